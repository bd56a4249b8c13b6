//! Run-level services: where the listing text comes from and the extraction that ties the
//! analysis passes together.

pub mod extract;
pub mod sources;

pub use extract::{extract, ExtractError, Extractor};
pub use sources::{DumpReader, ExeReader, LineStream, SourceError, SourceKind, SourceReader};
