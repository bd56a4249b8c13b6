//! Text sources for the disassembly listing.
//!
//! Two variants exist: [`DumpReader`] reads a listing produced earlier, [`ExeReader`] runs
//! `go tool objdump` against an executable. The analysis does not care which one it got.

use std::io::{self, BufRead};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

mod dump;
#[cfg(feature = "elf-inspect")]
mod elf;
mod objdump;

pub use dump::DumpReader;
pub use objdump::ExeReader;

/// Line-oriented listing handed to the symbol table builder.
pub type LineStream = Box<dyn BufRead + Send>;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Input not found at {0}")]
    NotFound(PathBuf),
    #[error("Permission denied reading {0}")]
    PermissionDenied(PathBuf),
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Disassembler error: {0}")]
    Disassembler(String),
    #[error("{0} is dynamically linked")]
    DynamicallyLinked(PathBuf),
}

impl SourceError {
    /// Map an I/O error on `path` to the matching variant.
    pub fn from_io(path: &Path, err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => SourceError::NotFound(path.to_path_buf()),
            io::ErrorKind::PermissionDenied => SourceError::PermissionDenied(path.to_path_buf()),
            _ => SourceError::Io { path: path.to_path_buf(), source: err },
        }
    }
}

/// What kind of input a source reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    Dump,
    Executable,
}

/// Provider of a disassembly listing.
pub trait SourceReader: Send + Sync {
    fn open(&self) -> Result<LineStream, SourceError>;
    fn path(&self) -> &Path;
    fn kind(&self) -> SourceKind;
}
