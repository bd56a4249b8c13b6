use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use super::{LineStream, SourceError, SourceKind, SourceReader};

/// Reads a previously produced `go tool objdump` listing verbatim.
#[derive(Debug, Clone)]
pub struct DumpReader {
    path: PathBuf,
}

impl DumpReader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SourceReader for DumpReader {
    fn open(&self) -> Result<LineStream, SourceError> {
        let file = File::open(&self.path).map_err(|e| SourceError::from_io(&self.path, e))?;
        Ok(Box::new(BufReader::new(file)))
    }

    fn path(&self) -> &Path {
        &self.path
    }

    fn kind(&self) -> SourceKind {
        SourceKind::Dump
    }
}
