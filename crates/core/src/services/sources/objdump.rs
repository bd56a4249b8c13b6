use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::process::Command;

use log::debug;

use super::{LineStream, SourceError, SourceKind, SourceReader};

/// Disassembles a Go executable with `go tool objdump` and serves its output.
#[derive(Debug, Clone)]
pub struct ExeReader {
    path: PathBuf,
    go_path: PathBuf,
}

impl ExeReader {
    pub fn new(path: impl Into<PathBuf>, go_path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), go_path: go_path.into() }
    }
}

impl SourceReader for ExeReader {
    fn open(&self) -> Result<LineStream, SourceError> {
        let meta = fs::metadata(&self.path).map_err(|e| SourceError::from_io(&self.path, e))?;
        if !meta.is_file() {
            return Err(SourceError::NotFound(self.path.clone()));
        }

        #[cfg(feature = "elf-inspect")]
        super::elf::ensure_statically_linked(&self.path)?;

        let stdout = run_objdump(&self.go_path, &self.path)?;
        debug!("go tool objdump produced {} bytes for {}", stdout.len(), self.path.display());
        Ok(Box::new(Cursor::new(stdout)))
    }

    fn path(&self) -> &Path {
        &self.path
    }

    fn kind(&self) -> SourceKind {
        SourceKind::Executable
    }
}

fn run_objdump(go_bin: &Path, binary: &Path) -> Result<Vec<u8>, SourceError> {
    let output = Command::new(go_bin)
        .args(["tool", "objdump"])
        .arg(binary)
        .output()
        .map_err(|e| {
            SourceError::Disassembler(format!("failed to spawn {}: {e}", go_bin.display()))
        })?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let first = stderr.lines().next().unwrap_or("").trim();
        return Err(SourceError::Disassembler(format!(
            "go tool objdump exited with {}: {first}",
            output.status
        )));
    }
    Ok(output.stdout)
}
