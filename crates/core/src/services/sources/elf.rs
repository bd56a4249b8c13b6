//! Header check for executables: only statically linked binaries are analyzed.

use std::fs;
use std::path::Path;

use goblin::Object;

use super::SourceError;

/// Reject ELF executables that request an interpreter or shared libraries. Non-ELF or
/// unparseable files pass through; the disassembler reports on those.
pub(crate) fn ensure_statically_linked(path: &Path) -> Result<(), SourceError> {
    let bytes = fs::read(path).map_err(|e| SourceError::from_io(path, e))?;
    if let Ok(Object::Elf(elf)) = Object::parse(&bytes) {
        if elf.interpreter.is_some() || !elf.libraries.is_empty() {
            return Err(SourceError::DynamicallyLinked(path.to_path_buf()));
        }
    }
    Ok(())
}
