#![allow(dead_code)]

use std::path::{Path, PathBuf};

use systract_core::services::DumpReader;
use tempfile::TempDir;

/// Path of a checked-in fixture listing.
pub fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join("fixtures").join(name)
}

/// Write `body` as a dump file inside a fresh temp dir.
pub fn write_dump(body: &str) -> (TempDir, DumpReader) {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("caps-dump");
    std::fs::write(&path, body).expect("write dump");
    (dir, DumpReader::new(path))
}

/// Sorted `(id, name)` pairs, for comparing results whose order depends on scheduling.
pub fn sorted(calls: &[systract_core::model::SystemCall]) -> Vec<(u16, String)> {
    let mut out: Vec<(u16, String)> = calls.iter().map(|c| (c.id, c.name.clone())).collect();
    out.sort();
    out
}
