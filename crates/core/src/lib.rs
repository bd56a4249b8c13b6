//! systract-core
//!
//! Core library for static system call extraction from statically linked Go executables.
//!
//! The pipeline reads a textual disassembly (an `objdump` listing), builds a per-function call
//! graph annotated with syscall-invocation sites, and walks that graph from the program entry
//! points to produce a deduplicated list of system calls the binary may invoke.
//!
//! All substantive logic lives here so it is fully testable and reusable from multiple
//! frontends; the `systract` CLI is a thin wrapper.

pub mod analysis;
pub mod config;
pub mod model;
pub mod registry;
pub mod services;

/// Returns the library version as encoded at compile time.
///
/// Useful for tests and for frontends to report consistent version info.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
