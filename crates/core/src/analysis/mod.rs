//! Analysis passes: line classification, syscall correlation, symbol table construction and
//! call graph reachability.
//!
//! Data flows strictly in that order. Only the last pass runs concurrently; the table it
//! reads is immutable by then.

pub mod classify;
pub mod correlate;
pub mod reachability;
pub mod symbols;

pub use classify::{LineClassifier, LineKind};
pub use correlate::SyscallCorrelator;
pub use reachability::{CancellationToken, Reachability, WalkStats};
pub use symbols::{BuildStats, SymbolTableBuilder};
