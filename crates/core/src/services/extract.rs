//! Extraction: source text to deduplicated system call list.

use std::io::BufRead;

use log::info;
use thiserror::Error;

use crate::analysis::{
    CancellationToken, LineClassifier, Reachability, SymbolTableBuilder, WalkStats,
};
use crate::config::EngineConfig;
use crate::model::{SymbolTable, SystemCall};
use crate::registry::SyscallRegistry;
use crate::services::sources::{SourceError, SourceReader};

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Input unavailable: {0}")]
    InputUnavailable(#[source] SourceError),
    #[error("Unsupported binary kind: {0}")]
    UnsupportedBinaryKind(String),
    #[error("Invalid line pattern: {0}")]
    Pattern(#[from] regex::Error),
    #[error("Failed to start worker pool: {0}")]
    WorkerPool(String),
    #[error("Extraction cancelled after {delivered} result(s)")]
    Cancelled { delivered: usize },
}

impl From<SourceError> for ExtractError {
    fn from(err: SourceError) -> Self {
        match err {
            SourceError::DynamicallyLinked(path) => ExtractError::UnsupportedBinaryKind(format!(
                "{} is dynamically linked; only static executables are supported",
                path.display()
            )),
            other => ExtractError::InputUnavailable(other),
        }
    }
}

/// Extraction settings plus compiled line patterns.
///
/// Holds no per-run state: every call builds its own symbol table and visited sets, so one
/// extractor can serve several runs, including concurrent ones.
pub struct Extractor {
    config: EngineConfig,
    registry: SyscallRegistry,
    classifier: LineClassifier,
    cancel: CancellationToken,
}

impl Extractor {
    pub fn new(config: EngineConfig) -> Result<Self, ExtractError> {
        let registry = SyscallRegistry::x86_64();
        let classifier = LineClassifier::new(registry, &config.syscall_wrappers)?;
        Ok(Self { config, registry, classifier, cancel: CancellationToken::new() })
    }

    /// Use `token` to stop walks started by this extractor.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Collect every system call reachable from the configured entry points.
    pub fn extract(&self, source: &dyn SourceReader) -> Result<Vec<SystemCall>, ExtractError> {
        let mut calls = Vec::new();
        self.extract_with(source, |call| calls.push(call))?;
        Ok(calls)
    }

    /// Like [`extract`](Self::extract), streaming each result to `consume` in discovery
    /// order. `consume` is never called concurrently.
    pub fn extract_with<F>(
        &self,
        source: &dyn SourceReader,
        consume: F,
    ) -> Result<WalkStats, ExtractError>
    where
        F: FnMut(SystemCall) + Send,
    {
        let reader = source.open()?;
        let table = self
            .build_table(reader)
            .map_err(|e| SourceError::from_io(source.path(), e))?;
        info!("{}: {} function(s) with calls or syscalls", source.path().display(), table.len());
        self.extract_from_table(&table, consume)
    }

    pub fn build_table<R: BufRead>(&self, reader: R) -> std::io::Result<SymbolTable> {
        SymbolTableBuilder::new(&self.classifier).build(reader)
    }

    /// Walk an already built table. Fails before delivering anything when no entry point is
    /// defined in `table`.
    pub fn extract_from_table<F>(
        &self,
        table: &SymbolTable,
        consume: F,
    ) -> Result<WalkStats, ExtractError>
    where
        F: FnMut(SystemCall) + Send,
    {
        let entry_points = &self.config.entry_points;
        if !entry_points.iter().any(|name| table.contains(name)) {
            return Err(ExtractError::UnsupportedBinaryKind(format!(
                "none of the entry points ({}) was found; libraries are not supported",
                entry_points.join(", ")
            )));
        }

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.jobs.unwrap_or(0))
            .thread_name(|idx| format!("systract-walk-{idx}"))
            .build()
            .map_err(|e| ExtractError::WorkerPool(e.to_string()))?;

        let walker = Reachability::new(table, self.registry, self.cancel.clone());
        let stats = walker.walk(&pool, entry_points, consume);
        if stats.cancelled {
            return Err(ExtractError::Cancelled { delivered: stats.delivered });
        }

        info!(
            "{} system call(s) across {} expanded function(s)",
            stats.delivered, stats.expanded
        );
        Ok(stats)
    }
}

/// Extract with the default configuration.
pub fn extract(source: &dyn SourceReader) -> Result<Vec<SystemCall>, ExtractError> {
    Extractor::new(EngineConfig::default())?.extract(source)
}
