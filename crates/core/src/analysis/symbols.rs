//! Symbol Table Builder: one sequential pass from listing text to [`SymbolTable`].

use std::io::{self, BufRead};

use log::{debug, trace, warn};

use crate::analysis::classify::{is_end_of_block, LineClassifier, LineKind};
use crate::analysis::correlate::SyscallCorrelator;
use crate::model::{FunctionDefinition, SymbolTable};

/// Groups lines into function blocks and records each block's call edges and syscall sites.
///
/// The pass is strictly ordered: the meaning of a line depends on the block state left by
/// the lines before it.
pub struct SymbolTableBuilder<'c> {
    classifier: &'c LineClassifier,
}

/// Function body currently being read.
struct Block {
    definition: FunctionDefinition,
    correlator: SyscallCorrelator,
}

impl Block {
    fn open(name: &str) -> Self {
        Self { definition: FunctionDefinition::new(name), correlator: SyscallCorrelator::new() }
    }

    fn feed(&mut self, kind: LineKind<'_>) {
        match kind {
            LineKind::SyscallInvocation => match self.correlator.on_invocation() {
                Some(id) => {
                    self.definition.syscall_ids.insert(id);
                }
                None => trace!("[{}] invocation without a pending id", self.definition.name),
            },
            LineKind::LoadCandidate(id) => self.correlator.push(id),
            LineKind::CallTarget(target) => self.definition.call_targets.push(target.to_string()),
            LineKind::FunctionStart(_) | LineKind::Ignored => {}
        }
    }
}

/// Counters reported after a build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildStats {
    pub lines: usize,
    pub blocks: usize,
    pub kept: usize,
    pub replaced: usize,
}

impl<'c> SymbolTableBuilder<'c> {
    pub fn new(classifier: &'c LineClassifier) -> Self {
        Self { classifier }
    }

    pub fn build<R: BufRead>(&self, reader: R) -> io::Result<SymbolTable> {
        self.build_with_stats(reader).map(|(table, _)| table)
    }

    /// Read the whole listing. Lines are decoded lossily; only I/O failures are errors.
    pub fn build_with_stats<R: BufRead>(
        &self,
        mut reader: R,
    ) -> io::Result<(SymbolTable, BuildStats)> {
        let mut table = SymbolTable::new();
        let mut stats = BuildStats::default();
        let mut block: Option<Block> = None;
        let mut buf = Vec::with_capacity(256);

        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            stats.lines += 1;
            let text = String::from_utf8_lossy(&buf);
            let line = text.trim_end_matches(['\n', '\r']);

            if is_end_of_block(line) {
                if let Some(done) = block.take() {
                    close(done, &mut table, &mut stats);
                }
                continue;
            }

            if block.is_none() {
                if let Some(name) = self.classifier.function_start(line) {
                    block = Some(Block::open(name));
                }
                continue;
            }

            match self.classifier.classify(line) {
                // Listings normally separate bodies with a blank line; a stray `TEXT` still
                // starts a new body rather than being folded into the previous one.
                LineKind::FunctionStart(name) => {
                    if let Some(done) = block.replace(Block::open(name)) {
                        close(done, &mut table, &mut stats);
                    }
                }
                kind => {
                    if let Some(open) = block.as_mut() {
                        open.feed(kind);
                    }
                }
            }
        }

        if let Some(done) = block.take() {
            close(done, &mut table, &mut stats);
        }

        debug!(
            "symbol table built: {} lines, {} functions, {} kept",
            stats.lines, stats.blocks, stats.kept
        );
        Ok((table, stats))
    }
}

fn close(block: Block, table: &mut SymbolTable, stats: &mut BuildStats) {
    stats.blocks += 1;
    let definition = block.definition;
    if definition.is_empty() {
        trace!("[{}] skipping empty symbol", definition.name);
        return;
    }

    debug!(
        "[{}] {} call(s), syscalls {:?}",
        definition.name,
        definition.call_targets.len(),
        definition.syscall_ids
    );
    stats.kept += 1;
    if let Some(previous) = table.insert(definition) {
        stats.replaced += 1;
        warn!("duplicate definition of {}; keeping the later one", previous.name);
    }
}
