//! Call Graph Reachability Engine.
//!
//! Walks the [`SymbolTable`] from a set of entry points. Callees are explored as tasks on a
//! bounded `rayon` pool; every result funnels through one channel into a single delivery
//! thread, so the consumer is never called concurrently.
//!
//! Both visited sets use [`DashSet::insert`], which tests and inserts in one step. Two
//! explorers racing on the same function or syscall id cannot both win.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::mpsc::{self, Sender};
use std::sync::Arc;
use std::thread;

use dashmap::DashSet;
use log::debug;
use rayon::ThreadPool;

use crate::model::{SymbolTable, SystemCall};
use crate::registry::SyscallRegistry;

/// Shared stop flag for a walk. Cloning yields a handle to the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Outcome counters of one walk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WalkStats {
    /// Functions visited for the first time (including names absent from the table).
    pub visited: usize,
    /// Visited functions that had a definition to expand.
    pub expanded: usize,
    /// Results handed to the consumer.
    pub delivered: usize,
    /// Whether the walk stopped early on cancellation.
    pub cancelled: bool,
}

/// One reachability walk over a built table. Visited state lives here, so a fresh value is
/// needed per run.
pub struct Reachability<'t> {
    table: &'t SymbolTable,
    registry: SyscallRegistry,
    visited_functions: DashSet<String>,
    visited_ids: DashSet<u16>,
    expanded: AtomicUsize,
    cancel: CancellationToken,
}

impl<'t> Reachability<'t> {
    pub fn new(
        table: &'t SymbolTable,
        registry: SyscallRegistry,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            table,
            registry,
            visited_functions: DashSet::new(),
            visited_ids: DashSet::new(),
            expanded: AtomicUsize::new(0),
            cancel,
        }
    }

    /// Explore everything reachable from `entry_points` on `pool`, handing each distinct
    /// syscall to `consume` exactly once. Blocks until the whole reachable subgraph has been
    /// explored and every result delivered.
    pub fn walk<F>(&self, pool: &ThreadPool, entry_points: &[String], mut consume: F) -> WalkStats
    where
        F: FnMut(SystemCall) + Send,
    {
        let (tx, rx) = mpsc::channel::<SystemCall>();

        let delivered = thread::scope(|threads| {
            let delivery = threads.spawn(move || {
                let mut delivered = 0usize;
                for call in rx {
                    consume(call);
                    delivered += 1;
                }
                delivered
            });

            pool.scope(move |scope| {
                for entry in entry_points {
                    if self.cancel.is_cancelled() {
                        break;
                    }
                    let tx = tx.clone();
                    scope.spawn(move |scope| self.explore(scope, entry.as_str(), tx));
                }
            });

            match delivery.join() {
                Ok(n) => n,
                Err(panic) => std::panic::resume_unwind(panic),
            }
        });

        let stats = WalkStats {
            visited: self.visited_functions.len(),
            expanded: self.expanded.load(Ordering::SeqCst),
            delivered,
            cancelled: self.cancel.is_cancelled(),
        };
        debug!("walk finished: {:?}", stats);
        stats
    }

    fn explore<'s>(&'s self, scope: &rayon::Scope<'s>, name: &'s str, tx: Sender<SystemCall>) {
        if !self.visited_functions.insert(name.to_string()) {
            return;
        }

        // Names without a definition are leaves.
        let table: &'t SymbolTable = self.table;
        let Some(definition) = table.get(name) else {
            return;
        };
        self.expanded.fetch_add(1, Ordering::SeqCst);
        debug!("expanding {name}");

        // A function's own syscalls go out before any of its callees are explored.
        for &id in &definition.syscall_ids {
            if self.visited_ids.insert(id) {
                let label = self.registry.name_for(id).unwrap_or_default();
                if tx.send(SystemCall::new(id, label)).is_err() {
                    return;
                }
            }
        }

        for target in &definition.call_targets {
            if self.cancel.is_cancelled() {
                return;
            }
            // Pre-check only; the authoritative test-and-insert is at the top of `explore`.
            if self.visited_functions.contains(target.as_str()) {
                continue;
            }
            let tx = tx.clone();
            scope.spawn(move |scope| self.explore(scope, target.as_str(), tx));
        }
    }

    /// Whether `name` has been visited by this walk.
    pub fn visited(&self, name: &str) -> bool {
        self.visited_functions.contains(name)
    }
}
