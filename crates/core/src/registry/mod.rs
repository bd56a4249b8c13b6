//! Syscall Registry: numeric identifier to name lookup.
//!
//! The table is static process-wide data for the one supported target (x86-64 Linux); it is
//! consulted to validate load candidates and to label results.

mod x86_64;

use x86_64::SYSCALLS_X86_64;

/// Immutable view over a sorted `(id, name)` table.
#[derive(Debug, Clone, Copy)]
pub struct SyscallRegistry {
    entries: &'static [(u16, &'static str)],
}

impl SyscallRegistry {
    /// Registry for x86-64 Linux.
    pub fn x86_64() -> Self {
        Self { entries: SYSCALLS_X86_64 }
    }

    pub fn name_for(&self, id: u16) -> Option<&'static str> {
        self.entries.binary_search_by_key(&id, |(k, _)| *k).ok().map(|idx| self.entries[idx].1)
    }

    pub fn contains(&self, id: u16) -> bool {
        self.name_for(id).is_some()
    }

    /// Lowest identifier registered under `name`.
    pub fn id_for(&self, name: &str) -> Option<u16> {
        self.entries.iter().find(|(_, n)| *n == name).map(|(id, _)| *id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (u16, &'static str)> + '_ {
        self.entries.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for SyscallRegistry {
    fn default() -> Self {
        Self::x86_64()
    }
}
