//! Core data model shared by the analysis passes and the frontends.

use std::collections::HashMap;

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

/// A system call discovered in the execution path of a binary.
///
/// `name` is empty when the registry has no entry for `id`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SystemCall {
    pub id: u16,
    pub name: String,
}

impl SystemCall {
    pub fn new(id: u16, name: impl Into<String>) -> Self {
        Self { id, name: name.into() }
    }
}

/// Call edges and direct syscall sites of one function body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FunctionDefinition {
    pub name: String,
    /// Direct call targets in the order they appear; duplicates are kept.
    pub call_targets: Vec<String>,
    /// Syscall identifiers invoked directly by this function, in first-seen order.
    pub syscall_ids: IndexSet<u16>,
}

impl FunctionDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), ..Default::default() }
    }

    /// A definition that neither calls anything nor invokes a syscall cannot
    /// contribute to reachability.
    pub fn is_empty(&self) -> bool {
        self.call_targets.is_empty() && self.syscall_ids.is_empty()
    }
}

/// Function name to definition, built once per analysis run and read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    functions: HashMap<String, FunctionDefinition>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self { functions: HashMap::new() }
    }

    /// Store a definition, returning the one it replaced (if the name was already defined).
    pub fn insert(&mut self, definition: FunctionDefinition) -> Option<FunctionDefinition> {
        self.functions.insert(definition.name.clone(), definition)
    }

    pub fn get(&self, name: &str) -> Option<&FunctionDefinition> {
        self.functions.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}
