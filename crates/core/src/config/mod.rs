//! Engine configuration.
//!
//! Every field has a default, so an empty file (or no file at all) yields a working
//! configuration for Go executables. Files ending in `.json` are parsed as JSON, anything
//! else as YAML.

use std::env;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Symbols run at program start-up, in traversal order.
pub const DEFAULT_ENTRY_POINTS: &[&str] = &["main.main", "main.init.0", "main.init.1"];

/// Low-level wrappers whose call sites count as syscall invocations.
pub const DEFAULT_SYSCALL_WRAPPERS: &[&str] = &["syscall.Syscall", "golang.org/x/sys/unix.Syscall"];

fn default_entry_points() -> Vec<String> {
    DEFAULT_ENTRY_POINTS.iter().map(|s| s.to_string()).collect()
}

fn default_syscall_wrappers() -> Vec<String> {
    DEFAULT_SYSCALL_WRAPPERS.iter().map(|s| s.to_string()).collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Functions that seed the reachability walk.
    #[serde(default = "default_entry_points")]
    pub entry_points: Vec<String>,
    /// Wrapper names matched as a prefix of the call target.
    #[serde(default = "default_syscall_wrappers")]
    pub syscall_wrappers: Vec<String>,
    /// Worker threads for the reachability walk; `None` uses one per CPU.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jobs: Option<usize>,
    /// Go toolchain used to disassemble executables.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub go_path: Option<PathBuf>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            entry_points: default_entry_points(),
            syscall_wrappers: default_syscall_wrappers(),
            jobs: None,
            go_path: None,
        }
    }
}

impl EngineConfig {
    /// Load a configuration file (YAML or JSON based on extension).
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("Failed to read engine config at {}", path.display()))?;
        if path.extension().and_then(|e| e.to_str()) == Some("json") {
            serde_json::from_slice(&bytes).context("Failed to parse engine config JSON")
        } else if bytes.iter().all(u8::is_ascii_whitespace) {
            // serde_yaml rejects an empty document.
            Ok(Self::default())
        } else {
            serde_yaml::from_slice(&bytes).context("Failed to parse engine config YAML")
        }
    }

    /// Resolve the `go` executable: config, then `GO_BIN`, then `go` on `PATH`.
    pub fn resolve_go_path(&self) -> PathBuf {
        self.go_path
            .clone()
            .or_else(|| env::var_os("GO_BIN").map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from("go"))
    }
}
