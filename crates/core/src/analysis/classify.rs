//! Line Classifier: sorts one `go tool objdump` line into a [`LineKind`].
//!
//! Classification is best-effort and line-local. Anything the patterns do not recognize is
//! [`LineKind::Ignored`]; malformed text is never an error, since the listing format drifts
//! between toolchain versions.

use regex::Regex;

use crate::registry::SyscallRegistry;

/// Category of a single disassembly line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind<'a> {
    /// `TEXT main.main(SB) /src/main.go`
    FunctionStart(&'a str),
    /// `CALL main.helper(SB)`; indirect calls never produce this.
    CallTarget(&'a str),
    /// `MOVL $0x3c, AX` where `0x3c` is a registered syscall id.
    LoadCandidate(u16),
    /// `SYSCALL`, or a call into one of the configured syscall wrappers.
    SyscallInvocation,
    Ignored,
}

// Symbol names: dotted package paths plus receiver decorations such as `(*File)` and
// instantiation brackets. The lazy repetition stops at the first `(SB)`.
const SYMBOL_CHARS: &str = r"[A-Za-z0-9_./%*()\[\]\-]+?";

/// Compiled line patterns; build once per run and reuse for every line.
#[derive(Debug, Clone)]
pub struct LineClassifier {
    function_start: Regex,
    call_target: Regex,
    load_candidate: Regex,
    invocation: Regex,
    registry: SyscallRegistry,
}

impl LineClassifier {
    pub fn new(
        registry: SyscallRegistry,
        syscall_wrappers: &[String],
    ) -> Result<Self, regex::Error> {
        let mut invocation = String::from(r"\bSYSCALL\b");
        let wrappers: Vec<String> = syscall_wrappers
            .iter()
            .filter(|w| !w.is_empty())
            .map(|w| regex::escape(w))
            .collect();
        if !wrappers.is_empty() {
            // Prefix match: `syscall.Syscall` also covers `syscall.Syscall6`. Any leading package
            // path is accepted, so `internal/runtime/syscall.Syscall6` counts too.
            invocation.push_str(r"|\b(?:CALL|JMP)\s+(?:[\w.%\-]+/)*(?:");
            invocation.push_str(&wrappers.join("|"));
            invocation.push(')');
        }

        Ok(Self {
            function_start: Regex::new(&format!(r"^\s*TEXT\s+({SYMBOL_CHARS})\(SB\)"))?,
            call_target: Regex::new(&format!(r"\bCALL\s+({SYMBOL_CHARS})\(SB\)"))?,
            load_candidate: Regex::new(r"\bMOV[LQ]\s+\$0x([0-9A-Fa-f]+)\b")?,
            invocation: Regex::new(&invocation)?,
            registry,
        })
    }

    /// Classify a line. Checked in order: function start, syscall invocation, load candidate,
    /// call target. Invocation wins over the other two so that a wrapper call is never
    /// recorded as a plain call edge.
    pub fn classify<'a>(&self, line: &'a str) -> LineKind<'a> {
        if let Some(name) = self.function_start(line) {
            return LineKind::FunctionStart(name);
        }
        if self.invocation.is_match(line) {
            return LineKind::SyscallInvocation;
        }
        if let Some(caps) = self.load_candidate.captures(line) {
            // Unregistered constants (addresses, sizes, flags) are dropped here so they never
            // reach the correlator.
            return match u16::from_str_radix(&caps[1], 16) {
                Ok(id) if self.registry.contains(id) => LineKind::LoadCandidate(id),
                _ => LineKind::Ignored,
            };
        }
        if let Some(caps) = self.call_target.captures(line) {
            if let Some(m) = caps.get(1) {
                return LineKind::CallTarget(m.as_str());
            }
        }
        LineKind::Ignored
    }

    /// Name declared by a `TEXT` directive, if the line is one.
    pub fn function_start<'a>(&self, line: &'a str) -> Option<&'a str> {
        self.function_start.captures(line).and_then(|caps| caps.get(1)).map(|m| m.as_str())
    }
}

/// Blank lines terminate a function body.
pub fn is_end_of_block(line: &str) -> bool {
    line.trim().is_empty()
}
