//! Syscall Correlator: pairs immediate loads with a later invocation in the same function.

/// Pending syscall-number candidates for the current function block.
///
/// Only registry-validated values are ever pushed, see [`LineClassifier`].
///
/// [`LineClassifier`]: super::classify::LineClassifier
#[derive(Debug, Default, Clone)]
pub struct SyscallCorrelator {
    pending: Vec<u16>,
}

impl SyscallCorrelator {
    pub fn new() -> Self {
        Self { pending: Vec::new() }
    }

    /// Start a new function block.
    pub fn reset(&mut self) {
        self.pending.clear();
    }

    pub fn push(&mut self, id: u16) {
        self.pending.push(id);
    }

    /// Resolve the identifier for an invocation site.
    ///
    /// Pops up to two candidates. With two, the deeper one wins: the usual sequence is the
    /// syscall number load followed by one argument-register load, then the invocation.
    /// Returns `None` when nothing is pending.
    pub fn on_invocation(&mut self) -> Option<u16> {
        let top = self.pending.pop()?;
        Some(self.pending.pop().unwrap_or(top))
    }

    pub fn pending(&self) -> &[u16] {
        &self.pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_candidate_is_used() {
        let mut c = SyscallCorrelator::new();
        c.push(60);
        assert_eq!(c.on_invocation(), Some(60));
        assert!(c.pending().is_empty());
    }

    #[test]
    fn deeper_of_two_candidates_wins() {
        let mut c = SyscallCorrelator::new();
        c.push(1);
        c.push(2);
        assert_eq!(c.on_invocation(), Some(1));
        assert!(c.pending().is_empty());
    }

    #[test]
    fn only_two_slots_are_consumed() {
        let mut c = SyscallCorrelator::new();
        c.push(9);
        c.push(1);
        c.push(2);
        assert_eq!(c.on_invocation(), Some(1));
        assert_eq!(c.pending(), &[9]);
        assert_eq!(c.on_invocation(), Some(9));
    }

    #[test]
    fn empty_stack_yields_nothing() {
        let mut c = SyscallCorrelator::new();
        assert_eq!(c.on_invocation(), None);
        c.push(3);
        c.reset();
        assert_eq!(c.on_invocation(), None);
    }
}
