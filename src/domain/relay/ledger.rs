//! Termination ledger: session ids that can never be joined again.

use std::collections::HashSet;

use crate::domain::foundation::SessionId;

/// Append-only set of terminated session ids.
///
/// There is no removal operation; an entry lives for the rest of the
/// process.
#[derive(Debug, Default)]
pub struct TerminationLedger {
    terminated: HashSet<SessionId>,
}

impl TerminationLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a session as terminated. Returns false if it already was.
    pub fn record(&mut self, session_id: SessionId) -> bool {
        self.terminated.insert(session_id)
    }

    pub fn is_terminated(&self, session_id: &SessionId) -> bool {
        self.terminated.contains(session_id)
    }

    pub fn len(&self) -> usize {
        self.terminated.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terminated.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_is_permanent_and_idempotent() {
        let mut ledger = TerminationLedger::new();
        assert!(ledger.is_empty());

        assert!(ledger.record(SessionId::from("s")));
        assert!(!ledger.record(SessionId::from("s")));

        assert!(ledger.is_terminated(&SessionId::from("s")));
        assert!(!ledger.is_terminated(&SessionId::from("t")));
        assert_eq!(ledger.len(), 1);
    }
}
