//! Lifecycle of a session identifier.
//!
//! ```text
//! NeverSeen ──join──▶ Active ──terminate──▶ Terminated
//!     ▲                 │ ▲
//!     └──last member────┘ └── join / partial leave
//!        disconnects
//! ```
//!
//! An id emptied by disconnects becomes indistinguishable from one never
//! seen; an explicitly terminated id can never come back.

use crate::domain::foundation::StateMachine;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionLifecycle {
    /// No registry entry and not terminated.
    NeverSeen,
    /// Registered with at least one member.
    Active,
    /// Recorded in the termination ledger.
    Terminated,
}

impl StateMachine for SessionLifecycle {
    fn can_transition_to(&self, target: &Self) -> bool {
        use SessionLifecycle::*;
        matches!(
            (self, target),
            (NeverSeen, Active) | (Active, Active) | (Active, NeverSeen) | (Active, Terminated)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use SessionLifecycle::*;
        match self {
            NeverSeen => vec![Active],
            Active => vec![Active, NeverSeen, Terminated],
            Terminated => vec![],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use SessionLifecycle::*;

    #[test]
    fn terminated_is_the_only_terminal_state() {
        assert!(Terminated.is_terminal());
        assert!(!Active.is_terminal());
        assert!(!NeverSeen.is_terminal());
    }

    #[test]
    fn never_seen_cannot_be_terminated_directly() {
        assert!(!NeverSeen.can_transition_to(&Terminated));
        assert!(NeverSeen.transition_to(Terminated).is_err());
    }

    #[test]
    fn attrition_returns_to_never_seen() {
        assert_eq!(Active.transition_to(NeverSeen), Ok(NeverSeen));
    }

    #[test]
    fn terminated_cannot_be_revived() {
        for target in [NeverSeen, Active, Terminated] {
            assert!(!Terminated.can_transition_to(&target));
        }
    }

    #[test]
    fn valid_transitions_agree_with_can_transition_to() {
        for from in [NeverSeen, Active, Terminated] {
            for to in [NeverSeen, Active, Terminated] {
                assert_eq!(
                    from.can_transition_to(&to),
                    from.valid_transitions().contains(&to),
                    "{:?} -> {:?}",
                    from,
                    to
                );
            }
        }
    }
}
