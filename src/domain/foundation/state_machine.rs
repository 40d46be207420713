//! State machine trait for lifecycle enums.
//!
//! Provides a consistent interface for validating and performing state
//! transitions on lifecycle statuses such as a session identifier's.

use super::TransitionError;

/// Trait for status enums that represent state machines.
///
/// Implementors define valid state transitions and get validated
/// transition methods for free.
///
/// # Example
///
/// ```ignore
/// impl StateMachine for SessionLifecycle {
///     fn can_transition_to(&self, target: &Self) -> bool {
///         matches!((self, target), (NeverSeen, Active) | (Active, Terminated))
///     }
///
///     fn valid_transitions(&self) -> Vec<Self> {
///         match self {
///             NeverSeen => vec![Active],
///             Active => vec![Terminated],
///             Terminated => vec![],
///         }
///     }
/// }
///
/// let next = current.transition_to(SessionLifecycle::Terminated)?;
/// ```
pub trait StateMachine: Sized + Copy + PartialEq + std::fmt::Debug {
    /// Returns true if transition from self to target is valid.
    fn can_transition_to(&self, target: &Self) -> bool;

    /// Returns all valid target states from current state.
    fn valid_transitions(&self) -> Vec<Self>;

    /// Performs transition with validation, returning error if invalid.
    fn transition_to(&self, target: Self) -> Result<Self, TransitionError> {
        if self.can_transition_to(&target) {
            Ok(target)
        } else {
            Err(TransitionError::invalid(self, target))
        }
    }

    /// Checks if current state is terminal (no valid outgoing transitions).
    fn is_terminal(&self) -> bool {
        self.valid_transitions().is_empty()
    }
}
