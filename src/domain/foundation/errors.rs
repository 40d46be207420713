//! Error types for the domain layer.

use thiserror::Error;

/// Raised when a lifecycle transition is not allowed by its state machine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("Cannot transition from {from} to {to}")]
    Invalid { from: String, to: String },
}

impl TransitionError {
    /// Creates an invalid transition error from any debuggable states.
    pub fn invalid(from: impl std::fmt::Debug, to: impl std::fmt::Debug) -> Self {
        TransitionError::Invalid {
            from: format!("{:?}", from),
            to: format!("{:?}", to),
        }
    }
}
