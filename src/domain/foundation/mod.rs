//! Foundation module - Shared domain primitives.
//!
//! Contains identifiers, the state machine trait, and error types
//! that form the vocabulary of the relay domain.

mod errors;
mod ids;
mod state_machine;

pub use errors::TransitionError;
pub use ids::{ConnectionId, SessionId};
pub use state_machine::StateMachine;
