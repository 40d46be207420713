//! Domain layer containing the relay's business logic.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, state machine trait, errors)
//! - `relay` - Session registry, termination ledger and the event dispatcher

pub mod foundation;
pub mod relay;
