//! SecureTalk relay - ephemeral two-party chat sessions
//!
//! This crate implements the server-side session relay: it tracks which
//! connections belong to which session, broadcasts messages between them,
//! and permanently closes sessions on request. Nothing is persisted.

pub mod adapters;
pub mod config;
pub mod domain;
pub mod server;
