//! HTTP adapters - router assembly and plain HTTP endpoints.
//!
//! - `health` - Liveness and relay counters
//! - `routes` - Top-level router with the WebSocket endpoint, CORS and tracing

pub mod health;
pub mod routes;

pub use routes::app_router;

use chrono::{DateTime, Utc};

use crate::adapters::websocket::RelayHandle;

/// Shared state for every HTTP and WebSocket handler.
#[derive(Clone)]
pub struct AppState {
    /// Handle to the relay task.
    pub relay: RelayHandle,

    /// Largest accepted WebSocket message in bytes.
    pub max_message_bytes: usize,

    /// When this process started serving.
    pub started_at: DateTime<Utc>,
}

impl AppState {
    pub fn new(relay: RelayHandle, max_message_bytes: usize) -> Self {
        Self {
            relay,
            max_message_bytes,
            started_at: Utc::now(),
        }
    }
}
