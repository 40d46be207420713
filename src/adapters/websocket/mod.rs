//! WebSocket adapters for the session relay.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐   RelayCommand    ┌─────────────────────────────────┐
//! │ socket c1    │ ────────────────▶ │           relay task             │
//! │ socket c2    │ ────────────────▶ │   RelayState::apply(event)       │
//! │ socket c3    │ ────────────────▶ │   ConnectionHub::deliver_all     │
//! └──────────────┘                   └─────────────────────────────────┘
//!        ▲                                          │
//!        │           outbox (mpsc per connection)   │
//!        └──────────────────────────────────────────┘
//! ```
//!
//! # Components
//!
//! - [`messages`] - WebSocket message protocol types
//! - [`hub`] - Per-connection outboxes
//! - [`relay`] - The relay task and its handle
//! - [`handler`] - Axum WebSocket upgrade handler

pub mod handler;
pub mod hub;
pub mod messages;
pub mod relay;

pub use handler::ws_handler;
pub use hub::{ConnectionHub, DeliveryError};
pub use messages::{
    ChatMessage, ClientMessage, ErrorMessage, ProtocolError, ServerMessage, UserCountMessage,
};
pub use relay::{spawn_relay, RelayCommand, RelayError, RelayHandle, RelayStats};
