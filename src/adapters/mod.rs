//! Adapters - connect the relay domain to the outside world.
//!
//! - `websocket` - Wire protocol, connection outboxes and the relay task
//! - `http` - Router assembly and the health endpoint

pub mod http;
pub mod websocket;
