//! Health endpoint reporting relay liveness and counters.

mod dto;
mod handlers;

pub use dto::{HealthResponse, UnavailableResponse};
pub use handlers::health;
