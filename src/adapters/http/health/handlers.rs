//! HTTP handlers for the health endpoint.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::adapters::http::AppState;

use super::dto::{HealthResponse, UnavailableResponse};

/// GET /health - Relay liveness and counters
pub async fn health(State(state): State<AppState>) -> Response {
    match state.relay.stats().await {
        Ok(stats) => {
            let started_at = state.started_at.to_rfc3339();
            (StatusCode::OK, Json(HealthResponse::ok(stats, started_at))).into_response()
        }
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(UnavailableResponse::default()),
            )
                .into_response()
        }
    }
}
