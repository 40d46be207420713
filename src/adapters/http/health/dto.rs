//! HTTP DTOs for the health endpoint.

use serde::Serialize;

use crate::adapters::websocket::RelayStats;

// ════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Health report while the relay task is running.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub active_sessions: usize,
    pub terminated_sessions: usize,
    pub connections: usize,
    pub started_at: String,
}

impl HealthResponse {
    pub fn ok(stats: RelayStats, started_at: String) -> Self {
        Self {
            status: "ok",
            active_sessions: stats.active_sessions,
            terminated_sessions: stats.terminated_sessions,
            connections: stats.connections,
            started_at,
        }
    }
}

/// Health report when the relay task has stopped.
#[derive(Debug, Clone, Serialize)]
pub struct UnavailableResponse {
    pub status: &'static str,
}

impl Default for UnavailableResponse {
    fn default() -> Self {
        Self {
            status: "unavailable",
        }
    }
}
