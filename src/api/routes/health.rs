//! Health Routes
//!
//! Health check endpoints for monitoring and container probes.
//!
//! - GET / - Welcome banner
//! - GET /api/health - Service and database status
//! - GET /health/live - Liveness probe (process is alive)
//! - GET /health/ready - Readiness probe (database answers)

use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;
use std::sync::Arc;

use crate::api::dto::HealthResponse;
use crate::api::state::AppState;

/// GET /
pub async fn welcome() -> &'static str {
    "Welcome to the Glo Stock Canvas API!"
}

/// GET /api/health
///
/// Always 200; the `database` field reports whether SQLite answers.
pub async fn api_health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let database = if state.store.ping() {
        "Connected"
    } else {
        "Disconnected"
    };

    Json(HealthResponse {
        status: "OK".to_string(),
        timestamp: Utc::now(),
        database: database.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.uptime_seconds(),
    })
}

/// GET /health/live
///
/// Returns 200 if the process is alive, no dependency checks.
pub async fn liveness() -> StatusCode {
    StatusCode::OK
}

/// GET /health/ready
///
/// Returns 200 if the database answers, 503 otherwise.
pub async fn readiness(State(state): State<Arc<AppState>>) -> StatusCode {
    if state.store.ping() {
        StatusCode::OK
    } else {
        tracing::warn!("Readiness check failed: database unavailable");
        StatusCode::SERVICE_UNAVAILABLE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_liveness() {
        let status = liveness().await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_welcome_banner() {
        assert!(welcome().await.contains("Glo Stock"));
    }
}
