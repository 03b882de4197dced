//! Health check handler

use axum::{Json, extract::State};
use serde::Serialize;
use crate::state::AppState;

/// Public health check response
#[derive(Debug, Serialize)]
pub struct HealthCheckResponse {
    /// Status indicator (always "ok")
    pub status: String,
}

/// GET /health
///
/// Liveness probe for load balancers. Touches neither the database nor
/// object storage.
///
/// # Example
/// ```bash
/// curl http://localhost:5000/health
/// # Returns: {"status":"ok"}
/// ```
pub async fn health_check(
    State(_state): State<AppState>,
) -> Json<HealthCheckResponse> {
    tracing::debug!("Health check requested");
    Json(HealthCheckResponse {
        status: "ok".to_string(),
    })
}
