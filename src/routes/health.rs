//! Health check endpoint for container orchestration.
//!
//! Provides a simple liveness probe that returns 200 OK when the process is running.
//! Used by Docker health checks, Kubernetes and load balancers to verify the service
//! is alive. It never contacts the cache service.

use axum::Json;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
}

/// Health check handler.
///
/// Returns `{"status": "ok"}`. This is a liveness probe - it only checks that
/// the process can respond to HTTP.
pub async fn health() -> Json<HealthStatus> {
    Json(HealthStatus { status: "ok" })
}
