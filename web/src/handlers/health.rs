//! Health check endpoint.
//!
//! Used by load balancers and monitoring systems to verify the process is up.

use axum::http::StatusCode;

/// Simple health check endpoint (for basic liveness).
///
/// Returns 200 OK to indicate the service is running.
/// This endpoint does NOT check the database.
///
/// # Endpoint
///
/// ```text
/// GET /api/v1/health
/// ```
#[allow(clippy::unused_async)]
pub async fn health_check() -> (StatusCode, &'static str) {
    (StatusCode::OK, "ok")
}
