//! Error types for web handlers.
//!
//! This module bridges workflow errors and HTTP responses, implementing
//! Axum's `IntoResponse` trait. Every error body has the shape
//! `{"error": "<CODE>", "message": "<text>"}`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use myramen_core::{ErrorKind, ServiceError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Application error type for web handlers.
///
/// # Examples
///
/// ```ignore
/// async fn handler(State(state): State<AppState<O, C>>) -> Result<Json<OrderView>, AppError> {
///     let order = state.orders.get_order(&id).await?;
///     Ok(Json(order))
/// }
/// ```
#[derive(Debug)]
pub struct AppError {
    /// HTTP status code
    status: StatusCode,
    /// Error message (user-facing)
    message: String,
    /// Error code (for client error handling)
    code: String,
    /// Internal error (for logging, not exposed to client)
    source: Option<anyhow::Error>,
}

impl AppError {
    /// Create a new application error.
    #[must_use]
    pub const fn new(status: StatusCode, message: String, code: String) -> Self {
        Self {
            status,
            message,
            code,
            source: None,
        }
    }

    /// Create a new error with a source error.
    #[must_use]
    pub fn with_source(mut self, source: anyhow::Error) -> Self {
        self.source = Some(source);
        self
    }

    /// Create a 400 Bad Request error with a specific code.
    #[must_use]
    pub fn bad_request(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message.into(), code.into())
    }

    /// Create a 401 Unauthorized error.
    #[must_use]
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::UNAUTHORIZED,
            message.into(),
            "UNAUTHORIZED".to_string(),
        )
    }

    /// HTTP status of the response.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// Machine-readable error code.
    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Error response body (JSON).
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorResponse {
    /// Error code (for client error handling).
    pub error: String,
    /// Human-readable error message.
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log internal errors
        if self.status.is_server_error() {
            if let Some(source) = &self.source {
                tracing::error!(
                    status = %self.status,
                    code = %self.code,
                    message = %self.message,
                    error = %source,
                    "Internal server error"
                );
            } else {
                tracing::error!(
                    status = %self.status,
                    code = %self.code,
                    message = %self.message,
                    "Internal server error"
                );
            }
        }

        let body = ErrorResponse {
            error: self.code,
            message: self.message,
        };

        (self.status, Json(body)).into_response()
    }
}

/// Map a workflow error onto its HTTP response.
impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        let status = match err.kind() {
            ErrorKind::BadRequest => StatusCode::BAD_REQUEST,
            ErrorKind::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let app_error = Self::new(status, err.public_message(), err.code().to_string());

        if status.is_server_error() {
            app_error.with_source(anyhow::Error::new(err))
        } else {
            app_error
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use myramen_core::{CouponId, CouponRejection, StoreError};

    #[test]
    fn test_error_display() {
        let err = AppError::bad_request("INVALID_REQUEST", "Invalid order request.");
        assert_eq!(err.to_string(), "[INVALID_REQUEST] Invalid order request.");
    }

    #[test]
    fn test_not_found_from_service() {
        let err = AppError::from(ServiceError::CouponNotFound(CouponId::new(
            "c1".to_string(),
        )));
        assert_eq!(err.status, StatusCode::NOT_FOUND);
        assert_eq!(err.code, "NOT_FOUND");
        assert_eq!(err.message, "Coupon not found.");
        assert!(err.source.is_none());
    }

    #[test]
    fn test_invalid_coupon_is_bad_request() {
        let err = AppError::from(ServiceError::InvalidCoupon(CouponRejection::Expired));
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.code, "INVALID_COUPON");
        assert_eq!(err.message, "This coupon has expired.");
    }

    #[test]
    fn test_store_failure_hides_detail() {
        let err = AppError::from(ServiceError::Store(StoreError::Database(
            "connection refused".to_string(),
        )));
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.code, "INTERNAL_ERROR");
        assert_eq!(err.message, "Internal server error");
        assert!(err.source.is_some());
    }

    #[test]
    fn test_unauthorized() {
        let err = AppError::unauthorized("admin authentication required");
        assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(err.code(), "UNAUTHORIZED");
    }
}
