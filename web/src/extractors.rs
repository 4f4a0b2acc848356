//! Custom Axum extractors.
//!
//! - [`CorrelationId`]: the request's correlation ID
//! - [`RequireAdmin`]: guard for admin-only routes, checking the
//!   `X-Admin-Password` header against the configured [`AdminPassword`]
//!
//! # Examples
//!
//! ```ignore
//! async fn list_orders(
//!     _admin: RequireAdmin,
//!     State(state): State<AppState<O, C>>,
//! ) -> Result<Json<OrderListView>, AppError> {
//!     Ok(Json(state.orders.list_orders().await?))
//! }
//! ```

use crate::error::AppError;
use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use std::convert::Infallible;
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

/// Header carrying the admin shared secret.
pub const ADMIN_PASSWORD_HEADER: &str = "X-Admin-Password";

/// Correlation ID for request tracing.
///
/// Set by the correlation-id middleware. Without the middleware, falls back
/// to the `X-Correlation-ID` header, or a fresh UUID v4.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorrelationId(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for CorrelationId
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        if let Some(id) = parts.extensions.get::<Self>() {
            return Ok(id.clone());
        }

        let correlation_id = parts
            .headers
            .get(crate::middleware::CORRELATION_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .filter(|s| !s.is_empty())
            .map_or_else(|| Uuid::new_v4().to_string(), ToString::to_string);

        Ok(Self(correlation_id))
    }
}

/// The configured admin shared secret.
///
/// `Debug` output is redacted.
#[derive(Clone, PartialEq, Eq)]
pub struct AdminPassword(Arc<str>);

impl AdminPassword {
    /// Wrap a configured password.
    #[must_use]
    pub fn new(password: impl Into<Arc<str>>) -> Self {
        Self(password.into())
    }

    /// Constant-time comparison against a presented value.
    #[must_use]
    pub fn matches(&self, presented: &str) -> bool {
        constant_time_eq::constant_time_eq(self.0.as_bytes(), presented.as_bytes())
    }
}

impl fmt::Debug for AdminPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AdminPassword(***)")
    }
}

/// Guard extractor for admin-only handlers.
///
/// Rejects with 401 when the `X-Admin-Password` header is missing or does
/// not match the configured password.
#[derive(Debug, Clone, Copy)]
pub struct RequireAdmin;

#[async_trait]
impl<S> FromRequestParts<S> for RequireAdmin
where
    AdminPassword: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let presented = parts
            .headers
            .get(ADMIN_PASSWORD_HEADER)
            .and_then(|value| value.to_str().ok())
            .filter(|value| !value.is_empty())
            .ok_or_else(|| AppError::unauthorized("admin authentication required"))?;

        if !AdminPassword::from_ref(state).matches(presented) {
            tracing::warn!(path = %parts.uri.path(), "Admin authentication failed");
            return Err(AppError::unauthorized("admin authentication failed"));
        }

        Ok(Self)
    }
}
