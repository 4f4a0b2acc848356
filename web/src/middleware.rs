//! Request tracking middleware.
//!
//! Every request gets a correlation ID:
//!
//! 1. **Extract** it from the `X-Correlation-ID` header when the client sent
//!    a usable one, otherwise generate a UUID v4
//! 2. **Store** it in request extensions as [`CorrelationId`]
//! 3. **Run** the rest of the stack inside an `http_request` span carrying it
//! 4. **Echo** it back in the response `X-Correlation-ID` header
//!
//! # Example
//!
//! ```ignore
//! use axum::Router;
//! use myramen_web::middleware::correlation_id_layer;
//!
//! let app = Router::new()
//!     .route("/api/v1/health", get(health_check))
//!     .layer(correlation_id_layer());
//! ```

use crate::extractors::CorrelationId;
use axum::{extract::Request, http::HeaderValue, response::Response};
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use tower::{Layer, Service};
use tracing::Instrument;
use uuid::Uuid;

/// Header name for correlation ID.
pub const CORRELATION_ID_HEADER: &str = "X-Correlation-ID";

/// Longest client-supplied correlation ID that is kept as is.
const MAX_CORRELATION_ID_LEN: usize = 128;

/// Create a layer that adds correlation ID tracking to all requests.
#[must_use]
pub const fn correlation_id_layer() -> CorrelationIdLayer {
    CorrelationIdLayer
}

/// Layer for correlation ID tracking.
#[derive(Clone, Copy, Debug, Default)]
pub struct CorrelationIdLayer;

impl<S> Layer<S> for CorrelationIdLayer {
    type Service = CorrelationIdMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        CorrelationIdMiddleware { inner }
    }
}

/// Middleware service for correlation ID tracking.
#[derive(Clone, Debug)]
pub struct CorrelationIdMiddleware<S> {
    inner: S,
}

impl<S> Service<Request> for CorrelationIdMiddleware<S>
where
    S: Service<Request, Response = Response> + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request) -> Self::Future {
        let correlation_id = req
            .headers()
            .get(CORRELATION_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(accept_client_id)
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        let span = tracing::info_span!(
            "http_request",
            correlation_id = %correlation_id,
            method = %req.method(),
            uri = %req.uri(),
        );

        let header_value = HeaderValue::from_str(&correlation_id).ok();
        req.extensions_mut().insert(CorrelationId(correlation_id));

        let fut = self.inner.call(req);

        Box::pin(async move {
            let mut response = fut.instrument(span).await?;

            if let Some(value) = header_value {
                response.headers_mut().insert(CORRELATION_ID_HEADER, value);
            }

            Ok(response)
        })
    }
}

/// Keep a client ID only if it is short, non-empty visible ASCII.
fn accept_client_id(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    let usable = !trimmed.is_empty()
        && trimmed.len() <= MAX_CORRELATION_ID_LEN
        && trimmed.bytes().all(|b| b.is_ascii_graphic());
    usable.then(|| trimmed.to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)] // Test code can use unwrap/expect
mod tests {
    use super::*;
    use axum::{Router, body::Body, http::Request, routing::get};
    use tower::ServiceExt;

    fn app() -> Router {
        Router::new()
            .route("/test", get(|id: CorrelationId| async move { id.0 }))
            .layer(correlation_id_layer())
    }

    #[tokio::test]
    async fn test_correlation_id_generated_if_missing() {
        let request = Request::builder().uri("/test").body(Body::empty()).unwrap();

        let response = app().oneshot(request).await.unwrap();

        let correlation_id = response
            .headers()
            .get(CORRELATION_ID_HEADER)
            .expect("Correlation ID header should be present");
        assert!(Uuid::parse_str(correlation_id.to_str().unwrap()).is_ok());
    }

    #[tokio::test]
    async fn test_correlation_id_preserved_from_request() {
        let request = Request::builder()
            .uri("/test")
            .header(CORRELATION_ID_HEADER, "checkout-42")
            .body(Body::empty())
            .unwrap();

        let response = app().oneshot(request).await.unwrap();

        let response_id = response
            .headers()
            .get(CORRELATION_ID_HEADER)
            .expect("Correlation ID header should be present")
            .to_str()
            .unwrap();
        assert_eq!(response_id, "checkout-42");

        let body = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
        assert_eq!(&body[..], b"checkout-42");
    }

    #[tokio::test]
    async fn test_oversized_id_is_replaced() {
        let request = Request::builder()
            .uri("/test")
            .header(CORRELATION_ID_HEADER, "x".repeat(MAX_CORRELATION_ID_LEN + 1))
            .body(Body::empty())
            .unwrap();

        let response = app().oneshot(request).await.unwrap();

        let id = response
            .headers()
            .get(CORRELATION_ID_HEADER)
            .unwrap()
            .to_str()
            .unwrap();
        assert!(Uuid::parse_str(id).is_ok());
    }

    #[test]
    fn test_accept_client_id() {
        assert_eq!(accept_client_id(" abc "), Some("abc".to_string()));
        assert_eq!(accept_client_id(""), None);
        assert_eq!(accept_client_id("has space"), None);
    }
}
