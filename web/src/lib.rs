//! Axum HTTP API for the MyRamen ordering service.
//!
//! This crate is the transport shell around the workflows in `myramen-core`:
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │            HTTP shell (Axum)            │  ← JSON, routes, admin header
//! │  - Request parsing                      │  ← Correlation IDs, tracing
//! │  - Error → status mapping               │
//! ├─────────────────────────────────────────┤
//! │            myramen-core                 │
//! │  - Pricing and coupon rules             │  ← Tested with in-memory stores
//! │  - Order and coupon workflows           │
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Request Flow
//!
//! 1. **HTTP Request** arrives at an Axum handler
//! 2. **Extract** the JSON body, path and (for admin routes) the admin header
//! 3. **Call** the order or coupon workflow
//! 4. **Map** the view or [`ServiceError`](myramen_core::ServiceError) to a response
//!
//! # Example
//!
//! ```ignore
//! use myramen_web::{AdminPassword, AppState, build_router};
//!
//! let state = AppState::new(order_service, coupon_service, AdminPassword::new("admin1234"));
//! let app = build_router(state);
//! axum::serve(listener, app).await?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

// Re-export key types for convenience
pub use error::{AppError, ErrorResponse};
pub use extractors::{ADMIN_PASSWORD_HEADER, AdminPassword, CorrelationId, RequireAdmin};
pub use middleware::{CORRELATION_ID_HEADER, correlation_id_layer};
pub use router::{API_PREFIX, build_router};
pub use state::AppState;

/// Result type alias for web handlers.
pub type WebResult<T> = Result<T, AppError>;
