//! Error types for the coupon and order workflows.
//!
//! Two layers:
//!
//! - [`StoreError`]: what a persistence collaborator can report
//! - [`ServiceError`]: what a workflow reports to its caller, classified by
//!   [`ErrorKind`] and a machine-readable [`ServiceError::code`]

use crate::types::{CouponId, OrderId};
use thiserror::Error;

/// Result type alias for workflow operations.
pub type Result<T> = std::result::Result<T, ServiceError>;

/// Failures reported by a coupon or order store.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// No row matched the identifier.
    #[error("Record not found")]
    NotFound,

    /// A conditional redeem found the coupon already used.
    #[error("Coupon already used")]
    AlreadyUsed,

    /// A record with the same identifier already exists.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// The backing database failed.
    #[error("Database error: {0}")]
    Database(String),

    /// A stored value could not be encoded or decoded.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Why a coupon could not be applied to an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CouponRejection {
    /// No coupon with that identifier exists.
    Unknown,
    /// The coupon was already redeemed.
    AlreadyUsed,
    /// The coupon is past its expiry.
    Expired,
}

impl CouponRejection {
    /// Human-readable reason shown to the customer.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::Unknown => "This coupon cannot be used.",
            Self::AlreadyUsed => "This coupon has already been used.",
            Self::Expired => "This coupon has expired.",
        }
    }

    /// Short label used in logs and metrics.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::AlreadyUsed => "already_used",
            Self::Expired => "expired",
        }
    }
}

/// Coarse classification that the transport layer maps to a response status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed or invalid input, including unusable coupons.
    BadRequest,
    /// Admin check failed.
    Unauthorized,
    /// Order or coupon does not exist.
    NotFound,
    /// Persistence or serialization failure.
    Internal,
}

/// Errors returned by the coupon and order workflows.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// The request failed validation.
    #[error("{0}")]
    InvalidRequest(String),

    /// The supplied coupon cannot be applied.
    #[error("{}", .0.message())]
    InvalidCoupon(CouponRejection),

    /// The requested status is not one of the known statuses.
    #[error("Invalid order status: {0}")]
    InvalidStatus(String),

    /// No order with this identifier.
    #[error("Order {0} not found")]
    OrderNotFound(OrderId),

    /// No coupon with this identifier.
    #[error("Coupon {0} not found")]
    CouponNotFound(CouponId),

    /// The persistence collaborator failed.
    #[error("Storage failure: {0}")]
    Store(#[from] StoreError),
}

impl ServiceError {
    /// Classification used to pick a response status.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidRequest(_) | Self::InvalidCoupon(_) | Self::InvalidStatus(_) => {
                ErrorKind::BadRequest
            }
            Self::OrderNotFound(_) | Self::CouponNotFound(_) => ErrorKind::NotFound,
            Self::Store(_) => ErrorKind::Internal,
        }
    }

    /// Machine-readable error code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidRequest(_) => "INVALID_REQUEST",
            Self::InvalidCoupon(_) => "INVALID_COUPON",
            Self::InvalidStatus(_) => "INVALID_STATUS",
            Self::OrderNotFound(_) | Self::CouponNotFound(_) => "NOT_FOUND",
            Self::Store(_) => "INTERNAL_ERROR",
        }
    }

    /// Message safe to show to a client.
    ///
    /// Storage failures are reduced to a generic message; the detail stays in
    /// the logs.
    #[must_use]
    pub fn public_message(&self) -> String {
        match self {
            Self::OrderNotFound(_) => "Order not found.".to_string(),
            Self::CouponNotFound(_) => "Coupon not found.".to_string(),
            Self::Store(_) => "Internal server error".to_string(),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coupon_rejections_share_code() {
        for rejection in [
            CouponRejection::Unknown,
            CouponRejection::AlreadyUsed,
            CouponRejection::Expired,
        ] {
            let err = ServiceError::InvalidCoupon(rejection);
            assert_eq!(err.kind(), ErrorKind::BadRequest);
            assert_eq!(err.code(), "INVALID_COUPON");
            assert_eq!(err.public_message(), rejection.message());
        }
    }

    #[test]
    fn store_errors_are_internal_and_opaque() {
        let err = ServiceError::from(StoreError::Database("connection reset".to_string()));
        assert_eq!(err.kind(), ErrorKind::Internal);
        assert_eq!(err.code(), "INTERNAL_ERROR");
        assert!(!err.public_message().contains("connection reset"));
    }

    #[test]
    fn not_found_variants() {
        let err = ServiceError::OrderNotFound(OrderId::new("o1".to_string()));
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(err.code(), "NOT_FOUND");
        assert_eq!(err.to_string(), "Order o1 not found");
    }
}
