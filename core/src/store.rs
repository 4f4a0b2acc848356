//! Persistence traits consumed by the workflows.
//!
//! The SQL-backed implementations live in `myramen-postgres`; in-memory ones
//! for tests live in `myramen-testing`. Methods return `Send` futures so the
//! workflows can be driven from multi-threaded HTTP handlers.

use crate::error::StoreError;
use crate::types::{Coupon, CouponId, Order, OrderId, OrderStatus};
use chrono::{DateTime, Utc};
use std::future::Future;

/// Result type alias for store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Durable record of coupons keyed by identifier.
pub trait CouponStore: Send + Sync {
    /// Insert a new coupon.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - A coupon with the same identifier exists → `StoreError::Conflict`
    /// - Database query fails
    fn create(&self, coupon: &Coupon) -> impl Future<Output = StoreResult<()>> + Send;

    /// Get a coupon by identifier, `None` if absent.
    ///
    /// # Errors
    ///
    /// Returns error if the database query fails.
    fn find_by_id(&self, id: &CouponId)
    -> impl Future<Output = StoreResult<Option<Coupon>>> + Send;

    /// All unused coupons whose expiry is after `now`, most recently issued
    /// first.
    ///
    /// # Errors
    ///
    /// Returns error if the database query fails.
    fn find_all_valid(
        &self,
        now: DateTime<Utc>,
    ) -> impl Future<Output = StoreResult<Vec<Coupon>>> + Send;

    /// Overwrite discount, expiry and used flag of an existing coupon.
    ///
    /// A used coupon stays used even if `coupon.used` is false.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - No coupon has this identifier → `StoreError::NotFound`
    /// - Database query fails
    fn update(&self, coupon: &Coupon) -> impl Future<Output = StoreResult<()>> + Send;

    /// Atomically flip the used flag from false to true.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - No coupon has this identifier → `StoreError::NotFound`
    /// - The coupon is already used → `StoreError::AlreadyUsed`
    /// - Database query fails
    fn mark_used(&self, id: &CouponId) -> impl Future<Output = StoreResult<()>> + Send;
}

/// Durable record of orders keyed by identifier.
pub trait OrderStore: Send + Sync {
    /// Insert a new order.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - An order with the same identifier exists → `StoreError::Conflict`
    /// - Database query or snapshot encoding fails
    fn create(&self, order: &Order) -> impl Future<Output = StoreResult<()>> + Send;

    /// Get an order by identifier, `None` if absent.
    ///
    /// # Errors
    ///
    /// Returns error if the database query or snapshot decoding fails.
    fn find_by_id(&self, id: &OrderId) -> impl Future<Output = StoreResult<Option<Order>>> + Send;

    /// All orders, newest first.
    ///
    /// # Errors
    ///
    /// Returns error if the database query or snapshot decoding fails.
    fn find_all(&self) -> impl Future<Output = StoreResult<Vec<Order>>> + Send;

    /// Set the status and refresh the updated timestamp.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - No order has this identifier → `StoreError::NotFound`
    /// - Database query fails
    fn update_status(
        &self,
        id: &OrderId,
        status: OrderStatus,
        updated_at: DateTime<Utc>,
    ) -> impl Future<Output = StoreResult<()>> + Send;

    /// Remove an order.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - No order has this identifier → `StoreError::NotFound`
    /// - Database query fails
    fn delete(&self, id: &OrderId) -> impl Future<Output = StoreResult<()>> + Send;
}
