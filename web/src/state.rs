//! Application state for Axum handlers.

use crate::extractors::AdminPassword;
use axum::extract::FromRef;
use myramen_core::{CouponService, OrderService};

/// Application state shared across all HTTP handlers.
///
/// Generic over the store implementations so the same router serves
/// PostgreSQL in production and in-memory stores in tests.
#[derive(Debug, Clone)]
pub struct AppState<O, C> {
    /// Order workflow
    pub orders: OrderService<O, C>,
    /// Coupon workflow
    pub coupons: CouponService<C>,
    /// Secret expected in the `X-Admin-Password` header
    pub admin_password: AdminPassword,
}

impl<O, C> AppState<O, C> {
    /// Create a new application state.
    #[must_use]
    pub const fn new(
        orders: OrderService<O, C>,
        coupons: CouponService<C>,
        admin_password: AdminPassword,
    ) -> Self {
        Self {
            orders,
            coupons,
            admin_password,
        }
    }
}

impl<O, C> FromRef<AppState<O, C>> for AdminPassword {
    fn from_ref(state: &AppState<O, C>) -> Self {
        state.admin_password.clone()
    }
}
