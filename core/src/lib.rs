//! # MyRamen Core
//!
//! Domain types and business workflows for the MyRamen ordering service.
//!
//! The crate is storage- and transport-agnostic: the workflows talk to
//! persistence through the [`store::CouponStore`] and [`store::OrderStore`]
//! traits and return plain view structs or a typed [`ServiceError`].
//!
//! ## Components
//!
//! - [`coupon::CouponService`]: issue, look up, list and redeem coupons
//! - [`order::OrderService`]: price an order, apply/issue coupons, persist
//!   it and manage its status
//! - [`pricing::PricingPolicy`]: unit price, surcharges and reward rules
//! - [`environment::Environment`]: injected clock and identifier generator
//!
//! ## Example
//!
//! ```ignore
//! use myramen_core::{CouponService, Environment, OrderService, PricingPolicy};
//!
//! let env = Environment::system();
//! let coupons = CouponService::new(coupon_store, env.clone());
//! let orders = OrderService::new(order_store, coupons, PricingPolicy::default(), env);
//!
//! let view = orders.place_order(request).await?;
//! println!("{} costs {}", view.order_id, view.total_price);
//! ```

pub mod coupon;
pub mod environment;
pub mod error;
pub mod metrics;
pub mod order;
pub mod pricing;
pub mod store;
pub mod types;

// Re-export commonly used types
pub use coupon::{CouponListView, CouponService, CouponView};
pub use environment::{Clock, Environment, IdGenerator, SystemClock, UuidIdGenerator};
pub use error::{CouponRejection, ErrorKind, Result, ServiceError, StoreError};
pub use order::{
    MAX_QUANTITY, OrderListView, OrderService, OrderView, PlaceOrderRequest, UpdateStatusRequest,
};
pub use pricing::PricingPolicy;
pub use store::{CouponStore, OrderStore, StoreResult};
pub use types::{
    Coupon, CouponId, CouponSnapshot, DeliveryOption, Money, Order, OrderId, OrderOptions,
    OrderStatus, SpiceLevel,
};
