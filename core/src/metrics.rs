//! Business metrics for orders and coupons.
//!
//! # Exported Metrics
//!
//! - `myramen_orders_placed_total` - Orders persisted
//! - `myramen_order_status_updates_total{status}` - Status changes by target status
//! - `myramen_coupons_issued_total` - Reward coupons issued
//! - `myramen_coupons_redeemed_total` - Coupons applied to an order
//! - `myramen_coupon_rejections_total{reason}` - Coupons refused at placement
//!
//! Recording is a no-op until a recorder is installed.

use crate::error::CouponRejection;
use crate::types::OrderStatus;
use metrics::describe_counter;

/// Register metric descriptions. Call once at startup.
pub fn register_business_metrics() {
    describe_counter!("myramen_orders_placed_total", "Total number of orders placed");
    describe_counter!(
        "myramen_order_status_updates_total",
        "Total number of order status changes by target status"
    );
    describe_counter!(
        "myramen_coupons_issued_total",
        "Total number of reward coupons issued"
    );
    describe_counter!(
        "myramen_coupons_redeemed_total",
        "Total number of coupons applied to orders"
    );
    describe_counter!(
        "myramen_coupon_rejections_total",
        "Total number of coupons refused by reason (unknown, already_used, expired)"
    );
}

pub(crate) fn record_order_placed() {
    metrics::counter!("myramen_orders_placed_total").increment(1);
}

pub(crate) fn record_status_update(status: OrderStatus) {
    metrics::counter!("myramen_order_status_updates_total", "status" => status.as_str())
        .increment(1);
}

pub(crate) fn record_coupon_issued() {
    metrics::counter!("myramen_coupons_issued_total").increment(1);
}

pub(crate) fn record_coupon_redeemed() {
    metrics::counter!("myramen_coupons_redeemed_total").increment(1);
}

pub(crate) fn record_coupon_rejected(reason: CouponRejection) {
    metrics::counter!("myramen_coupon_rejections_total", "reason" => reason.as_str())
        .increment(1);
}
