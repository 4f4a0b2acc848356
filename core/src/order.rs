//! Order workflow: price, apply and issue coupons, persist, project.
//!
//! # Placement
//!
//! 1. Validate the request (name, account, quantity, spice level)
//! 2. Price = unit price × quantity + option surcharges
//! 3. Apply the supplied coupon, if any: it must exist, be unused and not be
//!    expired; its discount is subtracted and it is redeemed
//! 4. Issue a reward coupon when the quantity reaches the threshold
//! 5. Persist the order as `PENDING` and return its projection

use crate::coupon::CouponService;
use crate::environment::Environment;
use crate::error::{CouponRejection, Result, ServiceError, StoreError};
use crate::metrics;
use crate::pricing::PricingPolicy;
use crate::store::{CouponStore, OrderStore};
use crate::types::{
    Coupon, CouponId, CouponSnapshot, DeliveryOption, Money, Order, OrderId, OrderOptions,
    OrderStatus, SpiceLevel,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

/// Largest quantity a single order may carry.
pub const MAX_QUANTITY: u32 = i32::MAX.unsigned_abs();

/// Request to place a new order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrderRequest {
    /// Customer name
    pub name: String,
    /// Account the customer pays from
    pub account_number: String,
    /// Number of portions
    pub quantity: u32,
    /// Requested spice level; absent or zero selects the default
    #[serde(default)]
    pub spicy_level: Option<u8>,
    /// Pickup or delivery
    pub delivery_option: DeliveryOption,
    /// Extra options
    #[serde(default)]
    pub options: OrderOptions,
    /// Coupon to apply; an empty or blank string means none
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coupon_id: Option<String>,
}

impl PlaceOrderRequest {
    /// Check the request and resolve the spice level.
    fn validate(&self) -> Result<SpiceLevel> {
        if self.name.trim().is_empty() {
            return Err(ServiceError::InvalidRequest("Name is required.".to_string()));
        }
        if self.account_number.trim().is_empty() {
            return Err(ServiceError::InvalidRequest(
                "Account number is required.".to_string(),
            ));
        }
        if self.quantity == 0 {
            return Err(ServiceError::InvalidRequest(
                "Quantity must be at least 1.".to_string(),
            ));
        }
        if self.quantity > MAX_QUANTITY {
            return Err(ServiceError::InvalidRequest(format!(
                "Quantity must be at most {MAX_QUANTITY}."
            )));
        }
        SpiceLevel::resolve(self.spicy_level).ok_or_else(|| {
            ServiceError::InvalidRequest("Spicy level must be between 1 and 5.".to_string())
        })
    }

    fn coupon_id(&self) -> Option<CouponId> {
        self.coupon_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(|id| CouponId::new(id.to_string()))
    }
}

/// Request to change an order's status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateStatusRequest {
    /// One of `PENDING`, `PAID`, `COOKING`, `READY`, `DELIVERING`, `DELIVERED`
    pub status: String,
}

/// Order as returned to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderView {
    /// Order identifier
    pub order_id: OrderId,
    /// Customer name
    pub name: String,
    /// Account number
    pub account_number: String,
    /// Number of portions
    pub quantity: u32,
    /// Spice level
    pub spicy_level: SpiceLevel,
    /// Pickup or delivery
    pub delivery_option: DeliveryOption,
    /// Extra options
    pub options: OrderOptions,
    /// Total after surcharges and discount
    pub total_price: Money,
    /// Current status
    pub status: OrderStatus,
    /// Coupon applied at placement
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub applied_coupon: Option<CouponSnapshot>,
    /// Coupon earned by this order
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_coupon: Option<CouponSnapshot>,
    /// Placement time
    pub created_at: DateTime<Utc>,
    /// Last status change
    pub updated_at: DateTime<Utc>,
}

impl From<Order> for OrderView {
    fn from(order: Order) -> Self {
        Self {
            order_id: order.id,
            name: order.customer_name,
            account_number: order.account_number,
            quantity: order.quantity,
            spicy_level: order.spice_level,
            delivery_option: order.delivery_option,
            options: order.options,
            total_price: order.total_price,
            status: order.status,
            applied_coupon: order.applied_coupon,
            new_coupon: order.new_coupon,
            created_at: order.created_at,
            updated_at: order.updated_at,
        }
    }
}

/// List of orders as returned to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderListView {
    /// Orders, newest first
    pub orders: Vec<OrderView>,
}

/// Order operations over an [`OrderStore`], using a [`CouponService`] for
/// coupon application and issuance.
#[derive(Debug, Clone)]
pub struct OrderService<O, C> {
    orders: O,
    coupons: CouponService<C>,
    pricing: PricingPolicy,
    env: Environment,
}

impl<O: OrderStore, C: CouponStore> OrderService<O, C> {
    /// Create an order service.
    #[must_use]
    pub const fn new(
        orders: O,
        coupons: CouponService<C>,
        pricing: PricingPolicy,
        env: Environment,
    ) -> Self {
        Self {
            orders,
            coupons,
            pricing,
            env,
        }
    }

    /// Place a new order.
    ///
    /// # Errors
    ///
    /// Returns:
    /// - `ServiceError::InvalidRequest` if validation fails
    /// - `ServiceError::InvalidCoupon` if the supplied coupon is unknown,
    ///   used or expired
    /// - `ServiceError::Store` on storage failure
    #[instrument(
        skip(self, request),
        fields(quantity = request.quantity, coupon_id = ?request.coupon_id)
    )]
    pub async fn place_order(&self, request: PlaceOrderRequest) -> Result<OrderView> {
        let spice_level = request.validate()?;
        let now = self.env.now();

        let mut total_price = self.pricing.subtotal(request.quantity, &request.options);

        let mut applied_coupon = None;
        if let Some(coupon_id) = request.coupon_id() {
            let coupon = self.usable_coupon(&coupon_id, now).await?;
            total_price = total_price.less_discount(coupon.discount);
            applied_coupon = Some(coupon.applied_snapshot());

            self.coupons
                .mark_redeemed(&coupon.id)
                .await
                .map_err(|err| match err {
                    ServiceError::CouponNotFound(_) => reject(CouponRejection::Unknown),
                    ServiceError::InvalidCoupon(reason) => reject(reason),
                    other => other,
                })?;
        }

        let mut new_coupon = None;
        if self.pricing.earns_reward(request.quantity) {
            let coupon = self
                .coupons
                .issue(self.pricing.reward_discount, self.pricing.reward_validity)
                .await?;
            new_coupon = Some(coupon.issued_snapshot());
        }

        let order = Order {
            id: OrderId::from_suffix(&self.env.ids.next_suffix()),
            customer_name: request.name,
            account_number: request.account_number,
            quantity: request.quantity,
            spice_level,
            delivery_option: request.delivery_option,
            options: request.options,
            total_price,
            status: OrderStatus::Pending,
            applied_coupon,
            new_coupon,
            created_at: now,
            updated_at: now,
        };

        self.orders.create(&order).await?;

        metrics::record_order_placed();
        info!(
            order_id = %order.id,
            total_price = %order.total_price,
            "Order placed"
        );
        Ok(order.into())
    }

    /// Get an order by identifier.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::OrderNotFound` if it does not exist, or
    /// `ServiceError::Store` if the lookup fails.
    #[instrument(skip(self), fields(order_id = %id))]
    pub async fn get_order(&self, id: &OrderId) -> Result<OrderView> {
        self.orders
            .find_by_id(id)
            .await?
            .map(OrderView::from)
            .ok_or_else(|| ServiceError::OrderNotFound(id.clone()))
    }

    /// All orders, newest first.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Store` if the query fails.
    #[instrument(skip(self))]
    pub async fn list_orders(&self) -> Result<OrderListView> {
        let orders = self.orders.find_all().await?;
        Ok(OrderListView {
            orders: orders.into_iter().map(OrderView::from).collect(),
        })
    }

    /// Change an order's status. Any status may follow any other.
    ///
    /// # Errors
    ///
    /// Returns:
    /// - `ServiceError::InvalidStatus` if the status is not recognised
    /// - `ServiceError::OrderNotFound` if the order does not exist
    /// - `ServiceError::Store` on storage failure
    #[instrument(skip(self, request), fields(order_id = %id, status = %request.status))]
    pub async fn update_status(
        &self,
        id: &OrderId,
        request: UpdateStatusRequest,
    ) -> Result<OrderView> {
        let status: OrderStatus = request
            .status
            .parse()
            .map_err(|_| ServiceError::InvalidStatus(request.status.clone()))?;

        if self.orders.find_by_id(id).await?.is_none() {
            return Err(ServiceError::OrderNotFound(id.clone()));
        }

        self.orders
            .update_status(id, status, self.env.now())
            .await
            .map_err(|err| match err {
                StoreError::NotFound => ServiceError::OrderNotFound(id.clone()),
                other => other.into(),
            })?;

        metrics::record_status_update(status);
        info!("Order status updated");

        self.get_order(id).await
    }

    /// Fetch a coupon and check it can be applied at `now`.
    async fn usable_coupon(&self, id: &CouponId, now: DateTime<Utc>) -> Result<Coupon> {
        let Some(coupon) = self.coupons.store().find_by_id(id).await? else {
            return Err(reject(CouponRejection::Unknown));
        };

        if coupon.used {
            return Err(reject(CouponRejection::AlreadyUsed));
        }

        if coupon.is_expired_at(now) {
            return Err(reject(CouponRejection::Expired));
        }

        Ok(coupon)
    }
}

fn reject(reason: CouponRejection) -> ServiceError {
    metrics::record_coupon_rejected(reason);
    warn!(reason = reason.as_str(), "Coupon rejected");
    ServiceError::InvalidCoupon(reason)
}
