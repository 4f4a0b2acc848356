//! HTTP handlers for orders.

use crate::WebResult;
use crate::error::AppError;
use crate::extractors::{CorrelationId, RequireAdmin};
use crate::state::AppState;
use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use myramen_core::{
    CouponStore, OrderId, OrderListView, OrderStore, OrderView, PlaceOrderRequest,
    UpdateStatusRequest,
};

/// Place a new order.
///
/// # Endpoint
///
/// ```text
/// POST /api/v1/orders
/// Content-Type: application/json
///
/// {
///   "name": "Kim",
///   "accountNumber": "110-123-456789",
///   "quantity": 3,
///   "spicyLevel": 2,
///   "deliveryOption": "PICKUP_4F",
///   "options": { "chopsticks": true, "hotWaterDelivery": true, "cookingService": false },
///   "couponId": "c0f3..."
/// }
/// ```
///
/// # Response
///
/// `201 Created` with the order projection, including `appliedCoupon`
/// and/or `newCoupon` when present.
///
/// # Errors
///
/// - 400 `INVALID_REQUEST` for a malformed body or failed validation
/// - 400 `INVALID_COUPON` if the coupon is unknown, used or expired
/// - 500 `INTERNAL_ERROR` on storage failure
pub async fn place_order<O, C>(
    State(state): State<AppState<O, C>>,
    CorrelationId(correlation_id): CorrelationId,
    payload: Result<Json<PlaceOrderRequest>, JsonRejection>,
) -> WebResult<(StatusCode, Json<OrderView>)>
where
    O: OrderStore,
    C: CouponStore,
{
    let Json(request) = payload.map_err(|rejection| {
        tracing::debug!(%correlation_id, error = %rejection, "Rejected order body");
        AppError::bad_request("INVALID_REQUEST", "Invalid order request.")
    })?;

    let order = state.orders.place_order(request).await?;
    Ok((StatusCode::CREATED, Json(order)))
}

/// Get an order.
///
/// # Endpoint
///
/// ```text
/// GET /api/v1/orders/:order_id
/// ```
///
/// # Errors
///
/// - 404 `NOT_FOUND` if no order has this identifier
pub async fn get_order<O, C>(
    State(state): State<AppState<O, C>>,
    Path(order_id): Path<String>,
) -> WebResult<Json<OrderView>>
where
    O: OrderStore,
    C: CouponStore,
{
    let order = state.orders.get_order(&OrderId::new(order_id)).await?;
    Ok(Json(order))
}

/// List all orders, newest first. Admin only.
///
/// # Endpoint
///
/// ```text
/// GET /api/v1/admin/orders
/// X-Admin-Password: <secret>
/// ```
///
/// # Response
///
/// ```json
/// { "orders": [ ... ] }
/// ```
pub async fn list_orders<O, C>(
    _admin: RequireAdmin,
    State(state): State<AppState<O, C>>,
) -> WebResult<Json<OrderListView>>
where
    O: OrderStore,
    C: CouponStore,
{
    Ok(Json(state.orders.list_orders().await?))
}

/// Change an order's status. Admin only.
///
/// # Endpoint
///
/// ```text
/// PUT /api/v1/admin/orders/:order_id/status
/// X-Admin-Password: <secret>
///
/// { "status": "COOKING" }
/// ```
///
/// # Errors
///
/// - 400 `INVALID_STATUS` for a malformed body or unknown status
/// - 404 `NOT_FOUND` if no order has this identifier
pub async fn update_order_status<O, C>(
    _admin: RequireAdmin,
    State(state): State<AppState<O, C>>,
    CorrelationId(correlation_id): CorrelationId,
    Path(order_id): Path<String>,
    payload: Result<Json<UpdateStatusRequest>, JsonRejection>,
) -> WebResult<Json<OrderView>>
where
    O: OrderStore,
    C: CouponStore,
{
    let Json(request) = payload.map_err(|rejection| {
        tracing::debug!(%correlation_id, error = %rejection, "Rejected status body");
        AppError::bad_request("INVALID_STATUS", "Invalid order status.")
    })?;

    let order = state
        .orders
        .update_status(&OrderId::new(order_id), request)
        .await?;
    Ok(Json(order))
}
