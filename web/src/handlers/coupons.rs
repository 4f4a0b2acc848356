//! HTTP handlers for coupons.

use crate::WebResult;
use crate::extractors::RequireAdmin;
use crate::state::AppState;
use axum::{
    Json,
    extract::{Path, State},
};
use myramen_core::{CouponId, CouponListView, CouponStore, CouponView, OrderStore};

/// Get a coupon.
///
/// # Endpoint
///
/// ```text
/// GET /api/v1/coupons/:coupon_id
/// ```
///
/// # Response
///
/// ```json
/// {
///   "couponId": "c0f3...",
///   "discount": 200,
///   "expiryDate": "2025-01-31T00:00:00Z",
///   "isUsed": false,
///   "issuedAt": "2025-01-01T00:00:00Z"
/// }
/// ```
pub async fn get_coupon<O, C>(
    State(state): State<AppState<O, C>>,
    Path(coupon_id): Path<String>,
) -> WebResult<Json<CouponView>>
where
    O: OrderStore,
    C: CouponStore,
{
    let coupon = state.coupons.lookup(&CouponId::new(coupon_id)).await?;
    Ok(Json(coupon))
}

/// List unused, unexpired coupons, most recently issued first. Admin only.
///
/// # Endpoint
///
/// ```text
/// GET /api/v1/admin/coupons
/// X-Admin-Password: <secret>
/// ```
pub async fn list_coupons<O, C>(
    _admin: RequireAdmin,
    State(state): State<AppState<O, C>>,
) -> WebResult<Json<CouponListView>>
where
    O: OrderStore,
    C: CouponStore,
{
    Ok(Json(state.coupons.list_valid().await?))
}
