//! Router configuration.
//!
//! Builds the complete Axum router with all endpoints under `/api/v1`.

use crate::handlers::{coupons, health_check, orders};
use crate::middleware::correlation_id_layer;
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post, put},
};
use myramen_core::{CouponStore, OrderStore};
use tower_http::trace::TraceLayer;

/// Base path of every route.
pub const API_PREFIX: &str = "/api/v1";

/// Build the complete Axum router.
///
/// # Routes
///
/// - `POST /orders` - Place an order
/// - `GET /orders/:order_id` - Get an order
/// - `GET /coupons/:coupon_id` - Get a coupon
/// - `GET /admin/orders` - List orders (admin)
/// - `PUT /admin/orders/:order_id/status` - Change an order's status (admin)
/// - `GET /admin/coupons` - List valid coupons (admin)
/// - `GET /health` - Liveness
///
/// Requests are traced with `TraceLayer` and tagged with a correlation ID.
pub fn build_router<O, C>(state: AppState<O, C>) -> Router
where
    O: OrderStore + Clone + 'static,
    C: CouponStore + Clone + 'static,
{
    let public_routes = Router::new()
        .route("/orders", post(orders::place_order::<O, C>))
        .route("/orders/:order_id", get(orders::get_order::<O, C>))
        .route("/coupons/:coupon_id", get(coupons::get_coupon::<O, C>))
        .route("/health", get(health_check));

    let admin_routes = Router::new()
        .route("/orders", get(orders::list_orders::<O, C>))
        .route(
            "/orders/:order_id/status",
            put(orders::update_order_status::<O, C>),
        )
        .route("/coupons", get(coupons::list_coupons::<O, C>));

    let api_routes = public_routes.nest("/admin", admin_routes);

    Router::new()
        .nest(API_PREFIX, api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(correlation_id_layer())
        .with_state(state)
}
