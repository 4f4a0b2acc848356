//! Order and coupon workflows against the in-memory stores.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use chrono::Duration;
use myramen_core::{
    Clock, Coupon, CouponId, CouponRejection, CouponService, CouponStore, DeliveryOption,
    MAX_QUANTITY, Money, OrderId, OrderOptions, OrderService, OrderStatus, PlaceOrderRequest,
    PricingPolicy, ServiceError, UpdateStatusRequest,
};
use myramen_testing::{
    FixedClock, InMemoryCouponStore, InMemoryOrderStore, at, test_clock, test_environment,
};

struct Harness {
    clock: FixedClock,
    orders: OrderService<InMemoryOrderStore, InMemoryCouponStore>,
    coupons: CouponService<InMemoryCouponStore>,
    order_store: InMemoryOrderStore,
    coupon_store: InMemoryCouponStore,
}

fn harness_with(coupons: impl IntoIterator<Item = Coupon>) -> Harness {
    let clock = test_clock();
    let env = test_environment(clock.clone());
    let coupon_store = InMemoryCouponStore::with_coupons(coupons);
    let order_store = InMemoryOrderStore::new();
    let coupon_service = CouponService::new(coupon_store.clone(), env.clone());
    let orders = OrderService::new(
        order_store.clone(),
        coupon_service.clone(),
        PricingPolicy::default(),
        env,
    );
    Harness {
        clock,
        orders,
        coupons: coupon_service,
        order_store,
        coupon_store,
    }
}

fn harness() -> Harness {
    harness_with([])
}

fn request(quantity: u32) -> PlaceOrderRequest {
    PlaceOrderRequest {
        name: "Kim".to_string(),
        account_number: "110-123-456789".to_string(),
        quantity,
        spicy_level: Some(2),
        delivery_option: DeliveryOption::PickupFloor,
        options: OrderOptions::default(),
        coupon_id: None,
    }
}

fn with_coupon(mut req: PlaceOrderRequest, id: &str) -> PlaceOrderRequest {
    req.coupon_id = Some(id.to_string());
    req
}

fn coupon(id: &str, discount: i64, expires_at: &str, used: bool) -> Coupon {
    Coupon {
        id: CouponId::new(id.to_string()),
        discount: Money::from_minor(discount),
        expires_at: at(expires_at),
        used,
        issued_at: at("2024-12-01T00:00:00Z"),
    }
}

fn cid(id: &str) -> CouponId {
    CouponId::new(id.to_string())
}

#[tokio::test]
async fn single_portion_costs_unit_price() {
    let h = harness();
    let view = h.orders.place_order(request(1)).await.unwrap();

    assert_eq!(view.total_price, Money::from_minor(4000));
    assert_eq!(view.status, OrderStatus::Pending);
    assert!(view.applied_coupon.is_none());
    assert!(view.new_coupon.is_none());
    assert_eq!(view.created_at, h.clock.now());
    assert_eq!(view.created_at, view.updated_at);
}

#[tokio::test]
async fn surcharges_add_five_hundred_each() {
    let h = harness();
    let mut req = request(2);
    req.options = OrderOptions {
        chopsticks: true,
        hot_water_delivery: true,
        cooking_service: true,
    };

    let view = h.orders.place_order(req).await.unwrap();
    assert_eq!(view.total_price, Money::from_minor(2 * 4000 + 500 + 500));
}

#[tokio::test]
async fn three_portions_with_hot_water_earn_a_coupon() {
    let h = harness();
    let mut req = request(3);
    req.options.hot_water_delivery = true;

    let view = h.orders.place_order(req).await.unwrap();

    assert_eq!(view.total_price, Money::from_minor(12_500));
    assert_eq!(view.status, OrderStatus::Pending);

    let reward = view.new_coupon.expect("reward coupon");
    assert_eq!(reward.discount, Money::from_minor(200));
    assert_eq!(reward.expiry_date, Some(at("2025-01-31T00:00:00Z")));

    assert_eq!(h.coupon_store.len(), 1);
    let stored = h.coupon_store.get(&reward.coupon_id).unwrap();
    assert!(!stored.used);
    assert_eq!(stored.issued_at, at("2025-01-01T00:00:00Z"));
    assert_eq!(stored.expires_at - stored.issued_at, Duration::days(30));
}

#[tokio::test]
async fn fewer_than_three_portions_earn_nothing() {
    let h = harness();
    for quantity in [1, 2] {
        let view = h.orders.place_order(request(quantity)).await.unwrap();
        assert!(view.new_coupon.is_none());
    }
    assert!(h.coupon_store.is_empty());
    assert_eq!(h.order_store.len(), 2);
}

#[tokio::test]
async fn large_orders_earn_exactly_one_coupon() {
    let h = harness();
    let view = h.orders.place_order(request(10)).await.unwrap();
    assert!(view.new_coupon.is_some());
    assert_eq!(h.coupon_store.len(), 1);
}

#[tokio::test]
async fn valid_coupon_is_applied_and_consumed() {
    let h = harness_with([coupon("c-welcome", 200, "2025-02-01T00:00:00Z", false)]);

    let view = h
        .orders
        .place_order(with_coupon(request(1), "c-welcome"))
        .await
        .unwrap();

    assert_eq!(view.total_price, Money::from_minor(3800));
    let applied = view.applied_coupon.expect("applied coupon");
    assert_eq!(applied.coupon_id, cid("c-welcome"));
    assert_eq!(applied.discount, Money::from_minor(200));
    assert_eq!(applied.expiry_date, None);
    assert!(view.new_coupon.is_none());
    assert!(h.coupon_store.get(&cid("c-welcome")).unwrap().used);

    let err = h
        .orders
        .place_order(with_coupon(request(1), "c-welcome"))
        .await
        .unwrap_err();
    assert_eq!(err, ServiceError::InvalidCoupon(CouponRejection::AlreadyUsed));
    assert_eq!(h.order_store.len(), 1);
}

#[tokio::test]
async fn used_coupon_is_rejected_without_side_effects() {
    let h = harness_with([coupon("c-spent", 200, "2025-02-01T00:00:00Z", true)]);

    let err = h
        .orders
        .place_order(with_coupon(request(3), "c-spent"))
        .await
        .unwrap_err();

    assert_eq!(err, ServiceError::InvalidCoupon(CouponRejection::AlreadyUsed));
    assert_eq!(err.public_message(), "This coupon has already been used.");
    assert!(h.order_store.is_empty());
    // no reward is issued for a rejected order
    assert_eq!(h.coupon_store.len(), 1);
}

#[tokio::test]
async fn expired_coupon_is_rejected() {
    let h = harness_with([coupon("c-old", 200, "2024-12-31T23:59:59Z", false)]);

    let err = h
        .orders
        .place_order(with_coupon(request(1), "c-old"))
        .await
        .unwrap_err();

    assert_eq!(err, ServiceError::InvalidCoupon(CouponRejection::Expired));
    assert!(!h.coupon_store.get(&cid("c-old")).unwrap().used);
    assert!(h.order_store.is_empty());
}

#[tokio::test]
async fn coupon_expiring_exactly_now_still_applies() {
    let h = harness_with([coupon("c-edge", 200, "2025-01-01T00:00:00Z", false)]);

    let view = h
        .orders
        .place_order(with_coupon(request(1), "c-edge"))
        .await
        .unwrap();
    assert_eq!(view.total_price, Money::from_minor(3800));
}

#[tokio::test]
async fn unknown_coupon_is_rejected() {
    let h = harness();
    let err = h
        .orders
        .place_order(with_coupon(request(1), "c-missing"))
        .await
        .unwrap_err();
    assert_eq!(err, ServiceError::InvalidCoupon(CouponRejection::Unknown));
    assert!(h.order_store.is_empty());
}

#[tokio::test]
async fn empty_coupon_id_means_no_coupon() {
    let h = harness();
    let view = h
        .orders
        .place_order(with_coupon(request(1), ""))
        .await
        .unwrap();
    assert_eq!(view.total_price, Money::from_minor(4000));
    assert!(view.applied_coupon.is_none());
}

#[tokio::test]
async fn blank_coupon_id_means_no_coupon() {
    let h = harness();
    let view = h
        .orders
        .place_order(with_coupon(request(1), "   "))
        .await
        .unwrap();
    assert_eq!(view.total_price, Money::from_minor(4000));
    assert!(view.applied_coupon.is_none());
}

#[tokio::test]
async fn oversized_quantity_is_rejected_before_touching_coupons() {
    let h = harness_with([coupon("c-w", 200, "2025-02-01T00:00:00Z", false)]);

    let err = h
        .orders
        .place_order(with_coupon(request(MAX_QUANTITY + 1), "c-w"))
        .await
        .unwrap_err();

    assert!(matches!(err, ServiceError::InvalidRequest(_)));
    assert!(!h.coupon_store.find_by_id(&cid("c-w")).await.unwrap().unwrap().used);
    assert_eq!(h.coupon_store.len(), 1);
    assert!(h.order_store.is_empty());

    let err = h
        .orders
        .place_order(request(u32::MAX))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::InvalidRequest(_)));
}

#[tokio::test]
async fn discount_larger_than_total_clamps_to_zero() {
    let h = harness_with([coupon("c-huge", 10_000, "2025-02-01T00:00:00Z", false)]);
    let view = h
        .orders
        .place_order(with_coupon(request(1), "c-huge"))
        .await
        .unwrap();
    assert_eq!(view.total_price, Money::ZERO);
}

#[tokio::test]
async fn applied_and_reward_coupons_can_coexist() {
    let h = harness_with([coupon("c-welcome", 200, "2025-02-01T00:00:00Z", false)]);
    let view = h
        .orders
        .place_order(with_coupon(request(3), "c-welcome"))
        .await
        .unwrap();

    assert_eq!(view.total_price, Money::from_minor(3 * 4000 - 200));
    assert!(view.applied_coupon.is_some());
    let reward = view.new_coupon.unwrap();
    assert_ne!(reward.coupon_id, cid("c-welcome"));
}

#[tokio::test]
async fn invalid_requests_are_rejected_before_persisting() {
    let h = harness();

    let mut nameless = request(1);
    nameless.name = "   ".to_string();
    let mut no_account = request(1);
    no_account.account_number = String::new();
    let zero = request(0);
    let mut too_hot = request(1);
    too_hot.spicy_level = Some(6);

    for req in [nameless, no_account, zero, too_hot] {
        let err = h.orders.place_order(req).await.unwrap_err();
        assert!(
            matches!(err, ServiceError::InvalidRequest(_)),
            "unexpected error: {err:?}"
        );
        assert_eq!(err.code(), "INVALID_REQUEST");
    }
    assert!(h.order_store.is_empty());
}

#[tokio::test]
async fn missing_spice_level_defaults_to_three() {
    let h = harness();
    for level in [None, Some(0)] {
        let mut req = request(1);
        req.spicy_level = level;
        let view = h.orders.place_order(req).await.unwrap();
        assert_eq!(view.spicy_level.get(), 3);
    }
}

#[tokio::test]
async fn get_order_is_repeatable() {
    let h = harness();
    let placed = h.orders.place_order(request(2)).await.unwrap();

    let first = h.orders.get_order(&placed.order_id).await.unwrap();
    let second = h.orders.get_order(&placed.order_id).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(first, placed);
}

#[tokio::test]
async fn get_unknown_order_is_not_found() {
    let h = harness();
    let id = OrderId::new("o-missing".to_string());
    let err = h.orders.get_order(&id).await.unwrap_err();
    assert_eq!(err, ServiceError::OrderNotFound(id));
    assert_eq!(err.public_message(), "Order not found.");
}

#[tokio::test]
async fn orders_are_listed_newest_first() {
    let h = harness();
    let first = h.orders.place_order(request(1)).await.unwrap();
    h.clock.advance(Duration::minutes(5));
    let second = h.orders.place_order(request(2)).await.unwrap();

    let list = h.orders.list_orders().await.unwrap();
    let ids: Vec<_> = list.orders.iter().map(|o| o.order_id.clone()).collect();
    assert_eq!(ids, [second.order_id, first.order_id]);
}

#[tokio::test]
async fn update_status_refreshes_timestamp() {
    let h = harness();
    let placed = h.orders.place_order(request(1)).await.unwrap();

    h.clock.advance(Duration::minutes(10));
    let updated = h
        .orders
        .update_status(
            &placed.order_id,
            UpdateStatusRequest {
                status: "COOKING".to_string(),
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.status, OrderStatus::Cooking);
    assert_eq!(updated.created_at, placed.created_at);
    assert_eq!(updated.updated_at, at("2025-01-01T00:10:00Z"));
}

#[tokio::test]
async fn any_status_may_follow_any_other() {
    let h = harness();
    let placed = h.orders.place_order(request(1)).await.unwrap();

    for status in ["DELIVERED", "PENDING", "READY"] {
        let view = h
            .orders
            .update_status(
                &placed.order_id,
                UpdateStatusRequest {
                    status: status.to_string(),
                },
            )
            .await
            .unwrap();
        assert_eq!(view.status.as_str(), status);
    }
}

#[tokio::test]
async fn update_status_on_unknown_order_changes_nothing() {
    let h = harness();
    let placed = h.orders.place_order(request(1)).await.unwrap();
    let missing = OrderId::new("o-missing".to_string());

    let err = h
        .orders
        .update_status(
            &missing,
            UpdateStatusRequest {
                status: "PAID".to_string(),
            },
        )
        .await
        .unwrap_err();

    assert_eq!(err, ServiceError::OrderNotFound(missing));
    assert_eq!(h.order_store.len(), 1);
    assert_eq!(
        h.order_store.get(&placed.order_id).unwrap().status,
        OrderStatus::Pending
    );
}

#[tokio::test]
async fn unknown_status_is_rejected() {
    let h = harness();
    let placed = h.orders.place_order(request(1)).await.unwrap();

    let err = h
        .orders
        .update_status(
            &placed.order_id,
            UpdateStatusRequest {
                status: "paid".to_string(),
            },
        )
        .await
        .unwrap_err();

    assert_eq!(err, ServiceError::InvalidStatus("paid".to_string()));
    assert_eq!(err.code(), "INVALID_STATUS");
}

#[tokio::test]
async fn coupon_lookup_and_listing() {
    let h = harness_with([
        coupon("c-a", 200, "2025-02-01T00:00:00Z", false),
        coupon("c-used", 200, "2025-02-01T00:00:00Z", true),
        coupon("c-expired", 200, "2024-12-15T00:00:00Z", false),
    ]);

    let view = h.coupons.lookup(&cid("c-used")).await.unwrap();
    assert!(view.is_used);

    let err = h.coupons.lookup(&cid("c-none")).await.unwrap_err();
    assert_eq!(err.public_message(), "Coupon not found.");

    // an order of three issues a fresh coupon that sorts first
    h.orders.place_order(request(3)).await.unwrap();
    let listed = h.coupons.list_valid().await.unwrap();
    assert_eq!(listed.coupons.len(), 2);
    assert_eq!(listed.coupons[1].coupon_id, cid("c-a"));
    assert!(listed.coupons.iter().all(|c| !c.is_used));
}

#[tokio::test]
async fn listing_drops_coupons_once_they_expire() {
    let h = harness_with([coupon("c-a", 200, "2025-01-02T00:00:00Z", false)]);
    assert_eq!(h.coupons.list_valid().await.unwrap().coupons.len(), 1);

    h.clock.advance(Duration::days(1));
    assert!(h.coupons.list_valid().await.unwrap().coupons.is_empty());
}

#[tokio::test]
async fn redeem_is_single_use() {
    let h = harness_with([coupon("c-a", 200, "2025-02-01T00:00:00Z", false)]);

    h.coupons.redeem(&cid("c-a")).await.unwrap();
    assert_eq!(
        h.coupons.redeem(&cid("c-a")).await.unwrap_err(),
        ServiceError::InvalidCoupon(CouponRejection::AlreadyUsed)
    );
    assert_eq!(
        h.coupons.redeem(&cid("c-none")).await.unwrap_err(),
        ServiceError::CouponNotFound(cid("c-none"))
    );
}

#[tokio::test]
async fn concurrent_redeems_have_one_winner() {
    let h = harness_with([coupon("c-a", 200, "2025-02-01T00:00:00Z", false)]);

    let id = cid("c-a");
    let (a, b) = tokio::join!(h.coupons.redeem(&id), h.coupons.redeem(&id));
    assert_eq!(usize::from(a.is_ok()) + usize::from(b.is_ok()), 1);
    assert!(h.coupon_store.find_by_id(&id).await.unwrap().unwrap().used);
}
