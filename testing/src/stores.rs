//! In-memory coupon and order stores.
//!
//! HashMap-backed implementations of the core store traits with the same
//! observable behaviour as the PostgreSQL ones: conditional redeem, newest
//! first listings and `NotFound` on missing rows.

use chrono::{DateTime, Utc};
use myramen_core::{
    Coupon, CouponId, CouponStore, Order, OrderId, OrderStatus, OrderStore, StoreError,
    StoreResult,
};
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard};

fn lock<T>(mutex: &Mutex<T>) -> StoreResult<MutexGuard<'_, T>> {
    mutex
        .lock()
        .map_err(|_| StoreError::Database("store lock poisoned".to_string()))
}

/// In-memory coupon store for fast, deterministic testing.
///
/// Clones share the same data.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCouponStore {
    coupons: Arc<Mutex<HashMap<CouponId, Coupon>>>,
}

impl InMemoryCouponStore {
    /// Create a new empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with coupons
    #[must_use]
    pub fn with_coupons(coupons: impl IntoIterator<Item = Coupon>) -> Self {
        let store = Self::new();
        if let Ok(mut guard) = store.coupons.lock() {
            guard.extend(coupons.into_iter().map(|c| (c.id.clone(), c)));
        }
        store
    }

    /// Snapshot of a stored coupon
    #[must_use]
    pub fn get(&self, id: &CouponId) -> Option<Coupon> {
        self.coupons.lock().ok()?.get(id).cloned()
    }

    /// Number of stored coupons
    #[must_use]
    pub fn len(&self) -> usize {
        self.coupons.lock().map_or(0, |guard| guard.len())
    }

    /// True when no coupon is stored
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl CouponStore for InMemoryCouponStore {
    fn create(&self, coupon: &Coupon) -> impl Future<Output = StoreResult<()>> + Send {
        let coupons = Arc::clone(&self.coupons);
        let coupon = coupon.clone();

        async move {
            let mut guard = lock(&coupons)?;
            if guard.contains_key(&coupon.id) {
                return Err(StoreError::Conflict(format!(
                    "coupon {} already exists",
                    coupon.id
                )));
            }
            guard.insert(coupon.id.clone(), coupon);
            Ok(())
        }
    }

    fn find_by_id(
        &self,
        id: &CouponId,
    ) -> impl Future<Output = StoreResult<Option<Coupon>>> + Send {
        let coupons = Arc::clone(&self.coupons);
        let id = id.clone();

        async move { Ok(lock(&coupons)?.get(&id).cloned()) }
    }

    fn find_all_valid(
        &self,
        now: DateTime<Utc>,
    ) -> impl Future<Output = StoreResult<Vec<Coupon>>> + Send {
        let coupons = Arc::clone(&self.coupons);

        async move {
            let mut valid: Vec<Coupon> = lock(&coupons)?
                .values()
                .filter(|c| c.is_valid_at(now))
                .cloned()
                .collect();
            valid.sort_by(|a, b| {
                b.issued_at
                    .cmp(&a.issued_at)
                    .then_with(|| b.id.as_str().cmp(a.id.as_str()))
            });
            Ok(valid)
        }
    }

    fn update(&self, coupon: &Coupon) -> impl Future<Output = StoreResult<()>> + Send {
        let coupons = Arc::clone(&self.coupons);
        let coupon = coupon.clone();

        async move {
            let mut guard = lock(&coupons)?;
            let stored = guard.get_mut(&coupon.id).ok_or(StoreError::NotFound)?;
            stored.discount = coupon.discount;
            stored.expires_at = coupon.expires_at;
            stored.used = stored.used || coupon.used;
            Ok(())
        }
    }

    fn mark_used(&self, id: &CouponId) -> impl Future<Output = StoreResult<()>> + Send {
        let coupons = Arc::clone(&self.coupons);
        let id = id.clone();

        async move {
            let mut guard = lock(&coupons)?;
            let stored = guard.get_mut(&id).ok_or(StoreError::NotFound)?;
            if stored.used {
                return Err(StoreError::AlreadyUsed);
            }
            stored.used = true;
            Ok(())
        }
    }
}

/// In-memory order store for fast, deterministic testing.
///
/// Clones share the same data.
#[derive(Debug, Clone, Default)]
pub struct InMemoryOrderStore {
    orders: Arc<Mutex<HashMap<OrderId, Order>>>,
}

impl InMemoryOrderStore {
    /// Create a new empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of a stored order
    #[must_use]
    pub fn get(&self, id: &OrderId) -> Option<Order> {
        self.orders.lock().ok()?.get(id).cloned()
    }

    /// Number of stored orders
    #[must_use]
    pub fn len(&self) -> usize {
        self.orders.lock().map_or(0, |guard| guard.len())
    }

    /// True when no order is stored
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl OrderStore for InMemoryOrderStore {
    fn create(&self, order: &Order) -> impl Future<Output = StoreResult<()>> + Send {
        let orders = Arc::clone(&self.orders);
        let order = order.clone();

        async move {
            let mut guard = lock(&orders)?;
            if guard.contains_key(&order.id) {
                return Err(StoreError::Conflict(format!(
                    "order {} already exists",
                    order.id
                )));
            }
            guard.insert(order.id.clone(), order);
            Ok(())
        }
    }

    fn find_by_id(&self, id: &OrderId) -> impl Future<Output = StoreResult<Option<Order>>> + Send {
        let orders = Arc::clone(&self.orders);
        let id = id.clone();

        async move { Ok(lock(&orders)?.get(&id).cloned()) }
    }

    fn find_all(&self) -> impl Future<Output = StoreResult<Vec<Order>>> + Send {
        let orders = Arc::clone(&self.orders);

        async move {
            let mut all: Vec<Order> = lock(&orders)?.values().cloned().collect();
            all.sort_by(|a, b| {
                b.created_at
                    .cmp(&a.created_at)
                    .then_with(|| b.id.as_str().cmp(a.id.as_str()))
            });
            Ok(all)
        }
    }

    fn update_status(
        &self,
        id: &OrderId,
        status: OrderStatus,
        updated_at: DateTime<Utc>,
    ) -> impl Future<Output = StoreResult<()>> + Send {
        let orders = Arc::clone(&self.orders);
        let id = id.clone();

        async move {
            let mut guard = lock(&orders)?;
            let stored = guard.get_mut(&id).ok_or(StoreError::NotFound)?;
            stored.status = status;
            stored.updated_at = updated_at;
            Ok(())
        }
    }

    fn delete(&self, id: &OrderId) -> impl Future<Output = StoreResult<()>> + Send {
        let orders = Arc::clone(&self.orders);
        let id = id.clone();

        async move {
            lock(&orders)?
                .remove(&id)
                .map(|_| ())
                .ok_or(StoreError::NotFound)
        }
    }
}
