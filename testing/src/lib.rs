//! # MyRamen Testing
//!
//! Testing utilities for the MyRamen workflows and HTTP API.
//!
//! This crate provides:
//! - Mock implementations of the environment traits (clock, identifiers)
//! - In-memory coupon and order stores
//! - Builders for a fully in-memory service stack
//!
//! ## Example
//!
//! ```ignore
//! use myramen_testing::{in_memory_services, test_clock};
//!
//! #[tokio::test]
//! async fn test_order_flow() {
//!     let (orders, _coupons) = in_memory_services(test_clock());
//!
//!     let view = orders.place_order(request).await.unwrap();
//!     assert_eq!(view.total_price.minor(), 4000);
//! }
//! ```

use chrono::{DateTime, Utc};
use myramen_core::{CouponService, Environment, OrderService, PricingPolicy};
use std::sync::Arc;

pub mod stores;

/// Mock implementations of Environment traits.
pub mod mocks {
    use chrono::{DateTime, Duration, Utc};
    use myramen_core::environment::{Clock, IdGenerator};
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::{Arc, Mutex};

    /// Fixed clock for deterministic tests
    ///
    /// Returns the same time until moved with [`FixedClock::set`] or
    /// [`FixedClock::advance`]. Clones share the same instant, so a test can
    /// keep a handle and move time under a running service.
    ///
    /// # Example
    ///
    /// ```
    /// use myramen_testing::mocks::FixedClock;
    /// use myramen_core::environment::Clock;
    /// use chrono::{Duration, Utc};
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// let time1 = clock.now();
    /// assert_eq!(time1, clock.now());
    ///
    /// clock.advance(Duration::days(1));
    /// assert_eq!(clock.now() - time1, Duration::days(1));
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: Arc<Mutex<DateTime<Utc>>>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub fn new(time: DateTime<Utc>) -> Self {
            Self {
                time: Arc::new(Mutex::new(time)),
            }
        }

        /// Jump to an absolute instant
        pub fn set(&self, time: DateTime<Utc>) {
            if let Ok(mut guard) = self.time.lock() {
                *guard = time;
            }
        }

        /// Move the clock forward
        pub fn advance(&self, by: Duration) {
            if let Ok(mut guard) = self.time.lock() {
                *guard += by;
            }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
                .lock()
                .map_or_else(|poisoned| *poisoned.into_inner(), |guard| *guard)
        }
    }

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
    ///
    /// # Panics
    ///
    /// This function will panic if the hardcoded timestamp fails to parse,
    /// which should never happen in practice.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(
            DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z")
                .expect("hardcoded timestamp should always parse")
                .with_timezone(&Utc),
        )
    }

    /// Predictable identifiers: `000001`, `000002`, ...
    ///
    /// Orders and coupons share the counter, so the first order placed with
    /// a reward yields coupon `c000001` and order `o000002`.
    #[derive(Debug, Clone, Default)]
    pub struct SequentialIdGenerator {
        next: Arc<AtomicU64>,
    }

    impl SequentialIdGenerator {
        /// Start counting from one
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }
    }

    impl IdGenerator for SequentialIdGenerator {
        fn next_suffix(&self) -> String {
            let n = self.next.fetch_add(1, Ordering::SeqCst) + 1;
            format!("{n:06}")
        }
    }
}

/// Environment with the given clock and sequential identifiers.
#[must_use]
pub fn test_environment(clock: FixedClock) -> Environment {
    Environment::new(Arc::new(clock), Arc::new(SequentialIdGenerator::new()))
}

/// Order and coupon services over fresh in-memory stores.
///
/// The stores are cheap handles; use [`CouponService::store`] to reach the
/// coupon store, or build the services by hand to keep the order store.
#[must_use]
pub fn in_memory_services(
    clock: FixedClock,
) -> (
    OrderService<InMemoryOrderStore, InMemoryCouponStore>,
    CouponService<InMemoryCouponStore>,
) {
    let env = test_environment(clock);
    let coupons = CouponService::new(InMemoryCouponStore::new(), env.clone());
    let orders = OrderService::new(
        InMemoryOrderStore::new(),
        coupons.clone(),
        PricingPolicy::default(),
        env,
    );
    (orders, coupons)
}

/// Parse an RFC 3339 timestamp for test fixtures.
///
/// # Panics
///
/// Panics if `s` is not valid RFC 3339.
#[must_use]
#[allow(clippy::expect_used)]
pub fn at(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .expect("fixture timestamp should parse")
        .with_timezone(&Utc)
}

// Re-export commonly used items
pub use mocks::{FixedClock, SequentialIdGenerator, test_clock};
pub use stores::{InMemoryCouponStore, InMemoryOrderStore};

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use myramen_core::environment::{Clock, IdGenerator};

    #[test]
    fn test_fixed_clock() {
        let clock = test_clock();
        let time1 = clock.now();
        let time2 = clock.now();
        assert_eq!(time1, time2);
        assert_eq!(time1, at("2025-01-01T00:00:00Z"));
    }

    #[test]
    fn clones_share_the_instant() {
        let clock = test_clock();
        let handle = clock.clone();
        handle.advance(Duration::hours(2));
        assert_eq!(clock.now(), at("2025-01-01T02:00:00Z"));

        handle.set(at("2030-06-01T00:00:00Z"));
        assert_eq!(clock.now(), at("2030-06-01T00:00:00Z"));
    }

    #[test]
    fn sequential_ids_count_up() {
        let ids = SequentialIdGenerator::new();
        assert_eq!(ids.next_suffix(), "000001");
        assert_eq!(ids.clone().next_suffix(), "000002");
        assert_eq!(ids.next_suffix(), "000003");
    }
}
