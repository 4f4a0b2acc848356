//! Order pricing and reward-coupon policy.

use crate::types::{Money, OrderOptions};
use chrono::Duration;

/// Prices and reward rules applied by the order workflow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricingPolicy {
    /// Price of one portion
    pub unit_price: Money,
    /// Surcharge for bringing hot water
    pub hot_water_fee: Money,
    /// Surcharge for cooking the order
    pub cooking_fee: Money,
    /// Minimum quantity that earns a reward coupon
    pub reward_threshold: u32,
    /// Discount carried by a reward coupon
    pub reward_discount: Money,
    /// How long a reward coupon stays valid
    pub reward_validity: Duration,
}

impl Default for PricingPolicy {
    fn default() -> Self {
        Self {
            unit_price: Money::from_minor(4000),
            hot_water_fee: Money::from_minor(500),
            cooking_fee: Money::from_minor(500),
            reward_threshold: 3,
            reward_discount: Money::from_minor(200),
            reward_validity: Duration::days(30),
        }
    }
}

impl PricingPolicy {
    /// Price before any coupon: portions plus option surcharges.
    ///
    /// Chopsticks are free.
    #[must_use]
    pub fn subtotal(&self, quantity: u32, options: &OrderOptions) -> Money {
        let mut price = self.unit_price.times(quantity);
        if options.hot_water_delivery {
            price += self.hot_water_fee;
        }
        if options.cooking_service {
            price += self.cooking_fee;
        }
        price
    }

    /// Whether an order of this size earns a reward coupon.
    #[must_use]
    pub const fn earns_reward(&self, quantity: u32) -> bool {
        quantity >= self.reward_threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn single_portion_without_options() {
        let policy = PricingPolicy::default();
        assert_eq!(
            policy.subtotal(1, &OrderOptions::default()),
            Money::from_minor(4000)
        );
    }

    #[test]
    fn chopsticks_are_free() {
        let policy = PricingPolicy::default();
        let options = OrderOptions {
            chopsticks: true,
            ..OrderOptions::default()
        };
        assert_eq!(policy.subtotal(2, &options), Money::from_minor(8000));
    }

    #[test]
    fn reward_threshold() {
        let policy = PricingPolicy::default();
        assert!(!policy.earns_reward(2));
        assert!(policy.earns_reward(3));
        assert!(policy.earns_reward(10));
    }

    proptest! {
        #[test]
        fn subtotal_is_base_plus_surcharges(
            quantity in 1u32..500,
            chopsticks in any::<bool>(),
            hot_water_delivery in any::<bool>(),
            cooking_service in any::<bool>(),
        ) {
            let policy = PricingPolicy::default();
            let options = OrderOptions { chopsticks, hot_water_delivery, cooking_service };
            let expected = 4000 * i64::from(quantity)
                + if hot_water_delivery { 500 } else { 0 }
                + if cooking_service { 500 } else { 0 };
            prop_assert_eq!(policy.subtotal(quantity, &options).minor(), expected);
        }
    }
}
