//! Core domain types for orders and coupons.
//!
//! Orders progress through
//! `PENDING → PAID → COOKING → READY → DELIVERING → DELIVERED`; coupons are
//! single-use discount vouchers with an expiry.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Unique identifier for an order
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(String);

impl OrderId {
    /// Prefix carried by every generated order identifier
    pub const PREFIX: &'static str = "o";

    /// Creates a new `OrderId` from a string
    #[must_use]
    pub const fn new(id: String) -> Self {
        Self(id)
    }

    /// Builds an identifier from a generated suffix
    #[must_use]
    pub fn from_suffix(suffix: &str) -> Self {
        Self(format!("{}{suffix}", Self::PREFIX))
    }

    /// Returns the inner string value
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a coupon
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CouponId(String);

impl CouponId {
    /// Prefix carried by every generated coupon identifier
    pub const PREFIX: &'static str = "c";

    /// Creates a new `CouponId` from a string
    #[must_use]
    pub const fn new(id: String) -> Self {
        Self(id)
    }

    /// Builds an identifier from a generated suffix
    #[must_use]
    pub fn from_suffix(suffix: &str) -> Self {
        Self(format!("{}{suffix}", Self::PREFIX))
    }

    /// Returns the inner string value
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CouponId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Money amount in minor currency units.
///
/// Serialized as a bare integer.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Zero amount
    pub const ZERO: Self = Self(0);

    /// Creates a money amount from minor units
    #[must_use]
    pub const fn from_minor(amount: i64) -> Self {
        Self(amount)
    }

    /// Returns the value in minor units
    #[must_use]
    pub const fn minor(&self) -> i64 {
        self.0
    }

    /// Multiplies a unit amount by a quantity
    #[must_use]
    pub const fn times(self, quantity: u32) -> Self {
        Self(self.0 * quantity as i64)
    }

    /// Subtracts a discount, never going below zero
    #[must_use]
    pub fn less_discount(self, discount: Self) -> Self {
        Self((self.0 - discount.0).max(0))
    }
}

impl std::ops::Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl std::ops::AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Spice level on a 1–5 scale.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct SpiceLevel(u8);

impl SpiceLevel {
    /// Mildest level
    pub const MIN: u8 = 1;
    /// Hottest level
    pub const MAX: u8 = 5;
    /// Level used when the customer does not choose one
    pub const DEFAULT: Self = Self(3);

    /// Validates a level, returning `None` outside `1..=5`
    #[must_use]
    pub const fn new(level: u8) -> Option<Self> {
        if level >= Self::MIN && level <= Self::MAX {
            Some(Self(level))
        } else {
            None
        }
    }

    /// Resolves an optional requested level; absent or zero means default
    #[must_use]
    pub const fn resolve(requested: Option<u8>) -> Option<Self> {
        match requested {
            None | Some(0) => Some(Self::DEFAULT),
            Some(level) => Self::new(level),
        }
    }

    /// Returns the numeric level
    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }
}

impl Default for SpiceLevel {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<u8> for SpiceLevel {
    type Error = String;

    fn try_from(level: u8) -> Result<Self, Self::Error> {
        Self::new(level).ok_or_else(|| format!("spice level must be between 1 and 5, got {level}"))
    }
}

impl From<SpiceLevel> for u8 {
    fn from(level: SpiceLevel) -> Self {
        level.0
    }
}

/// How the order reaches the customer
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeliveryOption {
    /// Pick up on the fourth floor
    #[serde(rename = "PICKUP_4F")]
    PickupFloor,
    /// Pick up at the laundry room
    #[serde(rename = "PICKUP_LAUNDRY")]
    PickupLaundry,
    /// Delivered to the door
    #[serde(rename = "DELIVERY")]
    Delivery,
}

impl DeliveryOption {
    /// Wire/storage representation
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PickupFloor => "PICKUP_4F",
            Self::PickupLaundry => "PICKUP_LAUNDRY",
            Self::Delivery => "DELIVERY",
        }
    }
}

impl fmt::Display for DeliveryOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeliveryOption {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PICKUP_4F" => Ok(Self::PickupFloor),
            "PICKUP_LAUNDRY" => Ok(Self::PickupLaundry),
            "DELIVERY" => Ok(Self::Delivery),
            other => Err(format!("unknown delivery option: {other}")),
        }
    }
}

/// Extra options on an order
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OrderOptions {
    /// Include disposable chopsticks (free)
    pub chopsticks: bool,
    /// Bring hot water along with the order
    pub hot_water_delivery: bool,
    /// Cook the ramen before handing it over
    pub cooking_service: bool,
}

/// Status of an order in its lifecycle
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    /// Order has been placed and awaits payment
    Pending,
    /// Payment received
    Paid,
    /// Being cooked
    Cooking,
    /// Ready for pickup or delivery
    Ready,
    /// On its way to the customer
    Delivering,
    /// Handed over
    Delivered,
}

impl OrderStatus {
    /// All statuses in progression order
    pub const ALL: [Self; 6] = [
        Self::Pending,
        Self::Paid,
        Self::Cooking,
        Self::Ready,
        Self::Delivering,
        Self::Delivered,
    ];

    /// Wire/storage representation
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Paid => "PAID",
            Self::Cooking => "COOKING",
            Self::Ready => "READY",
            Self::Delivering => "DELIVERING",
            Self::Delivered => "DELIVERED",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| format!("unknown order status: {s}"))
    }
}

/// A discount voucher
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coupon {
    /// Coupon identifier
    pub id: CouponId,
    /// Amount subtracted from an order total
    pub discount: Money,
    /// Last instant at which the coupon can be applied
    pub expires_at: DateTime<Utc>,
    /// Whether the coupon has been redeemed
    pub used: bool,
    /// When the coupon was issued
    pub issued_at: DateTime<Utc>,
}

impl Coupon {
    /// True once `now` is past the expiry instant
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    /// Unused and strictly before expiry (the listing criterion)
    #[must_use]
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        !self.used && self.expires_at > now
    }

    /// Snapshot recorded on an order the coupon was applied to
    #[must_use]
    pub fn applied_snapshot(&self) -> CouponSnapshot {
        CouponSnapshot {
            coupon_id: self.id.clone(),
            discount: self.discount,
            expiry_date: None,
        }
    }

    /// Snapshot recorded on an order that earned the coupon
    #[must_use]
    pub fn issued_snapshot(&self) -> CouponSnapshot {
        CouponSnapshot {
            coupon_id: self.id.clone(),
            discount: self.discount,
            expiry_date: Some(self.expires_at),
        }
    }
}

/// Copy of coupon data embedded in an order
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CouponSnapshot {
    /// Coupon identifier
    pub coupon_id: CouponId,
    /// Discount at the time of capture
    pub discount: Money,
    /// Expiry, recorded only for newly issued coupons
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<DateTime<Utc>>,
}

/// A persisted customer order
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    /// Order identifier
    pub id: OrderId,
    /// Customer name
    pub customer_name: String,
    /// Account the customer pays from
    pub account_number: String,
    /// Number of portions (at least one)
    pub quantity: u32,
    /// Chosen spice level
    pub spice_level: SpiceLevel,
    /// Pickup or delivery
    pub delivery_option: DeliveryOption,
    /// Extra options
    pub options: OrderOptions,
    /// Total after surcharges and discount
    pub total_price: Money,
    /// Current status
    pub status: OrderStatus,
    /// Coupon applied at placement
    pub applied_coupon: Option<CouponSnapshot>,
    /// Coupon earned by this order
    pub new_coupon: Option<CouponSnapshot>,
    /// Placement time
    pub created_at: DateTime<Utc>,
    /// Last status change
    pub updated_at: DateTime<Utc>,
}
