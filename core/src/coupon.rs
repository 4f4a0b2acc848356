//! Coupon workflow: issue, look up, list and redeem coupons.

use crate::environment::Environment;
use crate::error::{CouponRejection, Result, ServiceError, StoreError};
use crate::metrics;
use crate::store::CouponStore;
use crate::types::{Coupon, CouponId, Money};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

/// Coupon as returned to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CouponView {
    /// Coupon identifier
    pub coupon_id: CouponId,
    /// Discount in minor units
    pub discount: Money,
    /// Expiry instant
    pub expiry_date: DateTime<Utc>,
    /// Whether the coupon has been redeemed
    pub is_used: bool,
    /// Issue instant
    pub issued_at: DateTime<Utc>,
}

impl From<Coupon> for CouponView {
    fn from(coupon: Coupon) -> Self {
        Self {
            coupon_id: coupon.id,
            discount: coupon.discount,
            expiry_date: coupon.expires_at,
            is_used: coupon.used,
            issued_at: coupon.issued_at,
        }
    }
}

/// List of coupons as returned to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CouponListView {
    /// Coupons, most recently issued first
    pub coupons: Vec<CouponView>,
}

/// Coupon lifecycle operations over a [`CouponStore`].
#[derive(Debug, Clone)]
pub struct CouponService<C> {
    store: C,
    env: Environment,
}

impl<C: CouponStore> CouponService<C> {
    /// Create a coupon service.
    #[must_use]
    pub const fn new(store: C, env: Environment) -> Self {
        Self { store, env }
    }

    /// The underlying store.
    #[must_use]
    pub const fn store(&self) -> &C {
        &self.store
    }

    /// Issue a new unused coupon valid for `validity` from now.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Store` if the coupon cannot be persisted.
    #[instrument(skip(self), fields(discount = %discount))]
    pub async fn issue(&self, discount: Money, validity: Duration) -> Result<Coupon> {
        let now = self.env.now();
        let coupon = Coupon {
            id: CouponId::from_suffix(&self.env.ids.next_suffix()),
            discount,
            expires_at: now + validity,
            used: false,
            issued_at: now,
        };

        self.store.create(&coupon).await?;

        metrics::record_coupon_issued();
        info!(coupon_id = %coupon.id, expires_at = %coupon.expires_at, "Coupon issued");
        Ok(coupon)
    }

    /// Get a coupon by identifier.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::CouponNotFound` if it does not exist, or
    /// `ServiceError::Store` if the lookup fails.
    #[instrument(skip(self), fields(coupon_id = %id))]
    pub async fn lookup(&self, id: &CouponId) -> Result<CouponView> {
        self.store
            .find_by_id(id)
            .await?
            .map(CouponView::from)
            .ok_or_else(|| ServiceError::CouponNotFound(id.clone()))
    }

    /// All coupons that are unused and not yet expired, newest first.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Store` if the query fails.
    #[instrument(skip(self))]
    pub async fn list_valid(&self) -> Result<CouponListView> {
        let coupons = self.store.find_all_valid(self.env.now()).await?;
        Ok(CouponListView {
            coupons: coupons.into_iter().map(CouponView::from).collect(),
        })
    }

    /// Mark a coupon as used.
    ///
    /// Only the used flag is enforced here; callers applying a coupon to an
    /// order check expiry themselves.
    ///
    /// # Errors
    ///
    /// Returns:
    /// - `ServiceError::CouponNotFound` if the coupon does not exist
    /// - `ServiceError::InvalidCoupon` if it was already used, including when
    ///   a concurrent redeem wins
    /// - `ServiceError::Store` on storage failure
    #[instrument(skip(self), fields(coupon_id = %id))]
    pub async fn redeem(&self, id: &CouponId) -> Result<()> {
        let coupon = self
            .store
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::CouponNotFound(id.clone()))?;

        if coupon.used {
            return Err(ServiceError::InvalidCoupon(CouponRejection::AlreadyUsed));
        }

        self.mark_redeemed(id).await
    }

    /// Conditional flip of the used flag, shared with order placement.
    pub(crate) async fn mark_redeemed(&self, id: &CouponId) -> Result<()> {
        match self.store.mark_used(id).await {
            Ok(()) => {
                metrics::record_coupon_redeemed();
                info!("Coupon redeemed");
                Ok(())
            }
            Err(StoreError::NotFound) => Err(ServiceError::CouponNotFound(id.clone())),
            Err(StoreError::AlreadyUsed) => {
                Err(ServiceError::InvalidCoupon(CouponRejection::AlreadyUsed))
            }
            Err(other) => Err(other.into()),
        }
    }
}
