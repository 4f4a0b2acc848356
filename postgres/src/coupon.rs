//! PostgreSQL coupon store.

use crate::database_error;
use chrono::{DateTime, Utc};
use myramen_core::{Coupon, CouponId, CouponStore, Money, StoreError, StoreResult};
use sqlx::PgPool;
use tracing::instrument;

/// PostgreSQL coupon store.
#[derive(Debug, Clone)]
pub struct PostgresCouponStore {
    pool: PgPool,
}

impl PostgresCouponStore {
    /// Create a store over an existing pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct CouponRow {
    coupon_id: String,
    discount: i64,
    expiry_date: DateTime<Utc>,
    is_used: bool,
    issued_at: DateTime<Utc>,
}

impl From<CouponRow> for Coupon {
    fn from(row: CouponRow) -> Self {
        Self {
            id: CouponId::new(row.coupon_id),
            discount: Money::from_minor(row.discount),
            expires_at: row.expiry_date,
            used: row.is_used,
            issued_at: row.issued_at,
        }
    }
}

impl CouponStore for PostgresCouponStore {
    #[instrument(level = "debug", skip_all, fields(coupon_id = %coupon.id))]
    async fn create(&self, coupon: &Coupon) -> StoreResult<()> {
        sqlx::query(
            r"
            INSERT INTO coupons (coupon_id, discount, expiry_date, is_used, issued_at)
            VALUES ($1, $2, $3, $4, $5)
            ",
        )
        .bind(coupon.id.as_str())
        .bind(coupon.discount.minor())
        .bind(coupon.expires_at)
        .bind(coupon.used)
        .bind(coupon.issued_at)
        .execute(&self.pool)
        .await
        .map_err(|e| database_error("Failed to save coupon", e))?;

        Ok(())
    }

    #[instrument(level = "debug", skip(self), fields(coupon_id = %id))]
    async fn find_by_id(&self, id: &CouponId) -> StoreResult<Option<Coupon>> {
        let row: Option<CouponRow> = sqlx::query_as(
            r"
            SELECT coupon_id, discount, expiry_date, is_used, issued_at
            FROM coupons
            WHERE coupon_id = $1
            ",
        )
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| database_error("Failed to load coupon", e))?;

        Ok(row.map(Coupon::from))
    }

    #[instrument(level = "debug", skip(self))]
    async fn find_all_valid(&self, now: DateTime<Utc>) -> StoreResult<Vec<Coupon>> {
        let rows: Vec<CouponRow> = sqlx::query_as(
            r"
            SELECT coupon_id, discount, expiry_date, is_used, issued_at
            FROM coupons
            WHERE is_used = FALSE AND expiry_date > $1
            ORDER BY issued_at DESC, coupon_id DESC
            ",
        )
        .bind(now)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| database_error("Failed to list coupons", e))?;

        Ok(rows.into_iter().map(Coupon::from).collect())
    }

    #[instrument(level = "debug", skip_all, fields(coupon_id = %coupon.id))]
    async fn update(&self, coupon: &Coupon) -> StoreResult<()> {
        let result = sqlx::query(
            r"
            UPDATE coupons
            SET discount = $1, expiry_date = $2, is_used = is_used OR $3
            WHERE coupon_id = $4
            ",
        )
        .bind(coupon.discount.minor())
        .bind(coupon.expires_at)
        .bind(coupon.used)
        .bind(coupon.id.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| database_error("Failed to update coupon", e))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    #[instrument(level = "debug", skip(self), fields(coupon_id = %id))]
    async fn mark_used(&self, id: &CouponId) -> StoreResult<()> {
        let result = sqlx::query(
            r"
            UPDATE coupons
            SET is_used = TRUE
            WHERE coupon_id = $1 AND is_used = FALSE
            ",
        )
        .bind(id.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| database_error("Failed to redeem coupon", e))?;

        if result.rows_affected() > 0 {
            return Ok(());
        }

        // Nothing flipped: either the coupon is missing or someone else won.
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM coupons WHERE coupon_id = $1)")
                .bind(id.as_str())
                .fetch_one(&self.pool)
                .await
                .map_err(|e| database_error("Failed to load coupon", e))?;

        if exists {
            tracing::debug!("Coupon already redeemed");
            Err(StoreError::AlreadyUsed)
        } else {
            Err(StoreError::NotFound)
        }
    }
}
