//! PostgreSQL order store.

use crate::database_error;
use chrono::{DateTime, Utc};
use myramen_core::{
    CouponSnapshot, DeliveryOption, Money, Order, OrderId, OrderOptions, OrderStatus, OrderStore,
    SpiceLevel, StoreError, StoreResult,
};
use sqlx::PgPool;
use sqlx::types::Json;
use tracing::instrument;

/// PostgreSQL order store.
///
/// Options and coupon snapshots are kept in JSONB columns using the same
/// camelCase shape the API returns.
#[derive(Debug, Clone)]
pub struct PostgresOrderStore {
    pool: PgPool,
}

impl PostgresOrderStore {
    /// Create a store over an existing pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const SELECT_ORDER: &str = r"
    SELECT order_id, name, account_number, quantity, spicy_level, delivery_option,
           options, total_price, status, applied_coupon, new_coupon, created_at, updated_at
    FROM orders
";

#[derive(sqlx::FromRow)]
struct OrderRow {
    order_id: String,
    name: String,
    account_number: String,
    quantity: i32,
    spicy_level: i16,
    delivery_option: String,
    options: Json<OrderOptions>,
    total_price: i64,
    status: String,
    applied_coupon: Option<Json<CouponSnapshot>>,
    new_coupon: Option<Json<CouponSnapshot>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<OrderRow> for Order {
    type Error = StoreError;

    fn try_from(row: OrderRow) -> Result<Self, Self::Error> {
        let quantity = u32::try_from(row.quantity).map_err(|_| {
            StoreError::Serialization(format!("invalid quantity {}", row.quantity))
        })?;
        let spice_level = u8::try_from(row.spicy_level)
            .map_err(|e| e.to_string())
            .and_then(SpiceLevel::try_from)
            .map_err(StoreError::Serialization)?;
        let delivery_option: DeliveryOption = row
            .delivery_option
            .parse()
            .map_err(StoreError::Serialization)?;
        let status: OrderStatus = row.status.parse().map_err(StoreError::Serialization)?;

        Ok(Self {
            id: OrderId::new(row.order_id),
            customer_name: row.name,
            account_number: row.account_number,
            quantity,
            spice_level,
            delivery_option,
            options: row.options.0,
            total_price: Money::from_minor(row.total_price),
            status,
            applied_coupon: row.applied_coupon.map(|json| json.0),
            new_coupon: row.new_coupon.map(|json| json.0),
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

impl OrderStore for PostgresOrderStore {
    #[instrument(level = "debug", skip_all, fields(order_id = %order.id))]
    async fn create(&self, order: &Order) -> StoreResult<()> {
        let quantity = i32::try_from(order.quantity).map_err(|_| {
            StoreError::Serialization(format!("quantity {} too large", order.quantity))
        })?;

        sqlx::query(
            r"
            INSERT INTO orders (
                order_id, name, account_number, quantity, spicy_level, delivery_option,
                options, total_price, status, applied_coupon, new_coupon, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            ",
        )
        .bind(order.id.as_str())
        .bind(&order.customer_name)
        .bind(&order.account_number)
        .bind(quantity)
        .bind(i16::from(order.spice_level.get()))
        .bind(order.delivery_option.as_str())
        .bind(Json(&order.options))
        .bind(order.total_price.minor())
        .bind(order.status.as_str())
        .bind(order.applied_coupon.as_ref().map(Json))
        .bind(order.new_coupon.as_ref().map(Json))
        .bind(order.created_at)
        .bind(order.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| database_error("Failed to save order", e))?;

        Ok(())
    }

    #[instrument(level = "debug", skip(self), fields(order_id = %id))]
    async fn find_by_id(&self, id: &OrderId) -> StoreResult<Option<Order>> {
        let sql = format!("{SELECT_ORDER} WHERE order_id = $1");
        let row: Option<OrderRow> = sqlx::query_as(&sql)
            .bind(id.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| database_error("Failed to load order", e))?;

        row.map(Order::try_from).transpose()
    }

    #[instrument(level = "debug", skip(self))]
    async fn find_all(&self) -> StoreResult<Vec<Order>> {
        let sql = format!("{SELECT_ORDER} ORDER BY created_at DESC, order_id DESC");
        let rows: Vec<OrderRow> = sqlx::query_as(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| database_error("Failed to list orders", e))?;

        rows.into_iter().map(Order::try_from).collect()
    }

    #[instrument(level = "debug", skip(self), fields(order_id = %id))]
    async fn update_status(
        &self,
        id: &OrderId,
        status: OrderStatus,
        updated_at: DateTime<Utc>,
    ) -> StoreResult<()> {
        let result = sqlx::query(
            r"
            UPDATE orders
            SET status = $1, updated_at = $2
            WHERE order_id = $3
            ",
        )
        .bind(status.as_str())
        .bind(updated_at)
        .bind(id.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| database_error("Failed to update order status", e))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    #[instrument(level = "debug", skip(self), fields(order_id = %id))]
    async fn delete(&self, id: &OrderId) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM orders WHERE order_id = $1")
            .bind(id.as_str())
            .execute(&self.pool)
            .await
            .map_err(|e| database_error("Failed to delete order", e))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}
