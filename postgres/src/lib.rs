//! `PostgreSQL` coupon and order stores for MyRamen.
//!
//! This crate implements the `CouponStore` and `OrderStore` traits from
//! `myramen-core` on top of sqlx:
//!
//! - Runtime-checked queries with `FromRow` row types
//! - Order options and coupon snapshots stored as JSONB
//! - Conditional coupon redemption (`... WHERE is_used = FALSE`)
//! - Embedded migrations via [`migrate`]
//!
//! # Example
//!
//! ```ignore
//! use myramen_postgres::{PostgresCouponStore, PostgresOrderStore};
//! use std::time::Duration;
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let pool = myramen_postgres::connect("postgres://localhost/myramen", 10, Duration::from_secs(30)).await?;
//!     myramen_postgres::migrate(&pool).await?;
//!
//!     let coupons = PostgresCouponStore::new(pool.clone());
//!     let orders = PostgresOrderStore::new(pool);
//!     Ok(())
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod coupon;
mod order;

pub use coupon::PostgresCouponStore;
pub use order::PostgresOrderStore;

use myramen_core::StoreError;
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;

/// Open a connection pool.
///
/// # Errors
///
/// Returns [`StoreError::Database`] if no connection can be established
/// within `connect_timeout`.
pub async fn connect(
    database_url: &str,
    max_connections: u32,
    connect_timeout: Duration,
) -> Result<PgPool, StoreError> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(connect_timeout)
        .connect(database_url)
        .await
        .map_err(|e| StoreError::Database(format!("Failed to connect: {e}")))?;

    tracing::info!(max_connections, "Database pool ready");
    Ok(pool)
}

/// Create the `coupons` and `orders` tables if they don't already exist.
///
/// # Errors
///
/// Returns [`StoreError::Database`] if migration fails.
pub async fn migrate(pool: &PgPool) -> Result<(), StoreError> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .map_err(|e| StoreError::Database(format!("Migration failed: {e}")))?;
    Ok(())
}

/// Map a sqlx failure onto the store taxonomy.
fn database_error(action: &str, e: sqlx::Error) -> StoreError {
    match &e {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            StoreError::Conflict(format!("{action}: {db_err}"))
        }
        _ => {
            tracing::error!(error = %e, "{action}");
            StoreError::Database(format!("{action}: {e}"))
        }
    }
}
