//! PostgreSQL basket store.
//!
//! Baskets live in the `customer_baskets` table with the item list in a
//! JSONB column, so item order and duplicates survive a round trip.
//!
//! This module uses dynamic queries (sqlx::query) instead of compile-time
//! checked macros (sqlx::query!) to allow compilation without DATABASE_URL.

use async_trait::async_trait;
use basket_domain::{BasketItem, CustomerBasket};
use sqlx::postgres::PgPoolOptions;
use sqlx::types::Json;
use sqlx::PgPool;
use tracing::{debug, info};

use crate::error::StoreError;
use crate::repository::BasketRepository;

/// PostgreSQL implementation of `BasketRepository`.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Create a store over an existing pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect to the database at `database_url`.
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;
        Ok(Self::new(pool))
    }

    /// Run pending migrations from the workspace `migrations` directory.
    ///
    /// Idempotent: safe to run multiple times.
    pub async fn migrate(&self) -> Result<(), StoreError> {
        info!("Running basket store migrations...");
        sqlx::migrate!("../migrations")
            .run(&self.pool)
            .await
            .map_err(|e| StoreError::Database(e.to_string()))?;
        info!("Migrations completed successfully");
        Ok(())
    }
}

#[async_trait]
impl BasketRepository for PgStore {
    async fn get(&self, customer_id: &str) -> Result<CustomerBasket, StoreError> {
        let row: Option<(Json<Vec<BasketItem>>,)> =
            sqlx::query_as("SELECT items FROM customer_baskets WHERE customer_id = $1")
                .bind(customer_id)
                .fetch_optional(&self.pool)
                .await?;

        match row {
            Some((Json(items),)) => Ok(CustomerBasket::new(customer_id, items)),
            None => Err(StoreError::not_found(customer_id)),
        }
    }

    async fn update(&self, basket: &CustomerBasket) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO customer_baskets (customer_id, items, updated_at)
            VALUES ($1, $2, NOW())
            ON CONFLICT (customer_id)
            DO UPDATE SET items = EXCLUDED.items, updated_at = NOW()
            "#,
        )
        .bind(&basket.customer_id)
        .bind(Json(&basket.items))
        .execute(&self.pool)
        .await?;

        debug!(customer_id = %basket.customer_id, "Basket upserted in postgres");
        Ok(())
    }

    async fn delete(&self, customer_id: &str) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM customer_baskets WHERE customer_id = $1")
            .bind(customer_id)
            .execute(&self.pool)
            .await?;

        debug!(customer_id, removed = result.rows_affected(), "Basket deleted from postgres");
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================
//
// Run with: `cargo test -p basket-store --features postgres`
