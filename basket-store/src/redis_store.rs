//! Redis basket store.
//!
//! Baskets are stored as JSON strings under `basket:{customer_id}`, using a
//! `deadpool-redis` connection pool. An optional TTL makes Redis evict
//! abandoned baskets; the expiry is refreshed on every write.

use std::time::Duration;

use ::redis::AsyncCommands;
use async_trait::async_trait;
use basket_domain::CustomerBasket;
use deadpool_redis::{Config, Connection, Pool, Runtime};
use tracing::debug;

use crate::error::StoreError;
use crate::repository::BasketRepository;

/// Prefix for basket keys.
const BASKET_KEY_PREFIX: &str = "basket:";

/// Generates the Redis key for a customer's basket.
fn basket_key(customer_id: &str) -> String {
    format!("{BASKET_KEY_PREFIX}{customer_id}")
}

/// Redis implementation of `BasketRepository`.
///
/// # Example
///
/// ```ignore
/// use basket_store::{BasketRepository, RedisStore};
///
/// let store = RedisStore::from_url("redis://localhost:6379", None)?;
/// store.update(&basket).await?;
/// let stored = store.get(&basket.customer_id).await?;
/// ```
#[derive(Clone)]
pub struct RedisStore {
    pool: Pool,
    ttl: Option<Duration>,
}

impl RedisStore {
    /// Creates a store over an existing connection pool.
    pub fn new(pool: Pool, ttl: Option<Duration>) -> Self {
        Self { pool, ttl }
    }

    /// Creates a store from a Redis URL.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Connection` if the pool cannot be created.
    pub fn from_url(redis_url: &str, ttl: Option<Duration>) -> Result<Self, StoreError> {
        let pool = Config::from_url(redis_url)
            .create_pool(Some(Runtime::Tokio1))
            .map_err(|e| StoreError::Connection(e.to_string()))?;
        Ok(Self::new(pool, ttl))
    }

    /// Basket expiry, if any.
    pub fn ttl(&self) -> Option<Duration> {
        self.ttl
    }

    async fn connection(&self) -> Result<Connection, StoreError> {
        self.pool
            .get()
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))
    }
}

#[async_trait]
impl BasketRepository for RedisStore {
    async fn get(&self, customer_id: &str) -> Result<CustomerBasket, StoreError> {
        let mut conn = self.connection().await?;
        let data: Option<String> = conn.get(basket_key(customer_id)).await?;

        match data {
            Some(json) => Ok(serde_json::from_str(&json)?),
            None => Err(StoreError::not_found(customer_id)),
        }
    }

    async fn update(&self, basket: &CustomerBasket) -> Result<(), StoreError> {
        let key = basket_key(&basket.customer_id);
        let json = serde_json::to_string(basket)?;
        let mut conn = self.connection().await?;

        match self.ttl {
            Some(ttl) => {
                conn.set_ex::<_, _, ()>(&key, json, ttl.as_secs().max(1)).await?;
            },
            None => {
                conn.set::<_, _, ()>(&key, json).await?;
            },
        }

        debug!(%key, "Basket written to redis");
        Ok(())
    }

    async fn delete(&self, customer_id: &str) -> Result<(), StoreError> {
        let mut conn = self.connection().await?;
        let removed: u64 = conn.del(basket_key(customer_id)).await?;
        debug!(customer_id, removed, "Basket deleted from redis");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basket_key() {
        assert_eq!(basket_key("c1"), "basket:c1");
    }

    #[test]
    fn test_from_url_keeps_ttl() {
        // Pool creation is lazy: no server is contacted here.
        let store = RedisStore::from_url("redis://127.0.0.1:6379", Some(Duration::from_secs(60)))
            .unwrap();
        assert_eq!(store.ttl(), Some(Duration::from_secs(60)));
    }
}
