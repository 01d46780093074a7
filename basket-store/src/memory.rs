//! In-memory store implementation
//!
//! Used for testing and development without a backing service.
//! Thread-safe using RwLock for concurrent access.

use crate::error::StoreError;
use crate::repository::BasketRepository;
use async_trait::async_trait;
use basket_domain::{CustomerBasket, CustomerId};
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::trace;

type BasketMap = HashMap<CustomerId, CustomerBasket>;

/// In-memory basket store
pub struct MemoryStore {
    baskets: RwLock<BasketMap>,
}

impl MemoryStore {
    /// Create a new empty in-memory store
    pub fn new() -> Self {
        Self {
            baskets: RwLock::new(HashMap::new()),
        }
    }

    /// Get the number of stored baskets
    pub fn len(&self) -> usize {
        self.baskets.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// True when no basket is stored
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Clear all data (useful for test setup)
    pub fn clear(&self) {
        self.baskets.write().unwrap_or_else(PoisonError::into_inner).clear();
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, BasketMap>, StoreError> {
        self.baskets
            .read()
            .map_err(|_| StoreError::Cache("basket map lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, BasketMap>, StoreError> {
        self.baskets
            .write()
            .map_err(|_| StoreError::Cache("basket map lock poisoned".to_string()))
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BasketRepository for MemoryStore {
    async fn get(&self, customer_id: &str) -> Result<CustomerBasket, StoreError> {
        trace!(customer_id, "memory get");
        self.read()?
            .get(customer_id)
            .cloned()
            .ok_or_else(|| StoreError::not_found(customer_id))
    }

    async fn update(&self, basket: &CustomerBasket) -> Result<(), StoreError> {
        trace!(customer_id = %basket.customer_id, "memory update");
        self.write()?.insert(basket.customer_id.clone(), basket.clone());
        Ok(())
    }

    async fn delete(&self, customer_id: &str) -> Result<(), StoreError> {
        trace!(customer_id, "memory delete");
        self.write()?.remove(customer_id);
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================
