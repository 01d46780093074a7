//! Basket Controller: the request-side contract with the store.
//!
//! Each operation is a straight pipeline:
//!
//! ```text
//! validate → store call → (upsert only) read-back → respond
//! ```
//!
//! The controller owns no state besides its store handle, so it is cheap to
//! clone into every request. Store calls are awaited in sequence and never
//! retried; dropping an operation's future drops the pending store call, so
//! an upsert cancelled mid-write never issues its read-back.
//!
//! With a store timeout set, each store call that outlives it is abandoned
//! and reported as a store error like any other failure.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use basket_domain::CustomerBasket;
use basket_store::{BasketRepository, StoreError};
use tracing::{debug, error, info, warn};

use crate::error::{BasketError, BasketResult, StoreOperation};

/// Translates basket actions into store calls and classifies the outcome.
pub struct BasketController<S: BasketRepository + ?Sized> {
    store: Arc<S>,
    store_timeout: Option<Duration>,
}

impl<S: BasketRepository + ?Sized> Clone for BasketController<S> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            store_timeout: self.store_timeout,
        }
    }
}

impl<S: BasketRepository + ?Sized> BasketController<S> {
    /// Create a controller over a store.
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            store_timeout: None,
        }
    }

    /// Bound every store call by `timeout`.
    pub fn with_store_timeout(mut self, timeout: Duration) -> Self {
        self.store_timeout = Some(timeout);
        self
    }

    /// Create or fully replace a customer's basket.
    ///
    /// Returns the basket as read back from the store after the write, not
    /// the payload, so callers see whatever the store actually persisted.
    /// A failed read-back is reported as `BasketError::Confirmation`: the
    /// write itself succeeded.
    pub async fn upsert(&self, basket: CustomerBasket) -> BasketResult<CustomerBasket> {
        basket.validate()?;
        let customer_id = basket.customer_id.as_str();

        info!(customer_id, items = basket.items.len(), "Upserting basket");

        if let Err(source) = self.bounded(self.store.update(&basket)).await {
            warn!(customer_id, error = %source, "Basket write failed");
            return Err(BasketError::store(StoreOperation::Write, customer_id, source));
        }

        match self.bounded(self.store.get(customer_id)).await {
            Ok(stored) => {
                debug!(customer_id, items = stored.items.len(), "Basket write confirmed");
                Ok(stored)
            },
            Err(source) => {
                error!(customer_id, error = %source, "Basket persisted but confirmation read failed");
                Err(BasketError::Confirmation {
                    customer_id: customer_id.to_string(),
                    source,
                })
            },
        }
    }

    /// Load a customer's basket.
    ///
    /// An empty id cannot name a basket and is reported as not found
    /// without touching the store.
    pub async fn fetch(&self, customer_id: &str) -> BasketResult<CustomerBasket> {
        if customer_id.is_empty() {
            return Err(BasketError::NotFound {
                customer_id: String::new(),
                source: StoreError::not_found(customer_id),
            });
        }

        debug!(customer_id, "Fetching basket");

        self.bounded(self.store.get(customer_id)).await.map_err(|source| {
            if source.is_not_found() {
                debug!(customer_id, "Basket not found");
                BasketError::NotFound {
                    customer_id: customer_id.to_string(),
                    source,
                }
            } else {
                warn!(customer_id, error = %source, "Basket read failed");
                BasketError::store(StoreOperation::Read, customer_id, source)
            }
        })
    }

    /// Remove a customer's basket.
    ///
    /// Removing a basket that does not exist succeeds.
    pub async fn remove(&self, customer_id: &str) -> BasketResult<()> {
        if customer_id.is_empty() {
            return Err(BasketError::validation("customer id must not be empty"));
        }

        info!(customer_id, "Removing basket");

        self.bounded(self.store.delete(customer_id)).await.map_err(|source| {
            warn!(customer_id, error = %source, "Basket delete failed");
            BasketError::store(StoreOperation::Delete, customer_id, source)
        })
    }

    async fn bounded<T>(
        &self,
        call: impl Future<Output = Result<T, StoreError>>,
    ) -> Result<T, StoreError> {
        match self.store_timeout {
            Some(limit) => tokio::time::timeout(limit, call).await.unwrap_or_else(|_| {
                Err(StoreError::Connection(format!(
                    "store call timed out after {}ms",
                    limit.as_millis()
                )))
            }),
            None => call.await,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
