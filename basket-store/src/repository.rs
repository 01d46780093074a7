//! Repository trait definition (Port)
//!
//! The basket store is a capability, not a concrete dependency.
//! Implementations can be Redis, PostgreSQL, in-memory, or a test double.

use crate::error::StoreError;
use async_trait::async_trait;
use basket_domain::CustomerBasket;

/// Repository for customer baskets.
///
/// All operations must be safe to call concurrently for different customer
/// ids. Concurrent calls for the same id are serialized however the backend
/// chooses.
#[async_trait]
pub trait BasketRepository: Send + Sync {
    /// Load the basket for a customer.
    ///
    /// Returns `StoreError::NotFound` when no basket is stored for the id.
    async fn get(&self, customer_id: &str) -> Result<CustomerBasket, StoreError>;

    /// Store a basket, replacing any previous value for its customer id.
    async fn update(&self, basket: &CustomerBasket) -> Result<(), StoreError>;

    /// Remove the basket for a customer. Removing an absent basket succeeds.
    async fn delete(&self, customer_id: &str) -> Result<(), StoreError>;
}
