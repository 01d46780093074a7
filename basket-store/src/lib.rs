//! Basket Storage Layer
//!
//! Durable mapping from customer identifier to basket.
//!
//! # Architecture
//!
//! - **Repository trait**: `BasketRepository` defines the storage port
//! - **In-memory store**: Fast implementation for testing and development
//! - **Redis store**: Key-value backend (feature `redis`)
//! - **PostgreSQL store**: Relational backend (feature `postgres`)
//!
//! # Usage
//!
//! ```rust
//! use basket_domain::CustomerBasket;
//! use basket_store::{BasketRepository, MemoryStore};
//!
//! #[tokio::main]
//! async fn main() {
//!     let store = MemoryStore::new();
//!
//!     store.update(&CustomerBasket::empty("c1")).await.unwrap();
//!
//!     let basket = store.get("c1").await.unwrap();
//!     assert!(basket.items.is_empty());
//! }
//! ```

#![warn(clippy::all)]

// Modules
mod error;
mod memory;
#[cfg(feature = "postgres")]
mod postgres;
#[cfg(feature = "redis")]
mod redis_store;
mod repository;

// Re-exports
pub use error::StoreError;
pub use memory::MemoryStore;
#[cfg(feature = "postgres")]
pub use postgres::PgStore;
#[cfg(feature = "redis")]
pub use redis_store::RedisStore;
pub use repository::BasketRepository;
