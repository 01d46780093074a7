//! Basket Domain Layer
//!
//! Pure domain types with zero I/O dependencies.
//! A basket is an opaque bag of line items keyed by a caller-chosen
//! customer identifier; nothing here prices, merges or deduplicates items.

#![warn(missing_docs)]
#![warn(clippy::all)]

// Public modules
pub mod entities;
pub mod error;

// Re-export commonly used types
pub use entities::{BasketItem, CustomerBasket, CustomerId};
pub use error::DomainError;
