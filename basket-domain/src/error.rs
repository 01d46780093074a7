//! Domain validation errors

/// Errors raised when a basket payload breaks a domain invariant
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    /// Customer identifier is empty
    #[error("Invalid customer id: {0}")]
    InvalidCustomerId(String),

    /// Unit price must be non-negative
    #[error("Invalid unit price for item {index}: {message}")]
    InvalidUnitPrice {
        /// Position of the offending item in the basket
        index: usize,
        /// What was wrong
        message: String,
    },

    /// Quantity must be positive
    #[error("Invalid quantity for item {index}: {message}")]
    InvalidQuantity {
        /// Position of the offending item in the basket
        index: usize,
        /// What was wrong
        message: String,
    },
}
