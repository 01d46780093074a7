//! Daemon error types.

use std::error::Error as StdError;
use std::fmt;

use basket_domain::DomainError;
use basket_store::StoreError;
use thiserror::Error;

/// Store call that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOperation {
    /// Loading a basket
    Read,
    /// Writing a basket
    Write,
    /// Removing a basket
    Delete,
}

impl fmt::Display for StoreOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreOperation::Read => write!(f, "read"),
            StoreOperation::Write => write!(f, "write"),
            StoreOperation::Delete => write!(f, "delete"),
        }
    }
}

/// Classification callers branch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed input, never reached the store
    Validation,
    /// The basket does not exist
    NotFound,
    /// Any other store failure
    Store,
}

/// Outcome of a failed basket operation.
///
/// Every variant that wraps a store failure keeps it as `source`, so the
/// full cause chain survives to the response body.
#[derive(Debug, Error)]
pub enum BasketError {
    /// Malformed or incomplete input
    #[error("Invalid basket: {message}")]
    Validation {
        /// What was wrong with the input
        message: String,
    },

    /// No basket stored for the customer
    #[error("Basket not found for customer {customer_id}")]
    NotFound {
        /// Customer that was looked up
        customer_id: String,
        /// Store-level not found
        #[source]
        source: StoreError,
    },

    /// A store call failed
    #[error("Store {operation} failed for customer {customer_id}")]
    Store {
        /// Which call failed
        operation: StoreOperation,
        /// Customer the call was for
        customer_id: String,
        /// Underlying failure
        #[source]
        source: StoreError,
    },

    /// The write landed but reading it back failed.
    #[error("Basket for customer {customer_id} was saved but could not be read back")]
    Confirmation {
        /// Customer whose basket was written
        customer_id: String,
        /// Underlying read failure
        #[source]
        source: StoreError,
    },
}

impl BasketError {
    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Wrap a failed store call
    pub fn store(operation: StoreOperation, customer_id: impl Into<String>, source: StoreError) -> Self {
        Self::Store {
            operation,
            customer_id: customer_id.into(),
            source,
        }
    }

    /// Coarse classification (confirmation failures are store errors)
    pub fn kind(&self) -> ErrorKind {
        match self {
            BasketError::Validation { .. } => ErrorKind::Validation,
            BasketError::NotFound { .. } => ErrorKind::NotFound,
            BasketError::Store { .. } | BasketError::Confirmation { .. } => ErrorKind::Store,
        }
    }

    /// True when the basket is known to be persisted despite the error
    pub fn is_partial_write(&self) -> bool {
        matches!(self, BasketError::Confirmation { .. })
    }

    /// This error followed by each of its sources, joined with `": "`.
    pub fn chain(&self) -> String {
        let mut message = self.to_string();
        let mut source = self.source();
        while let Some(cause) = source {
            message.push_str(": ");
            message.push_str(&cause.to_string());
            source = cause.source();
        }
        message
    }
}

impl From<DomainError> for BasketError {
    fn from(err: DomainError) -> Self {
        Self::validation(err.to_string())
    }
}

/// Result type for basket operations.
pub type BasketResult<T> = Result<T, BasketError>;

/// Daemon-level errors (startup, configuration, serving).
#[derive(Debug, Error)]
pub enum DaemonError {
    /// Store error while building the backend
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Server I/O error
    #[error("Server error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for daemon operations.
pub type DaemonResult<T> = Result<T, DaemonError>;
