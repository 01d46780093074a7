//! Storage layer errors

use thiserror::Error;

/// Errors that can occur in the storage layer
#[derive(Debug, Error)]
pub enum StoreError {
    /// No basket stored under this customer id
    #[error("Basket not found: {customer_id}")]
    NotFound {
        /// Customer the lookup was for
        customer_id: String,
    },

    /// Serialization error (encoding or decoding a stored basket)
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Database error
    #[error("Database error: {0}")]
    Database(String),

    /// Connection error
    #[error("Connection error: {0}")]
    Connection(String),

    /// Key-value backend error
    #[error("Cache error: {0}")]
    Cache(String),
}

impl StoreError {
    /// Create a not found error
    pub fn not_found(customer_id: impl Into<String>) -> Self {
        Self::NotFound {
            customer_id: customer_id.into(),
        }
    }

    /// True when the store reported the key as absent
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Serialization(err.to_string())
    }
}

#[cfg(feature = "postgres")]
impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                StoreError::Connection(err.to_string())
            },
            sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_) => {
                StoreError::Serialization(err.to_string())
            },
            _ => StoreError::Database(err.to_string()),
        }
    }
}

#[cfg(feature = "redis")]
impl From<::redis::RedisError> for StoreError {
    fn from(err: ::redis::RedisError) -> Self {
        if err.is_io_error() || err.is_connection_refusal() || err.is_timeout() {
            StoreError::Connection(err.to_string())
        } else {
            StoreError::Cache(err.to_string())
        }
    }
}
