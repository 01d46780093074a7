//! Basket Daemon Library
//!
//! HTTP front end for the per-customer basket store.
//!
//! # Architecture
//!
//! ```text
//! HTTP → API Router → Basket Controller → BasketRepository → (memory | redis | postgres)
//! ```
//!
//! # Components
//!
//! - **Daemon**: Builds the store, serves the API, handles shutdown
//! - **Controller**: Validate → store call → read-back, with error classification
//! - **API**: Axum routes and the JSON error body
//! - **Config**: Environment-based configuration
//!
//! # Example
//!
//! ```rust,ignore
//! use basketd::{Config, Daemon};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = Config::from_env().expect("Failed to load config");
//!     let daemon = Daemon::from_config(config).await.expect("Failed to build store");
//!     daemon.run().await.expect("Daemon error");
//! }
//! ```

#![warn(clippy::all)]

pub mod api;
pub mod config;
pub mod controller;
pub mod daemon;
pub mod error;

// Re-exports for convenience
pub use api::{create_router, ApiState, ErrorResponse};
pub use config::{ApiConfig, Config, Environment, LogFormat, StoreBackend, StoreConfig};
pub use controller::BasketController;
pub use daemon::Daemon;
pub use error::{BasketError, BasketResult, DaemonError, DaemonResult, ErrorKind, StoreOperation};
