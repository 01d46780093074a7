//! Basket Daemon
//!
//! Serves the per-customer basket API.
//!
//! # Usage
//!
//! ```bash
//! # Start with default configuration (in-memory store)
//! cargo run -p basketd
//!
//! # Start against Redis
//! BASKET_STORE=redis BASKET_REDIS_URL=redis://localhost:6379 cargo run -p basketd --features redis
//! ```
//!
//! # Environment Variables
//!
//! - `BASKET_ENV`: Environment (test, development, production)
//! - `BASKET_API_HOST`: API host (default: 0.0.0.0)
//! - `BASKET_API_PORT`: API port (default: 8080)
//! - `BASKET_REQUEST_TIMEOUT_SECS`: Per-request timeout (default: 10)
//! - `BASKET_STORE`: Store backend (memory, redis, postgres; default: memory)
//! - `BASKET_REDIS_URL`: Redis URL (default: redis://127.0.0.1:6379)
//! - `BASKET_REDIS_TTL_SECS`: Basket expiry in Redis (default: none)
//! - `DATABASE_URL`: PostgreSQL URL (required for postgres)
//! - `BASKET_LOG_FORMAT`: text or json (default: text)
//! - `RUST_LOG`: Log filter (default: basketd=info)

use basketd::{Config, Daemon, LogFormat};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize tracing
    let json = config.log_format == LogFormat::Json;
    tracing_subscriber::registry()
        .with(json.then(|| fmt::layer().json()))
        .with((!json).then(|| fmt::layer()))
        .with(
            EnvFilter::from_default_env()
                .add_directive("basketd=info".parse()?)
                .add_directive("tower_http=info".parse()?),
        )
        .init();

    info!(
        version = env!("CARGO_PKG_VERSION"),
        environment = %config.environment,
        api_host = %config.api.host,
        api_port = config.api.port,
        store = %config.store.backend,
        "Basket daemon"
    );

    // Create and run daemon
    let daemon = Daemon::from_config(config).await?;
    daemon.run().await?;

    Ok(())
}
