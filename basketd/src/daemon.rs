//! Daemon: builds the store and serves the basket API.
//!
//! # Lifecycle
//!
//! 1. Load configuration
//! 2. Build the configured store backend
//! 3. Start API server
//! 4. Serve until SIGINT or the shutdown token fires
//! 5. Graceful shutdown (in-flight requests finish)

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use basket_store::{BasketRepository, MemoryStore};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::api::{create_router, ApiState};
use crate::config::{Config, StoreBackend};
use crate::controller::BasketController;
use crate::error::{DaemonError, DaemonResult};

// =============================================================================
// Daemon
// =============================================================================

/// The basket daemon.
pub struct Daemon {
    /// Configuration
    config: Config,
    /// Store shared by all requests
    store: Arc<dyn BasketRepository>,
    /// Fires to stop serving
    shutdown_token: CancellationToken,
}

impl Daemon {
    /// Create a daemon over an already-built store.
    pub fn new(config: Config, store: Arc<dyn BasketRepository>) -> Self {
        Self {
            config,
            store,
            shutdown_token: CancellationToken::new(),
        }
    }

    /// Create a daemon with an in-memory store (for testing/development).
    pub fn new_in_memory(config: Config) -> Self {
        Self::new(config, Arc::new(MemoryStore::new()))
    }

    /// Create a daemon with the store backend named in the configuration.
    pub async fn from_config(config: Config) -> DaemonResult<Self> {
        let store = build_store(&config).await?;
        Ok(Self::new(config, store))
    }

    /// Token that stops the daemon when cancelled.
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown_token.clone()
    }

    /// The full application: API routes plus tracing and CORS layers.
    ///
    /// Store calls are bounded by the configured request timeout, so a
    /// stalled backend answers with a store error body.
    pub fn router(&self) -> Router {
        let controller = BasketController::new(self.store.clone())
            .with_store_timeout(self.config.api.request_timeout);
        let state = Arc::new(ApiState { controller });

        create_router(state)
            .layer(CorsLayer::permissive())
            .layer(TraceLayer::new_for_http())
    }

    /// Run the daemon.
    ///
    /// This method blocks until shutdown is requested (SIGINT or token).
    pub async fn run(self) -> DaemonResult<()> {
        info!(
            version = env!("CARGO_PKG_VERSION"),
            environment = %self.config.environment,
            store = %self.config.store.backend,
            "Starting basket daemon"
        );

        let listener = self.bind().await?;
        let local_addr = listener.local_addr()?;
        info!(%local_addr, "API server started");

        let token = self.shutdown_token.clone();
        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown_signal(token))
            .await?;

        info!("Shutdown complete");
        Ok(())
    }

    /// Start the API server in the background.
    ///
    /// Returns the bound address; the server stops when the shutdown token
    /// is cancelled.
    pub async fn start_api_server(&self) -> DaemonResult<SocketAddr> {
        let listener = self.bind().await?;
        let local_addr = listener.local_addr()?;

        let router = self.router();
        let token = self.shutdown_token.clone();

        // Spawn the server task
        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, router)
                .with_graceful_shutdown(async move { token.cancelled().await })
                .await
            {
                error!(error = %e, "API server error");
            }
        });

        Ok(local_addr)
    }

    async fn bind(&self) -> DaemonResult<TcpListener> {
        let addr = format!("{}:{}", self.config.api.host, self.config.api.port);

        TcpListener::bind(&addr)
            .await
            .map_err(|e| DaemonError::Config(format!("Failed to bind to {}: {}", addr, e)))
    }
}

/// Resolves on ctrl-c or when the token is cancelled, whichever comes first.
async fn shutdown_signal(token: CancellationToken) {
    tokio::select! {
        result = tokio::signal::ctrl_c() => {
            if let Err(e) = result {
                error!(error = %e, "Failed to listen for shutdown signal");
            }
            info!("Received shutdown signal");
            token.cancel();
        }
        _ = token.cancelled() => {
            info!("Shutdown requested");
        }
    }
}

/// Build the store backend named in the configuration.
async fn build_store(config: &Config) -> DaemonResult<Arc<dyn BasketRepository>> {
    match config.store.backend {
        StoreBackend::Memory => Ok(Arc::new(MemoryStore::new())),
        StoreBackend::Redis => build_redis_store(config),
        StoreBackend::Postgres => build_postgres_store(config).await,
    }
}

#[cfg(feature = "redis")]
fn build_redis_store(config: &Config) -> DaemonResult<Arc<dyn BasketRepository>> {
    let store = basket_store::RedisStore::from_url(&config.store.redis_url, config.store.redis_ttl)?;
    info!(ttl_secs = config.store.redis_ttl.map(|ttl| ttl.as_secs()), "Using redis store");
    Ok(Arc::new(store))
}

#[cfg(not(feature = "redis"))]
fn build_redis_store(_config: &Config) -> DaemonResult<Arc<dyn BasketRepository>> {
    Err(DaemonError::Config(
        "BASKET_STORE=redis requires basketd built with the `redis` feature".to_string(),
    ))
}

#[cfg(feature = "postgres")]
async fn build_postgres_store(config: &Config) -> DaemonResult<Arc<dyn BasketRepository>> {
    let url = config
        .store
        .database_url
        .as_deref()
        .ok_or_else(|| DaemonError::Config("DATABASE_URL is not set".to_string()))?;

    let store = basket_store::PgStore::connect(url).await?;
    store.migrate().await?;
    info!("Using postgres store");
    Ok(Arc::new(store))
}

#[cfg(not(feature = "postgres"))]
async fn build_postgres_store(_config: &Config) -> DaemonResult<Arc<dyn BasketRepository>> {
    Err(DaemonError::Config(
        "BASKET_STORE=postgres requires basketd built with the `postgres` feature".to_string(),
    ))
}

// =============================================================================
// Tests
// =============================================================================
