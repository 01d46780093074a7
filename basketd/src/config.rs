//! Daemon configuration.
//!
//! Loads configuration from environment variables with sensible defaults.

use crate::error::{DaemonError, DaemonResult};
use std::env;
use std::time::Duration;

// =============================================================================
// Configuration
// =============================================================================

/// Daemon configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// API server configuration
    pub api: ApiConfig,

    /// Store backend configuration
    pub store: StoreConfig,

    /// Environment (test, development, production)
    pub environment: Environment,

    /// Log output format
    pub log_format: LogFormat,
}

/// API server configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Host to bind to
    pub host: String,
    /// Port to bind to
    pub port: u16,
    /// Store calls still running after this fail as store errors
    pub request_timeout: Duration,
}

/// Store backend configuration.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Which backend to build
    pub backend: StoreBackend,
    /// Redis connection URL
    pub redis_url: String,
    /// Basket expiry in Redis (None = never expire)
    pub redis_ttl: Option<Duration>,
    /// PostgreSQL connection URL
    pub database_url: Option<String>,
}

/// Store backend selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    /// Process-local map (lost on restart)
    Memory,
    /// Redis key-value store
    Redis,
    /// PostgreSQL table
    Postgres,
}

/// Environment type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    /// Test environment
    Test,
    /// Development environment
    Development,
    /// Production environment
    Production,
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable lines
    Text,
    /// One JSON object per line
    Json,
}

const DEFAULT_REDIS_URL: &str = "redis://127.0.0.1:6379";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> DaemonResult<Self> {
        // Load .env file if present (ignore errors)
        let _ = dotenvy::dotenv();

        Ok(Self {
            api: Self::load_api_config()?,
            store: Self::load_store_config()?,
            environment: Self::load_environment()?,
            log_format: Self::load_log_format()?,
        })
    }

    /// Create test configuration.
    pub fn test() -> Self {
        Self {
            api: ApiConfig {
                host: "127.0.0.1".to_string(),
                port: 0, // Let OS assign port
                request_timeout: Duration::from_secs(5),
            },
            store: StoreConfig {
                backend: StoreBackend::Memory,
                redis_url: DEFAULT_REDIS_URL.to_string(),
                redis_ttl: None,
                database_url: None,
            },
            environment: Environment::Test,
            log_format: LogFormat::Text,
        }
    }

    fn load_environment() -> DaemonResult<Environment> {
        let env_str = env::var("BASKET_ENV").unwrap_or_else(|_| "development".to_string());

        match env_str.to_lowercase().as_str() {
            "test" => Ok(Environment::Test),
            "development" | "dev" => Ok(Environment::Development),
            "production" | "prod" => Ok(Environment::Production),
            other => Err(DaemonError::Config(format!(
                "Invalid BASKET_ENV: {}. Expected: test, development, production",
                other
            ))),
        }
    }

    fn load_api_config() -> DaemonResult<ApiConfig> {
        let host = env::var("BASKET_API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port_str = env::var("BASKET_API_PORT").unwrap_or_else(|_| "8080".to_string());

        let port = port_str
            .parse::<u16>()
            .map_err(|_| DaemonError::Config(format!("Invalid BASKET_API_PORT: {}", port_str)))?;

        let timeout_secs =
            Self::load_u64_env("BASKET_REQUEST_TIMEOUT_SECS")?.unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS);

        Ok(ApiConfig {
            host,
            port,
            request_timeout: Duration::from_secs(timeout_secs),
        })
    }

    fn load_store_config() -> DaemonResult<StoreConfig> {
        let backend = env::var("BASKET_STORE").unwrap_or_else(|_| "memory".to_string());
        let backend = parse_backend(&backend)?;

        let redis_url = env::var("BASKET_REDIS_URL").unwrap_or_else(|_| DEFAULT_REDIS_URL.to_string());
        let redis_ttl = Self::load_u64_env("BASKET_REDIS_TTL_SECS")?.map(Duration::from_secs);
        let database_url = env::var("DATABASE_URL").ok();

        if backend == StoreBackend::Postgres && database_url.is_none() {
            return Err(DaemonError::Config(
                "DATABASE_URL is required when BASKET_STORE=postgres".to_string(),
            ));
        }

        Ok(StoreConfig {
            backend,
            redis_url,
            redis_ttl,
            database_url,
        })
    }

    fn load_log_format() -> DaemonResult<LogFormat> {
        match env::var("BASKET_LOG_FORMAT") {
            Ok(val) => match val.to_lowercase().as_str() {
                "text" => Ok(LogFormat::Text),
                "json" => Ok(LogFormat::Json),
                other => Err(DaemonError::Config(format!(
                    "Invalid BASKET_LOG_FORMAT: {}. Expected: text, json",
                    other
                ))),
            },
            Err(_) => Ok(LogFormat::Text),
        }
    }

    fn load_u64_env(key: &str) -> DaemonResult<Option<u64>> {
        match env::var(key) {
            Ok(val) => val
                .parse::<u64>()
                .map(Some)
                .map_err(|_| DaemonError::Config(format!("Invalid {} value: {}", key, val))),
            Err(_) => Ok(None),
        }
    }
}

fn parse_backend(value: &str) -> DaemonResult<StoreBackend> {
    match value.to_lowercase().as_str() {
        "memory" | "mem" => Ok(StoreBackend::Memory),
        "redis" => Ok(StoreBackend::Redis),
        "postgres" | "postgresql" | "pg" => Ok(StoreBackend::Postgres),
        other => Err(DaemonError::Config(format!(
            "Invalid BASKET_STORE: {}. Expected: memory, redis, postgres",
            other
        ))),
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: ApiConfig {
                host: "0.0.0.0".to_string(),
                port: 8080,
                request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            },
            store: StoreConfig {
                backend: StoreBackend::Memory,
                redis_url: DEFAULT_REDIS_URL.to_string(),
                redis_ttl: None,
                database_url: None,
            },
            environment: Environment::Development,
            log_format: LogFormat::Text,
        }
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Test => write!(f, "test"),
            Environment::Development => write!(f, "development"),
            Environment::Production => write!(f, "production"),
        }
    }
}

impl std::fmt::Display for StoreBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreBackend::Memory => write!(f, "memory"),
            StoreBackend::Redis => write!(f, "redis"),
            StoreBackend::Postgres => write!(f, "postgres"),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
