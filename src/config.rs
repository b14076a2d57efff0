//! Service configuration from environment variables
//!
//! Both binaries read their settings once at startup. Missing variables fall
//! back to the defaults used for local development; unparsable values are
//! logged and replaced by the default as well.

use std::env;
use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

pub const PRODUCT_DATABASE_FILE: &str = "database.json";
pub const CART_DATABASE_FILE: &str = "cart.json";
pub const REVIEWS_DATABASE_FILE: &str = "reviews.json";

const DEFAULT_PRODUCT_SERVICE_URL: &str = "http://localhost:3000/products";
const DEFAULT_CURRENCY_SERVICE_URL: &str = "https://api.exchangerate-api.com/v4/latest/USD";

/// Settings of the product catalog service
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    pub port: u16,
    /// Directory holding `database.json`
    pub data_dir: PathBuf,
}

impl CatalogConfig {
    pub fn from_env() -> Self {
        Self {
            port: env_or("PORT", 3000),
            data_dir: env_or("DATA_DIR", PathBuf::from(".")),
        }
    }

    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join(PRODUCT_DATABASE_FILE)
    }

    pub fn log_summary(&self) {
        tracing::info!("Configuration:");
        tracing::info!("  PORT: {}", self.port);
        tracing::info!("  DATA_DIR: {}", self.data_dir.display());
    }
}

/// Settings of the backend-for-frontend gateway
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub port: u16,
    /// Directory holding `cart.json` and `reviews.json`
    pub data_dir: PathBuf,
    /// Catalog collection endpoint (`GET` returns every product)
    pub product_service_url: String,
    /// Exchange-rate endpoint returning `{"rates": {"EUR": ...}}`
    pub currency_service_url: String,
    /// How long a fetched EUR rate is reused; zero disables caching
    pub rates_cache_ttl: Duration,
    pub upstream_timeout: Duration,
    /// Built UI to serve for non-API paths
    pub static_dir: Option<PathBuf>,
}

impl GatewayConfig {
    pub fn from_env() -> Self {
        Self {
            port: env_or("PORT", 5000),
            data_dir: env_or("DATA_DIR", PathBuf::from(".")),
            product_service_url: env_or("PRODUCT_SERVICE_URL", DEFAULT_PRODUCT_SERVICE_URL.to_string()),
            currency_service_url: env_or("CURRENCY_SERVICE_URL", DEFAULT_CURRENCY_SERVICE_URL.to_string()),
            rates_cache_ttl: Duration::from_secs(env_or("RATES_CACHE_TTL_SECS", 300)),
            upstream_timeout: Duration::from_secs(env_or("UPSTREAM_TIMEOUT_SECS", 10)),
            static_dir: env::var("STATIC_DIR").ok().filter(|s| !s.is_empty()).map(PathBuf::from),
        }
    }

    /// Defaults with every file under `data_dir`; used by tests and tools
    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            port: 5000,
            data_dir: data_dir.into(),
            product_service_url: DEFAULT_PRODUCT_SERVICE_URL.to_string(),
            currency_service_url: DEFAULT_CURRENCY_SERVICE_URL.to_string(),
            rates_cache_ttl: Duration::from_secs(300),
            upstream_timeout: Duration::from_secs(10),
            static_dir: None,
        }
    }

    pub fn cart_path(&self) -> PathBuf {
        self.data_dir.join(CART_DATABASE_FILE)
    }

    pub fn reviews_path(&self) -> PathBuf {
        self.data_dir.join(REVIEWS_DATABASE_FILE)
    }

    pub fn log_summary(&self) {
        tracing::info!("Configuration:");
        tracing::info!("  PORT: {}", self.port);
        tracing::info!("  DATA_DIR: {}", self.data_dir.display());
        tracing::info!("  PRODUCT_SERVICE_URL: {}", self.product_service_url);
        tracing::info!("  CURRENCY_SERVICE_URL: {}", self.currency_service_url);
        tracing::info!("  RATES_CACHE_TTL: {:?}", self.rates_cache_ttl);
        tracing::info!("  UPSTREAM_TIMEOUT: {:?}", self.upstream_timeout);
        match &self.static_dir {
            Some(dir) => tracing::info!("  STATIC_DIR: {}", dir.display()),
            None => tracing::info!("  STATIC_DIR: (disabled)"),
        }
    }
}

/// Value of `key` parsed as `T`, or `default` when unset or invalid
fn env_or<T>(key: &str, default: T) -> T
where
    T: FromStr,
    T::Err: Display,
{
    match env::var(key) {
        Ok(raw) => raw.parse().unwrap_or_else(|e| {
            tracing::warn!("Invalid {} value {:?}: {}, using default", key, raw, e);
            default
        }),
        Err(_) => default,
    }
}
