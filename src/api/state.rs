//! Application State
//!
//! Shared state accessible by all API handlers.
//! Wrapped in Arc for thread-safe sharing across async tasks.

use crate::auth::JwtHandler;
use crate::config::Config;
use crate::storage::{InventoryStore, DEFAULT_MIN_STOCK_LEVEL};
use std::sync::Arc;
use std::time::Instant;

/// Shared application state for all handlers
#[derive(Clone)]
pub struct AppState {
    /// Inventory record store
    pub store: Arc<InventoryStore>,
    /// Token validation
    pub jwt: Arc<JwtHandler>,
    /// API configuration
    pub config: Arc<ApiConfig>,
    /// Server start time for uptime tracking
    pub start_time: Instant,
}

impl AppState {
    pub fn new(store: Arc<InventoryStore>, jwt: Arc<JwtHandler>, config: ApiConfig) -> Self {
        Self {
            store,
            jwt,
            config: Arc::new(config),
            start_time: Instant::now(),
        }
    }

    /// Get server uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}

/// API server configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Allowed CORS origins; empty allows any origin
    pub cors_origins: Vec<String>,
    /// Request timeout in seconds
    pub request_timeout_secs: u64,
    /// Maximum request body size in bytes
    pub max_body_size: usize,
    /// Minimum stock level applied when a new item omits one
    pub default_min_stock_level: i64,
    /// Window for the "recently added" stat, in days
    pub recent_days: u32,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            cors_origins: Vec::new(),
            request_timeout_secs: 30,
            max_body_size: 1024 * 1024, // 1 MiB
            default_min_stock_level: DEFAULT_MIN_STOCK_LEVEL,
            recent_days: 7,
        }
    }
}

impl ApiConfig {
    /// Build from the loaded file/environment configuration
    pub fn from_config(config: &Config) -> Self {
        Self {
            host: config.api.host.clone(),
            port: config.api.port,
            cors_origins: config.api.cors_origins.clone(),
            request_timeout_secs: config.api.request_timeout_secs,
            max_body_size: config.api.max_body_bytes,
            default_min_stock_level: config.inventory.default_min_stock_level,
            recent_days: config.inventory.recent_days,
        }
    }

    /// Get the socket address string
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_config() {
        let mut config = Config::default();
        config.api.port = 9090;
        config.inventory.recent_days = 14;

        let api = ApiConfig::from_config(&config);
        assert_eq!(api.addr(), "0.0.0.0:9090");
        assert_eq!(api.recent_days, 14);
        assert_eq!(api.cors_origins.len(), 3);
        assert_eq!(api.max_body_size, 1024 * 1024);
    }
}
