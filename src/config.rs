//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::storage::DEFAULT_MIN_STOCK_LEVEL;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub auth: AuthConfig,

    #[serde(default)]
    pub inventory: InventoryConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// SQLite database configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: String,
}

fn default_db_path() -> String {
    dirs::data_local_dir()
        .map(|p| p.join("glostock").join("glostock.db").to_string_lossy().to_string())
        .unwrap_or_else(|| "./glostock.db".to_string())
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

/// API server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_cors_origins() -> Vec<String> {
    vec![
        "https://glo-stock-canvas.lovable.app".to_string(),
        "http://localhost:3000".to_string(),
        "http://localhost:5173".to_string(),
    ]
}

fn default_request_timeout() -> u64 {
    30
}

fn default_max_body_bytes() -> usize {
    1024 * 1024 // 1 MiB
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: default_cors_origins(),
            request_timeout_secs: default_request_timeout(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

/// Token signing configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// HS256 signing secret; usually supplied through `JWT_SECRET`
    #[serde(default)]
    pub jwt_secret: Option<String>,

    #[serde(default = "default_token_ttl")]
    pub token_ttl_hours: i64,
}

fn default_token_ttl() -> i64 {
    24
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: None,
            token_ttl_hours: default_token_ttl(),
        }
    }
}

/// Inventory behavior
#[derive(Debug, Clone, Deserialize)]
pub struct InventoryConfig {
    /// Minimum stock level for items created without one
    #[serde(default = "default_min_stock_level")]
    pub default_min_stock_level: i64,

    /// Window for the "recently added" stat, in days
    #[serde(default = "default_recent_days")]
    pub recent_days: u32,
}

fn default_min_stock_level() -> i64 {
    DEFAULT_MIN_STOCK_LEVEL
}

fn default_recent_days() -> u32 {
    7
}

impl Default for InventoryConfig {
    fn default() -> Self {
        Self {
            default_min_stock_level: default_min_stock_level(),
            recent_days: default_recent_days(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("glostock").join("config.toml")),
            Some(PathBuf::from("/etc/glostock/config.toml")),
            Some(PathBuf::from("./config.toml")),
        ];

        for path_opt in config_paths.iter().flatten() {
            if path_opt.exists() {
                match Self::load_with_env(path_opt) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path_opt);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path_opt, e);
                    }
                }
            }
        }

        tracing::info!("Using default config with environment overrides");
        Self::from_env()
    }

    /// The signing secret, required to serve or mint tokens
    pub fn jwt_secret(&self) -> Result<&str, ConfigError> {
        self.auth
            .jwt_secret
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .ok_or(ConfigError::MissingSecret)
    }

    /// Reject values the server cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.auth.token_ttl_hours <= 0 || self.auth.token_ttl_hours > 24 * 365 {
            return Err(ConfigError::Invalid(format!(
                "auth.token_ttl_hours must be between 1 and {}, got {}",
                24 * 365,
                self.auth.token_ttl_hours
            )));
        }
        if self.inventory.default_min_stock_level < 0 {
            return Err(ConfigError::Invalid(
                "inventory.default_min_stock_level cannot be negative".to_string(),
            ));
        }
        if self.api.max_body_bytes == 0 {
            return Err(ConfigError::Invalid(
                "api.max_body_bytes must be greater than zero".to_string(),
            ));
        }
        match self.logging.format.as_str() {
            "pretty" | "json" => Ok(()),
            other => Err(ConfigError::Invalid(format!(
                "logging.format must be 'pretty' or 'json', got '{}'",
                other
            ))),
        }
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        // Database overrides
        if let Some(path) = lookup("GLOSTOCK_DB_PATH") {
            self.database.path = path;
        }

        // API overrides
        if let Some(host) = lookup("GLOSTOCK_API_HOST") {
            self.api.host = host;
        }
        if let Some(port) = lookup("GLOSTOCK_API_PORT").or_else(|| lookup("PORT")) {
            if let Ok(p) = port.parse() {
                self.api.port = p;
            }
        }

        // Auth overrides
        if let Some(secret) = lookup("JWT_SECRET") {
            self.auth.jwt_secret = Some(secret);
        }
        if let Some(ttl) = lookup("GLOSTOCK_TOKEN_TTL_HOURS") {
            if let Ok(hours) = ttl.parse() {
                self.auth.token_ttl_hours = hours;
            }
        }

        // Logging overrides
        if let Some(level) = lookup("GLOSTOCK_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = lookup("GLOSTOCK_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("No JWT secret configured; set JWT_SECRET or auth.jwt_secret")]
    MissingSecret,
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Glo Stock Configuration
#
# Environment variables override these settings:
# - GLOSTOCK_DB_PATH
# - GLOSTOCK_API_HOST
# - GLOSTOCK_API_PORT (or PORT)
# - JWT_SECRET
# - GLOSTOCK_TOKEN_TTL_HOURS
# - GLOSTOCK_LOG_LEVEL
# - GLOSTOCK_LOG_FORMAT

[database]
# SQLite database file (defaults to the platform data directory)
# path = "/var/lib/glostock/glostock.db"

[api]
# API server host
host = "0.0.0.0"

# API server port
port = 8080

# Allowed CORS origins (credentials are allowed for these)
cors_origins = [
    "https://glo-stock-canvas.lovable.app",
    "http://localhost:3000",
    "http://localhost:5173",
]

# Request timeout in seconds
request_timeout_secs = 30

# Maximum request body size in bytes
max_body_bytes = 1048576

[auth]
# Token signing secret. Prefer the JWT_SECRET environment variable.
# jwt_secret = "change-me"

# Token lifetime in hours
token_ttl_hours = 24

[inventory]
# Minimum stock level for items created without one
default_min_stock_level = 5

# Window for the "recently added" statistic (days)
recent_days = 7

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.api.port, 8080);
        assert_eq!(config.api.cors_origins.len(), 3);
        assert_eq!(config.api.max_body_bytes, 1024 * 1024);
        assert_eq!(config.auth.token_ttl_hours, 24);
        assert_eq!(config.inventory.default_min_stock_level, 5);
        assert_eq!(config.inventory.recent_days, 7);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_generated_config_parses() {
        let config: Config = toml::from_str(&generate_default_config()).unwrap();
        assert_eq!(config.api.port, 8080);
        assert!(config.auth.jwt_secret.is_none());
        assert_eq!(config.logging.format, "pretty");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_partial_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[api]\nport = 9000\n\n[inventory]\nrecent_days = 30\n",
        )
        .unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.api.port, 9000);
        assert_eq!(config.api.host, "0.0.0.0");
        assert_eq!(config.inventory.recent_days, 30);
        assert_eq!(config.auth.token_ttl_hours, 24);
    }

    #[test]
    fn test_load_errors() {
        let dir = tempdir().unwrap();

        let missing = dir.path().join("missing.toml");
        assert!(matches!(
            Config::load(&missing),
            Err(ConfigError::Io { .. })
        ));

        let broken = dir.path().join("broken.toml");
        std::fs::write(&broken, "[api\nport = ").unwrap();
        assert!(matches!(
            Config::load(&broken),
            Err(ConfigError::Parse { .. })
        ));

        let invalid = dir.path().join("invalid.toml");
        std::fs::write(&invalid, "[auth]\ntoken_ttl_hours = 0\n").unwrap();
        assert!(matches!(
            Config::load(&invalid),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_overrides() {
        let env: HashMap<&str, &str> = [
            ("GLOSTOCK_DB_PATH", "/tmp/stock.db"),
            ("PORT", "7000"),
            ("JWT_SECRET", "s3cret"),
            ("GLOSTOCK_TOKEN_TTL_HOURS", "2"),
            ("GLOSTOCK_LOG_FORMAT", "json"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.database.path, "/tmp/stock.db");
        assert_eq!(config.api.port, 7000);
        assert_eq!(config.jwt_secret().unwrap(), "s3cret");
        assert_eq!(config.auth.token_ttl_hours, 2);
        assert_eq!(config.logging.format, "json");
    }

    #[test]
    fn test_glostock_port_wins_over_port() {
        let env: HashMap<&str, &str> = [("GLOSTOCK_API_PORT", "9100"), ("PORT", "7000")]
            .into_iter()
            .collect();

        let mut config = Config::default();
        config.apply_overrides(|key| env.get(key).map(|v| v.to_string()));
        assert_eq!(config.api.port, 9100);
    }

    #[test]
    fn test_missing_or_blank_secret() {
        let mut config = Config::default();
        assert!(matches!(config.jwt_secret(), Err(ConfigError::MissingSecret)));

        config.auth.jwt_secret = Some("   ".to_string());
        assert!(matches!(config.jwt_secret(), Err(ConfigError::MissingSecret)));
    }

    #[test]
    fn test_unknown_log_format_rejected() {
        let mut config = Config::default();
        config.logging.format = "xml".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }
}
