//! API configuration module.
//!
//! Configuration is loaded from environment variables with fallback to defaults.

use roomledger_core::{InventoryResetPolicy, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// API configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// HTTP server port
    pub http_port: u16,

    /// SQLite database file
    pub database_path: PathBuf,

    /// Pool size
    pub db_max_connections: u32,

    /// How long a reservation waits for the database write lock
    pub db_busy_timeout: Duration,

    /// JWT secret key for verifying bearer tokens
    pub jwt_secret: String,

    /// JWT lifetime in seconds for locally issued tokens
    pub jwt_lifetime_secs: i64,

    /// What re-setting inventory does to an existing booked count
    pub inventory_reset_policy: InventoryResetPolicy,

    /// Whether cancelling a booking gives its nights back
    pub release_inventory_on_cancel: bool,

    /// Page size for administrative listings when none is requested
    pub default_page_size: u32,
}

impl ApiConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        let config = ApiConfig {
            http_port: parse_var("HTTP_PORT", 8080)?,

            database_path: env::var("DATABASE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./roomledger.db")),

            db_max_connections: parse_var("DB_MAX_CONNECTIONS", 5)?,

            db_busy_timeout: Duration::from_secs(parse_var("DB_BUSY_TIMEOUT_SECS", 5)?),

            jwt_secret: env::var("JWT_SECRET").unwrap_or_else(|_| {
                // In production, this MUST be set via environment variable
                "roomledger-dev-secret-change-in-production".to_string()
            }),

            jwt_lifetime_secs: parse_var("JWT_LIFETIME_SECS", 3600)?, // 1 hour

            inventory_reset_policy: parse_var("INVENTORY_RESET_POLICY", InventoryResetPolicy::ResetBooked)?,

            release_inventory_on_cancel: parse_var("RELEASE_INVENTORY_ON_CANCEL", false)?,

            default_page_size: parse_var("DEFAULT_PAGE_SIZE", DEFAULT_PAGE_SIZE)?,
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.db_max_connections == 0 {
            return Err(ConfigError::InvalidValue("DB_MAX_CONNECTIONS".to_string()));
        }

        if self.default_page_size == 0 || self.default_page_size > MAX_PAGE_SIZE {
            return Err(ConfigError::InvalidValue("DEFAULT_PAGE_SIZE".to_string()));
        }

        if self.jwt_secret.is_empty() {
            return Err(ConfigError::MissingRequired("JWT_SECRET".to_string()));
        }

        Ok(())
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        ApiConfig {
            http_port: 8080,
            database_path: PathBuf::from("./roomledger.db"),
            db_max_connections: 5,
            db_busy_timeout: Duration::from_secs(5),
            jwt_secret: "roomledger-dev-secret-change-in-production".to_string(),
            jwt_lifetime_secs: 3600,
            inventory_reset_policy: InventoryResetPolicy::ResetBooked,
            release_inventory_on_cancel: false,
            default_page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Reads `name`, falling back to `default` when unset.
fn parse_var<T: FromStr>(name: &str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(name.to_string())),
        Err(_) => Ok(default),
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = ApiConfig::default();

        assert!(config.validate().is_ok());
        assert_eq!(config.default_page_size, 15);
        assert!(!config.release_inventory_on_cancel);
        assert_eq!(config.inventory_reset_policy, InventoryResetPolicy::ResetBooked);
    }

    #[test]
    fn test_invalid_page_size_rejected() {
        let config = ApiConfig {
            default_page_size: 0,
            ..ApiConfig::default()
        };

        assert!(matches!(config.validate(), Err(ConfigError::InvalidValue(_))));
    }

    #[test]
    fn test_parse_var_falls_back_when_unset() {
        let value: u16 = parse_var("ROOMLEDGER_TEST_SURELY_UNSET_VAR", 4242).unwrap();
        assert_eq!(value, 4242);
    }
}
