//! Server configuration management.
//!
//! Consolidates all environment variable reads and provides validated configuration.

use live_tables::table::{MAX_CLOCK, RegistryConfig, TableOptions};
use std::time::Duration;

/// Complete server configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Capacity of the registry request inbox
    pub inbox_capacity: usize,
    /// Number of tables to create on startup
    pub initial_tables: usize,
    /// Options applied to tables created without explicit options
    pub table_defaults: TableOptions,
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Arguments
    ///
    /// * `inbox_capacity_override` - Optional inbox capacity (from CLI args)
    /// * `initial_tables_override` - Optional number of tables (from CLI args)
    pub fn from_env(
        inbox_capacity_override: Option<usize>,
        initial_tables_override: Option<usize>,
    ) -> Self {
        let inbox_capacity = inbox_capacity_override
            .unwrap_or_else(|| parse_env_or("REGISTRY_INBOX_CAPACITY", 100));

        let initial_tables =
            initial_tables_override.unwrap_or_else(|| parse_env_or("INITIAL_TABLES", 1));

        let defaults = TableOptions::default();
        let table_defaults = TableOptions {
            timed: parse_env_or("TABLE_TIMED", defaults.timed),
            time_base: Duration::from_secs(parse_env_or(
                "TABLE_TIME_BASE_SECS",
                defaults.time_base.as_secs(),
            )),
            time_per_turn: Duration::from_secs(parse_env_or(
                "TABLE_TIME_PER_TURN_SECS",
                defaults.time_per_turn.as_secs(),
            )),
        };

        ServerConfig {
            inbox_capacity,
            initial_tables,
            table_defaults,
        }
    }

    /// Validate configuration after loading
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.inbox_capacity == 0 {
            return Err(ConfigError::Invalid {
                var: "REGISTRY_INBOX_CAPACITY".to_string(),
                reason: "Must be greater than 0".to_string(),
            });
        }

        if self.table_defaults.time_per_turn > MAX_CLOCK {
            return Err(ConfigError::Invalid {
                var: "TABLE_TIME_PER_TURN_SECS".to_string(),
                reason: format!("Must be at most {} seconds", MAX_CLOCK.as_secs()),
            });
        }

        if let Err(reason) = self.table_defaults.validate() {
            return Err(ConfigError::Invalid {
                var: "TABLE_TIME_BASE_SECS".to_string(),
                reason,
            });
        }

        Ok(())
    }

    /// Registry settings derived from this configuration
    pub fn registry_config(&self) -> RegistryConfig {
        RegistryConfig {
            inbox_capacity: self.inbox_capacity,
            default_options: self.table_defaults.clone(),
        }
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration for {var}: {reason}")]
    Invalid { var: String, reason: String },
}

/// Helper to parse environment variable with default fallback
fn parse_env_or<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ServerConfig {
        ServerConfig {
            inbox_capacity: 100,
            initial_tables: 2,
            table_defaults: TableOptions::timed(Duration::from_secs(120), Duration::from_secs(20)),
        }
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::Invalid {
            var: "REGISTRY_INBOX_CAPACITY".to_string(),
            reason: "Must be greater than 0".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid configuration for REGISTRY_INBOX_CAPACITY: Must be greater than 0"
        );
    }

    #[test]
    fn test_config_validation_ok() {
        assert!(config().validate().is_ok());
    }

    #[test]
    fn test_config_validation_zero_inbox() {
        let config = ServerConfig {
            inbox_capacity: 0, // Invalid
            ..config()
        };

        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { ref var, .. } if var == "REGISTRY_INBOX_CAPACITY"));
    }

    #[test]
    fn test_config_validation_timed_without_base() {
        let config = ServerConfig {
            table_defaults: TableOptions::timed(Duration::ZERO, Duration::from_secs(20)),
            ..config()
        };

        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { ref var, .. } if var == "TABLE_TIME_BASE_SECS"));
    }

    #[test]
    fn test_config_validation_clock_too_long() {
        let config = ServerConfig {
            table_defaults: TableOptions::timed(Duration::from_secs(u64::MAX), Duration::from_secs(20)),
            ..config()
        };
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { ref var, .. } if var == "TABLE_TIME_BASE_SECS"));

        let config = ServerConfig {
            table_defaults: TableOptions::timed(Duration::from_secs(120), Duration::from_secs(u64::MAX)),
            ..self::config()
        };
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { ref var, .. } if var == "TABLE_TIME_PER_TURN_SECS"));
    }

    #[test]
    fn test_registry_config_carries_defaults() {
        let config = config();
        let registry = config.registry_config();
        assert_eq!(registry.inbox_capacity, 100);
        assert_eq!(registry.default_options, config.table_defaults);
    }

    #[test]
    fn test_parse_env_or_falls_back() {
        assert_eq!(parse_env_or("LT_SERVER_TEST_UNSET_VARIABLE", 7usize), 7);
    }
}
