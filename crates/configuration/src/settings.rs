use crate::error::ConfigError;
use serde::Deserialize;
use std::time::Duration;

/// The root configuration structure for the entire application.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub database: DatabaseSettings,
}

/// Connection parameters for the order database.
///
/// These replace the old `database.properties` file; the defaults match
/// what that file fell back to when a key was absent.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    /// Database server host name.
    pub host: String,
    /// Database server port.
    pub port: u16,
    /// Database name.
    pub database: String,
    /// Login role.
    pub user: String,
    /// Login password.
    pub password: String,
    /// Upper bound on pooled connections.
    pub max_connections: u32,
    /// How long a caller waits for a free connection before the borrow
    /// fails. Bounded on purpose: an exhausted pool must surface an
    /// error instead of parking callers forever.
    pub acquire_timeout_secs: u64,
    /// When true, every statement execution is logged at debug level.
    pub statement_logging: bool,
}

impl DatabaseSettings {
    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.acquire_timeout_secs)
    }

    /// Rejects settings that would build an unusable pool. Checked once
    /// at load time so misconfiguration fails at startup, not on the
    /// first borrow.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.host.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "database.host must not be empty".to_string(),
            ));
        }
        if self.database.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "database.database must not be empty".to_string(),
            ));
        }
        if self.max_connections == 0 {
            return Err(ConfigError::Invalid(
                "database.max_connections must be at least 1".to_string(),
            ));
        }
        if self.acquire_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "database.acquire_timeout_secs must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> DatabaseSettings {
        DatabaseSettings {
            host: "localhost".to_string(),
            port: 8082,
            database: "bfx".to_string(),
            user: "marathon".to_string(),
            password: "marathon".to_string(),
            max_connections: 100,
            acquire_timeout_secs: 5,
            statement_logging: false,
        }
    }

    #[test]
    fn acquire_timeout_is_seconds() {
        assert_eq!(settings().acquire_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn valid_settings_pass_validation() {
        assert!(settings().validate().is_ok());
    }

    #[test]
    fn empty_host_is_rejected() {
        let mut settings = settings();
        settings.host = "  ".to_string();
        let err = settings.validate().unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
        assert!(err.to_string().contains("database.host"));
    }

    #[test]
    fn zero_connection_pool_is_rejected() {
        let mut settings = settings();
        settings.max_connections = 0;
        let err = settings.validate().unwrap_err();
        assert!(err.to_string().contains("max_connections"));
    }

    #[test]
    fn zero_acquire_timeout_is_rejected() {
        let mut settings = settings();
        settings.acquire_timeout_secs = 0;
        let err = settings.validate().unwrap_err();
        assert!(err.to_string().contains("acquire_timeout_secs"));
    }
}
