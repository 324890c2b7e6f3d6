use crate::error::ConfigError;

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use settings::{Config, DatabaseSettings};

/// Loads the application configuration.
///
/// Values are layered: coded defaults first (the same fallbacks the old
/// properties file used), then an optional `config.toml`, then
/// `BFX_`-prefixed environment variables (e.g. `BFX_DATABASE__HOST`).
pub fn load_config() -> Result<Config, ConfigError> {
    let builder = config::Config::builder()
        .set_default("database.host", "localhost")?
        .set_default("database.port", 8082)?
        .set_default("database.database", "bfx")?
        .set_default("database.user", "marathon")?
        .set_default("database.password", "marathon")?
        .set_default("database.max_connections", 100)?
        .set_default("database.acquire_timeout_secs", 5)?
        .set_default("database.statement_logging", false)?
        // Tells the builder to look for a file named `config.toml`
        .add_source(config::File::with_name("config.toml").required(false))
        .add_source(config::Environment::with_prefix("BFX").separator("__"))
        .build()?;

    // Attempt to deserialize the entire configuration into our `Config` struct
    let config = builder.try_deserialize::<Config>()?;
    config.database.validate()?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_legacy_properties_fallbacks() {
        let config = load_config().expect("defaults alone must produce a valid config");
        assert_eq!(config.database.host, "localhost");
        assert_eq!(config.database.port, 8082);
        assert_eq!(config.database.database, "bfx");
        assert_eq!(config.database.user, "marathon");
        assert_eq!(config.database.max_connections, 100);
        assert_eq!(config.database.acquire_timeout_secs, 5);
        assert!(!config.database.statement_logging);
    }
}
