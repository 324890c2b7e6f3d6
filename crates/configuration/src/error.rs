use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    /// The layered sources (defaults, `config.toml`, `BFX_` env vars)
    /// could not be read or deserialized.
    #[error("Failed to load connection settings: {0}")]
    Load(#[from] config::ConfigError),

    /// The sources parsed, but the resulting settings cannot build a
    /// usable connection pool.
    #[error("Invalid connection settings: {0}")]
    Invalid(String),
}
