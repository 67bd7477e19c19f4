//! Configuration management for shardgate
//!
//! Settings are layered, lowest priority first:
//! 1. Default values (embedded in structs)
//! 2. TOML configuration file
//! 3. Environment variables
//!
//! # Usage
//!
//! ```no_run
//! use shardgate::config::Config;
//!
//! let config = Config::load().expect("Failed to load configuration");
//! println!("Serving shards of {}", config.edge.root_domain);
//! ```
//!
//! # Environment Variables
//!
//! Any key can be overridden with `SHARDGATE__<section>__<key>`:
//! - `SHARDGATE__SERVER__BIND_ADDR=0.0.0.0:9000`
//! - `SHARDGATE__EDGE__ROOT_DOMAIN=media.example.org`
//! - `SHARDGATE__CACHE__MAX_BODY_BYTES=32MB`
//!
//! # Configuration File
//!
//! By default, the configuration is loaded from `config/shardgate.toml`.
//! This can be overridden using the `SHARDGATE_CONFIG` environment variable.

mod models;
mod sources;
mod validation;

pub use crate::humanize::ByteSize;
pub use models::{
    CacheConfig, CacheProvider, Config, EdgeConfig, LogFormat, OriginConfig, ServerConfig,
    TelemetryConfig,
};
pub use validation::ValidationError;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Configuration validation failed: {0}")]
    ValidationError(#[from] ValidationError),
}

impl Config {
    /// Load configuration from all sources (file + environment)
    ///
    /// # Errors
    ///
    /// Returns an error if the file is malformed or validation fails.
    pub fn load() -> Result<Self, ConfigError> {
        let config = sources::load()?;
        validation::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific path, still honoring environment overrides
    pub fn load_from_path(path: std::path::PathBuf) -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        let config = sources::load_from_sources(path)?;
        validation::validate(&config)?;
        Ok(config)
    }

    /// `SHARDGATE_CONFIG` or the default file location
    pub fn default_path() -> std::path::PathBuf {
        sources::config_path()
    }
}
