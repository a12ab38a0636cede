//! Runtime configuration: defaults, environment overrides, optional file
//! layering via the `config` crate.

use crate::error::{LomisError, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct LomisConfig {
    pub database_url: String,
    /// Capacity of the lifecycle event broadcast channel
    pub event_channel_capacity: usize,
    pub environment: String,
    pub max_connections: u32,
}

impl Default for LomisConfig {
    fn default() -> Self {
        Self {
            database_url: "postgresql://localhost/lomis_development".to_string(),
            event_channel_capacity: 1000,
            environment: "development".to_string(),
            max_connections: 10,
        }
    }
}

impl LomisConfig {
    /// Defaults overridden by environment variables (`DATABASE_URL`,
    /// `LOMIS_EVENT_CHANNEL_CAPACITY`, `LOMIS_ENV`).
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(db_url) = std::env::var("DATABASE_URL") {
            config.database_url = db_url;
        }

        if let Ok(capacity) = std::env::var("LOMIS_EVENT_CHANNEL_CAPACITY") {
            config.event_channel_capacity = capacity.parse().map_err(|e| {
                LomisError::Configuration(format!("Invalid event_channel_capacity: {e}"))
            })?;
        }

        if let Ok(environment) = std::env::var("LOMIS_ENV") {
            config.environment = environment;
        }

        Ok(config)
    }

    /// Layered load: defaults, then an optional TOML file, then `LOMIS_*`
    /// environment variables.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path));
        }
        builder = builder.add_source(config::Environment::with_prefix("LOMIS"));

        let raw = builder
            .build()
            .map_err(|e| LomisError::Configuration(e.to_string()))?;
        raw.try_deserialize()
            .map_err(|e| LomisError::Configuration(e.to_string()))
    }
}
