//! Configuration loading with environment variable overrides.

use anyhow::{anyhow, Result};
use config::{Config, Environment};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String, // "json" or "text"
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "text".to_string(),
        }
    }
}

/// Memory configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemoryConfig {
    /// Entries loaded into PLC memory at startup.
    #[serde(default)]
    pub seed: HashMap<String, Value>,
}

/// Main settings structure with all configuration sections
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub memory: MemoryConfig,
}

impl Settings {
    /// Load settings from configuration files and environment variables
    pub fn load() -> Result<Self> {
        let config = Config::builder()
            // Start with default settings
            .add_source(config::File::from_str(
                include_str!("../config.toml"),
                config::FileFormat::Toml,
            ))
            // Add local config file if it exists
            .add_source(config::File::with_name("config").required(false))
            // Add environment variables with PLC_ prefix
            .add_source(
                Environment::with_prefix("PLC")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let settings: Settings = config.try_deserialize()?;
        settings.validate()?;

        Ok(settings)
    }

    /// Validate settings for consistency
    pub fn validate(&self) -> Result<()> {
        match self.logging.format.as_str() {
            "text" | "json" => {}
            other => return Err(anyhow!("Unknown logging format '{}'", other)),
        }

        Ok(())
    }
}
