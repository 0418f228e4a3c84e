//! # Configuration Management Module
//!
//! Netquest reads a small TOML file with three sections:
//!
//! - `[player]` - identity fields for the seeded character sheet
//! - `[storage]` - where the embedded store lives
//! - `[logging]` - log level and optional log file
//!
//! ```toml
//! [player]
//! name = "Runner"
//! class = "Netrunner"
//! status = "Online"
//! location = "Night City"
//! bio = "Full Stack Developer | Creative Technologist"
//!
//! [storage]
//! data_dir = "data"
//!
//! [logging]
//! level = "info"
//! ```
//!
//! CLI verbosity flags override the configured level; every value has a
//! sensible default so `netquest init` works on an empty directory.

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use tokio::fs;

use crate::rpg::PlayerIdentity;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub data_dir: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: "data".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub player: PlayerIdentity,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file
    pub async fn load(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .map_err(|e| anyhow!("Failed to read config file {}: {}", path, e))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| anyhow!("Failed to parse config file {}: {}", path, e))?;

        Ok(config)
    }

    /// Create a default configuration file
    pub async fn create_default(path: &str) -> Result<()> {
        let config = Config::default();
        let content = toml::to_string_pretty(&config)
            .map_err(|e| anyhow!("Failed to serialize default config: {}", e))?;

        fs::write(path, content)
            .await
            .map_err(|e| anyhow!("Failed to write config file {}: {}", path, e))?;

        Ok(())
    }

    /// Path of the sled database under the configured data directory.
    pub fn store_path(&self) -> PathBuf {
        Path::new(&self.storage.data_dir).join("rpg")
    }
}
