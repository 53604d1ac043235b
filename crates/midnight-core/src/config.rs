//! Portal configuration
//!
//! Read from `~/.midnight/config.toml`. Every field is optional; a missing
//! file yields the defaults.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::constants;
use crate::paths;

/// User-editable portal settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PortalConfig {
    /// Where the wallpaper catalog is fetched from
    pub catalog_url: String,
    /// Transition overlay duration in milliseconds
    pub transition_ms: u64,
    /// Catalog request timeout in seconds
    pub fetch_timeout_secs: u64,
    /// SQLite database path (defaults to `~/.midnight/midnight.db`)
    pub database: Option<PathBuf>,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            catalog_url: constants::wallpaper::DEFAULT_CATALOG_URL.to_string(),
            transition_ms: constants::theme::TRANSITION_DELAY.as_millis() as u64,
            fetch_timeout_secs: constants::wallpaper::FETCH_TIMEOUT.as_secs(),
            database: None,
        }
    }
}

impl PortalConfig {
    /// Load config from the default location
    pub fn load() -> Result<Self> {
        Self::load_from_path(&paths::config_file())
    }

    /// Load config from a specific path
    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let config: PortalConfig = toml::from_str(&contents)
            .with_context(|| format!("invalid config in {}", path.display()))?;
        Ok(config)
    }

    /// Resolved database path
    pub fn database_path(&self) -> PathBuf {
        self.database.clone().unwrap_or_else(paths::database_path)
    }

    pub fn transition_delay(&self) -> Duration {
        Duration::from_millis(self.transition_ms)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }
}
