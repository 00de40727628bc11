//! # CLI Configuration
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Command-line flags (highest priority)                              │
//! │     --api-url, --timeout-secs, --data-dir                              │
//! │                                                                         │
//! │  2. Environment Variables                                              │
//! │     ROCKETSHOES_API_URL=http://localhost:3333                          │
//! │     ROCKETSHOES_TIMEOUT_SECS=5                                         │
//! │     ROCKETSHOES_DATA_DIR=/var/lib/rocketshoes                          │
//! │                                                                         │
//! │  3. TOML Config File (or --config PATH)                                │
//! │     ~/.config/storefront/rocketshoes.toml (Linux)                      │
//! │     ~/Library/Application Support/com.rocketshoes.storefront/... (mac) │
//! │                                                                         │
//! │  4. Default Values (lowest priority)                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [inventory]
//! base_url = "http://localhost:3333"
//! timeout_secs = 10
//!
//! [storage]
//! data_dir = "/var/lib/rocketshoes"
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use rocketshoes_inventory::http::DEFAULT_TIMEOUT;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use url::Url;

use crate::error::{ConfigError, ConfigResult};

const CONFIG_FILE_NAME: &str = "rocketshoes.toml";

pub const ENV_API_URL: &str = "ROCKETSHOES_API_URL";
pub const ENV_TIMEOUT_SECS: &str = "ROCKETSHOES_TIMEOUT_SECS";
pub const ENV_DATA_DIR: &str = "ROCKETSHOES_DATA_DIR";

// =============================================================================
// Sections
// =============================================================================

/// Where stock and product data come from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventorySettings {
    /// Base URL of the storefront API.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout (seconds).
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://localhost:3333".to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT.as_secs()
}

impl Default for InventorySettings {
    fn default() -> Self {
        InventorySettings {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Where the cart snapshot is kept.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageSettings {
    /// Data directory. `None` uses the platform data directory.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
}

/// Values given on the command line. `None` leaves the lower layers alone.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub api_url: Option<String>,
    pub timeout_secs: Option<u64>,
    pub data_dir: Option<PathBuf>,
}

// =============================================================================
// CliConfig
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CliConfig {
    #[serde(default)]
    pub inventory: InventorySettings,

    #[serde(default)]
    pub storage: StorageSettings,
}

impl CliConfig {
    /// Loads configuration from file, environment, flags and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (`config_path`, else the platform default)
    /// 3. Environment variables
    /// 4. `overrides`
    ///
    /// A missing default file is fine; a missing explicit file is an error.
    pub fn load(config_path: Option<PathBuf>, overrides: &Overrides) -> ConfigResult<Self> {
        let mut config = match config_path {
            Some(path) if !path.exists() => return Err(ConfigError::NotFound(path)),
            Some(path) => Self::from_file(&path)?,
            None => match Self::default_config_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                Some(path) => {
                    debug!(?path, "Config file not found, using defaults");
                    Self::default()
                }
                None => Self::default(),
            },
        };

        config.apply_env_overrides();
        config.apply_overrides(overrides);
        config.validate()?;

        Ok(config)
    }

    /// Parses a TOML config file.
    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        info!(?path, "Loading config from file");

        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFailed {
            path: path.to_path_buf(),
            source,
        })?;

        toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        let url = Url::parse(&self.inventory.base_url).map_err(|e| {
            ConfigError::InvalidUrl(format!("{}: {}", self.inventory.base_url, e))
        })?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidUrl(format!(
                "Inventory URL must start with http:// or https://, got: {}",
                self.inventory.base_url
            )));
        }

        if self.inventory.timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "timeout_secs must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    /// Applies environment variable overrides.
    fn apply_env_overrides(&mut self) {
        self.apply_lookup(|name| std::env::var(name).ok());
    }

    fn apply_lookup(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup(ENV_API_URL) {
            debug!(url = %url, "Overriding inventory URL from environment");
            self.inventory.base_url = url;
        }

        if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
            match raw.parse::<u64>() {
                Ok(secs) => self.inventory.timeout_secs = secs,
                Err(_) => warn!(value = %raw, "Ignoring non-numeric {}", ENV_TIMEOUT_SECS),
            }
        }

        if let Some(dir) = lookup(ENV_DATA_DIR) {
            debug!(dir = %dir, "Overriding data directory from environment");
            self.storage.data_dir = Some(PathBuf::from(dir));
        }
    }

    fn apply_overrides(&mut self, overrides: &Overrides) {
        if let Some(ref url) = overrides.api_url {
            self.inventory.base_url = url.clone();
        }
        if let Some(secs) = overrides.timeout_secs {
            self.inventory.timeout_secs = secs;
        }
        if let Some(ref dir) = overrides.data_dir {
            self.storage.data_dir = Some(dir.clone());
        }
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "rocketshoes", "storefront")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.inventory.timeout_secs)
    }
}
