//! Configuration errors.
//!
//! These are the only failures that make the binary exit non-zero. Cart
//! operation failures are reported as notices instead.

use std::path::PathBuf;

use thiserror::Error;

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// `--config` named a file that does not exist.
    #[error("Config file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to read config file {}: {source}", path.display())]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// API URL does not parse or is not http/https.
    #[error("Invalid inventory URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid config: {0}")]
    Invalid(String),
}
