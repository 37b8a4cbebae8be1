//! # Config Error Types
//!
//! Errors raised while loading, validating or saving `arlap.toml`, and while
//! installing the tracing subscriber.

use arlap_core::ValidationError;
use thiserror::Error;

/// Result type alias for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Configuration error type.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Reading or writing the config file failed.
    #[error("Config file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// The config file is not valid TOML for [`crate::ArlapConfig`].
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// The config could not be rendered as TOML.
    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// A value is outside its allowed range.
    #[error("Invalid configuration: {0}")]
    Invalid(#[from] ValidationError),

    /// No path to save to.
    #[error("Failed to save config: {0}")]
    SaveFailed(String),

    /// A global tracing subscriber was already installed.
    #[error("Failed to install tracing subscriber: {0}")]
    TracingInit(String),
}

impl ConfigError {
    /// Returns true if the problem is in the file's contents rather than
    /// in accessing it.
    pub fn is_content_error(&self) -> bool {
        matches!(self, ConfigError::Parse(_) | ConfigError::Invalid(_))
    }
}
