//! # Tracing Setup
//!
//! Installs the global `tracing` subscriber for binaries and tools built on
//! Árlap. Library code only emits events; it never installs a subscriber.
//!
//! ## Log Levels
//! - `RUST_LOG=debug` - Show debug messages everywhere
//! - `RUST_LOG=arlap_core=trace` - Also show unparseable deadlines
//! - Default: INFO, DEBUG for the arlap crates

use tracing_subscriber::EnvFilter;

use crate::error::{ConfigError, ConfigResult};

/// Filter used when `RUST_LOG` is unset or invalid.
pub const DEFAULT_LOG_FILTER: &str = "info,arlap=debug";

/// `RUST_LOG` if set and valid, otherwise [`DEFAULT_LOG_FILTER`].
pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
}

/// Installs the fmt subscriber.
///
/// # Panics
/// If a global subscriber is already set. Use [`try_init_tracing`] where
/// that can happen (tests, embedding).
pub fn init_tracing() {
    tracing_subscriber::fmt().with_env_filter(env_filter()).init();
}

/// Installs the fmt subscriber unless one is already set.
pub fn try_init_tracing() -> ConfigResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .try_init()
        .map_err(|e| ConfigError::TracingInit(e.to_string()))
}
