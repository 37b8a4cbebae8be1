//! # arlap-config: Configuration for Árlap
//!
//! Loads the comparator ratios, calculator limits and shop time zone from
//! `arlap.toml` and `ARLAP_*` environment variables, and sets up logging.
//!
//! ## Usage
//! ```rust,no_run
//! use arlap_config::{init_tracing, ArlapConfig};
//! use arlap_core::firewood::{compare, Offer};
//!
//! init_tracing();
//! let config = ArlapConfig::load_or_default(None);
//!
//! let a = Offer::delivered(30_000.0, config.comparator.default_unit_a);
//! let b = Offer::delivered(42_000.0, config.comparator.default_unit_b);
//! let result = compare(&a, &b, &config.conversion_ratios(), config.density());
//! println!("{result:?}");
//! ```

pub mod config;
pub mod error;
pub mod logging;

pub use config::{ArlapConfig, CalculatorSettings, CatalogSettings, ComparatorSettings};
pub use error::{ConfigError, ConfigResult};
pub use logging::{init_tracing, try_init_tracing};
