//! # Árlap Configuration
//!
//! Tunable constants for the firewood comparator and the lumber calculators,
//! and the time zone promotion deadlines are read in.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     ARLAP_M3_TO_FOREST=1,7                                             │
//! │     ARLAP_MOISTURE_PERCENT=25                                          │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/arlap/arlap.toml (Linux)                                 │
//! │     ~/Library/Application Support/hu.arlap.arlap/arlap.toml (macOS)    │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     The ratios the comparator has always shipped with                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # arlap.toml
//! [comparator]
//! m3_to_forest = 1.67
//! forest_to_ton = 1.4
//! stacked_to_solid = 0.45
//! solid_to_forest = 1.43
//! moisture_percent = 20.0
//! dry_density = 550.0
//! default_unit_a = "szort_m3"
//! default_unit_b = "erdei_m3"
//!
//! [calculator]
//! max_length_m = 50.0
//! max_width_cm = 150.0
//! max_thickness_cm = 150.0
//! max_quantity = 10000.0
//!
//! [catalog]
//! timezone_offset_minutes = 60
//! ```

use arlap_core::calculator::CalculatorLimits;
use arlap_core::firewood::{moisture_adjusted_density, ConversionRatios, FirewoodUnit};
use arlap_core::validation::{
    try_parse_decimal_input, validate_non_negative, validate_percent, validate_positive,
    validate_range,
};
use arlap_core::{
    DEFAULT_DRY_DENSITY, DEFAULT_MAX_LENGTH_M, DEFAULT_MAX_QUANTITY, DEFAULT_MAX_SECTION_CM,
    DEFAULT_MOISTURE_PERCENT,
};
use chrono::{DateTime, FixedOffset, Offset, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, info, warn};

use crate::error::{ConfigError, ConfigResult};

/// Largest accepted UTC offset, in minutes (exclusive).
const MAX_OFFSET_MINUTES: i32 = 24 * 60;

// =============================================================================
// Comparator Settings
// =============================================================================

/// Firewood comparator defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparatorSettings {
    /// Stacked m³ per forest m³.
    #[serde(default = "default_m3_to_forest")]
    pub m3_to_forest: f64,

    /// Tons per forest m³.
    #[serde(default = "default_forest_to_ton")]
    pub forest_to_ton: f64,

    /// Solid m³ per loose m³.
    #[serde(default = "default_stacked_to_solid")]
    pub stacked_to_solid: f64,

    /// Forest m³ per solid m³.
    #[serde(default = "default_solid_to_forest")]
    pub solid_to_forest: f64,

    /// Moisture content of the wood, percent (0-100).
    #[serde(default = "default_moisture_percent")]
    pub moisture_percent: f64,

    /// Density of fully dried wood, kg/m³.
    #[serde(default = "default_dry_density")]
    pub dry_density: f64,

    /// Unit preselected for offer A.
    #[serde(default = "default_unit_a")]
    pub default_unit_a: FirewoodUnit,

    /// Unit preselected for offer B.
    #[serde(default = "default_unit_b")]
    pub default_unit_b: FirewoodUnit,
}

fn default_m3_to_forest() -> f64 {
    ConversionRatios::default().m3_to_forest
}
fn default_forest_to_ton() -> f64 {
    ConversionRatios::default().forest_to_ton
}
fn default_stacked_to_solid() -> f64 {
    ConversionRatios::default().stacked_to_solid
}
fn default_solid_to_forest() -> f64 {
    ConversionRatios::default().solid_to_forest
}
fn default_moisture_percent() -> f64 {
    DEFAULT_MOISTURE_PERCENT
}
fn default_dry_density() -> f64 {
    DEFAULT_DRY_DENSITY
}
fn default_unit_a() -> FirewoodUnit {
    FirewoodUnit::LooseM3
}
fn default_unit_b() -> FirewoodUnit {
    FirewoodUnit::ForestM3
}

impl Default for ComparatorSettings {
    fn default() -> Self {
        ComparatorSettings {
            m3_to_forest: default_m3_to_forest(),
            forest_to_ton: default_forest_to_ton(),
            stacked_to_solid: default_stacked_to_solid(),
            solid_to_forest: default_solid_to_forest(),
            moisture_percent: default_moisture_percent(),
            dry_density: default_dry_density(),
            default_unit_a: default_unit_a(),
            default_unit_b: default_unit_b(),
        }
    }
}

// =============================================================================
// Calculator Settings
// =============================================================================

/// Input limits for the volume and area calculators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculatorSettings {
    #[serde(default = "default_max_length")]
    pub max_length_m: f64,

    #[serde(default = "default_max_section")]
    pub max_width_cm: f64,

    #[serde(default = "default_max_section")]
    pub max_thickness_cm: f64,

    #[serde(default = "default_max_quantity")]
    pub max_quantity: f64,
}

fn default_max_length() -> f64 {
    DEFAULT_MAX_LENGTH_M
}
fn default_max_section() -> f64 {
    DEFAULT_MAX_SECTION_CM
}
fn default_max_quantity() -> f64 {
    DEFAULT_MAX_QUANTITY
}

impl Default for CalculatorSettings {
    fn default() -> Self {
        CalculatorSettings {
            max_length_m: default_max_length(),
            max_width_cm: default_max_section(),
            max_thickness_cm: default_max_section(),
            max_quantity: default_max_quantity(),
        }
    }
}

// =============================================================================
// Catalog Settings
// =============================================================================

/// Catalog-wide settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogSettings {
    /// UTC offset of the shop, in minutes. Dates without an explicit offset
    /// in `discountValidUntil` are read in this zone.
    /// Default: 60 (CET)
    #[serde(default = "default_timezone_offset")]
    pub timezone_offset_minutes: i32,
}

fn default_timezone_offset() -> i32 {
    60
}

impl Default for CatalogSettings {
    fn default() -> Self {
        CatalogSettings {
            timezone_offset_minutes: default_timezone_offset(),
        }
    }
}

// =============================================================================
// Main Configuration
// =============================================================================

/// Complete Árlap configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArlapConfig {
    #[serde(default)]
    pub comparator: ComparatorSettings,

    #[serde(default)]
    pub calculator: CalculatorSettings,

    #[serde(default)]
    pub catalog: CatalogSettings,
}

impl ArlapConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (arlap.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> ConfigResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_overrides_from(|key| std::env::var(key).ok());
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> ConfigResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| ConfigError::SaveFailed("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents)?;

        info!(?path, "Config saved");
        Ok(())
    }

    /// Validates the configuration.
    ///
    /// Ratios of 0 are accepted: they make the affected conversions abstain,
    /// which is what the comparator has always done with a cleared field.
    pub fn validate(&self) -> ConfigResult<()> {
        let c = &self.comparator;
        validate_non_negative("comparator.m3_to_forest", c.m3_to_forest)?;
        validate_non_negative("comparator.forest_to_ton", c.forest_to_ton)?;
        validate_non_negative("comparator.stacked_to_solid", c.stacked_to_solid)?;
        validate_non_negative("comparator.solid_to_forest", c.solid_to_forest)?;
        validate_non_negative("comparator.dry_density", c.dry_density)?;
        validate_percent("comparator.moisture_percent", c.moisture_percent)?;

        let l = &self.calculator;
        validate_positive("calculator.max_length_m", l.max_length_m)?;
        validate_positive("calculator.max_width_cm", l.max_width_cm)?;
        validate_positive("calculator.max_thickness_cm", l.max_thickness_cm)?;
        validate_positive("calculator.max_quantity", l.max_quantity)?;

        let bound = f64::from(MAX_OFFSET_MINUTES - 1);
        validate_range(
            "catalog.timezone_offset_minutes",
            f64::from(self.catalog.timezone_offset_minutes),
            -bound,
            bound,
        )?;

        Ok(())
    }

    /// Applies `ARLAP_*` overrides read through `lookup`.
    ///
    /// [`ArlapConfig::load`] passes the process environment; tests pass a map.
    /// Values that do not parse are skipped with a warning.
    pub fn apply_overrides_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let decimal = |key: &str| -> Option<f64> {
            let raw = lookup(key)?;
            let parsed = try_parse_decimal_input(&raw);
            match parsed {
                Some(value) => debug!(key, value, "Overriding config from environment"),
                None => warn!(key, raw = %raw, "Ignoring non-numeric config override"),
            }
            parsed
        };

        let c = &mut self.comparator;
        if let Some(v) = decimal("ARLAP_M3_TO_FOREST") {
            c.m3_to_forest = v;
        }
        if let Some(v) = decimal("ARLAP_FOREST_TO_TON") {
            c.forest_to_ton = v;
        }
        if let Some(v) = decimal("ARLAP_STACKED_TO_SOLID") {
            c.stacked_to_solid = v;
        }
        if let Some(v) = decimal("ARLAP_SOLID_TO_FOREST") {
            c.solid_to_forest = v;
        }
        if let Some(v) = decimal("ARLAP_MOISTURE_PERCENT") {
            c.moisture_percent = v;
        }
        if let Some(v) = decimal("ARLAP_DRY_DENSITY") {
            c.dry_density = v;
        }

        if let Some(raw) = lookup("ARLAP_TIMEZONE_OFFSET_MINUTES") {
            match raw.trim().parse::<i32>() {
                Ok(minutes) => {
                    debug!(minutes, "Overriding time zone offset from environment");
                    self.catalog.timezone_offset_minutes = minutes;
                }
                Err(_) => warn!(raw = %raw, "Ignoring invalid time zone offset"),
            }
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("hu", "arlap", "arlap")
            .map(|dirs| dirs.config_dir().join("arlap.toml"))
    }

    // =========================================================================
    // Core Type Accessors
    // =========================================================================

    /// Conversion ratios for [`arlap_core::firewood::compare`].
    pub fn conversion_ratios(&self) -> ConversionRatios {
        ConversionRatios {
            m3_to_forest: self.comparator.m3_to_forest,
            forest_to_ton: self.comparator.forest_to_ton,
            stacked_to_solid: self.comparator.stacked_to_solid,
            solid_to_forest: self.comparator.solid_to_forest,
        }
    }

    /// Moisture-adjusted wood density, kg/m³.
    pub fn density(&self) -> f64 {
        moisture_adjusted_density(self.comparator.dry_density, self.comparator.moisture_percent)
    }

    pub fn calculator_limits(&self) -> CalculatorLimits {
        CalculatorLimits {
            max_length_m: self.calculator.max_length_m,
            max_width_cm: self.calculator.max_width_cm,
            max_thickness_cm: self.calculator.max_thickness_cm,
            max_quantity: self.calculator.max_quantity,
        }
    }

    /// The shop's time zone. Falls back to UTC for an out-of-range offset.
    pub fn timezone(&self) -> FixedOffset {
        FixedOffset::east_opt(self.catalog.timezone_offset_minutes * 60).unwrap_or_else(|| Utc.fix())
    }

    /// The current instant in the shop's time zone, for passing to the
    /// pricing functions.
    pub fn now(&self) -> DateTime<FixedOffset> {
        Utc::now().with_timezone(&self.timezone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arlap_core::firewood::{compare, Cheaper, Offer};
    use std::collections::HashMap;

    fn overrides(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = ArlapConfig::default();
        assert_eq!(config.comparator.m3_to_forest, 1.67);
        assert_eq!(config.comparator.solid_to_forest, 1.43);
        assert_eq!(config.comparator.default_unit_a, FirewoodUnit::LooseM3);
        assert_eq!(config.calculator.max_quantity, 10_000.0);
        assert_eq!(config.catalog.timezone_offset_minutes, 60);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_accessors_feed_the_comparator() {
        let config = ArlapConfig::default();
        assert_eq!(config.density(), 660.0);
        assert_eq!(config.conversion_ratios(), ConversionRatios::default());
        assert_eq!(config.calculator_limits(), CalculatorLimits::default());
        assert_eq!(config.timezone().local_minus_utc(), 3600);

        let a = Offer::delivered(30_000.0, config.comparator.default_unit_a);
        let b = Offer::delivered(42_000.0, config.comparator.default_unit_b);
        let result = compare(&a, &b, &config.conversion_ratios(), config.density()).unwrap();
        assert_eq!(result.cheaper, Cheaper::B);
    }

    #[test]
    fn test_config_validation() {
        let mut config = ArlapConfig::default();

        config.comparator.m3_to_forest = 0.0;
        assert!(config.validate().is_ok());

        config.comparator.m3_to_forest = -1.0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        config.comparator.m3_to_forest = 1.67;
        config.comparator.moisture_percent = 120.0;
        assert!(config.validate().is_err());

        config.comparator.moisture_percent = 20.0;
        config.calculator.max_length_m = 0.0;
        assert!(config.validate().is_err());

        config.calculator.max_length_m = 50.0;
        config.catalog.timezone_offset_minutes = 24 * 60;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_overrides() {
        let mut config = ArlapConfig::default();
        config.apply_overrides_from(overrides(&[
            ("ARLAP_M3_TO_FOREST", "1,7"),
            ("ARLAP_MOISTURE_PERCENT", "25"),
            ("ARLAP_DRY_DENSITY", "nem szám"),
            ("ARLAP_TIMEZONE_OFFSET_MINUTES", "120"),
        ]));

        assert_eq!(config.comparator.m3_to_forest, 1.7);
        assert_eq!(config.comparator.moisture_percent, 25.0);
        assert_eq!(config.comparator.dry_density, 550.0);
        assert_eq!(config.catalog.timezone_offset_minutes, 120);
        assert_eq!(config.density(), 688.0);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: ArlapConfig = toml::from_str(
            r#"
            [comparator]
            moisture_percent = 30.0
            default_unit_b = "rakott_m3"
            "#,
        )
        .unwrap();

        assert_eq!(config.comparator.moisture_percent, 30.0);
        assert_eq!(config.comparator.default_unit_b, FirewoodUnit::StackedM3);
        assert_eq!(config.comparator.stacked_to_solid, 0.45);
        assert_eq!(config.calculator, CalculatorSettings::default());
    }

    #[test]
    fn test_toml_serialization() {
        let config = ArlapConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("[comparator]"));
        assert!(toml_str.contains("[calculator]"));
        assert!(toml_str.contains(r#"default_unit_a = "szort_m3""#));
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("arlap.toml");

        let mut config = ArlapConfig::default();
        config.comparator.dry_density = 600.0;
        config.calculator.max_length_m = 12.0;
        config.save(Some(path.clone())).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let loaded: ArlapConfig = toml::from_str(&contents).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_rejects_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("arlap.toml");
        std::fs::write(&path, "[comparator]\nmoisture_percent = 150.0\n").unwrap();

        assert!(ArlapConfig::load(Some(path.clone())).is_err());
        let fallback = ArlapConfig::load_or_default(Some(path));
        assert_eq!(fallback.comparator.moisture_percent, 20.0);
    }

    #[test]
    fn test_load_rejects_malformed_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("arlap.toml");
        std::fs::write(&path, "[comparator\n").unwrap();

        assert!(matches!(
            ArlapConfig::load(Some(path)),
            Err(ConfigError::Parse(_))
        ));
    }
}
