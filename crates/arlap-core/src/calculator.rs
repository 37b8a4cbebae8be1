//! # Lumber Calculators
//!
//! Volume and area estimates for sawn timber, as used by the "köbméter" and
//! "négyzetméter" calculators.
//!
//! ## Units
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  length      meters        4.5  → 450 cm                               │
//! │  width       centimeters                                                │
//! │  thickness   centimeters                                                │
//! │                                                                         │
//! │  volume per piece  = w × t × (l × 100) / 1 000 000   [m³]              │
//! │  area per piece    = w × (l × 100) / 10 000           [m²]              │
//! │  pieces per unit   = floor(1 / per piece), 0 when per piece is 0        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Inputs are checked against [`CalculatorLimits`] before anything is
//! computed; all violations are reported together.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::CoreResult;
use crate::validation::{collect_violations, validate_range};
use crate::{DEFAULT_MAX_LENGTH_M, DEFAULT_MAX_QUANTITY, DEFAULT_MAX_SECTION_CM};

// =============================================================================
// Limits
// =============================================================================

/// Upper bounds for calculator inputs. Lower bounds are always 0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CalculatorLimits {
    pub max_length_m: f64,
    pub max_width_cm: f64,
    pub max_thickness_cm: f64,
    pub max_quantity: f64,
}

impl Default for CalculatorLimits {
    fn default() -> Self {
        Self {
            max_length_m: DEFAULT_MAX_LENGTH_M,
            max_width_cm: DEFAULT_MAX_SECTION_CM,
            max_thickness_cm: DEFAULT_MAX_SECTION_CM,
            max_quantity: DEFAULT_MAX_QUANTITY,
        }
    }
}

/// Pieces of `per_piece` that fit in one whole unit.
fn pieces_per_unit(per_piece: f64) -> u64 {
    if per_piece > 0.0 {
        (1.0 / per_piece).floor() as u64
    } else {
        0
    }
}

// =============================================================================
// Volume
// =============================================================================

/// Input of the cubic meter calculator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct VolumeInput {
    pub length_m: f64,
    pub width_cm: f64,
    pub thickness_cm: f64,
    pub quantity: f64,
    /// Price per m³; 0 when unknown.
    #[serde(default)]
    pub price_per_m3: f64,
}

/// Result of the cubic meter calculator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct VolumeEstimate {
    pub volume_per_piece: f64,
    pub total_volume: f64,
    pub pieces_per_m3: u64,
    pub total_price: f64,
}

impl VolumeInput {
    /// Validates against `limits` and computes the estimate.
    ///
    /// ## Example
    /// ```rust
    /// use arlap_core::calculator::{CalculatorLimits, VolumeInput};
    ///
    /// let plank = VolumeInput {
    ///     length_m: 4.0,
    ///     width_cm: 10.0,
    ///     thickness_cm: 2.5,
    ///     quantity: 10.0,
    ///     price_per_m3: 200_000.0,
    /// };
    /// let estimate = plank.estimate(&CalculatorLimits::default()).unwrap();
    /// assert!((estimate.volume_per_piece - 0.01).abs() < 1e-12);
    /// assert_eq!(estimate.pieces_per_m3, 100);
    /// ```
    pub fn estimate(&self, limits: &CalculatorLimits) -> CoreResult<VolumeEstimate> {
        collect_violations([
            validate_range("length", self.length_m, 0.0, limits.max_length_m),
            validate_range("width", self.width_cm, 0.0, limits.max_width_cm),
            validate_range("thickness", self.thickness_cm, 0.0, limits.max_thickness_cm),
            validate_range("quantity", self.quantity, 0.0, limits.max_quantity),
            validate_range("pricePerM3", self.price_per_m3, 0.0, f64::MAX),
        ])?;

        let volume_per_piece =
            self.width_cm * self.thickness_cm * (self.length_m * 100.0) / 1_000_000.0;
        let total_volume = volume_per_piece * self.quantity;
        Ok(VolumeEstimate {
            volume_per_piece,
            total_volume,
            pieces_per_m3: pieces_per_unit(volume_per_piece),
            total_price: total_volume * self.price_per_m3,
        })
    }
}

// =============================================================================
// Area
// =============================================================================

/// Input of the square meter calculator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct AreaInput {
    pub length_m: f64,
    pub width_cm: f64,
    pub quantity: f64,
    /// Price per m²; 0 when unknown.
    #[serde(default)]
    pub price_per_m2: f64,
}

/// Result of the square meter calculator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct AreaEstimate {
    pub area_per_piece: f64,
    pub total_area: f64,
    pub pieces_per_m2: u64,
    pub total_price: f64,
}

impl AreaInput {
    /// Validates against `limits` and computes the estimate.
    pub fn estimate(&self, limits: &CalculatorLimits) -> CoreResult<AreaEstimate> {
        collect_violations([
            validate_range("length", self.length_m, 0.0, limits.max_length_m),
            validate_range("width", self.width_cm, 0.0, limits.max_width_cm),
            validate_range("quantity", self.quantity, 0.0, limits.max_quantity),
            validate_range("pricePerM2", self.price_per_m2, 0.0, f64::MAX),
        ])?;

        let area_per_piece = self.width_cm * (self.length_m * 100.0) / 10_000.0;
        let total_area = area_per_piece * self.quantity;
        Ok(AreaEstimate {
            area_per_piece,
            total_area,
            pieces_per_m2: pieces_per_unit(area_per_piece),
            total_price: total_area * self.price_per_m2,
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{CoreError, ValidationError};

    fn close(actual: f64, expected: f64) -> bool {
        (actual - expected).abs() < 1e-9
    }

    #[test]
    fn test_volume_estimate() {
        let input = VolumeInput {
            length_m: 4.0,
            width_cm: 15.0,
            thickness_cm: 5.0,
            quantity: 20.0,
            price_per_m3: 180_000.0,
        };
        let estimate = input.estimate(&CalculatorLimits::default()).unwrap();

        assert!(close(estimate.volume_per_piece, 0.03));
        assert!(close(estimate.total_volume, 0.6));
        assert_eq!(estimate.pieces_per_m3, 33);
        assert!(close(estimate.total_price, 108_000.0));
    }

    #[test]
    fn test_zero_dimensions_give_zero_pieces() {
        let estimate = VolumeInput::default()
            .estimate(&CalculatorLimits::default())
            .unwrap();
        assert_eq!(estimate.volume_per_piece, 0.0);
        assert_eq!(estimate.pieces_per_m3, 0);
        assert_eq!(estimate.total_price, 0.0);
    }

    #[test]
    fn test_area_estimate() {
        let input = AreaInput {
            length_m: 2.5,
            width_cm: 20.0,
            quantity: 8.0,
            price_per_m2: 4_500.0,
        };
        let estimate = input.estimate(&CalculatorLimits::default()).unwrap();

        assert!(close(estimate.area_per_piece, 0.5));
        assert!(close(estimate.total_area, 4.0));
        assert_eq!(estimate.pieces_per_m2, 2);
        assert!(close(estimate.total_price, 18_000.0));
    }

    #[test]
    fn test_limits_are_inclusive() {
        let input = VolumeInput {
            length_m: 50.0,
            width_cm: 150.0,
            thickness_cm: 150.0,
            quantity: 10_000.0,
            price_per_m3: 0.0,
        };
        assert!(input.estimate(&CalculatorLimits::default()).is_ok());
    }

    #[test]
    fn test_every_violation_is_reported() {
        let input = VolumeInput {
            length_m: 51.0,
            width_cm: 10.0,
            thickness_cm: 151.0,
            quantity: 10_001.0,
            price_per_m3: 0.0,
        };
        let Err(CoreError::InvalidInput { errors }) = input.estimate(&CalculatorLimits::default())
        else {
            panic!("expected InvalidInput");
        };
        let fields: Vec<&str> = errors.iter().map(ValidationError::field).collect();
        assert_eq!(fields, vec!["length", "thickness", "quantity"]);
        assert!(errors
            .iter()
            .all(|e| matches!(e, ValidationError::OutOfRange { min, .. } if *min == 0.0)));
    }

    #[test]
    fn test_negative_input_rejected() {
        let input = AreaInput {
            length_m: -1.0,
            width_cm: 10.0,
            quantity: 1.0,
            price_per_m2: 0.0,
        };
        assert!(input.estimate(&CalculatorLimits::default()).is_err());
    }

    #[test]
    fn test_custom_limits() {
        let limits = CalculatorLimits {
            max_length_m: 6.0,
            ..Default::default()
        };
        let input = AreaInput {
            length_m: 8.0,
            width_cm: 10.0,
            quantity: 1.0,
            price_per_m2: 0.0,
        };
        assert!(input.estimate(&limits).is_err());
        assert!(input.estimate(&CalculatorLimits::default()).is_ok());
    }
}
