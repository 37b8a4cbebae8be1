//! # Firewood Unit Comparator
//!
//! Converts firewood offers quoted in different units to one reference unit
//! (forest m³, "erdei m³") so two offers can be compared.
//!
//! ## Conversion Table
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Quoted unit           Tag          Price per forest m³                 │
//! │  ────────────────────  ───────────  ───────────────────────────────────│
//! │  stacked m³ (rakott)   m3           price / m3ToForest                  │
//! │  forest m³ (erdei)     erdei_m3     price                               │
//! │  ton                   tonna        price × density × solidToForest/1000│
//! │  quintal (100 kg)      mazsa        price×10 × density × s2f / 1000     │
//! │  loose m³ (szórt)      szort_m3     price / (stackedToSolid × s2f)      │
//! │  solid m³ (tömör)      tomor_m3     price / solidToForest               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `density` is the moisture-adjusted wood density in kg/m³, see
//! [`moisture_adjusted_density`]. Delivery is added after conversion: a
//! delivery fee is per order, not per cubic meter.
//!
//! A conversion that would divide by zero, or that is asked of an unknown
//! unit, abstains with `None` and makes the whole comparison inconclusive.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::debug;
use ts_rs::TS;

use crate::error::CoreError;

// =============================================================================
// Units
// =============================================================================

/// The unit a firewood offer is quoted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum FirewoodUnit {
    /// Stacked cubic meter ("rakott m³"). Tagged plain `m3` by the form.
    #[serde(rename = "m3", alias = "rakott_m3")]
    StackedM3,
    /// Forest cubic meter ("erdei m³"), the reference unit.
    #[serde(rename = "erdei_m3")]
    ForestM3,
    #[serde(rename = "tonna")]
    Ton,
    /// 100 kg ("mázsa").
    #[serde(rename = "mazsa")]
    Quintal,
    /// Loose cubic meter ("szórt m³"), split logs thrown in a heap.
    #[serde(rename = "szort_m3")]
    LooseM3,
    /// Solid cubic meter ("tömör m³"), wood volume without gaps.
    #[serde(rename = "tomor_m3")]
    SolidM3,
    /// Any tag this build does not know. Never converts.
    #[serde(other)]
    Unrecognized,
}

impl FirewoodUnit {
    /// Units offered in the comparator form, in display order.
    pub const ALL: [FirewoodUnit; 6] = [
        FirewoodUnit::StackedM3,
        FirewoodUnit::ForestM3,
        FirewoodUnit::Ton,
        FirewoodUnit::Quintal,
        FirewoodUnit::LooseM3,
        FirewoodUnit::SolidM3,
    ];

    pub fn tag(&self) -> &'static str {
        match self {
            FirewoodUnit::StackedM3 => "m3",
            FirewoodUnit::ForestM3 => "erdei_m3",
            FirewoodUnit::Ton => "tonna",
            FirewoodUnit::Quintal => "mazsa",
            FirewoodUnit::LooseM3 => "szort_m3",
            FirewoodUnit::SolidM3 => "tomor_m3",
            FirewoodUnit::Unrecognized => "unrecognized",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FirewoodUnit::StackedM3 => "Rakott m³",
            FirewoodUnit::ForestM3 => "Erdei m³",
            FirewoodUnit::Ton => "Tonna",
            FirewoodUnit::Quintal => "Mázsa",
            FirewoodUnit::LooseM3 => "Szórt m³",
            FirewoodUnit::SolidM3 => "Tömör m³",
            FirewoodUnit::Unrecognized => "Ismeretlen",
        }
    }
}

impl fmt::Display for FirewoodUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for FirewoodUnit {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "m3" | "rakott_m3" | "stacked_m3" => Ok(FirewoodUnit::StackedM3),
            "erdei_m3" | "forest_m3" => Ok(FirewoodUnit::ForestM3),
            "tonna" | "ton" => Ok(FirewoodUnit::Ton),
            "mazsa" | "quintal" => Ok(FirewoodUnit::Quintal),
            "szort_m3" | "loose_m3" => Ok(FirewoodUnit::LooseM3),
            "tomor_m3" | "solid_m3" => Ok(FirewoodUnit::SolidM3),
            _ => Err(CoreError::UnknownUnit { tag: s.to_string() }),
        }
    }
}

// =============================================================================
// Conversion Ratios
// =============================================================================

/// Volume ratios between firewood measures.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ConversionRatios {
    /// Stacked m³ per forest m³.
    pub m3_to_forest: f64,
    /// Tons per forest m³. Shown to the user; the ton conversion goes
    /// through density instead.
    pub forest_to_ton: f64,
    /// Solid m³ per loose m³.
    pub stacked_to_solid: f64,
    /// Forest m³ per solid m³.
    pub solid_to_forest: f64,
}

impl Default for ConversionRatios {
    fn default() -> Self {
        Self {
            m3_to_forest: 1.67,
            forest_to_ton: 1.4,
            stacked_to_solid: 0.45,
            solid_to_forest: 1.43,
        }
    }
}

/// A ratio usable as a factor or divisor.
fn usable(ratio: f64) -> Option<f64> {
    (ratio.is_finite() && ratio > 0.0).then_some(ratio)
}

/// Wood density corrected for moisture, rounded to whole kg/m³:
/// `round(dry × (1 + moisture/100))`.
///
/// ```rust
/// use arlap_core::firewood::moisture_adjusted_density;
///
/// assert_eq!(moisture_adjusted_density(550.0, 20.0), 660.0);
/// ```
pub fn moisture_adjusted_density(dry_density: f64, moisture_percent: f64) -> f64 {
    (dry_density * (1.0 + moisture_percent / 100.0)).round()
}

/// Converts a unit price to the price of one forest m³.
///
/// Returns `None` for an unrecognized unit, a non-finite price, or when a
/// ratio (or the density) the formula needs is zero, negative or not finite.
pub fn to_reference_unit(
    price: f64,
    unit: FirewoodUnit,
    ratios: &ConversionRatios,
    density: f64,
) -> Option<f64> {
    if !price.is_finite() {
        return None;
    }
    let converted = match unit {
        FirewoodUnit::StackedM3 => price / usable(ratios.m3_to_forest)?,
        FirewoodUnit::ForestM3 => price,
        FirewoodUnit::Ton => price * usable(density)? * usable(ratios.solid_to_forest)? / 1000.0,
        FirewoodUnit::Quintal => {
            price * 10.0 * usable(density)? * usable(ratios.solid_to_forest)? / 1000.0
        }
        FirewoodUnit::LooseM3 => {
            price / (usable(ratios.stacked_to_solid)? * usable(ratios.solid_to_forest)?)
        }
        FirewoodUnit::SolidM3 => price / usable(ratios.solid_to_forest)?,
        FirewoodUnit::Unrecognized => return None,
    };
    Some(converted)
}

// =============================================================================
// Offers & Comparison
// =============================================================================

/// One firewood offer as entered in the comparator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Offer {
    pub price: f64,
    pub unit: FirewoodUnit,
    pub delivery_included: bool,
    /// Ignored when `delivery_included`.
    #[serde(default)]
    pub delivery_cost: f64,
}

impl Offer {
    /// Offer with delivery included in the price.
    pub fn delivered(price: f64, unit: FirewoodUnit) -> Self {
        Self {
            price,
            unit,
            delivery_included: true,
            delivery_cost: 0.0,
        }
    }

    /// Offer with a separate delivery fee.
    pub fn with_delivery(price: f64, unit: FirewoodUnit, delivery_cost: f64) -> Self {
        Self {
            price,
            unit,
            delivery_included: false,
            delivery_cost,
        }
    }

    /// Delivery fee actually charged on top of the price.
    pub fn delivery_surcharge(&self) -> f64 {
        if self.delivery_included {
            0.0
        } else {
            self.delivery_cost
        }
    }

    /// Prices this offer in forest m³, delivery included.
    pub fn total(&self, ratios: &ConversionRatios, density: f64) -> Option<OfferTotal> {
        let converted = to_reference_unit(self.price, self.unit, ratios, density)?;
        let delivery = self.delivery_surcharge();
        Some(OfferTotal {
            converted,
            delivery,
            total: converted + delivery,
        })
    }
}

/// One offer's price per forest m³.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct OfferTotal {
    pub converted: f64,
    pub delivery: f64,
    pub total: f64,
}

/// Which offer is cheaper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum Cheaper {
    A,
    B,
    Tie,
}

/// A conclusive comparison of two offers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Comparison {
    pub a: OfferTotal,
    pub b: OfferTotal,
    pub cheaper: Cheaper,
}

impl Comparison {
    /// Totals rounded to whole forints, as displayed.
    pub fn rounded_totals(&self) -> (i64, i64) {
        (self.a.total.round() as i64, self.b.total.round() as i64)
    }
}

/// Compares two offers in forest m³.
///
/// Returns `None` (inconclusive) when either offer cannot be converted.
///
/// ## Example
/// ```rust
/// use arlap_core::firewood::{compare, moisture_adjusted_density, Cheaper, ConversionRatios, FirewoodUnit, Offer};
///
/// let ratios = ConversionRatios::default();
/// let density = moisture_adjusted_density(550.0, 20.0);
/// let a = Offer::delivered(30_000.0, FirewoodUnit::LooseM3);
/// let b = Offer::delivered(42_000.0, FirewoodUnit::ForestM3);
///
/// let result = compare(&a, &b, &ratios, density).unwrap();
/// assert_eq!(result.cheaper, Cheaper::B);
/// assert_eq!(result.rounded_totals(), (46_620, 42_000));
/// ```
pub fn compare(a: &Offer, b: &Offer, ratios: &ConversionRatios, density: f64) -> Option<Comparison> {
    let (Some(total_a), Some(total_b)) = (a.total(ratios, density), b.total(ratios, density)) else {
        debug!(unit_a = %a.unit, unit_b = %b.unit, "Firewood comparison inconclusive");
        return None;
    };

    let cheaper = if total_a.total < total_b.total {
        Cheaper::A
    } else if total_b.total < total_a.total {
        Cheaper::B
    } else {
        Cheaper::Tie
    };

    Some(Comparison {
        a: total_a,
        b: total_b,
        cheaper,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
