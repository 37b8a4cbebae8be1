//! # Domain Types
//!
//! Catalog shapes consumed by the pricing functions.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Category     │   │  PricedProduct  │   │     Variant     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  slug           │──►│  price (piece)  │──►│  title          │       │
//! │  │  products[]     │   │  mPrice m2Price │   │  price          │       │
//! │  └─────────────────┘   │  m3Price        │   │  discountPrice  │       │
//! │                        │  palletPrice    │   │  discountPercent│       │
//! │  ┌─────────────────┐   │  discountPrice  │   │  validUntil     │       │
//! │  │  SellingUnit    │   │  discountPercent│   └─────────────────┘       │
//! │  │  ─────────────  │   │  validUntil     │                             │
//! │  │  db m m2 m3 pal │   │  variants[]     │                             │
//! │  └─────────────────┘   └─────────────────┘                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every type here is an immutable input. Pricing functions borrow them and
//! return new values; nothing computed is ever written back.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::discount::DiscountTerms;
use crate::error::CoreError;
use crate::money::{lenient_amount, lenient_money, lenient_price, Money};

// =============================================================================
// Selling Unit
// =============================================================================

/// The unit a catalog price is quoted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum SellingUnit {
    /// Per piece ("db").
    #[serde(rename = "db")]
    Piece,
    /// Per linear meter ("m").
    #[serde(rename = "m")]
    Meter,
    /// Per square meter ("m2").
    #[serde(rename = "m2")]
    SquareMeter,
    /// Per cubic meter ("m3").
    #[serde(rename = "m3")]
    CubicMeter,
    /// Per pallet ("pal").
    #[serde(rename = "pal")]
    Pallet,
}

impl SellingUnit {
    /// Priority order used when picking a product's representative unit and
    /// when breaking ties between equally common units.
    pub const PRIORITY: [SellingUnit; 5] = [
        SellingUnit::Pallet,
        SellingUnit::Piece,
        SellingUnit::Meter,
        SellingUnit::SquareMeter,
        SellingUnit::CubicMeter,
    ];

    /// Short catalog tag.
    pub fn tag(&self) -> &'static str {
        match self {
            SellingUnit::Piece => "db",
            SellingUnit::Meter => "m",
            SellingUnit::SquareMeter => "m2",
            SellingUnit::CubicMeter => "m3",
            SellingUnit::Pallet => "pal",
        }
    }

    /// Label shown next to a price.
    pub fn label(&self) -> &'static str {
        match self {
            SellingUnit::Piece => "db",
            SellingUnit::Meter => "m",
            SellingUnit::SquareMeter => "m²",
            SellingUnit::CubicMeter => "m³",
            SellingUnit::Pallet => "raklap",
        }
    }
}

impl fmt::Display for SellingUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for SellingUnit {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "db" | "piece" => Ok(SellingUnit::Piece),
            "m" | "meter" => Ok(SellingUnit::Meter),
            "m2" | "m²" | "square_meter" => Ok(SellingUnit::SquareMeter),
            "m3" | "m³" | "cubic_meter" => Ok(SellingUnit::CubicMeter),
            "pal" | "raklap" | "pallet" => Ok(SellingUnit::Pallet),
            _ => Err(CoreError::UnknownUnit { tag: s.to_string() }),
        }
    }
}

// =============================================================================
// Priced Product
// =============================================================================

/// A catalog item as delivered by the catalog adapter.
///
/// Any combination of the five unit prices may be present; a beam can be
/// sold both per piece and per cubic meter. The discount fields are shared
/// by all of them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct PricedProduct {
    /// Display name, also the tie-breaker when sorting unpriced items.
    #[serde(default)]
    pub name: String,

    /// URL slug.
    #[serde(default)]
    pub slug: Option<String>,

    /// Price per piece.
    #[serde(default, with = "lenient_price")]
    #[ts(type = "number | null")]
    pub price: Option<Money>,

    /// Price per linear meter.
    #[serde(default, alias = "mprice", with = "lenient_price")]
    #[ts(type = "number | null")]
    pub m_price: Option<Money>,

    /// Price per square meter.
    #[serde(default, alias = "m2price", with = "lenient_price")]
    #[ts(type = "number | null")]
    pub m2_price: Option<Money>,

    /// Price per cubic meter.
    #[serde(default, alias = "m3price", with = "lenient_price")]
    #[ts(type = "number | null")]
    pub m3_price: Option<Money>,

    /// Price per pallet.
    #[serde(default, alias = "palprice", with = "lenient_price")]
    #[ts(type = "number | null")]
    pub pallet_price: Option<Money>,

    /// Fixed promotional price, unrounded. Only ever compared with the
    /// piece price.
    #[serde(default, with = "lenient_amount")]
    #[ts(type = "number | null")]
    pub discount_price: Option<f64>,

    /// Promotional percentage, valid in the open range (0, 100).
    #[serde(default, with = "lenient_percent")]
    #[ts(type = "number | null")]
    pub discount_percent: Option<f64>,

    /// Free-text promotion deadline, see [`crate::deadline`].
    #[serde(default, with = "lenient_text")]
    #[ts(type = "string | null")]
    pub discount_valid_until: Option<String>,

    /// Priced variants, for products not sold through flat unit prices.
    #[serde(default)]
    pub variants: Option<Vec<Variant>>,
}

impl PricedProduct {
    /// Returns the raw price for `unit`, if the product is sold that way.
    pub fn unit_price(&self, unit: SellingUnit) -> Option<Money> {
        let raw = match unit {
            SellingUnit::Piece => self.price,
            SellingUnit::Meter => self.m_price,
            SellingUnit::SquareMeter => self.m2_price,
            SellingUnit::CubicMeter => self.m3_price,
            SellingUnit::Pallet => self.pallet_price,
        };
        raw.filter(Money::is_positive)
    }

    /// The product's promotion, borrowed.
    pub fn discount_terms(&self) -> DiscountTerms<'_> {
        DiscountTerms {
            percent: self.discount_percent,
            fixed_price: self.discount_price,
            valid_until: self.discount_valid_until.as_deref(),
        }
    }

    /// Variants as a slice (empty when the catalog sent none).
    pub fn variants(&self) -> &[Variant] {
        self.variants.as_deref().unwrap_or_default()
    }
}

// =============================================================================
// Variant
// =============================================================================

/// One priced variant of a product. Carries its own promotion, independent
/// of the parent product's.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Variant {
    /// Variant title ("Alap", "4 m", "6 m"...).
    #[serde(default)]
    pub title: Option<String>,

    /// Zero and negative prices are kept; only a missing or non-numeric
    /// price is `None`.
    #[serde(default, with = "lenient_money")]
    #[ts(type = "number | null")]
    pub price: Option<Money>,

    #[serde(default, with = "lenient_money")]
    #[ts(type = "number | null")]
    pub discount_price: Option<Money>,

    #[serde(default, with = "lenient_percent")]
    #[ts(type = "number | null")]
    pub discount_percent: Option<f64>,

    #[serde(default, with = "lenient_text")]
    #[ts(type = "string | null")]
    pub discount_valid_until: Option<String>,
}

// =============================================================================
// Promotion Field Decoding
// =============================================================================

/// Promotional percent: only a finite JSON number is kept. Strings such as
/// `"20"` are ignored rather than coerced, and never fail the whole catalog.
pub(crate) mod lenient_percent {
    use serde::de::IgnoredAny;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawPercent {
        Number(f64),
        Other(IgnoredAny),
    }

    pub fn serialize<S: Serializer>(value: &Option<f64>, serializer: S) -> Result<S::Ok, S::Error> {
        value.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
        let raw = Option::<RawPercent>::deserialize(deserializer)?;
        Ok(raw.and_then(|raw| match raw {
            RawPercent::Number(n) if n.is_finite() => Some(n),
            _ => None,
        }))
    }
}

/// Deadline text: anything that is not a JSON string decodes to `None`.
pub(crate) mod lenient_text {
    use serde::de::IgnoredAny;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawText {
        Text(String),
        Other(IgnoredAny),
    }

    pub fn serialize<S: Serializer>(value: &Option<String>, serializer: S) -> Result<S::Ok, S::Error> {
        value.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
        let raw = Option::<RawText>::deserialize(deserializer)?;
        Ok(raw.and_then(|raw| match raw {
            RawText::Text(text) => Some(text),
            RawText::Other(_) => None,
        }))
    }
}

// =============================================================================
// Category
// =============================================================================

/// A catalog category with its products, as used by listing pages.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Category {
    pub slug: String,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub products: Vec<PricedProduct>,
}

// =============================================================================
// Unit Tests
// =============================================================================
