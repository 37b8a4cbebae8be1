//! # Money Module
//!
//! Provides the `Money` type for catalog prices.
//!
//! ## Whole Forints
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Catalog prices are already-denominated integers in one currency.      │
//! │                                                                         │
//! │  There is no minor unit in play: 12 500 Ft is stored as 12500.         │
//! │  The only rounding rule anywhere is "nearest integer, halves away      │
//! │  from zero", applied when a percentage produces a fraction:           │
//! │                                                                         │
//! │    1999 × (1 − 15/100) = 1699.15  →  1699                              │
//! │    1990 × (1 − 25/100) = 1492.50  →  1493                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use arlap_core::money::Money;
//!
//! let price = Money::from_forints(1000);
//! let discounted = price.apply_percentage_discount(20.0);
//! assert_eq!(discounted.forints(), 800);
//! assert_eq!(price.percent_off(discounted), 20);
//! ```

use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use ts_rs::TS;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in whole forints.
///
/// ## Design Decisions
/// - **i64 (signed)**: differences between prices may be negative
/// - **Single field tuple struct**: zero-cost abstraction over i64
/// - **Serialized as a plain number** so catalog JSON stays unchanged
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(transparent)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from whole forints.
    #[inline]
    pub const fn from_forints(forints: i64) -> Self {
        Money(forints)
    }

    /// Rounds a fractional amount to the nearest forint (halves away from zero).
    ///
    /// Returns `None` for NaN and infinities.
    ///
    /// ## Example
    /// ```rust
    /// use arlap_core::money::Money;
    ///
    /// assert_eq!(Money::round_from(1492.5), Some(Money::from_forints(1493)));
    /// assert_eq!(Money::round_from(f64::NAN), None);
    /// ```
    pub fn round_from(amount: f64) -> Option<Self> {
        if !amount.is_finite() {
            return None;
        }
        Some(Money(amount.round() as i64))
    }

    /// Like [`Money::round_from`], but only accepts amounts that are still
    /// positive after rounding. This is how raw catalog prices are admitted:
    /// anything else means "not sold this way".
    pub fn positive_from(amount: f64) -> Option<Self> {
        Self::round_from(amount).filter(Money::is_positive)
    }

    /// Returns the value in forints.
    #[inline]
    pub const fn forints(&self) -> i64 {
        self.0
    }

    /// Returns the value as a float for ratio math.
    #[inline]
    pub fn as_f64(&self) -> f64 {
        self.0 as f64
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Applies a percentage discount: `round(self × (1 − percent/100))`.
    ///
    /// `percent` is taken as-is; range checks belong to the discount
    /// resolver, which decides whether a percentage is valid at all.
    ///
    /// ## Example
    /// ```rust
    /// use arlap_core::money::Money;
    ///
    /// let price = Money::from_forints(1990);
    /// assert_eq!(price.apply_percentage_discount(25.0).forints(), 1493);
    /// ```
    pub fn apply_percentage_discount(&self, percent: f64) -> Money {
        let discounted = self.as_f64() * (1.0 - percent / 100.0);
        Money(discounted.round() as i64)
    }

    /// The whole-number percentage by which `discounted` is below `self`:
    /// `round((1 − discounted/self) × 100)`.
    ///
    /// Negative when `discounted` is above `self`; 0 when `self` is not
    /// positive.
    ///
    /// ## Example
    /// ```rust
    /// use arlap_core::money::Money;
    ///
    /// let base = Money::from_forints(1000);
    /// assert_eq!(base.percent_off(Money::from_forints(850)), 15);
    /// ```
    pub fn percent_off(&self, discounted: Money) -> i64 {
        if !self.is_positive() {
            return 0;
        }
        ((1.0 - discounted.as_f64() / self.as_f64()) * 100.0).round() as i64
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display groups thousands with a space, the way prices are printed in
/// Hungarian: `12 500 Ft`.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = self.0.unsigned_abs().to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push(' ');
            }
            grouped.push(ch);
        }
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{} Ft", sign, grouped)
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

// =============================================================================
// Catalog Price Decoding
// =============================================================================

/// Raw catalog amount: a JSON number, or a numeric string with embedded
/// whitespace (`"12 500"`). Anything else, `null` included, is `None`.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawAmount {
    Number(f64),
    Text(String),
    Other(IgnoredAny),
}

impl RawAmount {
    fn value(self) -> Option<f64> {
        let amount = match self {
            RawAmount::Number(n) => n,
            RawAmount::Text(text) => {
                let compact: String = text.chars().filter(|c| !c.is_whitespace()).collect();
                compact.parse::<f64>().ok()?
            }
            RawAmount::Other(_) => return None,
        };
        amount.is_finite().then_some(amount)
    }

    fn decode<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
        Ok(Option::<RawAmount>::deserialize(deserializer)?.and_then(RawAmount::value))
    }
}

/// Lenient (de)serialization for optional catalog price fields.
///
/// Accepted on input:
/// - JSON numbers, rounded to the nearest forint
/// - numeric strings with embedded whitespace (`"12 500"`)
/// - `null` or a missing field
///
/// Anything non-numeric, non-finite, or not positive decodes to `None`.
pub(crate) mod lenient_price {
    use super::{Money, RawAmount};
    use serde::{Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(value: &Option<Money>, serializer: S) -> Result<S::Ok, S::Error> {
        value.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Money>, D::Error> {
        Ok(RawAmount::decode(deserializer)?.and_then(Money::positive_from))
    }
}

/// Like [`lenient_price`], but zero and negative amounts are kept.
///
/// Variant prices use this: a variant listed at 0 Ft with a promotional
/// price still resolves to that promotional price.
pub(crate) mod lenient_money {
    use super::{Money, RawAmount};
    use serde::{Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(value: &Option<Money>, serializer: S) -> Result<S::Ok, S::Error> {
        value.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Money>, D::Error> {
        Ok(RawAmount::decode(deserializer)?.and_then(Money::round_from))
    }
}

/// Unrounded catalog amount, for the fixed promotional price.
///
/// The fixed price is checked against the base before it is rounded, so
/// `999.6` still counts as below `1000`.
pub(crate) mod lenient_amount {
    use super::RawAmount;
    use serde::{Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(value: &Option<f64>, serializer: S) -> Result<S::Ok, S::Error> {
        value.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
        RawAmount::decode(deserializer)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_from_half_away_from_zero() {
        assert_eq!(Money::round_from(0.5), Some(Money::from_forints(1)));
        assert_eq!(Money::round_from(1.5), Some(Money::from_forints(2)));
        assert_eq!(Money::round_from(2.5), Some(Money::from_forints(3)));
        assert_eq!(Money::round_from(1699.15), Some(Money::from_forints(1699)));
        assert_eq!(Money::round_from(f64::INFINITY), None);
    }

    #[test]
    fn test_positive_from() {
        assert_eq!(Money::positive_from(12500.0), Some(Money::from_forints(12500)));
        assert_eq!(Money::positive_from(0.0), None);
        assert_eq!(Money::positive_from(0.3), None);
        assert_eq!(Money::positive_from(-10.0), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_forints(12500).to_string(), "12 500 Ft");
        assert_eq!(Money::from_forints(999).to_string(), "999 Ft");
        assert_eq!(Money::from_forints(1_234_567).to_string(), "1 234 567 Ft");
        assert_eq!(Money::from_forints(-4500).to_string(), "-4 500 Ft");
        assert_eq!(Money::zero().to_string(), "0 Ft");
    }

    #[test]
    fn test_percentage_discount() {
        let price = Money::from_forints(1000);
        assert_eq!(price.apply_percentage_discount(20.0).forints(), 800);
        assert_eq!(price.apply_percentage_discount(12.5).forints(), 875);

        let odd = Money::from_forints(1999);
        assert_eq!(odd.apply_percentage_discount(15.0).forints(), 1699);
    }

    #[test]
    fn test_percent_off() {
        let base = Money::from_forints(1000);
        assert_eq!(base.percent_off(Money::from_forints(800)), 20);
        assert_eq!(base.percent_off(Money::from_forints(999)), 0);
        assert_eq!(base.percent_off(Money::from_forints(1100)), -10);
        assert_eq!(Money::zero().percent_off(Money::from_forints(5)), 0);
    }

    #[test]
    fn test_lenient_price_decoding() {
        #[derive(Deserialize)]
        struct Row {
            #[serde(default, with = "lenient_price")]
            price: Option<Money>,
        }

        let decode = |json: &str| serde_json::from_str::<Row>(json).unwrap().price;

        assert_eq!(decode(r#"{"price": 4990}"#), Some(Money::from_forints(4990)));
        assert_eq!(decode(r#"{"price": 4990.6}"#), Some(Money::from_forints(4991)));
        assert_eq!(decode(r#"{"price": "12 500"}"#), Some(Money::from_forints(12500)));
        assert_eq!(decode(r#"{"price": "kérjen ajánlatot"}"#), None);
        assert_eq!(decode(r#"{"price": 0}"#), None);
        assert_eq!(decode(r#"{"price": true}"#), None);
        assert_eq!(decode(r#"{"price": null}"#), None);
        assert_eq!(decode(r#"{}"#), None);
    }

    #[test]
    fn test_lenient_money_keeps_zero() {
        #[derive(Deserialize)]
        struct Row {
            #[serde(default, with = "lenient_money")]
            price: Option<Money>,
        }

        let decode = |json: &str| serde_json::from_str::<Row>(json).unwrap().price;

        assert_eq!(decode(r#"{"price": 0}"#), Some(Money::zero()));
        assert_eq!(decode(r#"{"price": "-150"}"#), Some(Money::from_forints(-150)));
        assert_eq!(decode(r#"{"price": 5990.4}"#), Some(Money::from_forints(5990)));
        assert_eq!(decode(r#"{"price": "ingyen"}"#), None);
        assert_eq!(decode(r#"{"price": [1]}"#), None);
        assert_eq!(decode(r#"{}"#), None);
    }

    #[test]
    fn test_lenient_amount_is_not_rounded() {
        #[derive(Deserialize)]
        struct Row {
            #[serde(default, with = "lenient_amount")]
            amount: Option<f64>,
        }

        let decode = |json: &str| serde_json::from_str::<Row>(json).unwrap().amount;

        assert_eq!(decode(r#"{"amount": 999.6}"#), Some(999.6));
        assert_eq!(decode(r#"{"amount": "1 499.5"}"#), Some(1499.5));
        assert_eq!(decode(r#"{"amount": "NaN"}"#), None);
        assert_eq!(decode(r#"{"amount": false}"#), None);
        assert_eq!(decode(r#"{"amount": null}"#), None);
    }
}
