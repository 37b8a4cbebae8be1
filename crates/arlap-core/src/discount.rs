//! # Discount Resolution
//!
//! Turns a base price plus an optional promotion into the price a customer
//! sees.
//!
//! ## Resolution Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  base price absent or ≤ 0 ─────────────────────► { false, None, None } │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  deadline in the future? ── no ────────────────► { false, base, None } │
//! │       │ yes                                                             │
//! │       ▼                                                                 │
//! │  percent valid?  0 < p < 100          → round(base × (1 − p/100))       │
//! │  fixed valid?    0 < fixed < base     → round(fixed)                    │
//! │       │                                                                 │
//! │       ├── neither ─────────────────────────────► { false, base, None } │
//! │       ├── one ──► its price                                             │
//! │       └── both ─► the lower of the two                                  │
//! │                     │                                                   │
//! │                     ▼                                                   │
//! │  percent = round((1 − final/base) × 100), from the WINNING price        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The reported percent is never the raw input. When the fixed price wins,
//! echoing the input percent would show "−10%" next to a 15% cheaper price.

use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};
use tracing::debug;
use ts_rs::TS;

use crate::deadline::is_future;
use crate::money::Money;

// =============================================================================
// Discount Terms
// =============================================================================

/// The promotion fields attached to a product or variant, borrowed.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DiscountTerms<'a> {
    /// Percentage off, valid only in the open range (0, 100).
    pub percent: Option<f64>,
    /// Fixed promotional price as listed, unrounded. Valid only when
    /// positive and below the base.
    pub fixed_price: Option<f64>,
    /// Free-text deadline; absent or unparseable means inactive.
    pub valid_until: Option<&'a str>,
}

impl<'a> DiscountTerms<'a> {
    /// The same promotion without its fixed price.
    ///
    /// Used for unit prices other than the piece price, where a per-piece
    /// promotional price has no meaning.
    pub fn percent_only(&self) -> DiscountTerms<'a> {
        DiscountTerms {
            fixed_price: None,
            ..*self
        }
    }

    /// Whether the deadline is still in the future at `now`.
    pub fn is_active<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> bool {
        is_future(self.valid_until, now)
    }
}

/// Checks the open range (0, 100). NaN is rejected.
pub fn is_valid_percent(percent: Option<f64>) -> bool {
    matches!(percent, Some(p) if p > 0.0 && p < 100.0)
}

/// Checks `0 < fixed < base` on the unrounded fixed price. NaN is rejected.
pub fn is_valid_fixed_price(fixed: Option<f64>, base: Money) -> bool {
    matches!(fixed, Some(f) if f > 0.0 && f < base.as_f64())
}

// =============================================================================
// Discount Result
// =============================================================================

/// Outcome of resolving a promotion against one base price.
///
/// ## Invariants
/// - `final_price <= base` whenever `has_discount`
/// - `percent` is `Some` exactly when `has_discount`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct DiscountResult {
    pub has_discount: bool,
    #[ts(type = "number | null")]
    pub final_price: Option<Money>,
    #[ts(type = "number | null")]
    pub percent: Option<i64>,
}

impl DiscountResult {
    /// No base price: nothing to show.
    pub const UNPRICED: DiscountResult = DiscountResult {
        has_discount: false,
        final_price: None,
        percent: None,
    };

    /// A price without an active promotion.
    pub const fn undiscounted(base: Money) -> Self {
        DiscountResult {
            has_discount: false,
            final_price: Some(base),
            percent: None,
        }
    }

    fn discounted(base: Money, final_price: Money) -> Self {
        DiscountResult {
            has_discount: true,
            final_price: Some(final_price),
            percent: Some(base.percent_off(final_price)),
        }
    }
}

// =============================================================================
// Resolver
// =============================================================================

/// Resolves `terms` against `base` at `now`.
///
/// ## Example
/// ```rust
/// use arlap_core::discount::{resolve, DiscountTerms};
/// use arlap_core::money::Money;
/// use chrono::{TimeZone, Utc};
///
/// let now = Utc.with_ymd_and_hms(2025, 6, 1, 10, 0, 0).unwrap();
/// let terms = DiscountTerms {
///     percent: Some(10.0),
///     fixed_price: Some(850.0),
///     valid_until: Some("2025-06-02"),
/// };
///
/// let result = resolve(Some(Money::from_forints(1000)), &terms, &now);
/// assert!(result.has_discount);
/// assert_eq!(result.final_price, Some(Money::from_forints(850)));
/// assert_eq!(result.percent, Some(15));
/// ```
pub fn resolve<Tz: TimeZone>(
    base: Option<Money>,
    terms: &DiscountTerms<'_>,
    now: &DateTime<Tz>,
) -> DiscountResult {
    let Some(base) = base.filter(Money::is_positive) else {
        return DiscountResult::UNPRICED;
    };

    if !terms.is_active(now) {
        return DiscountResult::undiscounted(base);
    }

    let from_percent = terms
        .percent
        .filter(|&p| is_valid_percent(Some(p)))
        .map(|p| base.apply_percentage_discount(p));
    let from_fixed = terms
        .fixed_price
        .filter(|&f| is_valid_fixed_price(Some(f), base))
        .and_then(Money::round_from);

    let final_price = match (from_percent, from_fixed) {
        (Some(p), Some(f)) => p.min(f),
        (Some(p), None) => p,
        (None, Some(f)) => f,
        (None, None) => return DiscountResult::undiscounted(base),
    };

    debug!(
        base = base.forints(),
        final_price = final_price.forints(),
        via_percent = from_percent == Some(final_price),
        "Discount applied"
    );
    DiscountResult::discounted(base, final_price)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 10, 0, 0).unwrap()
    }

    fn tomorrow() -> String {
        (now() + Duration::days(1)).format("%Y-%m-%d").to_string()
    }

    fn money(forints: i64) -> Option<Money> {
        Some(Money::from_forints(forints))
    }

    #[test]
    fn test_no_base_price() {
        let deadline = tomorrow();
        let terms = DiscountTerms {
            percent: Some(20.0),
            valid_until: Some(&deadline),
            ..Default::default()
        };
        assert_eq!(resolve(None, &terms, &now()), DiscountResult::UNPRICED);
        assert_eq!(resolve(money(0), &terms, &now()), DiscountResult::UNPRICED);
        assert_eq!(resolve(money(-100), &terms, &now()), DiscountResult::UNPRICED);
    }

    #[test]
    fn test_no_discount_fields_returns_base() {
        for base in [1, 999, 1000, 123_456] {
            let result = resolve(money(base), &DiscountTerms::default(), &now());
            assert!(!result.has_discount);
            assert_eq!(result.final_price, money(base));
            assert_eq!(result.percent, None);
        }
    }

    #[test]
    fn test_percent_only() {
        let deadline = tomorrow();
        let terms = DiscountTerms {
            percent: Some(20.0),
            valid_until: Some(&deadline),
            ..Default::default()
        };
        let result = resolve(money(1000), &terms, &now());
        assert_eq!(
            result,
            DiscountResult {
                has_discount: true,
                final_price: money(800),
                percent: Some(20),
            }
        );
    }

    #[test]
    fn test_percent_path_reports_input_percent() {
        let deadline = tomorrow();
        for p in 1..100 {
            let terms = DiscountTerms {
                percent: Some(p as f64),
                valid_until: Some(&deadline),
                ..Default::default()
            };
            let result = resolve(money(1000), &terms, &now());
            assert_eq!(result.final_price, Some(Money::from_forints(1000 - 10 * p)));
            assert_eq!(result.percent, Some(p));
        }
    }

    #[test]
    fn test_fixed_wins_when_lower() {
        let deadline = tomorrow();
        let terms = DiscountTerms {
            percent: Some(10.0),
            fixed_price: Some(850.0),
            valid_until: Some(&deadline),
        };
        let result = resolve(money(1000), &terms, &now());
        assert_eq!(result.final_price, money(850));
        assert_eq!(result.percent, Some(15));
    }

    #[test]
    fn test_percent_wins_when_lower() {
        let deadline = tomorrow();
        let terms = DiscountTerms {
            percent: Some(30.0),
            fixed_price: Some(850.0),
            valid_until: Some(&deadline),
        };
        let result = resolve(money(1000), &terms, &now());
        assert_eq!(result.final_price, money(700));
        assert_eq!(result.percent, Some(30));
    }

    #[test]
    fn test_percent_recomputed_after_rounding() {
        let deadline = tomorrow();
        let terms = DiscountTerms {
            fixed_price: Some(1499.0),
            valid_until: Some(&deadline),
            ..Default::default()
        };
        // 1 − 1499/1999 = 25.01 %
        let result = resolve(money(1999), &terms, &now());
        assert_eq!(result.percent, Some(25));
    }

    #[test]
    fn test_expired_or_missing_deadline() {
        for deadline in [None, Some("2020-01-01"), Some("nem tudom"), Some("")] {
            let terms = DiscountTerms {
                percent: Some(20.0),
                fixed_price: Some(500.0),
                valid_until: deadline,
            };
            let result = resolve(money(1000), &terms, &now());
            assert!(!result.has_discount, "{deadline:?}");
            assert_eq!(result.final_price, money(1000));
            assert_eq!(result.percent, None);
        }
    }

    #[test]
    fn test_invalid_shapes_are_ignored_individually() {
        let deadline = tomorrow();

        for percent in [0.0, 100.0, 150.0, -5.0, f64::NAN] {
            let terms = DiscountTerms {
                percent: Some(percent),
                valid_until: Some(&deadline),
                ..Default::default()
            };
            assert!(!resolve(money(1000), &terms, &now()).has_discount);
        }

        // Fixed price equal to or above base is ignored, percent still applies.
        for fixed in [1000.0, 1200.0, f64::NAN] {
            let terms = DiscountTerms {
                percent: Some(5.0),
                fixed_price: Some(fixed),
                valid_until: Some(&deadline),
            };
            assert_eq!(resolve(money(1000), &terms, &now()).final_price, money(950));
        }

        // Invalid percent, valid fixed.
        let terms = DiscountTerms {
            percent: Some(100.0),
            fixed_price: Some(900.0),
            valid_until: Some(&deadline),
        };
        let result = resolve(money(1000), &terms, &now());
        assert_eq!(result.final_price, money(900));
        assert_eq!(result.percent, Some(10));
    }

    #[test]
    fn test_final_never_above_base() {
        let deadline = tomorrow();
        for p in [0.5, 1.0, 33.3, 66.6, 99.4, 99.9] {
            for base in [1, 3, 7, 999, 1000] {
                let terms = DiscountTerms {
                    percent: Some(p),
                    valid_until: Some(&deadline),
                    ..Default::default()
                };
                let result = resolve(money(base), &terms, &now());
                assert!(result.final_price.unwrap() <= Money::from_forints(base));
            }
        }
    }

    #[test]
    fn test_fixed_price_checked_before_rounding() {
        let deadline = tomorrow();
        let terms = DiscountTerms {
            fixed_price: Some(999.6),
            valid_until: Some(&deadline),
            ..Default::default()
        };
        let result = resolve(money(1000), &terms, &now());
        assert_eq!(
            result,
            DiscountResult {
                has_discount: true,
                final_price: money(1000),
                percent: Some(0),
            }
        );

        let terms = DiscountTerms {
            fixed_price: Some(849.5),
            ..terms
        };
        let result = resolve(money(1000), &terms, &now());
        assert_eq!(result.final_price, money(850));
        assert_eq!(result.percent, Some(15));
    }

    #[test]
    fn test_percent_only_terms() {
        let terms = DiscountTerms {
            percent: Some(10.0),
            fixed_price: Some(500.0),
            valid_until: Some("2030-01-01"),
        };
        let stripped = terms.percent_only();
        assert_eq!(stripped.fixed_price, None);
        assert_eq!(stripped.percent, Some(10.0));
        assert_eq!(stripped.valid_until, Some("2030-01-01"));
    }
}
