//! # Variant Aggregation
//!
//! Price summary for products sold as a list of priced variants
//! ("4 m", "5 m", "6 m"...), as shown on listing cards:
//! "12 990 Ft-tól 18 490 Ft-ig, akár −20%".
//!
//! ## Per-Variant Rule
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. discountPrice set, positive, deadline in future → discountPrice    │
//! │  2. else discountPercent in (0,100), deadline in future → percent      │
//! │  3. else                                            → price            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Unlike product-level resolution in [`crate::discount`], which takes the
//! lower of both, the first applicable rule wins here.

use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::deadline::is_future;
use crate::discount::is_valid_percent;
use crate::money::Money;
use crate::types::Variant;

// =============================================================================
// Per-Variant Resolution
// =============================================================================

/// How a single variant resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct VariantPrice {
    #[ts(type = "number | null")]
    pub original: Option<Money>,
    #[ts(type = "number | null")]
    pub final_price: Option<Money>,
    pub has_discount: bool,
    #[ts(type = "number | null")]
    pub percent: Option<i64>,
}

/// Resolves one variant's own promotion at `now`.
pub fn resolve_variant<Tz: TimeZone>(variant: &Variant, now: &DateTime<Tz>) -> VariantPrice {
    let original = variant.price;
    let undiscounted = VariantPrice {
        original,
        final_price: original,
        has_discount: false,
        percent: None,
    };

    let Some(base) = original else {
        return undiscounted;
    };
    if !is_future(variant.discount_valid_until.as_deref(), now) {
        return undiscounted;
    }

    if let Some(fixed) = variant.discount_price.filter(Money::is_positive) {
        return VariantPrice {
            original,
            final_price: Some(fixed),
            has_discount: true,
            percent: base.is_positive().then(|| base.percent_off(fixed)),
        };
    }

    if let Some(percent) = variant.discount_percent.filter(|&p| is_valid_percent(Some(p))) {
        return VariantPrice {
            original,
            final_price: Some(base.apply_percentage_discount(percent)),
            has_discount: true,
            percent: Some(percent.round() as i64),
        };
    }

    undiscounted
}

// =============================================================================
// Aggregate Summary
// =============================================================================

/// Price range across a product's variants.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct VariantSummary {
    #[ts(type = "number | null")]
    pub min_original: Option<Money>,
    #[ts(type = "number | null")]
    pub min_final: Option<Money>,
    #[ts(type = "number | null")]
    pub max_final: Option<Money>,
    pub has_any_discount: bool,
    /// Largest percent seen; `None` rather than 0 when nothing is discounted.
    #[ts(type = "number | null")]
    pub max_discount_percent: Option<i64>,
}

/// Summarizes `variants` at `now`.
///
/// Variants whose final price is not positive are left out entirely. The
/// reduction is commutative: any ordering of `variants` gives the same
/// summary.
///
/// ## Example
/// ```rust
/// use arlap_core::money::Money;
/// use arlap_core::types::Variant;
/// use arlap_core::variant::aggregate;
/// use chrono::{TimeZone, Utc};
///
/// let now = Utc.with_ymd_and_hms(2025, 6, 1, 10, 0, 0).unwrap();
/// let variants = vec![
///     Variant { price: Some(Money::from_forints(5990)), ..Default::default() },
///     Variant {
///         price: Some(Money::from_forints(7990)),
///         discount_percent: Some(25.0),
///         discount_valid_until: Some("2025-06-30".into()),
///         ..Default::default()
///     },
/// ];
///
/// let summary = aggregate(&variants, &now);
/// assert_eq!(summary.min_final, Some(Money::from_forints(5990)));
/// assert_eq!(summary.max_final, Some(Money::from_forints(5993)));
/// assert_eq!(summary.max_discount_percent, Some(25));
/// ```
pub fn aggregate<Tz: TimeZone>(variants: &[Variant], now: &DateTime<Tz>) -> VariantSummary {
    let mut summary = VariantSummary::default();
    let mut best_percent = 0i64;

    let priced = variants.iter().filter_map(|variant| {
        let resolved = resolve_variant(variant, now);
        let final_price = resolved.final_price.filter(Money::is_positive)?;
        Some((resolved, final_price))
    });

    for (resolved, final_price) in priced {
        summary.min_final = Some(summary.min_final.map_or(final_price, |m| m.min(final_price)));
        summary.max_final = Some(summary.max_final.map_or(final_price, |m| m.max(final_price)));

        if let Some(original) = resolved.original.filter(Money::is_positive) {
            summary.min_original = Some(summary.min_original.map_or(original, |m| m.min(original)));
        }

        summary.has_any_discount |= resolved.has_discount;
        best_percent = best_percent.max(resolved.percent.unwrap_or(0));
    }

    summary.max_discount_percent = (best_percent > 0).then_some(best_percent);
    summary
}

/// Whether a variant list describes a single-variant product.
///
/// True when there are no titles, or the only title is the placeholder
/// "Alap" (trimmed, case-insensitive).
pub fn is_single_by_titles<S: AsRef<str>>(titles: &[S]) -> bool {
    match titles {
        [] => true,
        [only] => only.as_ref().trim().to_lowercase() == "alap",
        _ => false,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 10, 0, 0).unwrap()
    }

    fn money(forints: i64) -> Option<Money> {
        Some(Money::from_forints(forints))
    }

    fn plain(price: i64) -> Variant {
        Variant {
            price: money(price),
            ..Default::default()
        }
    }

    #[test]
    fn test_empty_list() {
        assert_eq!(
            aggregate(&[], &now()),
            VariantSummary {
                min_original: None,
                min_final: None,
                max_final: None,
                has_any_discount: false,
                max_discount_percent: None,
            }
        );
    }

    #[test]
    fn test_fixed_price_has_priority_over_percent() {
        let variant = Variant {
            price: money(1000),
            discount_price: money(950),
            discount_percent: Some(30.0),
            discount_valid_until: Some("2025.06.30".to_string()),
            ..Default::default()
        };
        let resolved = resolve_variant(&variant, &now());
        assert_eq!(resolved.final_price, money(950));
        assert_eq!(resolved.percent, Some(5));
        assert!(resolved.has_discount);
    }

    #[test]
    fn test_percent_path_rounds_input_percent() {
        let variant = Variant {
            price: money(2000),
            discount_percent: Some(12.5),
            discount_valid_until: Some("2025.06.30".to_string()),
            ..Default::default()
        };
        let resolved = resolve_variant(&variant, &now());
        assert_eq!(resolved.final_price, money(1750));
        assert_eq!(resolved.percent, Some(13));
    }

    #[test]
    fn test_expired_variant_promotion() {
        let variant = Variant {
            price: money(1000),
            discount_price: money(800),
            discount_valid_until: Some("2025.05.31".to_string()),
            ..Default::default()
        };
        let resolved = resolve_variant(&variant, &now());
        assert_eq!(resolved.final_price, money(1000));
        assert!(!resolved.has_discount);
        assert_eq!(resolved.percent, None);
    }

    #[test]
    fn test_variant_without_price_is_dropped() {
        let unpriced = Variant {
            discount_price: money(500),
            discount_valid_until: Some("2025.06.30".to_string()),
            ..Default::default()
        };
        let summary = aggregate(&[unpriced, plain(3000)], &now());
        assert_eq!(summary.min_final, money(3000));
        assert_eq!(summary.max_final, money(3000));
        assert!(!summary.has_any_discount);
    }

    #[test]
    fn test_zero_priced_variant_keeps_its_promotional_price() {
        let variants: Vec<Variant> = serde_json::from_str(
            r#"[{"price": 0, "discountPrice": 500, "discountValidUntil": "2030-01-01"}]"#,
        )
        .unwrap();

        let resolved = resolve_variant(&variants[0], &now());
        assert_eq!(resolved.original, Some(Money::zero()));
        assert_eq!(resolved.final_price, money(500));
        assert!(resolved.has_discount);
        assert_eq!(resolved.percent, None);

        let summary = aggregate(&variants, &now());
        assert_eq!(summary.min_original, None);
        assert_eq!(summary.min_final, money(500));
        assert_eq!(summary.max_final, money(500));
        assert!(summary.has_any_discount);
        assert_eq!(summary.max_discount_percent, None);
    }

    #[test]
    fn test_summary_over_mixed_variants() {
        let variants = vec![
            plain(4990),
            Variant {
                price: money(6990),
                discount_price: money(5590),
                discount_valid_until: Some("2025. 6. 15.".to_string()),
                ..Default::default()
            },
            Variant {
                price: money(8990),
                discount_percent: Some(10.0),
                discount_valid_until: Some("2025-06-15".to_string()),
                ..Default::default()
            },
        ];
        let summary = aggregate(&variants, &now());

        assert_eq!(summary.min_original, money(4990));
        assert_eq!(summary.min_final, money(4990));
        assert_eq!(summary.max_final, money(8091));
        assert!(summary.has_any_discount);
        assert_eq!(summary.max_discount_percent, Some(20));
    }

    #[test]
    fn test_order_independent() {
        let mut variants = vec![
            plain(1200),
            Variant {
                price: money(3000),
                discount_percent: Some(50.0),
                discount_valid_until: Some("2030-01-01".to_string()),
                ..Default::default()
            },
            plain(900),
        ];
        let forward = aggregate(&variants, &now());
        variants.reverse();
        assert_eq!(aggregate(&variants, &now()), forward);
        variants.rotate_left(1);
        assert_eq!(aggregate(&variants, &now()), forward);
    }

    #[test]
    fn test_no_discount_percent_is_none_not_zero() {
        let summary = aggregate(&[plain(100), plain(200)], &now());
        assert_eq!(summary.max_discount_percent, None);
        assert_eq!(summary.min_original, money(100));
        assert_eq!(summary.max_final, money(200));
    }

    #[test]
    fn test_is_single_by_titles() {
        assert!(is_single_by_titles::<&str>(&[]));
        assert!(is_single_by_titles(&["Alap"]));
        assert!(is_single_by_titles(&["  alap "]));
        assert!(!is_single_by_titles(&["4 m"]));
        assert!(!is_single_by_titles(&["Alap", "6 m"]));
    }
}
