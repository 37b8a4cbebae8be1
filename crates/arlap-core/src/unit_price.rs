//! # Unit Price Projection
//!
//! Effective price of a product in one selling unit, and the dominant unit
//! of a product set.
//!
//! ## Which Discount Applies to Which Unit
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  unit     base field     percent discount     fixed discountPrice       │
//! │  ───────  ─────────────  ───────────────────  ─────────────────────     │
//! │  db       price          ✅                   ✅ (lower of both wins)   │
//! │  m        mPrice         ✅                   ❌                        │
//! │  m2       m2Price        ✅                   ❌                        │
//! │  m3       m3Price        ✅                   ❌                        │
//! │  pal      palletPrice    ✅                   ❌                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `discountPrice` is a per-piece figure and is never compared with the
//! other unit prices.

use chrono::{DateTime, TimeZone};

use crate::discount::resolve;
use crate::money::Money;
use crate::types::{PricedProduct, SellingUnit};

/// Effective price of `product` per `unit` at `now`.
///
/// Returns `None` when the product is not sold in that unit; the caller
/// omits the price line rather than showing zero.
///
/// ## Example
/// ```rust
/// use arlap_core::money::Money;
/// use arlap_core::types::{PricedProduct, SellingUnit};
/// use arlap_core::unit_price::effective_unit_price;
/// use chrono::{TimeZone, Utc};
///
/// let now = Utc.with_ymd_and_hms(2025, 6, 1, 10, 0, 0).unwrap();
/// let plank = PricedProduct {
///     price: Some(Money::from_forints(1000)),
///     m3_price: Some(Money::from_forints(200_000)),
///     discount_price: Some(850.0),
///     discount_percent: Some(10.0),
///     discount_valid_until: Some("2025.06.30".into()),
///     ..Default::default()
/// };
///
/// assert_eq!(effective_unit_price(&plank, SellingUnit::Piece, &now), Some(Money::from_forints(850)));
/// assert_eq!(effective_unit_price(&plank, SellingUnit::CubicMeter, &now), Some(Money::from_forints(180_000)));
/// assert_eq!(effective_unit_price(&plank, SellingUnit::Pallet, &now), None);
/// ```
pub fn effective_unit_price<Tz: TimeZone>(
    product: &PricedProduct,
    unit: SellingUnit,
    now: &DateTime<Tz>,
) -> Option<Money> {
    let base = product.unit_price(unit)?;
    let terms = match unit {
        SellingUnit::Piece => product.discount_terms(),
        _ => product.discount_terms().percent_only(),
    };
    resolve(Some(base), &terms, now).final_price
}

/// The first unit, in [`SellingUnit::PRIORITY`] order, in which `product`
/// has a price.
pub fn primary_unit<Tz: TimeZone>(product: &PricedProduct, now: &DateTime<Tz>) -> Option<SellingUnit> {
    SellingUnit::PRIORITY
        .into_iter()
        .find(|&unit| effective_unit_price(product, unit, now).is_some())
}

/// The unit most products in the set are priced in.
///
/// Each product votes for its [`primary_unit`]. The unit with the most votes
/// wins; ties go to the earlier unit in [`SellingUnit::PRIORITY`]. Returns
/// `None` when no product has any price.
///
/// Sorting a mixed set "by price" compares everything in this one unit.
pub fn dominant_unit<'a, Tz, I>(products: I, now: &DateTime<Tz>) -> Option<SellingUnit>
where
    Tz: TimeZone,
    I: IntoIterator<Item = &'a PricedProduct>,
{
    let mut votes = [0usize; SellingUnit::PRIORITY.len()];
    for product in products {
        if let Some(unit) = primary_unit(product, now) {
            if let Some(slot) = SellingUnit::PRIORITY.iter().position(|&u| u == unit) {
                votes[slot] += 1;
            }
        }
    }

    let mut best: Option<(SellingUnit, usize)> = None;
    for (unit, count) in SellingUnit::PRIORITY.into_iter().zip(votes) {
        if count > best.map_or(0, |(_, c)| c) {
            best = Some((unit, count));
        }
    }
    best.map(|(unit, _)| unit)
}

// =============================================================================
// Unit Tests
// =============================================================================
