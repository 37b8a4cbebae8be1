//! # Catalog Operations
//!
//! Listing-level helpers built on the per-product pricing functions:
//! product cards, the "akciós termékek" page, price filters and sorting.
//!
//! ## Listing Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Category[] ──► discounted_products ──► "Akciók" page                  │
//! │                                                                         │
//! │  PricedProduct[] ──► dominant_unit ──► unit used for the whole listing  │
//! │        │                                    │                           │
//! │        ├──► filter_by_price_range(unit, min, max)                       │
//! │        └──► sort_by_unit_price(unit, asc | desc)                        │
//! │                                                                         │
//! │  PricedProduct ──► card_discount + unit_price_lines ──► product card    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Listings borrow the catalog; nothing is cloned or written back.

use chrono::{DateTime, TimeZone};
use icu_collator::{Collator, CollatorOptions, Strength};
use icu_locid::locale;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use tracing::{debug, warn};
use ts_rs::TS;

use crate::discount::{is_valid_fixed_price, is_valid_percent, resolve, DiscountResult};
use crate::money::Money;
use crate::types::{Category, PricedProduct, SellingUnit};
use crate::unit_price::effective_unit_price;

pub use crate::unit_price::dominant_unit;

// =============================================================================
// Product Cards
// =============================================================================

/// Whether `product` should appear among discounted products.
///
/// The deadline must be active and either the percent is valid or the fixed
/// price is below the piece price.
pub fn is_discounted_product<Tz: TimeZone>(product: &PricedProduct, now: &DateTime<Tz>) -> bool {
    let terms = product.discount_terms();
    if !terms.is_active(now) {
        return false;
    }
    is_valid_percent(terms.percent)
        || product
            .unit_price(SellingUnit::Piece)
            .is_some_and(|base| is_valid_fixed_price(terms.fixed_price, base))
}

/// The piece-price discount shown on a product card.
pub fn card_discount<Tz: TimeZone>(product: &PricedProduct, now: &DateTime<Tz>) -> DiscountResult {
    resolve(
        product.unit_price(SellingUnit::Piece),
        &product.discount_terms(),
        now,
    )
}

/// One "price per unit" row of a product card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct UnitPriceLine {
    pub unit: SellingUnit,
    #[ts(type = "number")]
    pub original: Money,
    #[ts(type = "number")]
    pub effective: Money,
}

impl UnitPriceLine {
    pub fn is_discounted(&self) -> bool {
        self.effective < self.original
    }
}

/// Every unit `product` is sold in, in [`SellingUnit::PRIORITY`] order.
pub fn unit_price_lines<Tz: TimeZone>(product: &PricedProduct, now: &DateTime<Tz>) -> Vec<UnitPriceLine> {
    SellingUnit::PRIORITY
        .into_iter()
        .filter_map(|unit| {
            let original = product.unit_price(unit)?;
            let effective = effective_unit_price(product, unit, now)?;
            Some(UnitPriceLine {
                unit,
                original,
                effective,
            })
        })
        .collect()
}

// =============================================================================
// Discounted Listing
// =============================================================================

/// A product on the discounted products page.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscountedListing<'a> {
    #[serde(flatten)]
    pub product: &'a PricedProduct,
    pub category_slug: &'a str,
    pub final_discount_price: Money,
    pub final_discount_percent: i64,
}

/// Products with an active piece-price discount, across all categories.
///
/// Products without a piece price are left out even when their percent is
/// valid: the page shows a crossed-out piece price.
pub fn discounted_products<'a, Tz: TimeZone>(
    categories: &'a [Category],
    now: &DateTime<Tz>,
) -> Vec<DiscountedListing<'a>> {
    let listings: Vec<DiscountedListing<'a>> = categories
        .iter()
        .flat_map(|category| {
            category.products.iter().filter_map(move |product| {
                let result = card_discount(product, now);
                if !result.has_discount {
                    return None;
                }
                Some(DiscountedListing {
                    product,
                    category_slug: &category.slug,
                    final_discount_price: result.final_price?,
                    final_discount_percent: result.percent?,
                })
            })
        })
        .collect();

    debug!(
        categories = categories.len(),
        discounted = listings.len(),
        "Collected discounted products"
    );
    listings
}

// =============================================================================
// Filtering & Sorting
// =============================================================================

/// Keeps products whose effective price per `unit` lies in `[min, max]`.
///
/// With no bounds every product is kept. With any bound, products not sold
/// per `unit` are dropped.
pub fn filter_by_price_range<'a, Tz: TimeZone>(
    products: &'a [PricedProduct],
    unit: SellingUnit,
    min: Option<Money>,
    max: Option<Money>,
    now: &DateTime<Tz>,
) -> Vec<&'a PricedProduct> {
    if min.is_none() && max.is_none() {
        return products.iter().collect();
    }
    products
        .iter()
        .filter(|product| {
            effective_unit_price(product, unit, now).is_some_and(|price| {
                min.map_or(true, |lo| price >= lo) && max.map_or(true, |hi| price <= hi)
            })
        })
        .collect()
}

/// Sort order for price sorting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum SortDirection {
    #[default]
    #[serde(rename = "asc")]
    Ascending,
    #[serde(rename = "desc")]
    Descending,
}

/// Hungarian collator for product names, so "Ácsléc" sorts before "Bükk"
/// and case does not split the list in two.
fn hungarian_collator() -> Option<Collator> {
    let mut options = CollatorOptions::new();
    options.strength = Some(Strength::Tertiary);
    match Collator::try_new(&locale!("hu").into(), options) {
        Ok(collator) => Some(collator),
        Err(error) => {
            warn!(?error, "Hungarian collation unavailable, ordering names by code point");
            None
        }
    }
}

/// Sorts products by effective price per `unit`.
///
/// Products not sold per `unit` go last in either direction, ordered by name
/// among themselves in Hungarian alphabetical order. Equal prices keep their
/// catalog order.
///
/// ## Example
/// ```rust
/// use arlap_core::catalog::{sort_by_unit_price, SortDirection};
/// use arlap_core::money::Money;
/// use arlap_core::types::{PricedProduct, SellingUnit};
/// use chrono::{TimeZone, Utc};
///
/// let now = Utc.with_ymd_and_hms(2025, 6, 1, 10, 0, 0).unwrap();
/// let priced = |name: &str, m3: Option<i64>| PricedProduct {
///     name: name.into(),
///     m3_price: m3.map(Money::from_forints),
///     ..Default::default()
/// };
/// let products = vec![
///     priced("Tölgy", Some(320_000)),
///     priced("Akác", None),
///     priced("Lucfenyő", Some(150_000)),
/// ];
///
/// let sorted = sort_by_unit_price(&products, SellingUnit::CubicMeter, SortDirection::Descending, &now);
/// let names: Vec<&str> = sorted.iter().map(|p| p.name.as_str()).collect();
/// assert_eq!(names, ["Tölgy", "Lucfenyő", "Akác"]);
/// ```
pub fn sort_by_unit_price<'a, Tz: TimeZone>(
    products: &'a [PricedProduct],
    unit: SellingUnit,
    direction: SortDirection,
    now: &DateTime<Tz>,
) -> Vec<&'a PricedProduct> {
    let mut keyed: Vec<(Option<Money>, &'a PricedProduct)> = products
        .iter()
        .map(|product| (effective_unit_price(product, unit, now), product))
        .collect();

    let collator = hungarian_collator();
    let by_name = |a: &str, b: &str| match &collator {
        Some(collator) => collator.compare(a, b),
        None => a.cmp(b),
    };

    keyed.sort_by(|(price_a, a), (price_b, b)| match (price_a, price_b) {
        (Some(x), Some(y)) => match direction {
            SortDirection::Ascending => x.cmp(y),
            SortDirection::Descending => y.cmp(x),
        },
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => by_name(a.name.as_str(), b.name.as_str()),
    });

    keyed.into_iter().map(|(_, product)| product).collect()
}

// =============================================================================
// Unit Tests
// =============================================================================
