//! # arlap-core: Pure Pricing Logic for Árlap
//!
//! This crate resolves catalog prices and promotions for a timber and
//! building material webshop, and compares firewood offers quoted in
//! different units. Everything here is a pure function with zero I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Árlap Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Storefront (catalog JSON, forms)                │   │
//! │  │   Product cards ──► Listings ──► Akciók ──► Calculators        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ PricedProduct, Offer, now              │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ arlap-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │ deadline  │◄─│ discount  │◄─│unit_price │◄─│  catalog  │  │   │
//! │  │   │ isFuture  │  │  resolve  │  │ dominant  │  │ sort/filt │  │   │
//! │  │   └───────────┘  └─────▲─────┘  └───────────┘  └───────────┘  │   │
//! │  │                        │                                        │   │
//! │  │   ┌───────────┐  ┌─────┴─────┐  ┌───────────┐                  │   │
//! │  │   │ firewood  │  │  variant  │  │calculator │                  │   │
//! │  │   │  compare  │  │ aggregate │  │ m³ / m²   │                  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘                  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO CLOCK • NO CACHE • PURE FUNCTIONS                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                arlap-config (TOML + environment)                │   │
//! │  │        conversion ratios, density, limits, time zone            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Catalog types (PricedProduct, Variant, Category, SellingUnit)
//! - [`money`] - Money type in whole forints
//! - [`deadline`] - Free-text promotion deadlines
//! - [`discount`] - Discount resolution for one base price
//! - [`unit_price`] - Effective price per selling unit, dominant unit
//! - [`variant`] - Price range across variants
//! - [`catalog`] - Cards, discounted listing, filtering and sorting
//! - [`firewood`] - Firewood unit conversion and offer comparison
//! - [`calculator`] - Lumber volume and area calculators
//! - [`validation`] - Form input parsing and range checks
//! - [`error`] - Domain error types
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: `now` is always a parameter, never read from the clock
//! 2. **No I/O**: Configuration and logging setup live in `arlap-config`
//! 3. **Total Pricing**: Pricing functions never fail; bad data means "no discount" or `None`
//! 4. **Explicit Errors**: Input edges return typed errors, never strings or panics
//!
//! ## Example Usage
//!
//! ```rust
//! use arlap_core::types::{PricedProduct, SellingUnit};
//! use arlap_core::unit_price::effective_unit_price;
//! use arlap_core::Money;
//! use chrono::{TimeZone, Utc};
//!
//! let now = Utc.with_ymd_and_hms(2025, 6, 1, 10, 0, 0).unwrap();
//! let product: PricedProduct = serde_json::from_str(r#"{
//!     "name": "Fenyő léc",
//!     "price": 1000,
//!     "discountPercent": 20,
//!     "discountValidUntil": "2025. 06. 02."
//! }"#).unwrap();
//!
//! let price = effective_unit_price(&product, SellingUnit::Piece, &now);
//! assert_eq!(price, Some(Money::from_forints(800)));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod calculator;
pub mod catalog;
pub mod deadline;
pub mod discount;
pub mod error;
pub mod firewood;
pub mod money;
pub mod types;
pub mod unit_price;
pub mod validation;
pub mod variant;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use discount::{DiscountResult, DiscountTerms};
pub use error::{CoreError, CoreResult, ValidationError};
pub use firewood::{Cheaper, Comparison, ConversionRatios, FirewoodUnit, Offer};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Longest piece the calculators accept, in meters.
pub const DEFAULT_MAX_LENGTH_M: f64 = 50.0;

/// Widest or thickest cross-section the calculators accept, in centimeters.
pub const DEFAULT_MAX_SECTION_CM: f64 = 150.0;

/// Largest quantity the calculators accept.
///
/// Catches a mistyped extra zero before it turns into a truckload estimate.
pub const DEFAULT_MAX_QUANTITY: f64 = 10_000.0;

/// Dry wood density used by the firewood comparator, kg/m³.
pub const DEFAULT_DRY_DENSITY: f64 = 550.0;

/// Moisture content assumed by the firewood comparator, percent.
pub const DEFAULT_MOISTURE_PERCENT: f64 = 20.0;
