//! # Error Types
//!
//! Domain-specific error types for arlap-core.
//!
//! ## Where Errors Exist (and Where They Don't)
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Surfaces                                  │
//! │                                                                         │
//! │  Pricing contract (discount, unit_price, variant, firewood)            │
//! │  └── TOTAL: never errors. Bad input resolves to None / "no discount"   │
//! │                                                                         │
//! │  Input edges (this file)                                               │
//! │  ├── CoreError        - unknown unit tags, rejected calculator input   │
//! │  └── ValidationError  - a single field failing its rule                │
//! │                                                                         │
//! │  arlap-config errors (separate crate)                                  │
//! │  └── ConfigError      - file, parse and validation failures            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Errors raised at the input edges of the core.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A unit tag did not match any known selling or firewood unit.
    ///
    /// ## When This Occurs
    /// - Parsing `"db"`, `"m2"`, `"szort_m3"`... with a typo
    /// - A stale front end sending a unit that was since removed
    #[error("Unknown unit: '{tag}'")]
    UnknownUnit { tag: String },

    /// One or more calculator inputs were rejected.
    ///
    /// Every violated field is listed so the form can flag all of them at once.
    #[error("{} invalid input field(s)", errors.len())]
    InvalidInput { errors: Vec<ValidationError> },
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: f64, max: f64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., a number that is not finite).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

impl ValidationError {
    /// Returns the name of the offending field.
    pub fn field(&self) -> &str {
        match self {
            ValidationError::OutOfRange { field, .. }
            | ValidationError::MustBePositive { field }
            | ValidationError::InvalidFormat { field, .. } => field,
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
