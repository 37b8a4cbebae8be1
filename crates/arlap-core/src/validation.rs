//! # Validation Module
//!
//! Input parsing and range checks for the calculator and comparator forms.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Form (TypeScript)                                            │
//! │  ├── <input type="number" min max>                                     │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Text → number (parse_decimal_input)                          │
//! │  ├── "12,5" → 12.5, "30 cm" → 30, "abc" → 0                            │
//! │  └── Never fails: the form always has a number to show                 │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: THIS MODULE: range rules                                     │
//! │  └── Every violated field is reported, not just the first              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use arlap_core::validation::{parse_decimal_input, validate_range};
//!
//! let length = parse_decimal_input("4,5");
//! assert_eq!(length, 4.5);
//! assert!(validate_range("length", length, 0.0, 50.0).is_ok());
//! ```

use regex::Regex;
use std::sync::LazyLock;

use crate::error::{CoreError, CoreResult, ValidationError};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Leading decimal number: optional sign, digits with an optional fraction,
/// optional exponent. Trailing text is ignored.
static LEADING_NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?").expect("valid regex")
});

// =============================================================================
// Text Input
// =============================================================================

/// Parses a number typed into a form field.
///
/// ## Rules
/// - Surrounding whitespace is ignored
/// - The first `,` is read as the decimal separator
/// - Only the leading numeric prefix counts ("30 cm" is 30)
/// - Anything else, and any non-finite result, is 0
///
/// ## Example
/// ```rust
/// use arlap_core::validation::parse_decimal_input;
///
/// assert_eq!(parse_decimal_input("1,67"), 1.67);
/// assert_eq!(parse_decimal_input(" 34990 Ft"), 34990.0);
/// assert_eq!(parse_decimal_input("kb. 30"), 0.0);
/// assert_eq!(parse_decimal_input(""), 0.0);
/// ```
pub fn parse_decimal_input(text: &str) -> f64 {
    try_parse_decimal_input(text).unwrap_or(0.0)
}

/// Like [`parse_decimal_input`], but `None` where that would fall back to 0.
pub fn try_parse_decimal_input(text: &str) -> Option<f64> {
    let normalized = text.trim().replacen(',', ".", 1);
    LEADING_NUMBER
        .find(&normalized)
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .filter(|n| n.is_finite())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Checks `min <= value <= max`. NaN is out of range.
///
/// ## Example
/// ```rust
/// use arlap_core::validation::validate_range;
///
/// assert!(validate_range("width", 150.0, 0.0, 150.0).is_ok());
/// assert!(validate_range("width", 151.0, 0.0, 150.0).is_err());
/// assert!(validate_range("width", -1.0, 0.0, 150.0).is_err());
/// ```
pub fn validate_range(field: &str, value: f64, min: f64, max: f64) -> ValidationResult<()> {
    if value >= min && value <= max {
        return Ok(());
    }
    Err(ValidationError::OutOfRange {
        field: field.to_string(),
        min,
        max,
    })
}

/// Checks that `value` is finite and not negative.
pub fn validate_non_negative(field: &str, value: f64) -> ValidationResult<()> {
    if !value.is_finite() {
        return Err(ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: "must be a finite number".to_string(),
        });
    }
    if value < 0.0 {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0.0,
            max: f64::MAX,
        });
    }
    Ok(())
}

/// Checks that `value` is finite and greater than zero.
pub fn validate_positive(field: &str, value: f64) -> ValidationResult<()> {
    if value.is_finite() && value > 0.0 {
        return Ok(());
    }
    Err(ValidationError::MustBePositive {
        field: field.to_string(),
    })
}

/// Checks a percentage in `0..=100`.
pub fn validate_percent(field: &str, value: f64) -> ValidationResult<()> {
    validate_range(field, value, 0.0, 100.0)
}

// =============================================================================
// Collecting Validators
// =============================================================================

/// Runs several checks and reports all failures at once.
///
/// ```rust
/// use arlap_core::validation::{collect_violations, validate_range};
/// use arlap_core::CoreError;
///
/// let result = collect_violations([
///     validate_range("length", 60.0, 0.0, 50.0),
///     validate_range("width", 10.0, 0.0, 150.0),
///     validate_range("quantity", 20_000.0, 0.0, 10_000.0),
/// ]);
/// match result {
///     Err(CoreError::InvalidInput { errors }) => assert_eq!(errors.len(), 2),
///     other => panic!("unexpected: {other:?}"),
/// }
/// ```
pub fn collect_violations<I>(checks: I) -> CoreResult<()>
where
    I: IntoIterator<Item = ValidationResult<()>>,
{
    let errors: Vec<ValidationError> = checks.into_iter().filter_map(Result::err).collect();
    if errors.is_empty() {
        Ok(())
    } else {
        Err(CoreError::InvalidInput { errors })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_decimal_input() {
        assert_eq!(parse_decimal_input("42"), 42.0);
        assert_eq!(parse_decimal_input("0,45"), 0.45);
        assert_eq!(parse_decimal_input("1.43"), 1.43);
        assert_eq!(parse_decimal_input("-3,5"), -3.5);
        assert_eq!(parse_decimal_input(".5"), 0.5);
        assert_eq!(parse_decimal_input("12abc"), 12.0);
        assert_eq!(parse_decimal_input("1e3"), 1000.0);
        assert_eq!(parse_decimal_input("1,5,7"), 1.5);
    }

    #[test]
    fn test_parse_decimal_input_falls_back_to_zero() {
        assert_eq!(parse_decimal_input(""), 0.0);
        assert_eq!(parse_decimal_input("   "), 0.0);
        assert_eq!(parse_decimal_input("abc"), 0.0);
        assert_eq!(parse_decimal_input("NaN"), 0.0);
        assert_eq!(parse_decimal_input("1e999"), 0.0);

        assert_eq!(try_parse_decimal_input("abc"), None);
        assert_eq!(try_parse_decimal_input("0"), Some(0.0));
        assert_eq!(try_parse_decimal_input("1,43"), Some(1.43));
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range("length", 0.0, 0.0, 50.0).is_ok());
        assert!(validate_range("length", 50.0, 0.0, 50.0).is_ok());
        assert!(validate_range("length", 50.01, 0.0, 50.0).is_err());
        assert!(validate_range("length", f64::NAN, 0.0, 50.0).is_err());
    }

    #[test]
    fn test_validate_non_negative() {
        assert!(validate_non_negative("ratio", 0.0).is_ok());
        assert!(validate_non_negative("ratio", 1.67).is_ok());
        assert!(matches!(
            validate_non_negative("ratio", -0.1),
            Err(ValidationError::OutOfRange { .. })
        ));
        assert!(matches!(
            validate_non_negative("ratio", f64::INFINITY),
            Err(ValidationError::InvalidFormat { .. })
        ));
    }

    #[test]
    fn test_validate_positive_and_percent() {
        assert!(validate_positive("limit", 1.0).is_ok());
        assert!(validate_positive("limit", 0.0).is_err());
        assert!(validate_percent("moisture", 100.0).is_ok());
        assert!(validate_percent("moisture", 101.0).is_err());
    }

    #[test]
    fn test_collect_violations_ok() {
        assert!(collect_violations([Ok(()), Ok(())]).is_ok());
        assert!(collect_violations(Vec::new()).is_ok());
    }
}
