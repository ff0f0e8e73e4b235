//! # Checked Arithmetic
//!
//! Helpers for money arithmetic on provider totals.
//!
//! Provider APIs report prices as JSON numbers, so totals travel as `f64`.
//! Every computation goes through [`ensure_finite`] first so that `NaN` or
//! infinite inputs are rejected instead of silently propagating, and results
//! are rounded with [`round2`].
//!
//! # Examples
//!
//! ```
//! use shipping_quotes::domain::value_objects::arithmetic::{round2, ensure_finite};
//!
//! assert_eq!(round2(1.125), 1.13);
//! assert!(ensure_finite(f64::NAN, "amount").is_err());
//! ```

use thiserror::Error;

/// Error type for arithmetic operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum ArithmeticError {
    /// Input was not a finite number.
    #[error("{0} must be a finite number")]
    NotFinite(&'static str),
}

/// Result type for arithmetic operations.
pub type ArithmeticResult<T> = Result<T, ArithmeticError>;

/// Rounds to two decimal places, half up on the scaled value.
///
/// Computes `floor(x * 100 + 0.5) / 100`, so `-1.125` becomes `-1.12`.
#[inline]
#[must_use]
pub fn round2(value: f64) -> f64 {
    (value * 100.0 + 0.5).floor() / 100.0
}

/// Returns the value if it is finite.
///
/// # Errors
///
/// Returns `ArithmeticError::NotFinite` naming `field` for `NaN` or infinity.
#[inline]
pub fn ensure_finite(value: f64, field: &'static str) -> ArithmeticResult<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ArithmeticError::NotFinite(field))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn round2_keeps_two_decimals() {
        assert_eq!(round2(165.550_000_000_000_01), 165.55);
        assert_eq!(round2(99.999), 100.0);
        assert_eq!(round2(12.344), 12.34);
        assert_eq!(round2(0.0), 0.0);
    }

    #[test]
    fn round2_rounds_half_up() {
        assert_eq!(round2(1.125), 1.13);
        assert_eq!(round2(-1.125), -1.12);
    }

    #[test]
    fn ensure_finite_rejects_nan_and_infinity() {
        assert_eq!(
            ensure_finite(f64::NAN, "amount"),
            Err(ArithmeticError::NotFinite("amount"))
        );
        assert!(ensure_finite(f64::INFINITY, "amount").is_err());
        assert_eq!(ensure_finite(4.2, "amount").unwrap(), 4.2);
    }

    #[test]
    fn error_names_field() {
        let err = ArithmeticError::NotFinite("margin value");
        assert_eq!(err.to_string(), "margin value must be a finite number");
    }
}
