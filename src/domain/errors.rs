//! # Domain Errors
//!
//! Errors raised when domain invariants are violated.

use crate::domain::value_objects::arithmetic::ArithmeticError;
use crate::domain::value_objects::enums::ParseEnumError;
use thiserror::Error;

/// Error type for domain validation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DomainError {
    /// Postal code is not exactly five ASCII digits.
    #[error("invalid postal code for {field}: '{value}'")]
    InvalidPostalCode {
        /// Request field name.
        field: &'static str,
        /// Rejected value.
        value: String,
    },

    /// Parcel measure is negative or not finite.
    #[error("invalid parcel measure {field}: {value}")]
    InvalidMeasure {
        /// Request field name.
        field: &'static str,
        /// Rejected value.
        value: f64,
    },

    /// A required text field is empty.
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// A quote's total was already margin-adjusted.
    #[error("margin already applied to quote {0}")]
    MarginAlreadyApplied(String),

    /// An enum value could not be parsed.
    #[error(transparent)]
    InvalidEnum(#[from] ParseEnumError),

    /// Arithmetic on a monetary value failed.
    #[error(transparent)]
    Arithmetic(#[from] ArithmeticError),
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn postal_code_error_names_field() {
        let err = DomainError::InvalidPostalCode {
            field: "originPostalCode",
            value: "7200".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "invalid postal code for originPostalCode: '7200'"
        );
    }

    #[test]
    fn parse_error_is_transparent() {
        let err: DomainError = ParseEnumError::InvalidValue("CourierName", "X".to_string()).into();
        assert_eq!(err.to_string(), "invalid CourierName value: 'X'");
    }
}
