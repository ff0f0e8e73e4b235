//! # Shipment Request
//!
//! The canonical quote request every provider adapter translates from.
//!
//! # Examples
//!
//! ```
//! use shipping_quotes::domain::value_objects::shipment::QuoteRequest;
//!
//! let request = QuoteRequest::new("72000", "94298", 5.0, 30.0, 20.0, 10.0);
//! assert!(request.validate().is_ok());
//! ```

use crate::domain::errors::{DomainError, DomainResult};
use serde::{Deserialize, Serialize};

/// Canonical quote request.
///
/// Weight is in kilograms and dimensions in centimeters; adapters convert to
/// whatever their provider expects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRequest {
    /// Five-digit origin postal code.
    pub origin_postal_code: String,
    /// Five-digit destination postal code.
    pub destination_postal_code: String,
    /// Weight in kilograms.
    pub weight: f64,
    /// Length in centimeters.
    pub length: f64,
    /// Height in centimeters.
    pub height: f64,
    /// Width in centimeters.
    pub width: f64,
}

impl QuoteRequest {
    /// Creates a new request.
    #[must_use]
    pub fn new(
        origin_postal_code: impl Into<String>,
        destination_postal_code: impl Into<String>,
        weight: f64,
        length: f64,
        height: f64,
        width: f64,
    ) -> Self {
        Self {
            origin_postal_code: origin_postal_code.into(),
            destination_postal_code: destination_postal_code.into(),
            weight,
            length,
            height,
            width,
        }
    }

    /// Checks postal codes and parcel measures.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidPostalCode` if a postal code is not five
    /// digits, or `DomainError::InvalidMeasure` if a measure is negative or
    /// not finite.
    pub fn validate(&self) -> DomainResult<()> {
        validate_postal_code("originPostalCode", &self.origin_postal_code)?;
        validate_postal_code("destinationPostalCode", &self.destination_postal_code)?;
        validate_measure("weight", self.weight)?;
        validate_measure("length", self.length)?;
        validate_measure("height", self.height)?;
        validate_measure("width", self.width)?;
        Ok(())
    }
}

/// Checks that `value` is exactly five ASCII digits.
///
/// # Errors
///
/// Returns `DomainError::InvalidPostalCode` otherwise.
pub fn validate_postal_code(field: &'static str, value: &str) -> DomainResult<()> {
    if value.len() == 5 && value.bytes().all(|b| b.is_ascii_digit()) {
        Ok(())
    } else {
        Err(DomainError::InvalidPostalCode {
            field,
            value: value.to_string(),
        })
    }
}

/// Checks that a parcel measure is finite and non-negative.
///
/// # Errors
///
/// Returns `DomainError::InvalidMeasure` otherwise.
pub fn validate_measure(field: &'static str, value: f64) -> DomainResult<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(DomainError::InvalidMeasure { field, value })
    }
}
