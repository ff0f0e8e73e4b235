//! # Guide Entities
//!
//! Canonical guide (shipping label) request and result.
//!
//! A guide is created against a single provider using a quote previously
//! returned by that provider. Adapters translate [`GuideRequest`] into their
//! wire format and normalize the response into [`GuideResult`].

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::value_objects::shipment::{validate_measure, validate_postal_code};
use crate::domain::value_objects::{ProviderName, ProviderQuoteId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Postal address of a sender or recipient.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    /// Contact name.
    pub name: String,
    /// Company name.
    #[serde(default)]
    pub company: Option<String>,
    /// Street name.
    pub street: String,
    /// Exterior number.
    pub number: String,
    /// Neighborhood / district.
    pub district: String,
    /// City.
    pub city: String,
    /// State.
    pub state: String,
    /// Five-digit postal code.
    pub postal_code: String,
    /// Contact phone.
    pub phone: String,
    /// Contact email.
    pub email: String,
    /// Delivery reference notes.
    #[serde(default)]
    pub reference: Option<String>,
}

impl Address {
    fn validate(&self, postal_field: &'static str) -> DomainResult<()> {
        if self.name.trim().is_empty() {
            return Err(DomainError::MissingField("name"));
        }
        if self.street.trim().is_empty() {
            return Err(DomainError::MissingField("street"));
        }
        validate_postal_code(postal_field, &self.postal_code)
    }
}

/// Parcel measures for a guide.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Parcel {
    /// Weight in kilograms.
    pub weight: f64,
    /// Length in centimeters.
    pub length: f64,
    /// Height in centimeters.
    pub height: f64,
    /// Width in centimeters.
    pub width: f64,
}

/// Canonical guide-creation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuideRequest {
    /// Provider to create the guide with.
    pub provider: ProviderName,
    /// Identifier of the chosen quote, as returned by that provider.
    pub quote_id: ProviderQuoteId,
    /// Service name of the chosen quote.
    #[serde(default)]
    pub service: Option<String>,
    /// Sender.
    pub origin: Address,
    /// Recipient.
    pub destination: Address,
    /// Parcel measures.
    pub parcel: Parcel,
    /// Description of the content.
    pub content: String,
    /// Declared value of the content.
    #[serde(default)]
    pub declared_value: Option<f64>,
}

impl GuideRequest {
    /// Checks addresses and parcel measures.
    ///
    /// # Errors
    ///
    /// Returns a `DomainError` naming the first invalid field.
    pub fn validate(&self) -> DomainResult<()> {
        self.origin.validate("origin.postalCode")?;
        self.destination.validate("destination.postalCode")?;
        validate_measure("parcel.weight", self.parcel.weight)?;
        validate_measure("parcel.length", self.parcel.length)?;
        validate_measure("parcel.height", self.parcel.height)?;
        validate_measure("parcel.width", self.parcel.width)?;
        if self.content.trim().is_empty() {
            return Err(DomainError::MissingField("content"));
        }
        Ok(())
    }
}

/// Canonical guide-creation result.
///
/// `price` is always a string. When a provider exposes a single URL, both
/// `guide_link` and `label_url` carry it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuideResult {
    /// Carrier tracking number.
    pub tracking_number: String,
    /// Carrier that will move the parcel.
    pub carrier: String,
    /// Price charged by the provider.
    pub price: String,
    /// Web-viewable guide link.
    pub guide_link: Option<String>,
    /// Downloadable label URL.
    pub label_url: Option<String>,
    /// Inline label content (base64), if the provider returns it.
    pub file: Option<String>,
}

impl fmt::Display for GuideResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Guide({} via {})", self.tracking_number, self.carrier)
    }
}
