//! # Quote Entity
//!
//! The normalized representation of a shipping quote from any provider.
//!
//! This module provides the [`CanonicalQuote`] entity produced by provider
//! adapters, and [`MarginAdjustment`], the provenance record attached when a
//! profit margin is applied.
//!
//! # Examples
//!
//! ```
//! use shipping_quotes::domain::entities::quote::CanonicalQuote;
//! use shipping_quotes::domain::value_objects::{CourierName, ProviderName, ServiceType};
//!
//! let quote = CanonicalQuote::new(17, "Estafeta Terrestre", 150.5, ProviderName::Ge)
//!     .with_courier(Some(CourierName::Estafeta))
//!     .with_service_type(Some(ServiceType::Standard));
//!
//! assert_eq!(quote.total(), 150.5);
//! assert!(quote.adjustment().is_none());
//! ```

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::value_objects::{
    AdjustmentSource, CourierName, MarginType, ProviderName, ProviderQuoteId, ServiceType,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Provenance of an applied profit margin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarginAdjustment {
    /// Total before the margin.
    pub base_total: f64,
    /// Absolute amount added to the total.
    pub adjustment_amount: f64,
    /// Configured margin value before computation.
    pub adjustment_basis: f64,
    /// How the margin was computed.
    pub adjustment_mode: MarginType,
    /// Which configuration level supplied the margin.
    pub adjustment_source: AdjustmentSource,
}

/// A shipping quote normalized from a provider response.
///
/// # Lifecycle
///
/// Created by a provider adapter, adjusted exactly once by the margin engine,
/// then read-only until the response is returned. Quotes are never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalQuote {
    /// Provider-scoped identifier.
    id: ProviderQuoteId,
    /// Service name as given by the provider.
    service: String,
    /// Price in the provider's currency unit.
    total: f64,
    /// Delivery speed, if the service name could be classified.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    type_service: Option<ServiceType>,
    /// Courier brand, if recognized.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    courier: Option<CourierName>,
    /// Provider that produced this quote.
    source: ProviderName,
    /// Margin provenance, once applied.
    #[serde(flatten, default, skip_serializing_if = "Option::is_none")]
    adjustment: Option<MarginAdjustment>,
}

impl CanonicalQuote {
    /// Creates an unclassified, unadjusted quote.
    #[must_use]
    pub fn new(
        id: impl Into<ProviderQuoteId>,
        service: impl Into<String>,
        total: f64,
        source: ProviderName,
    ) -> Self {
        Self {
            id: id.into(),
            service: service.into(),
            total,
            type_service: None,
            courier: None,
            source,
            adjustment: None,
        }
    }

    /// Sets the service type.
    #[must_use]
    pub fn with_service_type(mut self, type_service: Option<ServiceType>) -> Self {
        self.type_service = type_service;
        self
    }

    /// Sets the courier.
    #[must_use]
    pub fn with_courier(mut self, courier: Option<CourierName>) -> Self {
        self.courier = courier;
        self
    }

    /// Returns the provider-scoped identifier.
    #[inline]
    #[must_use]
    pub fn id(&self) -> &ProviderQuoteId {
        &self.id
    }

    /// Returns the service name.
    #[inline]
    #[must_use]
    pub fn service(&self) -> &str {
        &self.service
    }

    /// Returns the current total.
    #[inline]
    #[must_use]
    pub fn total(&self) -> f64 {
        self.total
    }

    /// Returns the service type.
    #[inline]
    #[must_use]
    pub fn type_service(&self) -> Option<ServiceType> {
        self.type_service
    }

    /// Returns the courier.
    #[inline]
    #[must_use]
    pub fn courier(&self) -> Option<CourierName> {
        self.courier
    }

    /// Returns the provider that produced this quote.
    #[inline]
    #[must_use]
    pub fn source(&self) -> ProviderName {
        self.source
    }

    /// Returns the margin provenance, if a margin was applied.
    #[inline]
    #[must_use]
    pub fn adjustment(&self) -> Option<&MarginAdjustment> {
        self.adjustment.as_ref()
    }

    /// Returns true once a margin has been applied.
    #[inline]
    #[must_use]
    pub fn is_adjusted(&self) -> bool {
        self.adjustment.is_some()
    }

    /// Replaces the total with `new_total` and records the provenance.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::MarginAlreadyApplied` if the quote has already
    /// been adjusted.
    pub fn apply_adjustment(
        &mut self,
        new_total: f64,
        basis: f64,
        mode: MarginType,
        source: AdjustmentSource,
    ) -> DomainResult<()> {
        if self.adjustment.is_some() {
            return Err(DomainError::MarginAlreadyApplied(self.id.to_string()));
        }

        self.adjustment = Some(MarginAdjustment {
            base_total: self.total,
            adjustment_amount: crate::domain::value_objects::round2(new_total - self.total),
            adjustment_basis: basis,
            adjustment_mode: mode,
            adjustment_source: source,
        });
        self.total = new_total;
        Ok(())
    }
}

impl fmt::Display for CanonicalQuote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Quote({} {} '{}' total={:.2})",
            self.source, self.id, self.service, self.total
        )
    }
}
