//! # Margin Configuration
//!
//! Tenant-wide pricing configuration and its per-request lookup table.
//!
//! [`GlobalMarginConfig`] is the persisted document: a global fallback margin
//! plus per-courier overrides scoped by provider. The margin engine never
//! scans that document directly; it works on a [`MarginTable`], an explicit
//! `provider -> courier -> margin` mapping built once per request.
//!
//! # Examples
//!
//! ```
//! use shipping_quotes::domain::entities::margin_config::{
//!     GlobalMarginConfig, MarginLookup, MarginTable, ProfitMargin,
//! };
//! use shipping_quotes::domain::value_objects::{CourierName, ProviderName};
//!
//! let mut config = GlobalMarginConfig::new(ProfitMargin::percentage(10.0));
//! config.upsert_courier_margin(
//!     ProviderName::Ge,
//!     CourierName::Dhl,
//!     ProfitMargin::percentage(15.0),
//! );
//!
//! let table = MarginTable::from_config(&config);
//! assert_eq!(
//!     table.lookup(ProviderName::Ge, Some(CourierName::Dhl)),
//!     MarginLookup::Custom(ProfitMargin::percentage(15.0))
//! );
//! ```

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::value_objects::arithmetic::ensure_finite;
use crate::domain::value_objects::{CourierName, MarginType, ProviderName};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// A margin value and how to apply it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProfitMargin {
    /// Configured value: a percentage or an absolute amount.
    pub value: f64,
    /// How `value` is applied.
    #[serde(rename = "type")]
    pub margin_type: MarginType,
}

impl ProfitMargin {
    /// Creates a margin.
    #[must_use]
    pub const fn new(value: f64, margin_type: MarginType) -> Self {
        Self { value, margin_type }
    }

    /// Creates a percentage margin.
    #[must_use]
    pub const fn percentage(value: f64) -> Self {
        Self::new(value, MarginType::Percentage)
    }

    /// Creates an absolute margin.
    #[must_use]
    pub const fn absolute(value: f64) -> Self {
        Self::new(value, MarginType::Absolute)
    }

    /// Returns true if the value is a usable number.
    #[inline]
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.value.is_finite()
    }
}

impl fmt::Display for ProfitMargin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.margin_type {
            MarginType::Percentage => write!(f, "{}%", self.value),
            MarginType::Absolute => write!(f, "+{}", self.value),
        }
    }
}

/// Margin override for one courier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourierMargin {
    /// Courier the override applies to.
    pub name: CourierName,
    /// The override.
    pub profit_margin: ProfitMargin,
}

/// Courier overrides for one provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderMargins {
    /// Provider the overrides are scoped to.
    pub name: ProviderName,
    /// Courier overrides.
    #[serde(default)]
    pub couriers: Vec<CourierMargin>,
}

/// Persisted tenant-wide margin configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalMarginConfig {
    /// Fallback margin when no courier override exists.
    pub global_margin_profit: ProfitMargin,
    /// Per-provider courier overrides.
    #[serde(default)]
    pub providers: Vec<ProviderMargins>,
}

impl GlobalMarginConfig {
    /// Creates a configuration with no overrides.
    #[must_use]
    pub fn new(global_margin_profit: ProfitMargin) -> Self {
        Self {
            global_margin_profit,
            providers: Vec::new(),
        }
    }

    /// Checks every margin value and courier scoping.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Arithmetic` for a non-finite value, or
    /// `DomainError::InvalidEnum` for a courier its provider does not serve.
    pub fn validate(&self) -> DomainResult<()> {
        ensure_finite(self.global_margin_profit.value, "global margin value")?;
        for provider in &self.providers {
            for courier in &provider.couriers {
                ensure_finite(courier.profit_margin.value, "courier margin value")?;
                if !provider.name.supports(courier.name) {
                    return Err(DomainError::InvalidEnum(
                        crate::domain::value_objects::ParseEnumError::InvalidValue(
                            "CourierName",
                            format!("{} (not served by {})", courier.name, provider.name),
                        ),
                    ));
                }
            }
        }
        Ok(())
    }

    /// Replaces the global margin.
    pub fn set_global_margin(&mut self, margin: ProfitMargin) {
        self.global_margin_profit = margin;
    }

    /// Inserts or replaces a courier override.
    pub fn upsert_courier_margin(
        &mut self,
        provider: ProviderName,
        courier: CourierName,
        margin: ProfitMargin,
    ) {
        if !self.providers.iter().any(|p| p.name == provider) {
            self.providers.push(ProviderMargins {
                name: provider,
                couriers: Vec::new(),
            });
        }
        let Some(entry) = self.providers.iter_mut().find(|p| p.name == provider) else {
            return;
        };

        match entry.couriers.iter_mut().find(|c| c.name == courier) {
            Some(existing) => existing.profit_margin = margin,
            None => entry.couriers.push(CourierMargin {
                name: courier,
                profit_margin: margin,
            }),
        }
    }

    /// Removes a courier override. Returns true if one existed.
    pub fn remove_courier_margin(&mut self, provider: ProviderName, courier: CourierName) -> bool {
        let Some(entry) = self.providers.iter_mut().find(|p| p.name == provider) else {
            return false;
        };
        let before = entry.couriers.len();
        entry.couriers.retain(|c| c.name != courier);
        before != entry.couriers.len()
    }
}

/// Outcome of a margin lookup for one quote.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MarginLookup {
    /// A courier override exists.
    Custom(ProfitMargin),
    /// The provider has overrides, but none for this courier.
    MissingCourier,
    /// The provider has no overrides at all.
    MissingProvider,
}

/// Two-level margin lookup table built from a [`GlobalMarginConfig`].
#[derive(Debug, Clone, PartialEq)]
pub struct MarginTable {
    global: ProfitMargin,
    overrides: HashMap<ProviderName, HashMap<CourierName, ProfitMargin>>,
}

impl MarginTable {
    /// Builds the table. Later duplicates in the document win.
    #[must_use]
    pub fn from_config(config: &GlobalMarginConfig) -> Self {
        let mut overrides: HashMap<ProviderName, HashMap<CourierName, ProfitMargin>> =
            HashMap::new();
        for provider in &config.providers {
            let couriers = overrides.entry(provider.name).or_default();
            for courier in &provider.couriers {
                couriers.insert(courier.name, courier.profit_margin);
            }
        }

        Self {
            global: config.global_margin_profit,
            overrides,
        }
    }

    /// Returns the global fallback margin.
    #[inline]
    #[must_use]
    pub fn global(&self) -> ProfitMargin {
        self.global
    }

    /// Looks up the override for a provider/courier pair.
    ///
    /// A quote without a recognized courier can never match an override.
    #[must_use]
    pub fn lookup(&self, provider: ProviderName, courier: Option<CourierName>) -> MarginLookup {
        let Some(couriers) = self.overrides.get(&provider) else {
            return MarginLookup::MissingProvider;
        };
        courier
            .and_then(|c| couriers.get(&c))
            .map_or(MarginLookup::MissingCourier, |m| MarginLookup::Custom(*m))
    }
}
