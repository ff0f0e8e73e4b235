//! # Response Normalization Helpers
//!
//! Keyword rules and amount parsing shared by the provider adapters.

use crate::domain::value_objects::ServiceType;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Courier brands whose names contain service keywords ("express").
const BRAND_TERMS: &[&str] = &["paquetexpress", "paquete express"];

/// Per-provider keyword rules for service names.
///
/// Matching is a case-insensitive substring search. Next-day keywords are
/// checked before standard ones.
#[derive(Debug, Clone, Copy)]
pub struct ServiceRules {
    next_day: &'static [&'static str],
    standard: &'static [&'static str],
    exclude: &'static [&'static str],
}

impl ServiceRules {
    /// Creates a rule set.
    #[must_use]
    pub const fn new(
        next_day: &'static [&'static str],
        standard: &'static [&'static str],
        exclude: &'static [&'static str],
    ) -> Self {
        Self {
            next_day,
            standard,
            exclude,
        }
    }

    /// Returns true if the entry must be dropped before normalization.
    #[must_use]
    pub fn is_excluded(&self, service: &str) -> bool {
        let service = service.to_lowercase();
        self.exclude.iter().any(|k| service.contains(k))
    }

    /// Classifies a service name.
    #[must_use]
    pub fn classify(&self, service: &str) -> Option<ServiceType> {
        let mut service = service.to_lowercase();
        for brand in BRAND_TERMS {
            service = service.replace(brand, " ");
        }
        if self.next_day.iter().any(|k| service.contains(k)) {
            Some(ServiceType::NextDay)
        } else if self.standard.iter().any(|k| service.contains(k)) {
            Some(ServiceType::Standard)
        } else {
            None
        }
    }
}

/// A monetary amount as providers send it: a JSON number or a string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Amount {
    /// Numeric amount.
    Number(f64),
    /// Textual amount, e.g. `"150.50"`.
    Text(String),
}

impl Amount {
    /// Returns the amount as a finite number, if it is one.
    #[must_use]
    pub fn value(&self) -> Option<f64> {
        let value = match self {
            Self::Number(n) => *n,
            Self::Text(s) => s.trim().parse::<f64>().ok()?,
        };
        value.is_finite().then_some(value)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{}", n),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// Message reported when an entry's total cannot be parsed.
#[must_use]
pub fn unparseable_total(prefix: &str, service: &str, amount: &Amount) -> String {
    format!(
        "{} dropped quote '{}': invalid total '{}'",
        prefix, service, amount
    )
}
