//! # Domain Enums
//!
//! Enumeration types for domain concepts.
//!
//! This module provides the closed vocabularies used throughout the quote
//! pipeline:
//!
//! - [`ProviderName`] - Carrier-aggregator providers and their wire tags
//! - [`CourierName`] - Courier brands that physically move the parcel
//! - [`ServiceType`] - Delivery speed classification
//! - [`MarginType`] - How a profit margin is computed
//! - [`AdjustmentSource`] - Where an applied margin came from
//! - [`Environment`] - Production or development credentials
//!
//! All enums implement `Debug`, `Clone`, `Copy`, `PartialEq`, `Eq`, `Hash`,
//! `Display`, `FromStr`, and Serde traits.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Carrier-aggregator provider.
///
/// The serialized form is the provider tag used on the wire and in margin
/// configuration documents.
///
/// # Examples
///
/// ```
/// use shipping_quotes::domain::value_objects::enums::ProviderName;
///
/// assert_eq!(ProviderName::Tone.tag(), "TONE");
/// assert_eq!("pkk".parse::<ProviderName>().unwrap(), ProviderName::Pakke);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ProviderName {
    /// GE aggregator.
    #[serde(rename = "GE")]
    Ge,
    /// T1 aggregator.
    #[serde(rename = "TONE")]
    Tone,
    /// Pakke aggregator.
    #[serde(rename = "Pkk")]
    Pakke,
    /// Manuable aggregator.
    #[serde(rename = "Mn")]
    Manuable,
}

impl ProviderName {
    /// All providers, in fan-out order.
    pub const ALL: [ProviderName; 4] = [Self::Ge, Self::Tone, Self::Pakke, Self::Manuable];

    /// Returns the wire tag for this provider.
    #[inline]
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Ge => "GE",
            Self::Tone => "TONE",
            Self::Pakke => "Pkk",
            Self::Manuable => "Mn",
        }
    }

    /// Returns the couriers this provider can quote.
    ///
    /// Margin overrides may only reference couriers listed here.
    #[must_use]
    pub const fn supported_couriers(self) -> &'static [CourierName] {
        match self {
            Self::Ge => &[
                CourierName::Estafeta,
                CourierName::Dhl,
                CourierName::Ups,
                CourierName::Fedex,
                CourierName::Redpack,
                CourierName::Paquetexpress,
            ],
            Self::Tone => &[
                CourierName::Estafeta,
                CourierName::Dhl,
                CourierName::Fedex,
                CourierName::Ups,
            ],
            Self::Pakke => &[
                CourierName::Estafeta,
                CourierName::Dhl,
                CourierName::Fedex,
                CourierName::Ups,
                CourierName::Redpack,
            ],
            Self::Manuable => &[
                CourierName::Estafeta,
                CourierName::Dhl,
                CourierName::Fedex,
                CourierName::Ups,
            ],
        }
    }

    /// Returns true if this provider quotes the given courier.
    #[must_use]
    pub fn supports(self, courier: CourierName) -> bool {
        self.supported_couriers().contains(&courier)
    }
}

impl fmt::Display for ProviderName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for ProviderName {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "GE" => Ok(Self::Ge),
            "TONE" | "T1" => Ok(Self::Tone),
            "PKK" | "PAKKE" => Ok(Self::Pakke),
            "MN" | "MANUABLE" => Ok(Self::Manuable),
            _ => Err(ParseEnumError::InvalidValue("ProviderName", s.to_string())),
        }
    }
}

/// Courier brand.
///
/// Provider responses are mapped onto this enum by case-insensitive substring
/// matching via [`CourierName::detect`]. Unrecognized brands stay unset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CourierName {
    /// Estafeta.
    Estafeta,
    /// DHL.
    #[serde(rename = "DHL")]
    Dhl,
    /// UPS.
    #[serde(rename = "UPS")]
    Ups,
    /// FedEx.
    Fedex,
    /// Redpack.
    Redpack,
    /// Paquetexpress.
    Paquetexpress,
}

impl CourierName {
    /// All known couriers.
    pub const ALL: [CourierName; 6] = [
        Self::Estafeta,
        Self::Dhl,
        Self::Ups,
        Self::Fedex,
        Self::Redpack,
        Self::Paquetexpress,
    ];

    /// Returns the canonical name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Estafeta => "Estafeta",
            Self::Dhl => "DHL",
            Self::Ups => "UPS",
            Self::Fedex => "Fedex",
            Self::Redpack => "Redpack",
            Self::Paquetexpress => "Paquetexpress",
        }
    }

    const fn keywords(self) -> &'static [&'static str] {
        match self {
            Self::Estafeta => &["estafeta"],
            Self::Dhl => &["dhl"],
            Self::Ups => &["ups"],
            Self::Fedex => &["fedex", "federal express"],
            Self::Redpack => &["redpack"],
            Self::Paquetexpress => &["paquetexpress", "paquete express"],
        }
    }

    /// Detects the courier named in a free-form provider string.
    ///
    /// # Examples
    ///
    /// ```
    /// use shipping_quotes::domain::value_objects::enums::CourierName;
    ///
    /// assert_eq!(CourierName::detect("DHL Express"), Some(CourierName::Dhl));
    /// assert_eq!(CourierName::detect("Carrier X"), None);
    /// ```
    #[must_use]
    pub fn detect(raw: &str) -> Option<Self> {
        let lowered = raw.to_lowercase();
        Self::ALL.into_iter().find(|courier| {
            courier
                .keywords()
                .iter()
                .any(|keyword| lowered.contains(keyword))
        })
    }
}

impl fmt::Display for CourierName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CourierName {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "ESTAFETA" => Ok(Self::Estafeta),
            "DHL" => Ok(Self::Dhl),
            "UPS" => Ok(Self::Ups),
            "FEDEX" => Ok(Self::Fedex),
            "REDPACK" => Ok(Self::Redpack),
            "PAQUETEXPRESS" => Ok(Self::Paquetexpress),
            _ => Err(ParseEnumError::InvalidValue("CourierName", s.to_string())),
        }
    }
}

/// Delivery speed classification of a quote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ServiceType {
    /// Regular ground delivery.
    Standard,
    /// Next-day or faster delivery.
    NextDay,
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Standard => write!(f, "standard"),
            Self::NextDay => write!(f, "nextDay"),
        }
    }
}

impl FromStr for ServiceType {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "standard" => Ok(Self::Standard),
            "nextday" | "next_day" => Ok(Self::NextDay),
            _ => Err(ParseEnumError::InvalidValue("ServiceType", s.to_string())),
        }
    }
}

/// How a profit margin is computed.
///
/// Doubles as the `adjustmentMode` provenance tag on a margin-adjusted quote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarginType {
    /// Value is a percentage of the base total.
    Percentage,
    /// Value is added to the base total as-is.
    Absolute,
}

impl fmt::Display for MarginType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Percentage => write!(f, "percentage"),
            Self::Absolute => write!(f, "absolute"),
        }
    }
}

impl FromStr for MarginType {
    type Err = ParseEnumError;

    /// Only the exact lowercase tags are accepted; anything else is a
    /// configuration error.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "percentage" => Ok(Self::Percentage),
            "absolute" => Ok(Self::Absolute),
            _ => Err(ParseEnumError::InvalidValue("MarginType", s.to_string())),
        }
    }
}

/// Where the margin applied to a quote came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdjustmentSource {
    /// The global default margin.
    Default,
    /// A courier-specific override.
    Custom,
}

impl fmt::Display for AdjustmentSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Default => write!(f, "default"),
            Self::Custom => write!(f, "custom"),
        }
    }
}

/// Credential environment for provider tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Production credentials.
    Production,
    /// Development / sandbox credentials.
    Development,
}

impl Environment {
    /// Maps the `is_prod` flag used by token operations.
    #[inline]
    #[must_use]
    pub const fn from_is_prod(is_prod: bool) -> Self {
        if is_prod {
            Self::Production
        } else {
            Self::Development
        }
    }

    /// Returns true for production.
    #[inline]
    #[must_use]
    pub const fn is_prod(self) -> bool {
        matches!(self, Self::Production)
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Production => write!(f, "production"),
            Self::Development => write!(f, "development"),
        }
    }
}

/// Error type for parsing enum values from strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseEnumError {
    /// The provided string value is not valid for the enum.
    InvalidValue(&'static str, String),
}

impl ParseEnumError {
    /// Returns the rejected input.
    #[must_use]
    pub fn value(&self) -> &str {
        match self {
            Self::InvalidValue(_, value) => value,
        }
    }
}

impl fmt::Display for ParseEnumError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidValue(enum_name, value) => {
                write!(f, "invalid {} value: '{}'", enum_name, value)
            }
        }
    }
}

impl std::error::Error for ParseEnumError {}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    mod provider_name {
        use super::*;

        #[test]
        fn tags_match_wire_format() {
            assert_eq!(ProviderName::Ge.to_string(), "GE");
            assert_eq!(ProviderName::Tone.to_string(), "TONE");
            assert_eq!(ProviderName::Pakke.to_string(), "Pkk");
            assert_eq!(ProviderName::Manuable.to_string(), "Mn");
        }

        #[test]
        fn serde_uses_tags() {
            let json = serde_json::to_string(&ProviderName::Pakke).unwrap();
            assert_eq!(json, "\"Pkk\"");
            let parsed: ProviderName = serde_json::from_str("\"Mn\"").unwrap();
            assert_eq!(parsed, ProviderName::Manuable);
        }

        #[test]
        fn from_str_aliases() {
            assert_eq!("t1".parse::<ProviderName>().unwrap(), ProviderName::Tone);
            assert_eq!(
                "manuable".parse::<ProviderName>().unwrap(),
                ProviderName::Manuable
            );
            assert!("skydropx".parse::<ProviderName>().is_err());
        }

        #[test]
        fn supported_couriers() {
            assert!(ProviderName::Ge.supports(CourierName::Paquetexpress));
            assert!(!ProviderName::Manuable.supports(CourierName::Redpack));
        }
    }

    mod courier_name {
        use super::*;

        #[test]
        fn detect_is_case_insensitive() {
            assert_eq!(CourierName::detect("ESTAFETA"), Some(CourierName::Estafeta));
            assert_eq!(CourierName::detect("fedex"), Some(CourierName::Fedex));
            assert_eq!(
                CourierName::detect("Paquete Express"),
                Some(CourierName::Paquetexpress)
            );
        }

        #[test]
        fn detect_unknown_is_none() {
            assert_eq!(CourierName::detect("99 Minutos"), None);
            assert_eq!(CourierName::detect(""), None);
        }

        #[test]
        fn serde_names() {
            let json = serde_json::to_string(&CourierName::Dhl).unwrap();
            assert_eq!(json, "\"DHL\"");
            let json = serde_json::to_string(&CourierName::Estafeta).unwrap();
            assert_eq!(json, "\"Estafeta\"");
        }
    }

    mod margin_type {
        use super::*;

        #[test]
        fn only_exact_tags_parse() {
            assert_eq!(
                "percentage".parse::<MarginType>().unwrap(),
                MarginType::Percentage
            );
            assert_eq!("absolute".parse::<MarginType>().unwrap(), MarginType::Absolute);
            assert!("Percentage".parse::<MarginType>().is_err());
            assert!("fixed".parse::<MarginType>().is_err());
        }

        #[test]
        fn serde_rejects_unknown_type() {
            let parsed: Result<MarginType, _> = serde_json::from_str("\"fixed\"");
            assert!(parsed.is_err());
        }
    }

    mod service_type {
        use super::*;

        #[test]
        fn serde_camel_case() {
            let json = serde_json::to_string(&ServiceType::NextDay).unwrap();
            assert_eq!(json, "\"nextDay\"");
        }
    }

    mod parse_enum_error {
        use super::*;

        #[test]
        fn display_format() {
            let err = ParseEnumError::InvalidValue("MarginType", "fixed".to_string());
            assert_eq!(err.to_string(), "invalid MarginType value: 'fixed'");
            assert_eq!(err.value(), "fixed");
        }
    }
}
