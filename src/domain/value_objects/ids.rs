//! # Identifiers
//!
//! Provider-scoped identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier a provider assigns to one of its quotes.
///
/// Providers disagree on the type: some send integers, some UUID strings.
/// The value is only unique within the issuing provider.
///
/// # Examples
///
/// ```
/// use shipping_quotes::domain::value_objects::ids::ProviderQuoteId;
///
/// let id: ProviderQuoteId = serde_json::from_str("42").unwrap();
/// assert_eq!(id, ProviderQuoteId::Number(42));
/// assert_eq!(id.to_string(), "42");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProviderQuoteId {
    /// Numeric identifier.
    Number(i64),
    /// Textual identifier.
    Text(String),
}

impl From<i64> for ProviderQuoteId {
    fn from(value: i64) -> Self {
        Self::Number(value)
    }
}

impl From<String> for ProviderQuoteId {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for ProviderQuoteId {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl fmt::Display for ProviderQuoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{}", n),
            Self::Text(s) => f.write_str(s),
        }
    }
}
