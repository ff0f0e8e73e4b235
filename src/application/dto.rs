//! # Response Envelopes
//!
//! The uniform response shape returned by every use case.
//!
//! ```text
//! { "version": "...", "message": null, "messages": [...], "error": null, "data": {...} }
//! ```

use crate::domain::entities::{CanonicalQuote, GuideResult, GlobalMarginConfig};
use serde::Serialize;

/// Version reported in every envelope.
pub const API_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Uniform response wrapper.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResponseEnvelope<T> {
    /// Service version.
    pub version: &'static str,
    /// Summary message.
    pub message: Option<String>,
    /// Advisory messages collected while serving the request.
    pub messages: Vec<String>,
    /// Error description, set only on failure.
    pub error: Option<String>,
    /// Payload, absent on failure.
    pub data: Option<T>,
}

impl<T> ResponseEnvelope<T> {
    /// Wraps a successful payload.
    #[must_use]
    pub fn success(data: T, messages: Vec<String>) -> Self {
        Self {
            version: API_VERSION,
            message: None,
            messages,
            error: None,
            data: Some(data),
        }
    }

    /// Builds a failure envelope.
    #[must_use]
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            version: API_VERSION,
            message: None,
            messages: Vec::new(),
            error: Some(error.into()),
            data: None,
        }
    }
}

/// Payload of the quotes envelope.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuotesData {
    /// Quotes ordered by ascending total.
    pub quotes: Vec<CanonicalQuote>,
}

/// Payload of the guide envelope.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GuideData {
    /// The created guide, if the provider issued one.
    pub guide: Option<GuideResult>,
}

/// Payload of the margin settings envelope.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarginSettingsData {
    /// Current configuration.
    pub margin_config: GlobalMarginConfig,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::value_objects::ProviderName;
    use serde_json::json;

    #[test]
    fn success_envelope_shape() {
        let quote = CanonicalQuote::new(1, "Express", 150.5, ProviderName::Ge);
        let envelope = ResponseEnvelope::success(
            QuotesData {
                quotes: vec![quote],
            },
            vec!["Profit margin applied".to_string()],
        );
        let value = serde_json::to_value(&envelope).unwrap();

        assert_eq!(value["version"], API_VERSION);
        assert_eq!(value["message"], json!(null));
        assert_eq!(value["error"], json!(null));
        assert_eq!(value["messages"], json!(["Profit margin applied"]));
        assert_eq!(value["data"]["quotes"][0]["total"], 150.5);
        assert_eq!(value["data"]["quotes"][0]["source"], "GE");
    }

    #[test]
    fn failure_envelope_has_null_data() {
        let envelope: ResponseEnvelope<GuideData> = ResponseEnvelope::failure("bad request");
        let value = serde_json::to_value(&envelope).unwrap();
        assert_eq!(value["error"], "bad request");
        assert_eq!(value["data"], json!(null));
    }

    #[test]
    fn guide_data_null_guide() {
        let value = serde_json::to_value(GuideData { guide: None }).unwrap();
        assert_eq!(value, json!({"guide": null}));
    }
}
