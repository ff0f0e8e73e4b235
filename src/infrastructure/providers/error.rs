//! # Provider Errors
//!
//! Error types for provider adapter operations.
//!
//! This module provides the error type shared by every provider integration
//! (quotes, guides, session tokens) and the structured [`AuthSignal`] used to
//! decide whether a failure means "your session token is no longer valid".
//!
//! # Examples
//!
//! ```
//! use shipping_quotes::infrastructure::providers::error::{AuthSignal, ProviderError};
//!
//! let error = ProviderError::http(401, None);
//! assert_eq!(error.auth_signal(), AuthSignal::Http { status: 401 });
//! ```

use crate::domain::value_objects::ProviderName;
use thiserror::Error;

/// Message carried by HTTP 401 failures.
pub const UNAUTHORIZED_MESSAGE: &str = "Request failed with status code 401";

/// Fixed message used when a failure cannot be described more precisely.
pub const GENERIC_FAILURE_MESSAGE: &str = "The request could not be processed";

/// Error type for provider adapter operations.
#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    /// A required setting for the provider is missing.
    #[error("{provider} is not configured: missing {setting}")]
    Configuration {
        /// The provider.
        provider: ProviderName,
        /// Name of the missing setting.
        setting: &'static str,
    },

    /// The provider answered with a non-success HTTP status.
    #[error("{message}")]
    Http {
        /// HTTP status code.
        status: u16,
        /// Error message.
        message: String,
        /// Response body, if any.
        body: Option<String>,
    },

    /// Request timed out.
    #[error("provider timeout: {message}")]
    Timeout {
        /// Error message.
        message: String,
    },

    /// Network or connection error.
    #[error("provider connection error: {message}")]
    Connection {
        /// Error message.
        message: String,
    },

    /// Response could not be parsed.
    #[error("provider protocol error: {message}")]
    Protocol {
        /// Error message.
        message: String,
    },

    /// The provider reported a failure in an otherwise valid response.
    #[error("{message}")]
    Rejected {
        /// Message reported by the provider.
        message: String,
    },

    /// Request was rejected before or after reaching the provider.
    #[error("invalid request: {message}")]
    InvalidRequest {
        /// Error message.
        message: String,
    },

    /// Local failure unrelated to the provider (storage, client setup).
    #[error("internal error: {message}")]
    Internal {
        /// Error message.
        message: String,
    },

    /// Failure with no usable description.
    #[error("unknown error: {message}")]
    Unknown {
        /// Error message.
        message: String,
    },
}

/// Structured input for unauthorized classification.
///
/// Every error maps onto exactly one signal, so the retry rules can be
/// expressed without inspecting transport details.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthSignal<'a> {
    /// The failure carries an HTTP status code.
    Http {
        /// The status code.
        status: u16,
    },
    /// The failure only carries a message.
    Message {
        /// The message text.
        text: &'a str,
    },
    /// Nothing is known about the failure.
    Unknown,
}

impl ProviderError {
    /// Creates a configuration error.
    #[must_use]
    pub fn configuration(provider: ProviderName, setting: &'static str) -> Self {
        Self::Configuration { provider, setting }
    }

    /// Creates an HTTP status error with the conventional message.
    #[must_use]
    pub fn http(status: u16, body: Option<String>) -> Self {
        Self::Http {
            status,
            message: format!("Request failed with status code {}", status),
            body,
        }
    }

    /// Creates a timeout error.
    #[must_use]
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::Timeout {
            message: message.into(),
        }
    }

    /// Creates a connection error.
    #[must_use]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Creates a protocol error.
    #[must_use]
    pub fn protocol_error(message: impl Into<String>) -> Self {
        Self::Protocol {
            message: message.into(),
        }
    }

    /// Creates a provider rejection.
    #[must_use]
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected {
            message: message.into(),
        }
    }

    /// Creates an invalid request error.
    #[must_use]
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }

    /// Creates the generic invalid request error.
    #[must_use]
    pub fn generic() -> Self {
        Self::invalid_request(GENERIC_FAILURE_MESSAGE)
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Creates an unknown error.
    #[must_use]
    pub fn unknown(message: impl Into<String>) -> Self {
        Self::Unknown {
            message: message.into(),
        }
    }

    /// Returns the HTTP status, if the failure carries one.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns the classification input for this error.
    #[must_use]
    pub fn auth_signal(&self) -> AuthSignal<'_> {
        match self {
            Self::Http { status, .. } => AuthSignal::Http { status: *status },
            Self::Unknown { .. } => AuthSignal::Unknown,
            Self::Configuration { .. } => AuthSignal::Message { text: "" },
            Self::Timeout { message }
            | Self::Connection { message }
            | Self::Protocol { message }
            | Self::Rejected { message }
            | Self::InvalidRequest { message }
            | Self::Internal { message } => AuthSignal::Message { text: message },
        }
    }

    /// Returns true if the request itself was at fault.
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::Configuration { .. } | Self::InvalidRequest { .. }
        )
    }
}

/// Result type for provider operations.
pub type ProviderResult<T> = Result<T, ProviderError>;

/// Returns a configured setting, or the configuration error naming it.
///
/// Blank values count as missing.
///
/// # Errors
///
/// Returns `ProviderError::Configuration` if the setting is absent or blank.
pub fn require_setting<'a>(
    value: Option<&'a str>,
    provider: ProviderName,
    setting: &'static str,
) -> ProviderResult<&'a str> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| ProviderError::configuration(provider, setting))
}
