//! # Application Errors
//!
//! Error types for the application layer.
//!
//! These errors represent failures that can occur during use case execution:
//! invalid input, provider failures, storage failures, and margin arithmetic.
//!
//! # Error Hierarchy
//!
//! ```text
//! ApplicationError
//! ├── InvalidRequest(String)        - Request could not be processed
//! ├── Validation(String)            - Input validation failures
//! ├── Domain(DomainError)           - Domain rule violations
//! ├── Provider(ProviderError)       - Provider integration failures
//! ├── Repository(RepositoryError)   - Storage failures
//! ├── Margin(MarginError)           - Margin arithmetic failures
//! ├── NotFound { .. }               - Resource not found
//! └── Internal(String)              - Unexpected failures
//! ```
//!
//! # Examples
//!
//! ```
//! use shipping_quotes::application::error::ApplicationError;
//!
//! let err = ApplicationError::validation("margin type must be percentage or absolute");
//! assert!(err.is_client_error());
//!
//! let err = ApplicationError::generic();
//! assert!(err.is_client_error());
//! ```

use crate::domain::errors::DomainError;
use crate::domain::services::MarginError;
use crate::infrastructure::persistence::RepositoryError;
use crate::infrastructure::providers::error::{GENERIC_FAILURE_MESSAGE, ProviderError};
use thiserror::Error;

/// Application layer error.
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// The request could not be processed.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Request validation failed.
    #[error("validation error: {0}")]
    Validation(String),

    /// Domain rule violation.
    #[error("domain error: {0}")]
    Domain(#[from] DomainError),

    /// Provider integration failure.
    #[error("provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Storage failure.
    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),

    /// Margin arithmetic failure.
    #[error("margin error: {0}")]
    Margin(#[from] MarginError),

    /// Resource not found.
    #[error("not found: {resource_type} with id {id}")]
    NotFound {
        /// Type of resource.
        resource_type: String,
        /// Resource identifier.
        id: String,
    },

    /// Internal error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApplicationError {
    /// Creates an invalid request error.
    #[must_use]
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }

    /// Creates the generic invalid request error.
    #[must_use]
    pub fn generic() -> Self {
        Self::invalid_request(GENERIC_FAILURE_MESSAGE)
    }

    /// Creates a validation error.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Creates a not found error.
    #[must_use]
    pub fn not_found(resource_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            resource_type: resource_type.into(),
            id: id.into(),
        }
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Returns true if the caller's input was at fault.
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        match self {
            Self::InvalidRequest(_) | Self::Validation(_) | Self::Domain(_) => true,
            Self::Provider(e) => e.is_client_error(),
            _ => false,
        }
    }

    /// Returns true if this is a not found error.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns true if an upstream provider failed.
    #[must_use]
    pub fn is_upstream(&self) -> bool {
        matches!(self, Self::Provider(e) if !e.is_client_error())
    }
}

/// Result type for application operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
