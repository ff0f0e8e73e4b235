//! # Token Record
//!
//! A provider session token as persisted by the token store.

use crate::domain::value_objects::{Environment, ProviderName};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Stored session token for one provider and environment.
///
/// Records are never expired proactively; a provider rejecting the token is
/// what triggers replacement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenRecord {
    provider: ProviderName,
    environment: Environment,
    token: String,
    updated_at: DateTime<Utc>,
}

impl TokenRecord {
    /// Creates a record stamped with the current time.
    #[must_use]
    pub fn new(provider: ProviderName, environment: Environment, token: impl Into<String>) -> Self {
        Self {
            provider,
            environment,
            token: token.into(),
            updated_at: Utc::now(),
        }
    }

    /// Returns the provider.
    #[inline]
    #[must_use]
    pub fn provider(&self) -> ProviderName {
        self.provider
    }

    /// Returns the environment.
    #[inline]
    #[must_use]
    pub fn environment(&self) -> Environment {
        self.environment
    }

    /// Returns the token.
    #[inline]
    #[must_use]
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Returns when the token was stored.
    #[inline]
    #[must_use]
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Consumes the record, returning the token.
    #[must_use]
    pub fn into_token(self) -> String {
        self.token
    }
}
