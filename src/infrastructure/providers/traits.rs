//! # Provider Adapter Traits
//!
//! Port definitions for provider integrations.
//!
//! Every provider integration implements [`Provider`] plus one or both of
//! [`QuoteProvider`] and [`GuideProvider`]. Results travel inside
//! [`Annotated`], which pairs the value with the advisory messages produced
//! while obtaining it.
//!
//! # Examples
//!
//! ```ignore
//! use shipping_quotes::infrastructure::providers::traits::{Annotated, Provider, QuoteProvider};
//!
//! struct MyProvider { /* ... */ }
//!
//! #[async_trait::async_trait]
//! impl QuoteProvider for MyProvider {
//!     async fn get_quote(&self, request: &QuoteRequest)
//!         -> ProviderResult<Annotated<Vec<CanonicalQuote>>> { /* ... */ }
//! }
//! ```

use crate::domain::entities::{CanonicalQuote, GuideRequest, GuideResult};
use crate::domain::value_objects::{ProviderName, QuoteRequest};
use crate::infrastructure::providers::error::ProviderResult;
use async_trait::async_trait;
use std::fmt;

/// A value plus the advisory messages collected while producing it.
#[derive(Debug, Clone, PartialEq)]
pub struct Annotated<T> {
    /// The produced value.
    pub result: T,
    /// Advisory messages, in the order they were produced.
    pub messages: Vec<String>,
}

impl<T> Annotated<T> {
    /// Creates an annotated value.
    #[must_use]
    pub fn new(result: T, messages: Vec<String>) -> Self {
        Self { result, messages }
    }

    /// Creates an annotated value without messages.
    #[must_use]
    pub fn plain(result: T) -> Self {
        Self::new(result, Vec::new())
    }

    /// Returns true if any message equals `message`.
    #[must_use]
    pub fn has_message(&self, message: &str) -> bool {
        self.messages.iter().any(|m| m == message)
    }
}

impl<T> Annotated<Annotated<T>> {
    /// Collapses a nested annotation; outer messages come first.
    #[must_use]
    pub fn flatten(self) -> Annotated<T> {
        let mut messages = self.messages;
        messages.extend(self.result.messages);
        Annotated {
            result: self.result.result,
            messages,
        }
    }
}

/// Common identity of a provider integration.
pub trait Provider: Send + Sync + fmt::Debug {
    /// Returns the provider this adapter talks to.
    fn name(&self) -> ProviderName;
}

/// Port for fetching quotes from one provider.
#[async_trait]
pub trait QuoteProvider: Provider {
    /// Requests quotes for a validated shipment.
    ///
    /// Entries that cannot be normalized are dropped and reported through
    /// the returned messages.
    ///
    /// # Errors
    ///
    /// - `ProviderError::Configuration` - A required setting is missing
    /// - `ProviderError::Http` / `Timeout` / `Connection` - Transport failure
    /// - `ProviderError::Rejected` - The provider reported a failure
    async fn get_quote(&self, request: &QuoteRequest)
    -> ProviderResult<Annotated<Vec<CanonicalQuote>>>;
}

/// Port for creating shipping guides with one provider.
#[async_trait]
pub trait GuideProvider: Provider {
    /// Creates a guide for a previously quoted service.
    ///
    /// A `None` result means the provider answered but no guide was issued;
    /// the messages explain why.
    ///
    /// # Errors
    ///
    /// Same as [`QuoteProvider::get_quote`].
    async fn create_guide(&self, request: &GuideRequest)
    -> ProviderResult<Annotated<Option<GuideResult>>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flatten_keeps_message_order() {
        let inner = Annotated::new(1, vec!["inner".to_string()]);
        let outer = Annotated::new(inner, vec!["outer".to_string()]);
        let flat = outer.flatten();
        assert_eq!(flat.result, 1);
        assert_eq!(flat.messages, vec!["outer", "inner"]);
    }

    #[test]
    fn has_message_matches_exactly() {
        let value = Annotated::new(2, vec!["x".to_string()]);
        assert_eq!(value.result, 2);
        assert!(value.has_message("x"));
        assert!(!Annotated::plain(()).has_message("x"));
    }
}
