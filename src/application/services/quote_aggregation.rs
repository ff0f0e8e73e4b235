//! # Quote Aggregator
//!
//! Orchestrates quote collection, margin application, and ordering.
//!
//! This module provides the [`QuoteAggregator`] which fans a
//! [`QuoteRequest`] out to every registered provider concurrently. A provider
//! that fails or panics contributes a diagnostic message and zero quotes; it
//! never aborts the aggregate response.
//!
//! # Pipeline
//!
//! ```text
//! validate -> margin snapshot -> fan-out -> merge (provider order)
//!          -> apply_margins -> stable sort by total
//! ```

use crate::application::dto::{QuotesData, ResponseEnvelope};
use crate::application::error::{ApplicationError, ApplicationResult};
use crate::domain::entities::{CanonicalQuote, GlobalMarginConfig};
use crate::domain::services::apply_margins;
use crate::domain::value_objects::{ProviderName, QuoteRequest};
use crate::infrastructure::persistence::MarginConfigRepository;
use crate::infrastructure::providers::QuoteProvider;
use futures::future::join_all;
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Appended when the margin configuration could not be loaded.
pub const MARGIN_CONFIG_UNAVAILABLE: &str =
    "Profit margin not applied: margin configuration could not be loaded";

/// Result of quote aggregation.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregationResult {
    /// Margin-adjusted quotes, ascending by total.
    pub quotes: Vec<CanonicalQuote>,
    /// Advisory diagnostics collected along the way.
    pub messages: Vec<String>,
}

impl AggregationResult {
    /// Wraps the result in the response envelope.
    #[must_use]
    pub fn into_envelope(self) -> ResponseEnvelope<QuotesData> {
        ResponseEnvelope::success(
            QuotesData {
                quotes: self.quotes,
            },
            self.messages,
        )
    }
}

/// Message recorded for a provider that produced no usable response.
#[must_use]
pub fn provider_failure_message(provider: ProviderName) -> String {
    format!("{} failed to get quotes", provider.tag())
}

/// Collects quotes from every provider and prices them.
#[derive(Debug, Clone)]
pub struct QuoteAggregator {
    providers: Vec<Arc<dyn QuoteProvider>>,
    margins: Arc<dyn MarginConfigRepository>,
}

impl QuoteAggregator {
    /// Creates a new aggregator.
    ///
    /// Providers are merged in the order given here.
    #[must_use]
    pub fn new(
        providers: Vec<Arc<dyn QuoteProvider>>,
        margins: Arc<dyn MarginConfigRepository>,
    ) -> Self {
        Self { providers, margins }
    }

    /// Returns the registered providers, in merge order.
    #[must_use]
    pub fn provider_names(&self) -> Vec<ProviderName> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    /// Collects, prices, and orders quotes for a shipment.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::Domain` if the request is malformed, or the
    /// generic invalid-request error if margins cannot be applied.
    pub async fn get_quote(&self, request: &QuoteRequest) -> ApplicationResult<AggregationResult> {
        request.validate()?;

        let request_id = Uuid::new_v4();
        let mut messages = Vec::new();
        let snapshot = self.load_snapshot(&mut messages).await;

        let (mut quotes, provider_messages) =
            self.collect_from_providers(request_id, request).await;
        messages.extend(provider_messages);

        apply_margins(&mut quotes, snapshot.as_ref(), &mut messages).map_err(|e| {
            warn!(%request_id, error = %e, "failed to apply profit margins");
            ApplicationError::generic()
        })?;

        quotes.sort_by(|a, b| a.total().total_cmp(&b.total()));

        info!(
            %request_id,
            providers = self.providers.len(),
            quotes = quotes.len(),
            messages = messages.len(),
            "quote aggregation completed"
        );

        Ok(AggregationResult { quotes, messages })
    }

    /// Runs [`get_quote`](Self::get_quote) and wraps the result.
    ///
    /// # Errors
    ///
    /// Same as [`get_quote`](Self::get_quote).
    pub async fn quote_envelope(
        &self,
        request: &QuoteRequest,
    ) -> ApplicationResult<ResponseEnvelope<QuotesData>> {
        self.get_quote(request)
            .await
            .map(AggregationResult::into_envelope)
    }

    /// Fetches one margin configuration snapshot for this request.
    async fn load_snapshot(&self, messages: &mut Vec<String>) -> Option<GlobalMarginConfig> {
        match self.margins.get().await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!(error = %e, "failed to load margin configuration");
                messages.push(MARGIN_CONFIG_UNAVAILABLE.to_string());
                None
            }
        }
    }

    /// Queries all providers concurrently.
    async fn collect_from_providers(
        &self,
        request_id: Uuid,
        request: &QuoteRequest,
    ) -> (Vec<CanonicalQuote>, Vec<String>) {
        let mut names = Vec::with_capacity(self.providers.len());
        let mut handles = Vec::with_capacity(self.providers.len());

        for provider in &self.providers {
            let provider = Arc::clone(provider);
            let request = request.clone();
            names.push(provider.name());

            handles.push(tokio::spawn(async move { provider.get_quote(&request).await }));
        }

        let outcomes = join_all(handles).await;

        let mut quotes = Vec::new();
        let mut messages = Vec::new();

        for (name, outcome) in names.into_iter().zip(outcomes) {
            match outcome {
                Ok(Ok(annotated)) => {
                    debug!(
                        %request_id,
                        provider = %name,
                        quotes = annotated.result.len(),
                        "provider returned quotes"
                    );
                    messages.extend(annotated.messages);
                    quotes.extend(annotated.result);
                }
                Ok(Err(e)) => {
                    warn!(
                        %request_id,
                        provider = %name,
                        error = %e,
                        "provider failed to return quotes"
                    );
                    messages.push(provider_failure_message(name));
                }
                Err(e) => {
                    warn!(%request_id, provider = %name, error = %e, "provider task panicked");
                    messages.push(provider_failure_message(name));
                }
            }
        }

        (quotes, messages)
    }
}
