//! # Guide Creation
//!
//! Routes a guide request to the provider that issued the chosen quote.

use crate::application::dto::{GuideData, ResponseEnvelope};
use crate::application::error::{ApplicationError, ApplicationResult};
use crate::domain::entities::{GuideRequest, GuideResult};
use crate::domain::value_objects::ProviderName;
use crate::infrastructure::providers::{Annotated, GuideProvider};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, warn};

/// Creates shipping guides against a single provider.
#[derive(Debug, Clone, Default)]
pub struct GuideCreationService {
    providers: HashMap<ProviderName, Arc<dyn GuideProvider>>,
}

impl GuideCreationService {
    /// Creates a service with no providers registered.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a provider, replacing any previous one with the same name.
    #[must_use]
    pub fn with_provider(mut self, provider: Arc<dyn GuideProvider>) -> Self {
        self.providers.insert(provider.name(), provider);
        self
    }

    /// Returns true if guides can be created with `provider`.
    #[must_use]
    pub fn supports(&self, provider: ProviderName) -> bool {
        self.providers.contains_key(&provider)
    }

    /// Creates a guide with the provider named in the request.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::Domain` for a malformed request,
    /// `ApplicationError::NotFound` if the provider is not registered, or
    /// `ApplicationError::Provider` if the provider call fails.
    pub async fn create_guide(
        &self,
        request: &GuideRequest,
    ) -> ApplicationResult<Annotated<Option<GuideResult>>> {
        request.validate()?;

        let provider = self.providers.get(&request.provider).ok_or_else(|| {
            ApplicationError::not_found("GuideProvider", request.provider.tag())
        })?;

        let outcome = provider.create_guide(request).await.map_err(|e| {
            warn!(provider = %request.provider, error = %e, "guide creation failed");
            ApplicationError::from(e)
        })?;

        info!(
            provider = %request.provider,
            quote_id = %request.quote_id,
            created = outcome.result.is_some(),
            "guide creation completed"
        );

        Ok(outcome)
    }

    /// Runs [`create_guide`](Self::create_guide) and wraps the result.
    ///
    /// # Errors
    ///
    /// Same as [`create_guide`](Self::create_guide).
    pub async fn guide_envelope(
        &self,
        request: &GuideRequest,
    ) -> ApplicationResult<ResponseEnvelope<GuideData>> {
        let outcome = self.create_guide(request).await?;
        Ok(ResponseEnvelope::success(
            GuideData {
                guide: outcome.result,
            },
            outcome.messages,
        ))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::entities::guide::tests::guide_request;
    use crate::infrastructure::providers::{Provider, ProviderError, ProviderResult};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug)]
    struct MockGuideProvider {
        name: ProviderName,
        fail: bool,
        calls: AtomicUsize,
    }

    impl MockGuideProvider {
        fn new(name: ProviderName) -> Self {
            Self {
                name,
                fail: false,
                calls: AtomicUsize::new(0),
            }
        }

        fn failing(name: ProviderName) -> Self {
            Self {
                fail: true,
                ..Self::new(name)
            }
        }
    }

    impl Provider for MockGuideProvider {
        fn name(&self) -> ProviderName {
            self.name
        }
    }

    #[async_trait]
    impl GuideProvider for MockGuideProvider {
        async fn create_guide(
            &self,
            request: &GuideRequest,
        ) -> ProviderResult<Annotated<Option<GuideResult>>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(ProviderError::http(503, None));
            }
            Ok(Annotated::new(
                Some(GuideResult {
                    tracking_number: format!("TRK-{}", request.quote_id),
                    carrier: "DHL".to_string(),
                    price: "150.50".to_string(),
                    guide_link: Some("https://labels.test/1".to_string()),
                    label_url: Some("https://labels.test/1".to_string()),
                    file: None,
                }),
                vec![format!("{} create_guide completed", self.name.tag())],
            ))
        }
    }

    #[tokio::test]
    async fn routes_to_requested_provider() {
        let ge = Arc::new(MockGuideProvider::new(ProviderName::Ge));
        let pakke = Arc::new(MockGuideProvider::new(ProviderName::Pakke));
        let service = GuideCreationService::new()
            .with_provider(ge.clone())
            .with_provider(pakke.clone());

        let outcome = service
            .create_guide(&guide_request(ProviderName::Pakke))
            .await
            .unwrap();

        assert_eq!(outcome.result.unwrap().tracking_number, "TRK-rate-1");
        assert_eq!(ge.calls.load(Ordering::SeqCst), 0);
        assert_eq!(pakke.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn unregistered_provider_is_not_found() {
        let service = GuideCreationService::new()
            .with_provider(Arc::new(MockGuideProvider::new(ProviderName::Ge)));

        let err = service
            .create_guide(&guide_request(ProviderName::Tone))
            .await
            .unwrap_err();

        assert!(err.is_not_found());
        assert!(!service.supports(ProviderName::Tone));
    }

    #[tokio::test]
    async fn invalid_request_skips_provider() {
        let ge = Arc::new(MockGuideProvider::new(ProviderName::Ge));
        let service = GuideCreationService::new().with_provider(ge.clone());
        let mut request = guide_request(ProviderName::Ge);
        request.content = "  ".to_string();

        let err = service.create_guide(&request).await.unwrap_err();

        assert!(err.is_client_error());
        assert_eq!(ge.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn provider_failure_is_upstream() {
        let service = GuideCreationService::new()
            .with_provider(Arc::new(MockGuideProvider::failing(ProviderName::Manuable)));

        let err = service
            .create_guide(&guide_request(ProviderName::Manuable))
            .await
            .unwrap_err();

        assert!(err.is_upstream());
    }

    #[tokio::test]
    async fn envelope_carries_guide_and_messages() {
        let service = GuideCreationService::new()
            .with_provider(Arc::new(MockGuideProvider::new(ProviderName::Ge)));

        let envelope = service
            .guide_envelope(&guide_request(ProviderName::Ge))
            .await
            .unwrap();

        assert_eq!(envelope.messages, vec!["GE create_guide completed"]);
        let guide = envelope.data.unwrap().guide.unwrap();
        assert_eq!(guide.price, "150.50");
    }
}
