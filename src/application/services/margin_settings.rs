//! # Margin Settings
//!
//! Reads and updates the persisted [`GlobalMarginConfig`].
//!
//! Inputs arrive as raw strings from the API surface; every validation error
//! names the offending value so callers can correct it.

use crate::application::error::{ApplicationError, ApplicationResult};
use crate::domain::entities::{GlobalMarginConfig, ProfitMargin};
use crate::domain::value_objects::{CourierName, MarginType, ParseEnumError, ProviderName};
use crate::infrastructure::persistence::MarginConfigRepository;
use std::sync::Arc;
use tracing::info;

/// Manages the tenant-wide margin configuration.
#[derive(Debug, Clone)]
pub struct MarginSettingsService {
    repository: Arc<dyn MarginConfigRepository>,
    default_margin: ProfitMargin,
}

impl MarginSettingsService {
    /// Creates a service whose unset configuration defaults to a 0% margin.
    #[must_use]
    pub fn new(repository: Arc<dyn MarginConfigRepository>) -> Self {
        Self {
            repository,
            default_margin: ProfitMargin::percentage(0.0),
        }
    }

    /// Sets the global margin used while nothing has been stored.
    #[must_use]
    pub fn with_default_margin(mut self, margin: ProfitMargin) -> Self {
        self.default_margin = margin;
        self
    }

    /// Returns the stored configuration, or an empty default.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::Repository` if the store fails.
    pub async fn current(&self) -> ApplicationResult<GlobalMarginConfig> {
        Ok(self
            .repository
            .get()
            .await?
            .unwrap_or_else(|| GlobalMarginConfig::new(self.default_margin)))
    }

    /// Replaces the global margin.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::Validation` for an unknown margin type or a
    /// non-finite value.
    pub async fn update_global_margin(
        &self,
        value: f64,
        margin_type: &str,
    ) -> ApplicationResult<GlobalMarginConfig> {
        let margin = parse_margin(value, margin_type)?;
        let mut config = self.current().await?;
        config.set_global_margin(margin);
        self.store(config, "global margin updated").await
    }

    /// Inserts or replaces a courier override.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::Validation` for an unknown provider, a
    /// courier the provider does not serve, an unknown margin type, or a
    /// non-finite value.
    pub async fn update_courier_margin(
        &self,
        provider: &str,
        courier: &str,
        value: f64,
        margin_type: &str,
    ) -> ApplicationResult<GlobalMarginConfig> {
        let (provider, courier) = parse_scope(provider, courier)?;
        let margin = parse_margin(value, margin_type)?;
        let mut config = self.current().await?;
        config.upsert_courier_margin(provider, courier, margin);
        self.store(config, "courier margin updated").await
    }

    /// Removes a courier override.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::Validation` for an unknown provider or
    /// courier, or `ApplicationError::NotFound` if no override exists.
    pub async fn remove_courier_margin(
        &self,
        provider: &str,
        courier: &str,
    ) -> ApplicationResult<GlobalMarginConfig> {
        let (provider, courier) = parse_scope(provider, courier)?;
        let mut config = self.current().await?;
        if !config.remove_courier_margin(provider, courier) {
            return Err(ApplicationError::not_found(
                "CourierMargin",
                format!("{}/{}", provider, courier),
            ));
        }
        self.store(config, "courier margin removed").await
    }

    async fn store(
        &self,
        config: GlobalMarginConfig,
        action: &'static str,
    ) -> ApplicationResult<GlobalMarginConfig> {
        config
            .validate()
            .map_err(|e| ApplicationError::validation(e.to_string()))?;
        self.repository.save(&config).await?;
        info!(global = %config.global_margin_profit, "{}", action);
        Ok(config)
    }
}

fn invalid_value(error: ParseEnumError) -> ApplicationError {
    ApplicationError::validation(error.to_string())
}

fn parse_margin(value: f64, margin_type: &str) -> ApplicationResult<ProfitMargin> {
    let margin_type: MarginType = margin_type.parse().map_err(invalid_value)?;
    if !value.is_finite() {
        return Err(ApplicationError::validation(format!(
            "margin value must be a finite number, got {}",
            value
        )));
    }
    Ok(ProfitMargin::new(value, margin_type))
}

fn parse_scope(provider: &str, courier: &str) -> ApplicationResult<(ProviderName, CourierName)> {
    let provider: ProviderName = provider.parse().map_err(invalid_value)?;
    let courier: CourierName = courier.parse().map_err(invalid_value)?;
    if !provider.supports(courier) {
        return Err(ApplicationError::validation(format!(
            "courier '{}' is not served by provider '{}'",
            courier, provider
        )));
    }
    Ok((provider, courier))
}
