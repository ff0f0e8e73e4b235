//! # Manuable Adapter
//!
//! Quote and guide integration with the Manuable aggregator.
//!
//! Manuable authenticates with a session token obtained from
//! `POST /session`. The token is stored per environment and reused until the
//! provider rejects it, at which point the token manager creates a new one
//! and retries once.
//!
//! Label creation reports expiry in-band: an HTTP 401 from `/labels` becomes
//! the [`SESSION_EXPIRED`] message, which drives
//! [`execute_with_retry_on_unauthorized`].

use crate::domain::entities::{Address, CanonicalQuote, GuideRequest, GuideResult, TokenRecord};
use crate::domain::value_objects::{CourierName, Environment, ProviderName, QuoteRequest};
use crate::infrastructure::persistence::traits::TokenRepository;
use crate::infrastructure::providers::classify::{Amount, ServiceRules, unparseable_total};
use crate::infrastructure::providers::error::{ProviderError, ProviderResult, require_setting};
use crate::infrastructure::providers::http_client::{HttpClient, bearer_header, endpoint};
use crate::infrastructure::providers::token_manager::{
    TokenOperations, execute_with_retry_on_unauthorized, execute_with_token_management,
};
use crate::infrastructure::providers::traits::{
    Annotated, GuideProvider, Provider, QuoteProvider,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

const PREFIX: &str = "[Manuable]";

/// Message produced when `/labels` rejects the session token.
pub const SESSION_EXPIRED: &str = "Manuable session expired";

/// Phrase Manuable uses in error bodies for rejected tokens.
pub const INVALID_TOKEN_PHRASE: &str = "Invalid token";

const COUNTRY_CODE: &str = "MX";

const SERVICES: ServiceRules = ServiceRules::new(
    &["express", "next_day", "nextday", "saver", "dia siguiente"],
    &["standard", "ground", "economy", "terrestre"],
    &[],
);

/// Settings for the Manuable integration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManuableConfig {
    uri: Option<String>,
    email: Option<String>,
    password: Option<String>,
}

impl ManuableConfig {
    /// Creates an empty configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the base URI.
    #[must_use]
    pub fn with_uri(mut self, uri: impl Into<String>) -> Self {
        self.uri = Some(uri.into());
        self
    }

    /// Sets the account credentials.
    #[must_use]
    pub fn with_credentials(
        mut self,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.email = Some(email.into());
        self.password = Some(password.into());
        self
    }

    fn uri(&self) -> ProviderResult<&str> {
        require_setting(self.uri.as_deref(), ProviderName::Manuable, "uri")
    }

    fn ensure_configured(&self) -> ProviderResult<()> {
        self.uri()?;
        require_setting(self.email.as_deref(), ProviderName::Manuable, "email")?;
        require_setting(self.password.as_deref(), ProviderName::Manuable, "password")?;
        Ok(())
    }
}

#[derive(Debug, Serialize)]
struct SessionRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct SessionResponse {
    token: String,
}

/// Session token storage and issuance for Manuable.
#[derive(Debug, Clone)]
pub struct ManuableTokenOps {
    config: ManuableConfig,
    http: HttpClient,
    repository: Arc<dyn TokenRepository>,
}

impl ManuableTokenOps {
    /// Creates token operations backed by a token repository.
    #[must_use]
    pub fn new(
        config: ManuableConfig,
        http: HttpClient,
        repository: Arc<dyn TokenRepository>,
    ) -> Self {
        Self {
            config,
            http,
            repository,
        }
    }
}

#[async_trait]
impl TokenOperations for ManuableTokenOps {
    async fn get_stored_token(&self, is_prod: bool) -> ProviderResult<Option<String>> {
        let record = self
            .repository
            .get(ProviderName::Manuable, Environment::from_is_prod(is_prod))
            .await
            .map_err(|e| ProviderError::internal_error(e.to_string()))?;
        Ok(record.map(TokenRecord::into_token))
    }

    async fn create_new_token(&self) -> ProviderResult<String> {
        let uri = self.config.uri()?;
        let email = require_setting(self.config.email.as_deref(), ProviderName::Manuable, "email")?;
        let password = require_setting(
            self.config.password.as_deref(),
            ProviderName::Manuable,
            "password",
        )?;

        let session: SessionResponse = self
            .http
            .post(&endpoint(uri, "session"), &SessionRequest { email, password })
            .await?;
        Ok(session.token)
    }

    async fn update_stored_token(&self, token: &str, is_prod: bool) -> ProviderResult<()> {
        let record = TokenRecord::new(
            ProviderName::Manuable,
            Environment::from_is_prod(is_prod),
            token,
        );
        self.repository
            .save(&record)
            .await
            .map_err(|e| ProviderError::internal_error(e.to_string()))
    }

    fn invalid_token_phrase(&self) -> Option<&str> {
        Some(INVALID_TOKEN_PHRASE)
    }
}

#[derive(Debug, Serialize)]
struct ManuableZip<'a> {
    zip_code: &'a str,
    country_code: &'static str,
}

#[derive(Debug, Clone, Copy, Serialize)]
struct ManuableParcel {
    weight: f64,
    length: f64,
    height: f64,
    width: f64,
    distance_unit: &'static str,
    mass_unit: &'static str,
}

impl ManuableParcel {
    fn new(weight: f64, length: f64, height: f64, width: f64) -> Self {
        Self {
            weight,
            length,
            height,
            width,
            distance_unit: "CM",
            mass_unit: "KG",
        }
    }
}

#[derive(Debug, Serialize)]
struct ManuableRatesRequest<'a> {
    address_from: ManuableZip<'a>,
    address_to: ManuableZip<'a>,
    parcel: ManuableParcel,
}

#[derive(Debug, Deserialize)]
struct ManuableRatesResponse {
    #[serde(default)]
    data: Vec<ManuableRate>,
}

#[derive(Debug, Deserialize)]
struct ManuableRate {
    uuid: String,
    carrier: String,
    service: String,
    total_amount: Amount,
    #[serde(default)]
    currency: Option<String>,
}

#[derive(Debug, Serialize)]
struct ManuableAddress<'a> {
    name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    company: Option<&'a str>,
    street1: String,
    neighborhood: &'a str,
    city: &'a str,
    state: &'a str,
    zip_code: &'a str,
    country_code: &'static str,
    phone: &'a str,
    email: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    reference: Option<&'a str>,
}

impl<'a> From<&'a Address> for ManuableAddress<'a> {
    fn from(address: &'a Address) -> Self {
        Self {
            name: &address.name,
            company: address.company.as_deref(),
            street1: format!("{} {}", address.street, address.number),
            neighborhood: &address.district,
            city: &address.city,
            state: &address.state,
            zip_code: &address.postal_code,
            country_code: COUNTRY_CODE,
            phone: &address.phone,
            email: &address.email,
            reference: address.reference.as_deref(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ManuableLabelRequest<'a> {
    rate_token: String,
    address_from: ManuableAddress<'a>,
    address_to: ManuableAddress<'a>,
    parcel: ManuableParcel,
    content: &'a str,
    label_format: &'static str,
}

#[derive(Debug, Deserialize)]
struct ManuableLabelResponse {
    data: Option<ManuableLabel>,
}

#[derive(Debug, Deserialize)]
struct ManuableLabel {
    tracking_number: String,
    carrier: String,
    price: Amount,
    label_url: Option<String>,
}

/// Manuable aggregator adapter.
#[derive(Debug, Clone)]
pub struct ManuableAdapter {
    config: ManuableConfig,
    http: HttpClient,
    tokens: ManuableTokenOps,
    is_prod: bool,
}

impl ManuableAdapter {
    /// Creates a new adapter storing session tokens in `repository`.
    #[must_use]
    pub fn new(
        config: ManuableConfig,
        http: HttpClient,
        repository: Arc<dyn TokenRepository>,
        is_prod: bool,
    ) -> Self {
        let tokens = ManuableTokenOps::new(config.clone(), http.clone(), repository);
        Self {
            config,
            http,
            tokens,
            is_prod,
        }
    }

    async fn fetch_rates(
        &self,
        token: String,
        body: &ManuableRatesRequest<'_>,
    ) -> ProviderResult<Vec<ManuableRate>> {
        let response: ManuableRatesResponse = self
            .http
            .post_with_headers(
                &endpoint(self.config.uri()?, "rates"),
                body,
                bearer_header(&token)?,
            )
            .await
            .map_err(surface_invalid_token)?;
        Ok(response.data)
    }

    async fn request_label(
        &self,
        token: String,
        body: &ManuableLabelRequest<'_>,
    ) -> ProviderResult<Annotated<Option<GuideResult>>> {
        let response: ManuableLabelResponse = match self
            .http
            .post_with_headers(
                &endpoint(self.config.uri()?, "labels"),
                body,
                bearer_header(&token)?,
            )
            .await
        {
            Ok(response) => response,
            Err(error) if error.status() == Some(401) => {
                return Ok(Annotated::new(None, vec![SESSION_EXPIRED.to_string()]));
            }
            Err(error) => return Err(surface_invalid_token(error)),
        };

        let Some(label) = response.data else {
            return Ok(Annotated::new(
                None,
                vec![format!("{} No label returned", PREFIX)],
            ));
        };
        debug!(provider = PREFIX, tracking = %label.tracking_number, "Guide created");

        Ok(Annotated::plain(Some(GuideResult {
            tracking_number: label.tracking_number,
            carrier: label.carrier,
            price: label.price.to_string(),
            guide_link: label.label_url.clone(),
            label_url: label.label_url,
            file: None,
        })))
    }

    fn normalize(rates: Vec<ManuableRate>, messages: &mut Vec<String>) -> Vec<CanonicalQuote> {
        rates
            .into_iter()
            .filter(|rate| !SERVICES.is_excluded(&rate.service))
            .filter_map(|rate| {
                let Some(total) = rate.total_amount.value() else {
                    messages.push(unparseable_total(PREFIX, &rate.service, &rate.total_amount));
                    return None;
                };
                if let Some(currency) = rate
                    .currency
                    .as_deref()
                    .filter(|c| !c.eq_ignore_ascii_case("MXN"))
                {
                    messages.push(format!(
                        "{} quote '{}' priced in {}",
                        PREFIX, rate.service, currency
                    ));
                }
                let service_type = SERVICES.classify(&rate.service);
                let courier = CourierName::detect(&rate.carrier);
                let service = format!("{} {}", rate.carrier, rate.service);
                Some(
                    CanonicalQuote::new(rate.uuid, service, total, ProviderName::Manuable)
                        .with_service_type(service_type)
                        .with_courier(courier),
                )
            })
            .collect()
    }
}

/// Turns an error body naming a rejected token into a message failure.
fn surface_invalid_token(error: ProviderError) -> ProviderError {
    match error {
        ProviderError::Http {
            status,
            body: Some(body),
            ..
        } if status != 401 && body.contains(INVALID_TOKEN_PHRASE) => ProviderError::rejected(body),
        other => other,
    }
}

impl Provider for ManuableAdapter {
    fn name(&self) -> ProviderName {
        ProviderName::Manuable
    }
}

#[async_trait]
impl QuoteProvider for ManuableAdapter {
    async fn get_quote(
        &self,
        request: &QuoteRequest,
    ) -> ProviderResult<Annotated<Vec<CanonicalQuote>>> {
        self.config.ensure_configured()?;
        let body = ManuableRatesRequest {
            address_from: ManuableZip {
                zip_code: &request.origin_postal_code,
                country_code: COUNTRY_CODE,
            },
            address_to: ManuableZip {
                zip_code: &request.destination_postal_code,
                country_code: COUNTRY_CODE,
            },
            parcel: ManuableParcel::new(
                request.weight,
                request.length,
                request.height,
                request.width,
            ),
        };
        let body = &body;

        let outcome = execute_with_token_management(
            move |token| self.fetch_rates(token, body),
            "get_quote",
            self.is_prod,
            &self.tokens,
            PREFIX,
        )
        .await?;

        let received = outcome.result.len();
        let mut messages = outcome.messages;
        let quotes = Self::normalize(outcome.result, &mut messages);
        debug!(provider = PREFIX, received, normalized = quotes.len(), "Quotes normalized");

        Ok(Annotated::new(quotes, messages))
    }
}

#[async_trait]
impl GuideProvider for ManuableAdapter {
    async fn create_guide(
        &self,
        request: &GuideRequest,
    ) -> ProviderResult<Annotated<Option<GuideResult>>> {
        self.config.ensure_configured()?;
        let body = ManuableLabelRequest {
            rate_token: request.quote_id.to_string(),
            address_from: ManuableAddress::from(&request.origin),
            address_to: ManuableAddress::from(&request.destination),
            parcel: ManuableParcel::new(
                request.parcel.weight,
                request.parcel.length,
                request.parcel.height,
                request.parcel.width,
            ),
            content: &request.content,
            label_format: "PDF",
        };
        let body = &body;

        let initial = async move {
            execute_with_token_management(
                move |token| self.request_label(token, body),
                "create_guide",
                self.is_prod,
                &self.tokens,
                PREFIX,
            )
            .await
            .map(Annotated::flatten)
        };

        execute_with_retry_on_unauthorized(
            initial,
            move |token| self.request_label(token, body),
            "create_guide",
            SESSION_EXPIRED,
            &self.tokens,
            self.is_prod,
            PREFIX,
        )
        .await
    }
}
