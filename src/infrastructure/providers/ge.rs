//! # GE Adapter
//!
//! Quote and guide integration with the GE aggregator.
//!
//! GE authenticates with a static `x-api-key` header. Pickup surcharge
//! entries are returned alongside real services and are dropped during
//! normalization.
//!
//! # Examples
//!
//! ```ignore
//! use shipping_quotes::infrastructure::providers::ge::{GeAdapter, GeConfig};
//!
//! let config = GeConfig::new()
//!     .with_api_key("key")
//!     .with_uri("https://api.ge.example");
//! let adapter = GeAdapter::new(config, HttpClient::new(10_000)?);
//! let quotes = adapter.get_quote(&request).await?;
//! ```

use crate::domain::entities::{Address, CanonicalQuote, GuideRequest, GuideResult, Parcel};
use crate::domain::value_objects::{CourierName, ProviderName, ProviderQuoteId, QuoteRequest};
use crate::infrastructure::providers::classify::{Amount, ServiceRules, unparseable_total};
use crate::infrastructure::providers::error::{ProviderResult, require_setting};
use crate::infrastructure::providers::http_client::{HttpClient, endpoint, single_header};
use crate::infrastructure::providers::traits::{
    Annotated, GuideProvider, Provider, QuoteProvider,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

const PREFIX: &str = "[GE]";

const SERVICES: ServiceRules = ServiceRules::new(
    &["express", "dia siguiente", "día siguiente", "next day", "overnight"],
    &["terrestre", "standard", "estandar", "estándar", "ground", "economico", "económico"],
    &["recoleccion", "recolección", "pickup"],
);

/// Settings for the GE integration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeConfig {
    api_key: Option<String>,
    uri: Option<String>,
}

impl GeConfig {
    /// Creates an empty configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the API key.
    #[must_use]
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Sets the base URI.
    #[must_use]
    pub fn with_uri(mut self, uri: impl Into<String>) -> Self {
        self.uri = Some(uri.into());
        self
    }

    fn credentials(&self) -> ProviderResult<(&str, &str)> {
        let api_key = require_setting(self.api_key.as_deref(), ProviderName::Ge, "api_key")?;
        let uri = require_setting(self.uri.as_deref(), ProviderName::Ge, "uri")?;
        Ok((api_key, uri))
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
struct GePackage {
    weight: f64,
    length: f64,
    height: f64,
    width: f64,
}

impl From<&QuoteRequest> for GePackage {
    fn from(request: &QuoteRequest) -> Self {
        Self {
            weight: request.weight,
            length: request.length,
            height: request.height,
            width: request.width,
        }
    }
}

impl From<&Parcel> for GePackage {
    fn from(parcel: &Parcel) -> Self {
        Self {
            weight: parcel.weight,
            length: parcel.length,
            height: parcel.height,
            width: parcel.width,
        }
    }
}

#[derive(Debug, Serialize)]
struct GeQuoteRequest<'a> {
    origin_zip_code: &'a str,
    destination_zip_code: &'a str,
    package: GePackage,
}

#[derive(Debug, Deserialize)]
struct GeQuoteResponse {
    #[serde(default)]
    data: Vec<GeRate>,
}

#[derive(Debug, Deserialize)]
struct GeRate {
    id: ProviderQuoteId,
    service_name: String,
    carrier: String,
    total_price: Amount,
}

#[derive(Debug, Serialize)]
struct GeAddress<'a> {
    name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    company: Option<&'a str>,
    street: &'a str,
    number: &'a str,
    district: &'a str,
    city: &'a str,
    state: &'a str,
    zip_code: &'a str,
    phone: &'a str,
    email: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    reference: Option<&'a str>,
}

impl<'a> From<&'a Address> for GeAddress<'a> {
    fn from(address: &'a Address) -> Self {
        Self {
            name: &address.name,
            company: address.company.as_deref(),
            street: &address.street,
            number: &address.number,
            district: &address.district,
            city: &address.city,
            state: &address.state,
            zip_code: &address.postal_code,
            phone: &address.phone,
            email: &address.email,
            reference: address.reference.as_deref(),
        }
    }
}

#[derive(Debug, Serialize)]
struct GeShipmentRequest<'a> {
    rate_id: &'a ProviderQuoteId,
    #[serde(skip_serializing_if = "Option::is_none")]
    service_name: Option<&'a str>,
    origin: GeAddress<'a>,
    destination: GeAddress<'a>,
    package: GePackage,
    content: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    declared_value: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct GeShipmentResponse {
    data: Option<GeShipment>,
}

#[derive(Debug, Deserialize)]
struct GeShipment {
    tracking_number: String,
    carrier: String,
    price: Amount,
    label_url: Option<String>,
}

/// GE aggregator adapter.
#[derive(Debug, Clone)]
pub struct GeAdapter {
    config: GeConfig,
    http: HttpClient,
}

impl GeAdapter {
    /// Creates a new adapter.
    #[must_use]
    pub fn new(config: GeConfig, http: HttpClient) -> Self {
        Self { config, http }
    }

    fn normalize(rates: Vec<GeRate>, messages: &mut Vec<String>) -> Vec<CanonicalQuote> {
        rates
            .into_iter()
            .filter(|rate| !SERVICES.is_excluded(&rate.service_name))
            .filter_map(|rate| {
                let Some(total) = rate.total_price.value() else {
                    messages.push(unparseable_total(PREFIX, &rate.service_name, &rate.total_price));
                    return None;
                };
                let service_type = SERVICES.classify(&rate.service_name);
                let courier = CourierName::detect(&rate.carrier);
                Some(
                    CanonicalQuote::new(rate.id, rate.service_name, total, ProviderName::Ge)
                        .with_service_type(service_type)
                        .with_courier(courier),
                )
            })
            .collect()
    }
}

impl Provider for GeAdapter {
    fn name(&self) -> ProviderName {
        ProviderName::Ge
    }
}

#[async_trait]
impl QuoteProvider for GeAdapter {
    async fn get_quote(
        &self,
        request: &QuoteRequest,
    ) -> ProviderResult<Annotated<Vec<CanonicalQuote>>> {
        let (api_key, uri) = self.config.credentials()?;
        let body = GeQuoteRequest {
            origin_zip_code: &request.origin_postal_code,
            destination_zip_code: &request.destination_postal_code,
            package: GePackage::from(request),
        };

        let response: GeQuoteResponse = self
            .http
            .post_with_headers(
                &endpoint(uri, "quotes"),
                &body,
                single_header("x-api-key", api_key)?,
            )
            .await?;

        let received = response.data.len();
        let mut messages = Vec::new();
        let quotes = Self::normalize(response.data, &mut messages);
        debug!(provider = PREFIX, received, normalized = quotes.len(), "Quotes normalized");

        Ok(Annotated::new(quotes, messages))
    }
}

#[async_trait]
impl GuideProvider for GeAdapter {
    async fn create_guide(
        &self,
        request: &GuideRequest,
    ) -> ProviderResult<Annotated<Option<GuideResult>>> {
        let (api_key, uri) = self.config.credentials()?;
        let body = GeShipmentRequest {
            rate_id: &request.quote_id,
            service_name: request.service.as_deref(),
            origin: GeAddress::from(&request.origin),
            destination: GeAddress::from(&request.destination),
            package: GePackage::from(&request.parcel),
            content: &request.content,
            declared_value: request.declared_value,
        };

        let response: GeShipmentResponse = self
            .http
            .post_with_headers(
                &endpoint(uri, "shipments"),
                &body,
                single_header("x-api-key", api_key)?,
            )
            .await?;

        let Some(shipment) = response.data else {
            return Ok(Annotated::new(
                None,
                vec![format!("{} No guide returned", PREFIX)],
            ));
        };
        debug!(provider = PREFIX, tracking = %shipment.tracking_number, "Guide created");

        Ok(Annotated::plain(Some(GuideResult {
            tracking_number: shipment.tracking_number,
            carrier: shipment.carrier,
            price: shipment.price.to_string(),
            guide_link: shipment.label_url.clone(),
            label_url: shipment.label_url,
            file: None,
        })))
    }
}
