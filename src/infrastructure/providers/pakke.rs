//! # Pakke Adapter
//!
//! Quote and guide integration with the Pakke aggregator.
//!
//! Pakke speaks PascalCase JSON and authenticates with the raw API key in the
//! `Authorization` header. Rate lists include insurance add-ons, which are
//! not shipping services and are dropped. Generated labels come back as
//! base64 content.

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

const PREFIX: &str = "[Pakke]";

const SERVICES: ServiceRules = ServiceRules::new(
    &[
        "dia_siguiente",
        "dia siguiente",
        "día siguiente",
        "express",
        "next_day",
        "overnight",
        "saver",
    ],
    &["terrestre", "ground", "economy", "economico", "standard", "estandar"],
    &["seguro", "insurance"],
);

/// Settings for the Pakke integration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PakkeConfig {
    api_key: Option<String>,
    uri: Option<String>,
}

impl PakkeConfig {
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
        let api_key = require_setting(self.api_key.as_deref(), ProviderName::Pakke, "api_key")?;
        let uri = require_setting(self.uri.as_deref(), ProviderName::Pakke, "uri")?;
        Ok((api_key, uri))
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct PakkeZipCodes<'a> {
    from: &'a str,
    to: &'a str,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "PascalCase")]
struct PakkeParcel {
    weight: f64,
    length: f64,
    width: f64,
    height: f64,
}

impl From<&Parcel> for PakkeParcel {
    fn from(parcel: &Parcel) -> Self {
        Self {
            weight: parcel.weight,
            length: parcel.length,
            width: parcel.width,
            height: parcel.height,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct PakkeRatesRequest<'a> {
    zip_code: PakkeZipCodes<'a>,
    parcel: PakkeParcel,
}

#[derive(Debug, Deserialize)]
struct PakkeRatesResponse {
    #[serde(rename = "Pakke", default)]
    rates: Vec<PakkeRate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct PakkeRate {
    courier_code: String,
    courier_name: String,
    courier_service_id: String,
    courier_service: String,
    total_price: Amount,
}

impl PakkeRate {
    fn classification_text(&self) -> String {
        format!("{} {}", self.courier_service_id, self.courier_service)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct PakkeAddress<'a> {
    zip_code: &'a str,
    state: &'a str,
    city: &'a str,
    neighborhood: &'a str,
    address1: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    address2: Option<&'a str>,
}

impl<'a> From<&'a Address> for PakkeAddress<'a> {
    fn from(address: &'a Address) -> Self {
        Self {
            zip_code: &address.postal_code,
            state: &address.state,
            city: &address.city,
            neighborhood: &address.district,
            address1: format!("{} {}", address.street, address.number),
            address2: address.reference.as_deref(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct PakkeContact<'a> {
    name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    company_name: Option<&'a str>,
    phone1: &'a str,
    email: &'a str,
}

impl<'a> From<&'a Address> for PakkeContact<'a> {
    fn from(address: &'a Address) -> Self {
        Self {
            name: &address.name,
            company_name: address.company.as_deref(),
            phone1: &address.phone,
            email: &address.email,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct PakkeShipmentRequest<'a> {
    courier_service_id: &'a ProviderQuoteId,
    address_from: PakkeAddress<'a>,
    address_to: PakkeAddress<'a>,
    parcel: PakkeParcel,
    sender: PakkeContact<'a>,
    recipient: PakkeContact<'a>,
    content: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    insured_amount: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct PakkeShipment {
    tracking_number: Option<String>,
    courier_name: String,
    total_price: Amount,
    label: Option<String>,
    label_url: Option<String>,
}

/// Pakke aggregator adapter.
#[derive(Debug, Clone)]
pub struct PakkeAdapter {
    config: PakkeConfig,
    http: HttpClient,
}

impl PakkeAdapter {
    /// Creates a new adapter.
    #[must_use]
    pub fn new(config: PakkeConfig, http: HttpClient) -> Self {
        Self { config, http }
    }

    fn normalize(rates: Vec<PakkeRate>, messages: &mut Vec<String>) -> Vec<CanonicalQuote> {
        rates
            .into_iter()
            .filter(|rate| !SERVICES.is_excluded(&rate.classification_text()))
            .filter_map(|rate| {
                let Some(total) = rate.total_price.value() else {
                    messages.push(unparseable_total(
                        PREFIX,
                        &rate.courier_service,
                        &rate.total_price,
                    ));
                    return None;
                };
                let service_type = SERVICES.classify(&rate.classification_text());
                let courier = CourierName::detect(&rate.courier_name)
                    .or_else(|| CourierName::detect(&rate.courier_code));
                Some(
                    CanonicalQuote::new(
                        rate.courier_service_id,
                        rate.courier_service,
                        total,
                        ProviderName::Pakke,
                    )
                    .with_service_type(service_type)
                    .with_courier(courier),
                )
            })
            .collect()
    }
}

impl Provider for PakkeAdapter {
    fn name(&self) -> ProviderName {
        ProviderName::Pakke
    }
}

#[async_trait]
impl QuoteProvider for PakkeAdapter {
    async fn get_quote(
        &self,
        request: &QuoteRequest,
    ) -> ProviderResult<Annotated<Vec<CanonicalQuote>>> {
        let (api_key, uri) = self.config.credentials()?;
        let body = PakkeRatesRequest {
            zip_code: PakkeZipCodes {
                from: &request.origin_postal_code,
                to: &request.destination_postal_code,
            },
            parcel: PakkeParcel {
                weight: request.weight,
                length: request.length,
                width: request.width,
                height: request.height,
            },
        };

        let response: PakkeRatesResponse = self
            .http
            .post_with_headers(
                &endpoint(uri, "Shipments/rates"),
                &body,
                single_header("authorization", api_key)?,
            )
            .await?;

        let received = response.rates.len();
        let mut messages = Vec::new();
        let quotes = Self::normalize(response.rates, &mut messages);
        debug!(provider = PREFIX, received, normalized = quotes.len(), "Quotes normalized");

        Ok(Annotated::new(quotes, messages))
    }
}

#[async_trait]
impl GuideProvider for PakkeAdapter {
    async fn create_guide(
        &self,
        request: &GuideRequest,
    ) -> ProviderResult<Annotated<Option<GuideResult>>> {
        let (api_key, uri) = self.config.credentials()?;
        let body = PakkeShipmentRequest {
            courier_service_id: &request.quote_id,
            address_from: PakkeAddress::from(&request.origin),
            address_to: PakkeAddress::from(&request.destination),
            parcel: PakkeParcel::from(&request.parcel),
            sender: PakkeContact::from(&request.origin),
            recipient: PakkeContact::from(&request.destination),
            content: &request.content,
            insured_amount: request.declared_value,
        };

        let shipment: PakkeShipment = self
            .http
            .post_with_headers(
                &endpoint(uri, "Shipments"),
                &body,
                single_header("authorization", api_key)?,
            )
            .await?;

        let Some(tracking_number) = shipment.tracking_number else {
            return Ok(Annotated::new(
                None,
                vec![format!("{} Shipment created without tracking number", PREFIX)],
            ));
        };
        debug!(provider = PREFIX, tracking = %tracking_number, "Guide created");

        Ok(Annotated::plain(Some(GuideResult {
            tracking_number,
            carrier: shipment.courier_name,
            price: shipment.total_price.to_string(),
            guide_link: shipment.label_url.clone(),
            label_url: shipment.label_url,
            file: shipment.label,
        })))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::domain::entities::guide::tests::guide_request;
    use crate::domain::value_objects::ServiceType;
    use crate::infrastructure::providers::error::ProviderError;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn request() -> QuoteRequest {
        QuoteRequest::new("72000", "94298", 5.0, 30.0, 20.0, 10.0)
    }

    fn adapter(uri: &str) -> PakkeAdapter {
        PakkeAdapter::new(
            PakkeConfig::new().with_api_key("pk-key").with_uri(uri),
            HttpClient::new(2000).unwrap(),
        )
    }

    #[tokio::test]
    async fn missing_uri_is_configuration_error() {
        let adapter = PakkeAdapter::new(
            PakkeConfig::new().with_api_key("k"),
            HttpClient::new(200).unwrap(),
        );
        let err = adapter.get_quote(&request()).await.unwrap_err();
        assert!(matches!(
            err,
            ProviderError::Configuration { setting: "uri", .. }
        ));
    }

    #[tokio::test]
    async fn rates_exclude_insurance() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/Shipments/rates"))
            .and(header("authorization", "pk-key"))
            .and(body_json(json!({
                "ZipCode": {"From": "72000", "To": "94298"},
                "Parcel": {"Weight": 5.0, "Length": 30.0, "Width": 10.0, "Height": 20.0}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "Pakke": [
                    {
                        "CourierCode": "EST",
                        "CourierName": "Estafeta",
                        "CourierServiceId": "ESTAFETA_DIA_SIGUIENTE",
                        "CourierService": "Día Siguiente",
                        "TotalPrice": 125.5
                    },
                    {
                        "CourierCode": "RPK",
                        "CourierName": "Redpack",
                        "CourierServiceId": "REDPACK_TERRESTRE",
                        "CourierService": "Terrestre",
                        "TotalPrice": "98.10"
                    },
                    {
                        "CourierCode": "PKK",
                        "CourierName": "Pakke",
                        "CourierServiceId": "SEGURO_ENVIO",
                        "CourierService": "Seguro",
                        "TotalPrice": 20
                    }
                ]
            })))
            .mount(&server)
            .await;

        let outcome = adapter(&server.uri()).get_quote(&request()).await.unwrap();
        let quotes = outcome.result;

        assert_eq!(quotes.len(), 2);
        assert_eq!(
            quotes[0].id(),
            &ProviderQuoteId::Text("ESTAFETA_DIA_SIGUIENTE".to_string())
        );
        assert_eq!(quotes[0].type_service(), Some(ServiceType::NextDay));
        assert_eq!(quotes[0].courier(), Some(CourierName::Estafeta));
        assert_eq!(quotes[1].courier(), Some(CourierName::Redpack));
        assert_eq!(quotes[1].total(), 98.1);
        assert!(quotes.iter().all(|q| q.source() == ProviderName::Pakke));
    }

    #[tokio::test]
    async fn guide_carries_base64_label() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/Shipments"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "TrackingNumber": "PK-42",
                "CourierName": "Estafeta",
                "TotalPrice": 125.5,
                "Label": "JVBERi0xLjQK"
            })))
            .mount(&server)
            .await;

        let outcome = adapter(&server.uri())
            .create_guide(&guide_request(ProviderName::Pakke))
            .await
            .unwrap();
        let guide = outcome.result.unwrap();

        assert_eq!(guide.tracking_number, "PK-42");
        assert_eq!(guide.price, "125.5");
        assert_eq!(guide.file.as_deref(), Some("JVBERi0xLjQK"));
        assert!(guide.label_url.is_none());
    }
}
