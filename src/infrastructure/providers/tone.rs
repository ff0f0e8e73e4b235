//! # T1 Adapter
//!
//! Quote and guide integration with the T1 (TONE) aggregator.
//!
//! T1 wraps every response in a `{success, message, result}` envelope and
//! reports business failures with `success: false` under HTTP 200. Requests
//! are scoped to a store (`comercio_id`).

use crate::domain::entities::{Address, CanonicalQuote, GuideRequest, GuideResult};
use crate::domain::value_objects::{CourierName, ProviderName, ProviderQuoteId, QuoteRequest};
use crate::infrastructure::providers::classify::{Amount, ServiceRules, unparseable_total};
use crate::infrastructure::providers::error::{ProviderError, ProviderResult, require_setting};
use crate::infrastructure::providers::http_client::{HttpClient, endpoint, single_header};
use crate::infrastructure::providers::traits::{
    Annotated, GuideProvider, Provider, QuoteProvider,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

const PREFIX: &str = "[T1]";

const SERVICES: ServiceRules = ServiceRules::new(
    &["express", "next_day", "dia siguiente", "día siguiente", "siguiente dia"],
    &["standard", "estandar", "estándar", "terrestre", "ground", "economy"],
    &[],
);

/// Settings for the T1 integration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToneConfig {
    api_key: Option<String>,
    uri: Option<String>,
    store_id: Option<String>,
}

impl ToneConfig {
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

    /// Sets the store identifier.
    #[must_use]
    pub fn with_store_id(mut self, store_id: impl Into<String>) -> Self {
        self.store_id = Some(store_id.into());
        self
    }

    fn credentials(&self) -> ProviderResult<ToneCredentials<'_>> {
        Ok(ToneCredentials {
            api_key: require_setting(self.api_key.as_deref(), ProviderName::Tone, "api_key")?,
            uri: require_setting(self.uri.as_deref(), ProviderName::Tone, "uri")?,
            store_id: require_setting(self.store_id.as_deref(), ProviderName::Tone, "store_id")?,
        })
    }
}

struct ToneCredentials<'a> {
    api_key: &'a str,
    uri: &'a str,
    store_id: &'a str,
}

#[derive(Debug, Serialize)]
struct ToneQuoteRequest<'a> {
    codigo_postal_origen: &'a str,
    codigo_postal_destino: &'a str,
    peso: f64,
    largo: f64,
    alto: f64,
    ancho: f64,
    comercio_id: &'a str,
}

/// T1 response envelope.
#[derive(Debug, Deserialize)]
struct ToneEnvelope<T> {
    success: bool,
    #[serde(default)]
    message: Option<String>,
    result: Option<T>,
}

impl<T> ToneEnvelope<T> {
    /// Returns the payload, or the provider's rejection.
    fn into_result(self) -> ProviderResult<Option<T>> {
        if self.success {
            Ok(self.result)
        } else {
            let message = self
                .message
                .unwrap_or_else(|| format!("{} request was not successful", PREFIX));
            Err(ProviderError::rejected(message))
        }
    }
}

#[derive(Debug, Deserialize)]
struct ToneRate {
    id: ProviderQuoteId,
    servicio: String,
    paqueteria: String,
    costo_total: Amount,
}

#[derive(Debug, Serialize)]
struct ToneContact<'a> {
    nombre: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    empresa: Option<&'a str>,
    calle: &'a str,
    numero: &'a str,
    colonia: &'a str,
    ciudad: &'a str,
    estado: &'a str,
    codigo_postal: &'a str,
    telefono: &'a str,
    email: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    referencia: Option<&'a str>,
}

impl<'a> From<&'a Address> for ToneContact<'a> {
    fn from(address: &'a Address) -> Self {
        Self {
            nombre: &address.name,
            empresa: address.company.as_deref(),
            calle: &address.street,
            numero: &address.number,
            colonia: &address.district,
            ciudad: &address.city,
            estado: &address.state,
            codigo_postal: &address.postal_code,
            telefono: &address.phone,
            email: &address.email,
            referencia: address.reference.as_deref(),
        }
    }
}

#[derive(Debug, Serialize)]
struct TonePackage<'a> {
    peso: f64,
    largo: f64,
    alto: f64,
    ancho: f64,
    contenido: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    valor_declarado: Option<f64>,
}

#[derive(Debug, Serialize)]
struct ToneGuideRequest<'a> {
    comercio_id: &'a str,
    cotizacion_id: &'a ProviderQuoteId,
    #[serde(skip_serializing_if = "Option::is_none")]
    servicio: Option<&'a str>,
    remitente: ToneContact<'a>,
    destinatario: ToneContact<'a>,
    paquete: TonePackage<'a>,
}

#[derive(Debug, Deserialize)]
struct ToneGuide {
    guia: String,
    paqueteria: String,
    costo: Amount,
    url_guia: Option<String>,
    url_etiqueta: Option<String>,
    archivo: Option<String>,
}

/// T1 aggregator adapter.
#[derive(Debug, Clone)]
pub struct ToneAdapter {
    config: ToneConfig,
    http: HttpClient,
}

impl ToneAdapter {
    /// Creates a new adapter.
    #[must_use]
    pub fn new(config: ToneConfig, http: HttpClient) -> Self {
        Self { config, http }
    }

    fn normalize(rates: Vec<ToneRate>, messages: &mut Vec<String>) -> Vec<CanonicalQuote> {
        rates
            .into_iter()
            .filter(|rate| !SERVICES.is_excluded(&rate.servicio))
            .filter_map(|rate| {
                let Some(total) = rate.costo_total.value() else {
                    messages.push(unparseable_total(PREFIX, &rate.servicio, &rate.costo_total));
                    return None;
                };
                let service_type = SERVICES.classify(&rate.servicio);
                let courier = CourierName::detect(&rate.paqueteria);
                Some(
                    CanonicalQuote::new(rate.id, rate.servicio, total, ProviderName::Tone)
                        .with_service_type(service_type)
                        .with_courier(courier),
                )
            })
            .collect()
    }
}

impl Provider for ToneAdapter {
    fn name(&self) -> ProviderName {
        ProviderName::Tone
    }
}

#[async_trait]
impl QuoteProvider for ToneAdapter {
    async fn get_quote(
        &self,
        request: &QuoteRequest,
    ) -> ProviderResult<Annotated<Vec<CanonicalQuote>>> {
        let creds = self.config.credentials()?;
        let body = ToneQuoteRequest {
            codigo_postal_origen: &request.origin_postal_code,
            codigo_postal_destino: &request.destination_postal_code,
            peso: request.weight,
            largo: request.length,
            alto: request.height,
            ancho: request.width,
            comercio_id: creds.store_id,
        };

        let envelope: ToneEnvelope<Vec<ToneRate>> = self
            .http
            .post_with_headers(
                &endpoint(creds.uri, "v1/quotes"),
                &body,
                single_header("x-api-key", creds.api_key)?,
            )
            .await?;
        let rates = envelope.into_result().inspect_err(|e| {
            warn!(provider = PREFIX, error = %e, "Quote request rejected");
        })?;

        let rates = rates.unwrap_or_default();
        let received = rates.len();
        let mut messages = Vec::new();
        let quotes = Self::normalize(rates, &mut messages);
        debug!(provider = PREFIX, received, normalized = quotes.len(), "Quotes normalized");

        Ok(Annotated::new(quotes, messages))
    }
}

#[async_trait]
impl GuideProvider for ToneAdapter {
    async fn create_guide(
        &self,
        request: &GuideRequest,
    ) -> ProviderResult<Annotated<Option<GuideResult>>> {
        let creds = self.config.credentials()?;
        let body = ToneGuideRequest {
            comercio_id: creds.store_id,
            cotizacion_id: &request.quote_id,
            servicio: request.service.as_deref(),
            remitente: ToneContact::from(&request.origin),
            destinatario: ToneContact::from(&request.destination),
            paquete: TonePackage {
                peso: request.parcel.weight,
                largo: request.parcel.length,
                alto: request.parcel.height,
                ancho: request.parcel.width,
                contenido: &request.content,
                valor_declarado: request.declared_value,
            },
        };

        let envelope: ToneEnvelope<ToneGuide> = self
            .http
            .post_with_headers(
                &endpoint(creds.uri, "v1/guides"),
                &body,
                single_header("x-api-key", creds.api_key)?,
            )
            .await?;

        let Some(guide) = envelope.into_result()? else {
            return Ok(Annotated::new(
                None,
                vec![format!("{} No guide returned", PREFIX)],
            ));
        };
        debug!(provider = PREFIX, tracking = %guide.guia, "Guide created");

        Ok(Annotated::plain(Some(GuideResult {
            tracking_number: guide.guia,
            carrier: guide.paqueteria,
            price: guide.costo.to_string(),
            guide_link: guide.url_guia,
            label_url: guide.url_etiqueta,
            file: guide.archivo,
        })))
    }
}
