//! # REST Handlers
//!
//! Request handlers for the shipping quotes REST API.
//!
//! Every handler answers with a [`ResponseEnvelope`]. Failures are mapped by
//! [`ApiError`] to an envelope with `error` set and `data: null`.

use crate::application::dto::{GuideData, MarginSettingsData, QuotesData, ResponseEnvelope};
use crate::application::error::ApplicationError;
use crate::application::services::{GuideCreationService, MarginSettingsService, QuoteAggregator};
use crate::domain::entities::{GlobalMarginConfig, GuideRequest};
use crate::domain::value_objects::{ProviderName, QuoteRequest};
use crate::infrastructure::providers::error::GENERIC_FAILURE_MESSAGE;
use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::error;

// ============================================================================
// Application State
// ============================================================================

/// Shared state handed to every handler.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Quote aggregation use case.
    pub aggregator: Arc<QuoteAggregator>,
    /// Guide creation use case.
    pub guides: Arc<GuideCreationService>,
    /// Margin configuration use case.
    pub margins: Arc<MarginSettingsService>,
}

// ============================================================================
// Request / Response Types
// ============================================================================

/// Body of the margin update endpoints.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MarginUpdateRequest {
    /// Margin value.
    pub value: f64,
    /// `percentage` or `absolute`.
    #[serde(rename = "type")]
    pub margin_type: String,
}

/// Health check payload.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Always `ok` while the process serves requests.
    pub status: &'static str,
    /// Providers registered for quoting.
    pub providers: Vec<ProviderName>,
}

// ============================================================================
// Errors
// ============================================================================

/// HTTP mapping of an [`ApplicationError`].
#[derive(Debug)]
pub struct ApiError(pub ApplicationError);

impl ApiError {
    /// Returns the HTTP status code for this error.
    ///
    /// - Client errors: 400 Bad Request
    /// - Missing resources: 404 Not Found
    /// - Provider failures: 502 Bad Gateway
    /// - Everything else: 500 Internal Server Error
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        if self.0.is_client_error() {
            StatusCode::BAD_REQUEST
        } else if self.0.is_not_found() {
            StatusCode::NOT_FOUND
        } else if self.0.is_upstream() {
            StatusCode::BAD_GATEWAY
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }

    fn public_message(&self) -> String {
        match &self.0 {
            ApplicationError::InvalidRequest(message) => message.clone(),
            ApplicationError::Repository(_) | ApplicationError::Internal(_) => {
                GENERIC_FAILURE_MESSAGE.to_string()
            }
            other => other.to_string(),
        }
    }
}

impl From<ApplicationError> for ApiError {
    fn from(error: ApplicationError) -> Self {
        Self(error)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!(error = %self.0, status = status.as_u16(), "request failed");
        }
        let body: ResponseEnvelope<()> = ResponseEnvelope::failure(self.public_message());
        (status, Json(body)).into_response()
    }
}

/// Result type for handlers.
pub type ApiResult<T> = Result<Json<ResponseEnvelope<T>>, ApiError>;

// ============================================================================
// Handlers
// ============================================================================

/// `POST /api/v1/quotes`
pub async fn create_quotes(
    State(state): State<Arc<AppState>>,
    Json(request): Json<QuoteRequest>,
) -> ApiResult<QuotesData> {
    Ok(Json(state.aggregator.quote_envelope(&request).await?))
}

/// `POST /api/v1/guides`
pub async fn create_guide(
    State(state): State<Arc<AppState>>,
    Json(request): Json<GuideRequest>,
) -> ApiResult<GuideData> {
    Ok(Json(state.guides.guide_envelope(&request).await?))
}

/// `GET /api/v1/margins`
pub async fn get_margins(State(state): State<Arc<AppState>>) -> ApiResult<MarginSettingsData> {
    Ok(margin_envelope(state.margins.current().await?))
}

/// `PUT /api/v1/margins/global`
pub async fn update_global_margin(
    State(state): State<Arc<AppState>>,
    Json(body): Json<MarginUpdateRequest>,
) -> ApiResult<MarginSettingsData> {
    let config = state
        .margins
        .update_global_margin(body.value, &body.margin_type)
        .await?;
    Ok(margin_envelope(config))
}

/// `PUT /api/v1/margins/{provider}/{courier}`
pub async fn update_courier_margin(
    State(state): State<Arc<AppState>>,
    Path((provider, courier)): Path<(String, String)>,
    Json(body): Json<MarginUpdateRequest>,
) -> ApiResult<MarginSettingsData> {
    let config = state
        .margins
        .update_courier_margin(&provider, &courier, body.value, &body.margin_type)
        .await?;
    Ok(margin_envelope(config))
}

/// `DELETE /api/v1/margins/{provider}/{courier}`
pub async fn remove_courier_margin(
    State(state): State<Arc<AppState>>,
    Path((provider, courier)): Path<(String, String)>,
) -> ApiResult<MarginSettingsData> {
    let config = state
        .margins
        .remove_courier_margin(&provider, &courier)
        .await?;
    Ok(margin_envelope(config))
}

/// `GET /api/v1/health`
pub async fn health(State(state): State<Arc<AppState>>) -> Json<ResponseEnvelope<HealthResponse>> {
    Json(ResponseEnvelope::success(
        HealthResponse {
            status: "ok",
            providers: state.aggregator.provider_names(),
        },
        Vec::new(),
    ))
}

fn margin_envelope(
    margin_config: GlobalMarginConfig,
) -> Json<ResponseEnvelope<MarginSettingsData>> {
    Json(ResponseEnvelope::success(
        MarginSettingsData { margin_config },
        Vec::new(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::DomainError;
    use crate::infrastructure::persistence::RepositoryError;
    use crate::infrastructure::providers::ProviderError;

    #[test]
    fn error_status_codes() {
        assert_eq!(
            ApiError(ApplicationError::validation("bad type")).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError(DomainError::MissingField("content").into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError(ApplicationError::not_found("GuideProvider", "TONE")).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError(ProviderError::http(503, None).into()).status_code(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            ApiError(RepositoryError::internal("disk").into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn internal_details_are_hidden() {
        let err = ApiError(RepositoryError::internal("disk full at /var/lib").into());
        assert_eq!(err.public_message(), GENERIC_FAILURE_MESSAGE);
    }

    #[test]
    fn invalid_request_message_is_verbatim() {
        let err = ApiError(ApplicationError::generic());
        assert_eq!(err.public_message(), GENERIC_FAILURE_MESSAGE);
    }
}
