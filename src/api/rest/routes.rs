//! # REST Routes
//!
//! Router assembly for the REST API.

use crate::api::rest::handlers::{self, AppState};
use axum::Router;
use axum::http::Method;
use axum::routing::{get, post, put};
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Builds the API router.
pub fn create_router(state: Arc<AppState>) -> Router {
    let api = Router::new()
        .route("/quotes", post(handlers::create_quotes))
        .route("/guides", post(handlers::create_guide))
        .route("/margins", get(handlers::get_margins))
        .route("/margins/global", put(handlers::update_global_margin))
        .route(
            "/margins/{provider}/{courier}",
            put(handlers::update_courier_margin).delete(handlers::remove_courier_margin),
        )
        .route("/health", get(handlers::health));

    Router::new()
        .nest("/api/v1", api)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer())
        .with_state(state)
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(Any)
        .max_age(Duration::from_secs(3600))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::application::services::{
        GuideCreationService, MarginSettingsService, QuoteAggregator,
    };
    use crate::domain::entities::{CanonicalQuote, GlobalMarginConfig, ProfitMargin};
    use crate::domain::value_objects::{CourierName, ProviderName, QuoteRequest};
    use crate::infrastructure::persistence::in_memory::InMemoryMarginConfigRepository;
    use crate::infrastructure::providers::{Annotated, Provider, ProviderResult, QuoteProvider};
    use async_trait::async_trait;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    #[derive(Debug)]
    struct FixedProvider;

    impl Provider for FixedProvider {
        fn name(&self) -> ProviderName {
            ProviderName::Ge
        }
    }

    #[async_trait]
    impl QuoteProvider for FixedProvider {
        async fn get_quote(
            &self,
            _request: &QuoteRequest,
        ) -> ProviderResult<Annotated<Vec<CanonicalQuote>>> {
            Ok(Annotated::plain(vec![
                CanonicalQuote::new(2, "Estafeta Dia Siguiente", 210.0, ProviderName::Ge)
                    .with_courier(Some(CourierName::Estafeta)),
                CanonicalQuote::new(1, "Estafeta Terrestre", 150.5, ProviderName::Ge)
                    .with_courier(Some(CourierName::Estafeta)),
            ]))
        }
    }

    fn app() -> Router {
        let margins = Arc::new(InMemoryMarginConfigRepository::with_config(
            GlobalMarginConfig::new(ProfitMargin::percentage(10.0)),
        ));
        let state = AppState {
            aggregator: Arc::new(QuoteAggregator::new(
                vec![Arc::new(FixedProvider) as Arc<dyn QuoteProvider>],
                margins.clone(),
            )),
            guides: Arc::new(GuideCreationService::new()),
            margins: Arc::new(MarginSettingsService::new(margins)),
        };
        create_router(Arc::new(state))
    }

    async fn send(
        app: Router,
        method: &str,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let builder = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json");
        let request = match body {
            Some(body) => builder.body(Body::from(body.to_string())).unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn quote_body() -> Value {
        json!({
            "originPostalCode": "72000",
            "destinationPostalCode": "94298",
            "weight": 5,
            "length": 30,
            "height": 20,
            "width": 10
        })
    }

    #[tokio::test]
    async fn health_lists_providers() {
        let (status, body) = send(app(), "GET", "/api/v1/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["status"], "ok");
        assert_eq!(body["data"]["providers"], json!(["GE"]));
    }

    #[tokio::test]
    async fn quotes_are_priced_and_sorted() {
        let (status, body) = send(app(), "POST", "/api/v1/quotes", Some(quote_body())).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["error"], Value::Null);
        let quotes = body["data"]["quotes"].as_array().unwrap();
        assert_eq!(quotes.len(), 2);
        assert_eq!(quotes[0]["total"], 165.55);
        assert_eq!(quotes[0]["source"], "GE");
        assert_eq!(quotes[1]["total"], 231.0);
        assert!(
            body["messages"]
                .as_array()
                .unwrap()
                .contains(&json!("Profit margin applied"))
        );
    }

    #[tokio::test]
    async fn invalid_quote_request_is_bad_request() {
        let mut request = quote_body();
        request["originPostalCode"] = json!("7200");

        let (status, body) = send(app(), "POST", "/api/v1/quotes", Some(request)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["data"], Value::Null);
        assert!(body["error"].as_str().unwrap().contains("7200"));
    }

    #[tokio::test]
    async fn guide_for_unregistered_provider_is_not_found() {
        let request = serde_json::to_value(crate::domain::entities::guide::tests::guide_request(
            ProviderName::Tone,
        ))
        .unwrap();

        let (status, body) = send(app(), "POST", "/api/v1/guides", Some(request)).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body["error"].as_str().unwrap().contains("TONE"));
    }

    #[tokio::test]
    async fn margin_updates_round_trip() {
        let app = app();

        let (status, _) = send(
            app.clone(),
            "PUT",
            "/api/v1/margins/GE/DHL",
            Some(json!({"value": 15, "type": "percentage"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = send(app.clone(), "GET", "/api/v1/margins", None).await;
        assert_eq!(status, StatusCode::OK);
        let config = &body["data"]["marginConfig"];
        assert_eq!(config["globalMarginProfit"]["value"], 10.0);
        assert_eq!(config["providers"][0]["name"], "GE");
        assert_eq!(config["providers"][0]["couriers"][0]["name"], "DHL");

        let (status, _) = send(app.clone(), "DELETE", "/api/v1/margins/GE/DHL", None).await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = send(app, "DELETE", "/api/v1/margins/GE/DHL", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn invalid_margin_type_names_value() {
        let (status, body) = send(
            app(),
            "PUT",
            "/api/v1/margins/global",
            Some(json!({"value": 5, "type": "ratio"})),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("ratio"));
    }
}
