//! # HTTP Client Utilities
//!
//! Shared HTTP client for provider adapters.
//!
//! This module provides a reusable HTTP client wrapper with:
//! - Configurable timeouts
//! - JSON serialization/deserialization
//! - Uniform mapping of transport and status failures to [`ProviderError`]
//!
//! Non-success statuses become `ProviderError::Http` carrying the status
//! code, which is what the token manager inspects to detect expired
//! sessions.
//!
//! # Examples
//!
//! ```ignore
//! use shipping_quotes::infrastructure::providers::http_client::HttpClient;
//!
//! let client = HttpClient::new(5000)?;
//! let response: MyResponse = client.post("https://api.example.com/quotes", &body).await?;
//! ```

use crate::infrastructure::providers::error::{ProviderError, ProviderResult};
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// HTTP client wrapper for provider adapters.
///
/// Cloning is cheap; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct HttpClient {
    /// Inner reqwest client.
    client: Client,
    /// Request timeout in milliseconds.
    timeout_ms: u64,
}

impl HttpClient {
    /// Creates a new HTTP client with the specified timeout.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::Internal` if the client cannot be created.
    pub fn new(timeout_ms: u64) -> ProviderResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .build()
            .map_err(|e| {
                ProviderError::internal_error(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self { client, timeout_ms })
    }

    /// Makes a POST request with JSON body and deserializes the JSON response.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::Timeout`/`Connection` if the request fails,
    /// `ProviderError::Http` for non-success statuses, and
    /// `ProviderError::Protocol` if the response cannot be parsed.
    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        url: &str,
        body: &B,
    ) -> ProviderResult<T> {
        self.post_with_headers(url, body, HeaderMap::new()).await
    }

    /// Makes a POST request with JSON body and custom headers.
    ///
    /// # Errors
    ///
    /// Same as [`HttpClient::post`].
    pub async fn post_with_headers<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        url: &str,
        body: &B,
        headers: HeaderMap,
    ) -> ProviderResult<T> {
        let response = self
            .client
            .post(url)
            .json(body)
            .headers(headers)
            .send()
            .await
            .map_err(|e| self.map_reqwest_error(e))?;

        self.handle_response(response).await
    }

    /// Handles the HTTP response, checking status and deserializing JSON.
    async fn handle_response<T: DeserializeOwned>(&self, response: Response) -> ProviderResult<T> {
        let status = response.status();

        if status.is_success() {
            response.json::<T>().await.map_err(|e| {
                ProviderError::protocol_error(format!("Failed to parse response: {}", e))
            })
        } else {
            let body = response.text().await.ok().filter(|b| !b.is_empty());
            Err(ProviderError::http(status.as_u16(), body))
        }
    }

    /// Maps a reqwest error to a ProviderError.
    fn map_reqwest_error(&self, error: reqwest::Error) -> ProviderError {
        if error.is_timeout() {
            ProviderError::timeout(format!("Request timed out after {}ms", self.timeout_ms))
        } else if error.is_connect() {
            ProviderError::connection(format!("Connection failed: {}", error))
        } else {
            ProviderError::connection(format!("HTTP request failed: {}", error))
        }
    }
}

/// Builds a header map with a single named header.
///
/// # Errors
///
/// Returns `ProviderError::InvalidRequest` if the value contains characters
/// not allowed in headers.
pub fn single_header(name: &'static str, value: &str) -> ProviderResult<HeaderMap> {
    let mut headers = HeaderMap::new();
    let value = HeaderValue::from_str(value)
        .map_err(|_| ProviderError::invalid_request(format!("Invalid value for header {}", name)))?;
    headers.insert(HeaderName::from_static(name), value);
    Ok(headers)
}

/// Builds a header map carrying `Authorization: Bearer <token>`.
///
/// # Errors
///
/// Returns `ProviderError::InvalidRequest` if the token is not a valid
/// header value.
pub fn bearer_header(token: &str) -> ProviderResult<HeaderMap> {
    let mut headers = HeaderMap::new();
    let value = HeaderValue::from_str(&format!("Bearer {}", token))
        .map_err(|_| ProviderError::invalid_request("Invalid bearer token"))?;
    headers.insert(AUTHORIZATION, value);
    Ok(headers)
}

/// Joins a base URI and a path with exactly one slash.
#[must_use]
pub fn endpoint(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use serde_json::{Value, json};
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn new_client() {
        assert!(HttpClient::new(5000).is_ok());
    }

    #[test]
    fn endpoint_joins_with_single_slash() {
        assert_eq!(endpoint("https://api.x/", "/quotes"), "https://api.x/quotes");
        assert_eq!(endpoint("https://api.x", "quotes"), "https://api.x/quotes");
    }

    #[test]
    fn header_helpers() {
        let headers = single_header("x-api-key", "abc").unwrap();
        assert_eq!(headers.get("x-api-key").unwrap(), "abc");
        let headers = bearer_header("tok").unwrap();
        assert_eq!(headers.get(AUTHORIZATION).unwrap(), "Bearer tok");
        assert!(single_header("x-api-key", "bad\nvalue").is_err());
    }

    #[tokio::test]
    async fn post_deserializes_json() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/echo"))
            .and(header("x-api-key", "k"))
            .and(body_json(json!({"a": 1})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
            .mount(&server)
            .await;

        let client = HttpClient::new(2000).unwrap();
        let value: Value = client
            .post_with_headers(
                &endpoint(&server.uri(), "echo"),
                &json!({"a": 1}),
                single_header("x-api-key", "k").unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(value["ok"], true);
    }

    #[tokio::test]
    async fn non_success_status_maps_to_http_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_string("expired"))
            .mount(&server)
            .await;

        let client = HttpClient::new(2000).unwrap();
        let result: ProviderResult<Value> = client.post(&server.uri(), &json!({})).await;
        let err = result.unwrap_err();
        assert_eq!(err.status(), Some(401));
        assert!(matches!(err, ProviderError::Http { body: Some(ref b), .. } if b == "expired"));
    }

    #[tokio::test]
    async fn invalid_json_is_protocol_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let client = HttpClient::new(2000).unwrap();
        let result: ProviderResult<Value> = client.post(&server.uri(), &json!({})).await;
        assert!(matches!(result, Err(ProviderError::Protocol { .. })));
    }
}
