//! Authenticated HTTP client for the DataCube REST API.

use std::time::Duration;

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use reqwest::{Method, StatusCode};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use tracing::{debug, instrument, trace, warn};

use datacube_core::error::{ApiError, ValidationError};
use datacube_core::{BaseUrl, Result};

use crate::config::ClientConfig;
use crate::endpoints::ErrorResponse;

/// HTTP client carrying the base URL, API key and timeout.
///
/// Every request gets `Authorization: Bearer <key>` and a `datacube/<version>`
/// user agent.
#[derive(Debug, Clone)]
pub(crate) struct HttpClient {
    client: reqwest::Client,
    base_url: BaseUrl,
    timeout: Duration,
}

impl HttpClient {
    /// Build a client from a validated config.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        config.validate()?;

        let mut auth = HeaderValue::from_str(&format!("Bearer {}", config.api_key.expose()))
            .map_err(|_| ValidationError::Config {
                reason: "API key contains characters not allowed in a header".to_string(),
            })?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);

        let client = reqwest::Client::builder()
            .user_agent(concat!("datacube/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .map_err(|e| ApiError::transport(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            timeout: config.timeout,
        })
    }

    /// Returns the base URL this client is configured for.
    pub fn base_url(&self) -> &BaseUrl {
        &self.base_url
    }

    /// Send a request whose parameters travel in the query string.
    #[instrument(skip(self), fields(base_url = %self.base_url))]
    pub async fn query<Q, R>(&self, method: Method, path: &str, params: &Q) -> Result<R>
    where
        Q: Serialize + std::fmt::Debug,
        R: DeserializeOwned,
    {
        let url = self.base_url.endpoint(path);
        debug!(%method, path, "API query");
        trace!(?params, "query parameters");

        let request = self.client.request(method, &url).query(params);
        self.send(request).await
    }

    /// Send a request with a JSON body.
    #[instrument(skip(self, body), fields(base_url = %self.base_url))]
    pub async fn procedure<B, R>(&self, method: Method, path: &str, body: &B) -> Result<R>
    where
        B: Serialize,
        R: DeserializeOwned,
    {
        let url = self.base_url.endpoint(path);
        debug!(%method, path, "API procedure");

        let request = self.client.request(method, &url).json(body);
        self.send(request).await
    }

    /// Send a request with neither body nor query string.
    #[instrument(skip(self), fields(base_url = %self.base_url))]
    pub async fn call<R>(&self, method: Method, path: &str) -> Result<R>
    where
        R: DeserializeOwned,
    {
        let url = self.base_url.endpoint(path);
        debug!(%method, path, "API call");

        let request = self.client.request(method, &url);
        self.send(request).await
    }

    async fn send<R: DeserializeOwned>(&self, request: reqwest::RequestBuilder) -> Result<R> {
        let response = request
            .send()
            .await
            .map_err(|e| self.transport_error(&e))?;

        self.handle_response(response).await
    }

    /// Turn a response into the typed payload or an [`ApiError`].
    ///
    /// A 2xx response whose body says `"success": false` is still a failure.
    async fn handle_response<R: DeserializeOwned>(&self, response: reqwest::Response) -> Result<R> {
        let status = response.status();
        trace!(status = %status, "API response");

        // A status line arrived, so body failures keep the status.
        let bytes = match response.bytes().await {
            Ok(bytes) => bytes,
            Err(e) if !status.is_success() => {
                warn!(status = %status, error = %e, "Failed to read error body");
                Default::default()
            }
            Err(e) => {
                return Err(ApiError::new(
                    status.as_u16(),
                    Some("InvalidResponse".to_string()),
                    format!("failed to read response body: {}", e),
                )
                .into());
            }
        };

        if !status.is_success() {
            return Err(parse_error_response(status, &bytes).into());
        }

        let body: Value = serde_json::from_slice(&bytes).map_err(|e| {
            ApiError::new(
                status.as_u16(),
                Some("InvalidResponse".to_string()),
                format!("response body is not valid JSON: {}", e),
            )
        })?;

        if body.get("success").and_then(Value::as_bool) == Some(false) {
            return Err(parse_error_response(status, &bytes).into());
        }

        serde_json::from_value(body).map_err(|e| {
            ApiError::new(
                status.as_u16(),
                Some("InvalidResponse".to_string()),
                format!("unexpected response shape: {}", e),
            )
            .into()
        })
    }

    /// Map a reqwest failure onto the no-response sentinel.
    fn transport_error(&self, err: &reqwest::Error) -> ApiError {
        let message = if err.is_timeout() {
            format!("request timed out after {}ms", self.timeout.as_millis())
        } else if err.is_connect() {
            format!("connection failed: {}", err)
        } else {
            format!("request failed: {}", err)
        };
        debug!(%message, "transport failure");
        ApiError::transport(message)
    }
}

/// Parse a failure body, falling back to the status reason phrase when the
/// body is missing or not JSON.
fn parse_error_response(status: StatusCode, bytes: &[u8]) -> ApiError {
    let fallback = status
        .canonical_reason()
        .unwrap_or("request failed")
        .to_string();

    match serde_json::from_slice::<ErrorResponse>(bytes) {
        Ok(ErrorResponse {
            error: Some(error),
            message: Some(message),
        }) => ApiError::new(status.as_u16(), Some(error), message),
        Ok(ErrorResponse {
            error,
            message: None,
        }) => ApiError::new(status.as_u16(), None, error.unwrap_or(fallback)),
        Ok(ErrorResponse {
            error: None,
            message: Some(message),
        }) => ApiError::new(status.as_u16(), None, message),
        Err(_) => ApiError::new(status.as_u16(), None, fallback),
    }
}
