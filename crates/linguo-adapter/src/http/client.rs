/*
[INPUT]:  HTTP configuration (base URL, timeouts)
[OUTPUT]: Configured reqwest client ready for API calls
[POS]:    HTTP layer - core client implementation
[UPDATE]: When adding connection options or changing client behavior
*/

use crate::http::{LinguoError, Result};
use crate::types::ApiErrorBody;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Base URL for the hosted Linguo API
const DEFAULT_BASE_URL: &str = "https://api.linguo.kleros.io";

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub timeout: Duration,
    pub connect_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
        }
    }
}

/// Main HTTP client for the Linguo API
#[derive(Debug, Clone)]
pub struct LinguoClient {
    http_client: Client,
    base_url: Url,
    timeout: Duration,
}

impl LinguoClient {
    /// Create a new client with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(ClientConfig::default())
    }

    /// Create a new client with custom configuration
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        Self::with_config_and_base_url(config, DEFAULT_BASE_URL)
    }

    /// Create a new client pointing at a custom base URL
    pub fn with_config_and_base_url(config: ClientConfig, base_url: &str) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .build()?;

        Ok(Self {
            http_client,
            base_url: Url::parse(base_url)?,
            timeout: config.timeout,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Build request builder for an API endpoint
    pub(crate) fn request(&self, method: Method, endpoint: &str) -> Result<RequestBuilder> {
        let url = self.base_url.join(endpoint)?;
        Ok(self.http_client.request(method, url))
    }

    /// Send a request and decode a JSON body, mapping non-2xx statuses to errors
    pub(crate) async fn send_json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T> {
        let response = self.send(builder).await?;
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(LinguoError::from)
    }

    /// Like `send_json`, but a 404 yields `Ok(None)`
    pub(crate) async fn send_json_optional<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
    ) -> Result<Option<T>> {
        match self.send_json(builder).await {
            Ok(value) => Ok(Some(value)),
            Err(LinguoError::NotFound(_)) => Ok(None),
            Err(err) => Err(err),
        }
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Response> {
        let response = builder.send().await.map_err(|err| {
            if err.is_timeout() {
                LinguoError::Timeout {
                    duration: self.timeout.as_secs(),
                }
            } else {
                LinguoError::Http(err)
            }
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let url = response.url().to_string();
        match status {
            StatusCode::NOT_FOUND => Err(LinguoError::NotFound(url)),
            StatusCode::TOO_MANY_REQUESTS => {
                let retry_after = response
                    .headers()
                    .get(reqwest::header::RETRY_AFTER)
                    .and_then(|value| value.to_str().ok())
                    .and_then(|value| value.parse().ok())
                    .unwrap_or(1);
                Err(LinguoError::RateLimit { retry_after })
            }
            _ => {
                let body = response.text().await.unwrap_or_default();
                let parsed: ApiErrorBody = serde_json::from_str(&body).unwrap_or_default();
                let message = if parsed.message.is_empty() {
                    body
                } else {
                    parsed.message
                };
                tracing::debug!(%url, status = status.as_u16(), %message, "api request failed");
                Err(LinguoError::api_error(status, message))
            }
        }
    }
}
