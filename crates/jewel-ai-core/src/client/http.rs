//! HTTP generation client
//!
//! Posts the [`GenerationRequest`] as JSON to a configured endpoint.
//! Features:
//! - Async, non-blocking requests over rustls
//! - Optional bearer token
//! - Retry with exponential backoff on connection errors, timeouts, 429 and 5xx
//!
//! # Reply format
//!
//! A JSON reply of the form `{"text": "..."}` (or `response`/`content`) is
//! unwrapped. Any other body is returned verbatim as the raw model text.

use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tokio::time::sleep;

use async_trait::async_trait;

use super::{GenerationClient, GenerationRequest};
use crate::config::ClientConfig;
use crate::error::TransportError;

/// JSON envelope some services wrap the completion in
#[derive(Debug, Deserialize)]
struct ReplyEnvelope {
    #[serde(alias = "response", alias = "content")]
    text: String,
}

/// HTTP client for the text generation service
#[derive(Debug, Clone)]
pub struct HttpGenerationClient {
    client: Client,
    config: ClientConfig,
}

impl HttpGenerationClient {
    /// Create a client with default settings for `endpoint`
    pub fn new(endpoint: impl Into<String>) -> Result<Self, TransportError> {
        Self::with_config(ClientConfig {
            endpoint: endpoint.into(),
            ..Default::default()
        })
    }

    /// Create a client with custom configuration
    pub fn with_config(config: ClientConfig) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .pool_max_idle_per_host(10)
            .pool_idle_timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| TransportError::Config(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// Start a builder
    pub fn builder() -> HttpGenerationClientBuilder {
        HttpGenerationClientBuilder::new()
    }

    /// The endpoint requests are posted to
    pub fn endpoint(&self) -> &str {
        &self.config.endpoint
    }

    /// Request timeout in milliseconds
    pub fn timeout_ms(&self) -> u64 {
        self.config.timeout_ms
    }

    /// Maximum retry count
    pub fn max_retries(&self) -> u32 {
        self.config.max_retries
    }

    async fn send_once(&self, request: &GenerationRequest) -> Result<String, TransportError> {
        let mut builder = self.client.post(&self.config.endpoint).json(request);
        if let Some(key) = &self.config.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder.send().await.map_err(map_reqwest_error)?;
        let status = response.status();
        let is_json = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.contains("json"))
            .unwrap_or(false);

        let body = response.text().await.map_err(map_reqwest_error)?;

        if !status.is_success() {
            return Err(TransportError::Status {
                status: status.as_u16(),
                body,
            });
        }

        if is_json {
            if let Ok(envelope) = serde_json::from_str::<ReplyEnvelope>(&body) {
                return Ok(envelope.text);
            }
        }
        Ok(body)
    }
}

#[async_trait]
impl GenerationClient for HttpGenerationClient {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, TransportError> {
        let mut backoff_ms = self.config.initial_backoff_ms;
        let mut attempt = 0;

        loop {
            match self.send_once(request).await {
                Ok(text) => {
                    tracing::debug!(
                        attempt = attempt,
                        model = %request.model,
                        len = text.len(),
                        "Generation request succeeded"
                    );
                    return Ok(text);
                }
                Err(e) if e.is_permanent() || attempt >= self.config.max_retries => {
                    tracing::warn!(attempt = attempt, error = %e, "Generation request failed");
                    return Err(e);
                }
                Err(e) => {
                    tracing::debug!(
                        attempt = attempt,
                        backoff_ms = backoff_ms,
                        error = %e,
                        "Retrying generation request"
                    );
                    sleep(Duration::from_millis(backoff_ms)).await;
                    backoff_ms = ((backoff_ms as f64 * self.config.backoff_multiplier) as u64)
                        .min(self.config.max_backoff_ms);
                    attempt += 1;
                }
            }
        }
    }
}

fn map_reqwest_error(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout(err.to_string())
    } else if err.is_builder() {
        TransportError::Config(err.to_string())
    } else if err.is_decode() || err.is_body() {
        TransportError::InvalidResponse(err.to_string())
    } else {
        TransportError::Connection(err.to_string())
    }
}

/// Builder for [`HttpGenerationClient`]
pub struct HttpGenerationClientBuilder {
    config: ClientConfig,
}

impl HttpGenerationClientBuilder {
    /// Create a new builder with default configuration
    pub fn new() -> Self {
        Self {
            config: ClientConfig::default(),
        }
    }

    /// Set the endpoint
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.config.endpoint = endpoint.into();
        self
    }

    /// Set the bearer token
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.api_key = Some(key.into());
        self
    }

    /// Set the request timeout
    pub fn timeout_ms(mut self, timeout: u64) -> Self {
        self.config.timeout_ms = timeout;
        self
    }

    /// Set the maximum retry attempts
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.config.max_retries = retries;
        self
    }

    /// Set the initial backoff delay
    pub fn initial_backoff_ms(mut self, backoff: u64) -> Self {
        self.config.initial_backoff_ms = backoff;
        self
    }

    /// Set the maximum backoff delay
    pub fn max_backoff_ms(mut self, backoff: u64) -> Self {
        self.config.max_backoff_ms = backoff;
        self
    }

    /// Build the client
    pub fn build(self) -> Result<HttpGenerationClient, TransportError> {
        HttpGenerationClient::with_config(self.config)
    }
}

impl Default for HttpGenerationClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
