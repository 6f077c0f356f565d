//! HTTP transport for the messages endpoint.
//!
//! The transport only moves bytes: it reports the status and body of whatever came back
//! and leaves classification to the generation client.

use crate::error::GenerationError;
use crate::provider::MessagesRequest;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

/// Raw HTTP outcome of a messages call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

impl TransportResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends a messages request to a text-generation endpoint.
#[async_trait]
pub trait MessagesTransport: Send + Sync {
    /// Perform exactly one request. Errors mean no HTTP response was received.
    async fn send(
        &self,
        api_key: &str,
        request: &MessagesRequest,
    ) -> Result<TransportResponse, GenerationError>;
}

// Helper function to map reqwest failures to GenerationError
fn map_http_error(error: reqwest::Error) -> GenerationError {
    if error.is_timeout() {
        GenerationError::Transport(format!("Request timeout: {}", error))
    } else if error.is_connect() {
        GenerationError::Transport(format!("Connection error: {}", error))
    } else {
        GenerationError::Transport(format!("HTTP error: {}", error))
    }
}

/// reqwest-backed transport for the Anthropic messages API.
pub struct HttpTransport {
    client: Client,
    endpoint: String,
    api_version: String,
}

impl HttpTransport {
    pub fn new(
        endpoint: impl Into<String>,
        api_version: impl Into<String>,
        connect_timeout: Duration,
        request_timeout: Duration,
    ) -> Result<Self, GenerationError> {
        let client = Client::builder()
            .connect_timeout(connect_timeout)
            .timeout(request_timeout)
            .build()
            .map_err(|e| {
                GenerationError::Configuration(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
            api_version: api_version.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl MessagesTransport for HttpTransport {
    async fn send(
        &self,
        api_key: &str,
        request: &MessagesRequest,
    ) -> Result<TransportResponse, GenerationError> {
        let response = self
            .client
            .post(&self.endpoint)
            .header("x-api-key", api_key)
            .header("anthropic-version", &self.api_version)
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await
            .map_err(map_http_error)?;

        let status = response.status().as_u16();
        let body = if response.status().is_success() {
            response.text().await.map_err(map_http_error)?
        } else {
            response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string())
        };

        debug!(status, body_len = body.len(), endpoint = %self.endpoint, "Messages endpoint responded");
        Ok(TransportResponse { status, body })
    }
}
