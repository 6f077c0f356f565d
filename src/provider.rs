//! Generation Client
//!
//! Sends a single prompt to the remote text-generation endpoint under a strict
//! "JSON only" contract and turns the reply into a parsed payload. Every failure is
//! classified into a [`GenerationError`]; retrying is left to the caller.

pub mod transport;

pub use transport::{HttpTransport, MessagesTransport, TransportResponse};

use crate::config::ProviderConfig;
use crate::error::GenerationError;
use crate::extract::{extract_detailed, truncate_chars, Strategy};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

pub const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";
pub const DEFAULT_ENDPOINT: &str = "https://api.anthropic.com/v1/messages";
pub const DEFAULT_API_VERSION: &str = "2023-06-01";
pub const DEFAULT_API_KEY_ENV: &str = "ANTHROPIC_API_KEY";
pub const DEFAULT_MAX_OUTPUT_TOKENS: u32 = 16000;
pub const JSON_ONLY_INSTRUCTION: &str =
    "Respond with valid JSON only. No markdown, no code fences, no commentary before or after the JSON.";

/// Stop reason reported when output hit the token bound.
pub const TRUNCATED_STOP_REASON: &str = "max_tokens";

const PREVIEW_CHARS: usize = 500;

/// One generation call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub prompt: String,
    pub max_output_tokens: u32,
}

impl GenerationRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            max_output_tokens: DEFAULT_MAX_OUTPUT_TOKENS,
        }
    }

    pub fn with_max_output_tokens(mut self, max_output_tokens: u32) -> Self {
        self.max_output_tokens = max_output_tokens;
        self
    }
}

/// Outcome of a generation call: the parsed payload or a classified failure.
pub type GenerationResult = Result<Value, GenerationError>;

/// Chat message role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

/// Chat message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: String,
}

/// Messages API request body.
#[derive(Debug, Clone, Serialize)]
pub struct MessagesRequest {
    pub model: String,
    pub max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    pub messages: Vec<ChatMessage>,
}

/// Messages API response body (only the fields the pipeline reads).
#[derive(Debug, Clone, Deserialize)]
pub struct MessagesResponse {
    #[serde(default)]
    pub content: Vec<ContentBlock>,
    #[serde(default)]
    pub stop_reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ContentBlock {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub text: Option<String>,
}

impl MessagesResponse {
    /// Text segments joined by newlines; non-text blocks are skipped.
    pub fn text(&self) -> String {
        self.content
            .iter()
            .filter(|block| block.kind == "text")
            .filter_map(|block| block.text.as_deref())
            .filter(|text| !text.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn was_truncated(&self) -> bool {
        self.stop_reason.as_deref() == Some(TRUNCATED_STOP_REASON)
    }
}

/// Anything that can turn a prompt into a parsed payload.
#[async_trait]
pub trait Generator: Send + Sync {
    async fn generate(&self, request: GenerationRequest) -> GenerationResult;
}

/// Client for the remote generation endpoint.
pub struct GenerationClient {
    transport: Arc<dyn MessagesTransport>,
    model: String,
    api_key: Option<String>,
    api_key_env: String,
    system_instruction: Option<String>,
}

impl GenerationClient {
    pub fn new(
        transport: Arc<dyn MessagesTransport>,
        model: impl Into<String>,
        api_key: Option<String>,
    ) -> Self {
        Self {
            transport,
            model: model.into(),
            api_key,
            api_key_env: DEFAULT_API_KEY_ENV.to_string(),
            system_instruction: Some(JSON_ONLY_INSTRUCTION.to_string()),
        }
    }

    /// Build a client over HTTP from provider configuration.
    ///
    /// A missing credential is not an error here; it is reported by each `generate` call.
    pub fn from_config(config: &ProviderConfig) -> Result<Self, GenerationError> {
        let transport = HttpTransport::new(
            config.endpoint.clone(),
            config.api_version.clone(),
            Duration::from_secs(config.connect_timeout_secs),
            Duration::from_secs(config.request_timeout_secs),
        )?;

        let mut client = Self::new(
            Arc::new(transport),
            config.model.clone(),
            config.resolve_api_key(),
        )
        .with_system_instruction(config.system_instruction.clone());
        client.api_key_env = config.api_key_env.clone();
        Ok(client)
    }

    pub fn with_system_instruction(mut self, system_instruction: Option<String>) -> Self {
        self.system_instruction = system_instruction.filter(|s| !s.trim().is_empty());
        self
    }

    pub fn model_name(&self) -> &str {
        &self.model
    }

    pub fn has_credential(&self) -> bool {
        self.api_key.as_deref().is_some_and(|key| !key.is_empty())
    }

    fn build_request(&self, request: GenerationRequest) -> MessagesRequest {
        MessagesRequest {
            model: self.model.clone(),
            max_tokens: request.max_output_tokens,
            system: self.system_instruction.clone(),
            messages: vec![ChatMessage {
                role: MessageRole::User,
                content: request.prompt,
            }],
        }
    }
}

#[async_trait]
impl Generator for GenerationClient {
    async fn generate(&self, request: GenerationRequest) -> GenerationResult {
        if request.prompt.trim().is_empty() {
            return Err(GenerationError::Configuration(
                "Prompt must not be empty".to_string(),
            ));
        }

        let api_key = match self.api_key.as_deref().filter(|key| !key.is_empty()) {
            Some(key) => key,
            None => {
                return Err(GenerationError::Configuration(format!(
                    "Missing {}. Export it or set provider.api_key in your config file.",
                    self.api_key_env
                )))
            }
        };

        let body = self.build_request(request);
        debug!(
            model = %body.model,
            max_tokens = body.max_tokens,
            prompt_chars = body.messages[0].content.chars().count(),
            "Sending generation request"
        );

        let response = self.transport.send(api_key, &body).await?;
        if !response.is_success() {
            warn!(status = response.status, "Generation endpoint returned an error status");
            return Err(GenerationError::Provider {
                status: response.status,
                body: response.body,
            });
        }

        let envelope: MessagesResponse = match serde_json::from_str(&response.body) {
            Ok(envelope) => envelope,
            Err(e) => {
                let body_preview = truncate_chars(&response.body, PREVIEW_CHARS).to_string();
                error!(error = %e, preview = %body_preview, "Unexpected response envelope");
                return Err(GenerationError::InvalidPayload {
                    preview: body_preview,
                });
            }
        };

        let text = envelope.text();
        match extract_detailed(&text) {
            // a repair that kept no members recovered nothing worth storing
            Some(extraction)
                if extraction.strategy == Strategy::Repaired && is_empty_container(&extraction.value) =>
            {
                warn!(
                    truncated = envelope.was_truncated(),
                    "Repair recovered an empty document; treating reply as unusable"
                );
            }
            Some(extraction) => {
                if extraction.strategy == Strategy::Repaired && envelope.was_truncated() {
                    warn!("Reply hit the output limit; keeping the repaired partial document");
                }
                info!(
                    strategy = extraction.strategy.as_str(),
                    stop_reason = envelope.stop_reason.as_deref().unwrap_or("unknown"),
                    "Generation succeeded"
                );
                return Ok(extraction.value);
            }
            None => {}
        }

        let text_preview = truncate_chars(&text, PREVIEW_CHARS).to_string();
        error!(preview = %text_preview, "Failed to parse AI response");
        if envelope.was_truncated() {
            Err(GenerationError::Truncated {
                preview: text_preview,
            })
        } else {
            Err(GenerationError::InvalidPayload {
                preview: text_preview,
            })
        }
    }
}

fn is_empty_container(value: &Value) -> bool {
    match value {
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

// Scripted transport for testing
#[cfg(test)]
pub struct MockTransport {
    responses: parking_lot::Mutex<Vec<Result<TransportResponse, GenerationError>>>,
    pub requests: parking_lot::Mutex<Vec<(String, MessagesRequest)>>,
}

#[cfg(test)]
impl MockTransport {
    pub fn new(responses: Vec<Result<TransportResponse, GenerationError>>) -> Self {
        Self {
            responses: parking_lot::Mutex::new(responses),
            requests: parking_lot::Mutex::new(Vec::new()),
        }
    }

    pub fn ok(body: Value) -> Result<TransportResponse, GenerationError> {
        Ok(TransportResponse {
            status: 200,
            body: body.to_string(),
        })
    }
}

#[cfg(test)]
#[async_trait]
impl MessagesTransport for MockTransport {
    async fn send(
        &self,
        api_key: &str,
        request: &MessagesRequest,
    ) -> Result<TransportResponse, GenerationError> {
        self.requests
            .lock()
            .push((api_key.to_string(), request.clone()));
        let mut responses = self.responses.lock();
        if responses.is_empty() {
            return Err(GenerationError::Transport("no scripted response".to_string()));
        }
        responses.remove(0)
    }
}
