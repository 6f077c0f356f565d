//! Integration tests for the generation client over a scripted transport

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::json;
use std::sync::Arc;
use tarantino::error::{ErrorKind, GenerationError};
use tarantino::provider::{
    GenerationClient, GenerationRequest, Generator, MessagesRequest, MessagesTransport,
    TransportResponse, JSON_ONLY_INSTRUCTION,
};

struct CannedTransport {
    response: Result<TransportResponse, GenerationError>,
    seen: Mutex<Vec<(String, MessagesRequest)>>,
}

impl CannedTransport {
    fn new(response: Result<TransportResponse, GenerationError>) -> Arc<Self> {
        Arc::new(Self {
            response,
            seen: Mutex::new(Vec::new()),
        })
    }

    fn reply(status: u16, body: serde_json::Value) -> Arc<Self> {
        Self::new(Ok(TransportResponse {
            status,
            body: body.to_string(),
        }))
    }
}

#[async_trait]
impl MessagesTransport for CannedTransport {
    async fn send(
        &self,
        api_key: &str,
        request: &MessagesRequest,
    ) -> Result<TransportResponse, GenerationError> {
        self.seen.lock().push((api_key.to_string(), request.clone()));
        self.response.clone()
    }
}

fn envelope(text: &str, stop_reason: &str) -> serde_json::Value {
    json!({
        "content": [{"type": "text", "text": text}],
        "stop_reason": stop_reason
    })
}

fn client(transport: Arc<CannedTransport>) -> GenerationClient {
    GenerationClient::new(transport, "test-model", Some("sk-test".to_string()))
}

#[tokio::test]
async fn test_generate_sends_single_user_message_with_json_instruction() {
    let transport = CannedTransport::reply(200, envelope(r#"{"title":"Roots"}"#, "end_turn"));
    let value = client(transport.clone())
        .generate(GenerationRequest::new("Write a script").with_max_output_tokens(1234))
        .await
        .unwrap();
    assert_eq!(value, json!({"title": "Roots"}));

    let seen = transport.seen.lock();
    assert_eq!(seen.len(), 1);
    let (key, request) = &seen[0];
    assert_eq!(key, "sk-test");
    assert_eq!(request.model, "test-model");
    assert_eq!(request.max_tokens, 1234);
    assert_eq!(request.system.as_deref(), Some(JSON_ONLY_INSTRUCTION));
    assert_eq!(request.messages.len(), 1);
    assert_eq!(request.messages[0].content, "Write a script");
}

#[tokio::test]
async fn test_generate_recovers_fenced_payload() {
    let transport = CannedTransport::reply(
        200,
        envelope("Sure!\n```json\n{\"title\": \"Fenced\"}\n```", "end_turn"),
    );
    let value = client(transport).generate(GenerationRequest::new("p")).await.unwrap();
    assert_eq!(value, json!({"title": "Fenced"}));
}

#[tokio::test]
async fn test_generate_repairs_truncated_payload() {
    let transport = CannedTransport::reply(
        200,
        envelope(r#"{"title":"Roots","chapters":[{"title":"One"},{"title":"Tw"#, "max_tokens"),
    );
    let value = client(transport).generate(GenerationRequest::new("p")).await.unwrap();
    assert_eq!(value, json!({"title": "Roots", "chapters": [{"title": "One"}, {}]}));
}

#[tokio::test]
async fn test_reply_cut_inside_first_member_is_truncated() {
    let transport = CannedTransport::reply(200, envelope(r#"{"title":"Half a ti"#, "max_tokens"));
    let err = client(transport).generate(GenerationRequest::new("p")).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Truncated);
    match err {
        GenerationError::Truncated { preview } => assert!(preview.contains("Half a ti")),
        other => panic!("expected truncated, got {:?}", other),
    }
}

#[tokio::test]
async fn test_empty_repair_of_complete_reply_is_invalid_payload() {
    let transport = CannedTransport::reply(200, envelope(r#"{"title":"#, "end_turn"));
    let err = client(transport).generate(GenerationRequest::new("p")).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidPayload);
}

#[tokio::test]
async fn test_unrecoverable_truncated_reply_is_truncated_error() {
    let transport = CannedTransport::reply(200, envelope("The documentary opens on", "max_tokens"));
    let err = client(transport).generate(GenerationRequest::new("p")).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Truncated);
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_unrecoverable_complete_reply_is_invalid_payload() {
    let transport = CannedTransport::reply(200, envelope("I'd rather not.", "end_turn"));
    let err = client(transport).generate(GenerationRequest::new("p")).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidPayload);
}

#[tokio::test]
async fn test_error_status_carries_status_and_body() {
    let transport = CannedTransport::reply(429, json!({"error": {"type": "rate_limit_error"}}));
    let err = client(transport).generate(GenerationRequest::new("p")).await.unwrap_err();
    assert_eq!(err.status(), Some(429));
    match err {
        GenerationError::Provider { body, .. } => assert!(body.contains("rate_limit_error")),
        other => panic!("expected provider error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_missing_credential_never_reaches_transport() {
    let transport = CannedTransport::reply(200, envelope("{}", "end_turn"));
    let client = GenerationClient::new(transport.clone(), "test-model", None);
    assert!(!client.has_credential());

    let err = client.generate(GenerationRequest::new("p")).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Configuration);
    assert!(!err.is_retryable());
    assert!(transport.seen.lock().is_empty());
}

#[tokio::test]
async fn test_transport_failure_is_propagated() {
    let transport = CannedTransport::new(Err(GenerationError::Transport(
        "Connection error: refused".to_string(),
    )));
    let err = client(transport).generate(GenerationRequest::new("p")).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Transport);
}

#[tokio::test]
async fn test_multiple_text_blocks_are_joined() {
    let transport = CannedTransport::reply(
        200,
        json!({
            "content": [
                {"type": "text", "text": "{\"title\":"},
                {"type": "tool_use", "id": "x"},
                {"type": "text", "text": "\"Joined\"}"}
            ],
            "stop_reason": "end_turn"
        }),
    );
    let value = client(transport).generate(GenerationRequest::new("p")).await.unwrap();
    assert_eq!(value, json!({"title": "Joined"}));
}
