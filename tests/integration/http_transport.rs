//! Integration tests for the HTTP transport against a local fake endpoint

use serde_json::json;
use std::time::Duration;
use tarantino::config::ProviderConfig;
use tarantino::error::{ErrorKind, GenerationError};
use tarantino::provider::{GenerationClient, GenerationRequest, Generator, HttpTransport};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Request as seen by the fake endpoint.
struct Captured {
    head: String,
    body: String,
}

/// Serve exactly one request with the given status and body.
async fn serve_once(status: u16, body: String) -> (String, JoinHandle<Captured>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let endpoint = format!("http://{}/v1/messages", listener.local_addr().unwrap());

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];
        let (head, body_start, content_length) = loop {
            let n = socket.read(&mut chunk).await.unwrap();
            assert!(n > 0, "client closed before sending headers");
            buf.extend_from_slice(&chunk[..n]);
            if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                let head = String::from_utf8_lossy(&buf[..pos]).to_string();
                let content_length = head
                    .lines()
                    .find_map(|line| {
                        let (name, value) = line.split_once(':')?;
                        name.eq_ignore_ascii_case("content-length")
                            .then(|| value.trim().parse::<usize>().ok())
                            .flatten()
                    })
                    .unwrap_or(0);
                break (head, pos + 4, content_length);
            }
        };
        while buf.len() < body_start + content_length {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
        }
        let request_body = String::from_utf8_lossy(&buf[body_start..]).to_string();

        let response = format!(
            "HTTP/1.1 {} Test\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.ok();

        Captured {
            head,
            body: request_body,
        }
    });

    (endpoint, handle)
}

fn client_for(endpoint: &str, api_key: &str) -> GenerationClient {
    let config = ProviderConfig {
        endpoint: endpoint.to_string(),
        api_key: Some(api_key.to_string()),
        model: "test-model".to_string(),
        ..ProviderConfig::default()
    };
    GenerationClient::from_config(&config).unwrap()
}

#[tokio::test]
async fn test_successful_round_trip_sends_headers_and_body() {
    let reply = json!({
        "content": [{"type": "text", "text": "{\"title\":\"Roots\"}"}],
        "stop_reason": "end_turn"
    });
    let (endpoint, server) = serve_once(200, reply.to_string()).await;

    let value = client_for(&endpoint, "sk-local")
        .generate(GenerationRequest::new("Write it").with_max_output_tokens(500))
        .await
        .unwrap();
    assert_eq!(value, json!({"title": "Roots"}));

    let captured = server.await.unwrap();
    let head = captured.head.to_lowercase();
    assert!(head.starts_with("post /v1/messages"));
    assert!(head.contains("x-api-key: sk-local"));
    assert!(head.contains("anthropic-version: 2023-06-01"));
    assert!(head.contains("content-type: application/json"));

    let sent: serde_json::Value = serde_json::from_str(&captured.body).unwrap();
    assert_eq!(sent["model"], json!("test-model"));
    assert_eq!(sent["max_tokens"], json!(500));
    assert_eq!(sent["messages"][0]["role"], json!("user"));
    assert_eq!(sent["messages"][0]["content"], json!("Write it"));
    assert!(sent["system"].as_str().unwrap().contains("JSON"));
}

#[tokio::test]
async fn test_unauthorized_status_is_provider_error() {
    let (endpoint, server) = serve_once(401, r#"{"error":"invalid x-api-key"}"#.to_string()).await;

    let err = client_for(&endpoint, "sk-wrong")
        .generate(GenerationRequest::new("Write it"))
        .await
        .unwrap_err();
    match err {
        GenerationError::Provider { status, body } => {
            assert_eq!(status, 401);
            assert!(body.contains("invalid x-api-key"));
        }
        other => panic!("expected provider error, got {:?}", other),
    }
    server.await.unwrap();
}

#[tokio::test]
async fn test_unreachable_endpoint_is_transport_error() {
    // Bind then drop to get a port nothing listens on.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let transport = HttpTransport::new(
        format!("http://{}/v1/messages", addr),
        "2023-06-01",
        Duration::from_secs(2),
        Duration::from_secs(2),
    )
    .unwrap();
    let client = GenerationClient::new(std::sync::Arc::new(transport), "m", Some("k".to_string()));

    let err = client.generate(GenerationRequest::new("p")).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Transport);
    assert!(err.is_retryable());
}
