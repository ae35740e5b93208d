//! Gemini client against a local fake `generateContent` endpoint.
//!
//! Exercises the real HTTP path: auth header, request body, success decoding
//! and error mapping.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};

use helpdesk_chat::{GeminiClient, GenerationBackend, GenerationError, ResponseGenerator};
use helpdesk_core::config::GeminiConfig;

const API_KEY: &str = "gemini-test-key";

/// Records what the client sent and replays one scripted response per call.
#[derive(Clone, Default)]
struct FakeGemini {
    replies: Arc<Mutex<Vec<(StatusCode, Value)>>>,
    calls: Arc<Mutex<Vec<(String, Option<String>, Value)>>>,
}

impl FakeGemini {
    fn script(&self, replies: Vec<(StatusCode, Value)>) {
        *self.replies.lock().unwrap() = replies.into_iter().rev().collect();
    }

    fn calls(&self) -> Vec<(String, Option<String>, Value)> {
        self.calls.lock().unwrap().clone()
    }
}

async fn generate_content(
    State(state): State<FakeGemini>,
    Path(call): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let key = headers
        .get("x-goog-api-key")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    state.calls.lock().unwrap().push((call, key.clone(), body));

    if key.as_deref() != Some(API_KEY) {
        return (
            StatusCode::FORBIDDEN,
            Json(json!({ "error": { "code": 403, "message": "API key not valid" } })),
        )
            .into_response();
    }

    let (status, reply) = state
        .replies
        .lock()
        .unwrap()
        .pop()
        .unwrap_or((StatusCode::OK, json!({ "candidates": [] })));
    (status, Json(reply)).into_response()
}

async fn spawn_fake() -> (SocketAddr, FakeGemini) {
    let state = FakeGemini::default();
    let app = Router::new()
        .route("/v1beta/models/{call}", post(generate_content))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (addr, state)
}

fn config_for(addr: SocketAddr) -> GeminiConfig {
    GeminiConfig {
        api_key: API_KEY.to_string(),
        endpoint: format!("http://{}/v1beta", addr),
        ..GeminiConfig::default()
    }
}

fn text_reply(text: &str) -> Value {
    json!({
        "candidates": [{
            "content": { "role": "model", "parts": [{ "text": text }] },
            "finishReason": "STOP"
        }]
    })
}

#[tokio::test]
async fn test_generate_sends_key_and_decodes_text() {
    let (addr, fake) = spawn_fake().await;
    fake.script(vec![(StatusCode::OK, text_reply(" hi "))]);
    let client = GeminiClient::new(&config_for(addr)).unwrap();

    let text = client.generate("User: hello\nAssistant:").await.unwrap();
    assert_eq!(text.as_deref(), Some("hi"));

    let calls = fake.calls();
    assert_eq!(calls.len(), 1);
    let (call, key, body) = &calls[0];
    assert_eq!(call, "gemini-1.5-flash:generateContent");
    assert_eq!(key.as_deref(), Some(API_KEY));
    assert_eq!(body["contents"][0]["parts"][0]["text"], "User: hello\nAssistant:");
    assert_eq!(body["safetySettings"].as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn test_error_status_uses_message_envelope() {
    let (addr, fake) = spawn_fake().await;
    fake.script(vec![(
        StatusCode::TOO_MANY_REQUESTS,
        json!({ "error": { "code": 429, "message": "quota", "status": "RESOURCE_EXHAUSTED" } }),
    )]);
    let client = GeminiClient::new(&config_for(addr)).unwrap();

    match client.generate("hi").await {
        Err(GenerationError::Status { status, message }) => {
            assert_eq!(status, 429);
            assert_eq!(message, "quota");
        }
        other => panic!("unexpected result: {:?}", other),
    }
}

#[tokio::test]
async fn test_blocked_candidate_is_empty_result() {
    let (addr, fake) = spawn_fake().await;
    fake.script(vec![(
        StatusCode::OK,
        json!({ "candidates": [{ "finishReason": "SAFETY" }] }),
    )]);
    let client = GeminiClient::new(&config_for(addr)).unwrap();

    assert_eq!(client.generate("hi").await.unwrap(), None);
}

#[tokio::test]
async fn test_undecodable_body_is_decode_error() {
    let (addr, fake) = spawn_fake().await;
    fake.script(vec![(StatusCode::OK, json!({ "candidates": "nope" }))]);
    let client = GeminiClient::new(&config_for(addr)).unwrap();

    assert!(matches!(
        client.generate("hi").await,
        Err(GenerationError::Decode(_))
    ));
}

#[tokio::test]
async fn test_wrong_key_trips_generator_to_mock() {
    let (addr, fake) = spawn_fake().await;
    let config = GeminiConfig {
        api_key: "wrong-key".to_string(),
        ..config_for(addr)
    };
    let generator = ResponseGenerator::from_config(&config);
    assert!(!generator.is_mock());

    let reply = generator.generate_simple_response("Hello").await;
    assert!(reply.contains("'Hello'"));
    assert!(generator.is_mock());

    generator.generate_simple_response("Again").await;
    assert_eq!(fake.calls().len(), 1);
}
