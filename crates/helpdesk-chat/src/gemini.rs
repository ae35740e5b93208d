//! Gemini `generateContent` client.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::Url;
use serde::Deserialize;
use serde_json::{json, Value};

use helpdesk_core::config::GeminiConfig;

use crate::backend::GenerationBackend;
use crate::error::GenerationError;

/// Harm categories blocked at medium probability and above.
const SAFETY_CATEGORIES: [&str; 4] = [
    "HARM_CATEGORY_HARASSMENT",
    "HARM_CATEGORY_HATE_SPEECH",
    "HARM_CATEGORY_SEXUALLY_EXPLICIT",
    "HARM_CATEGORY_DANGEROUS_CONTENT",
];

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorEnvelope {
    error: GeminiErrorBody,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorBody {
    message: String,
}

/// Client for one Gemini model.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    url: Url,
    temperature: f32,
    top_p: f32,
    top_k: u32,
    max_output_tokens: u32,
}

impl GeminiClient {
    /// Build a client from configuration. No request is made.
    pub fn new(config: &GeminiConfig) -> Result<Self, GenerationError> {
        let raw = format!(
            "{}/models/{}:generateContent",
            config.endpoint.trim_end_matches('/'),
            config.model
        );
        let url = Url::parse(&raw)
            .map_err(|e| GenerationError::InvalidEndpoint(format!("{}: {}", raw, e)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(GenerationError::InvalidEndpoint(raw));
        }

        let mut key = HeaderValue::from_str(&config.api_key)
            .map_err(|e| GenerationError::InvalidEndpoint(format!("api key: {}", e)))?;
        key.set_sensitive(true);
        let mut headers = HeaderMap::new();
        headers.insert("x-goog-api-key", key);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| GenerationError::Transport(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            url,
            temperature: config.temperature,
            top_p: config.top_p,
            top_k: config.top_k,
            max_output_tokens: config.max_output_tokens,
        })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Request body for a single-turn prompt.
    pub fn build_request_body(&self, prompt: &str) -> Value {
        let safety_settings: Vec<Value> = SAFETY_CATEGORIES
            .iter()
            .map(|category| json!({"category": category, "threshold": "BLOCK_MEDIUM_AND_ABOVE"}))
            .collect();

        json!({
            "contents": [{ "role": "user", "parts": [{ "text": prompt }] }],
            "generationConfig": {
                "temperature": self.temperature,
                "topP": self.top_p,
                "topK": self.top_k,
                "maxOutputTokens": self.max_output_tokens,
            },
            "safetySettings": safety_settings,
        })
    }
}

/// Text of the first candidate, trimmed; `None` when there is none.
fn extract_text(response: GenerateContentResponse) -> Option<String> {
    let content = response.candidates.into_iter().next()?.content?;
    let text: String = content
        .parts
        .into_iter()
        .filter_map(|p| p.text)
        .collect::<Vec<_>>()
        .join("");
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[async_trait]
impl GenerationBackend for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<Option<String>, GenerationError> {
        let response = self
            .http
            .post(self.url.clone())
            .json(&self.build_request_body(prompt))
            .send()
            .await
            .map_err(|e| GenerationError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| GenerationError::Transport(e.to_string()))?;

        if !status.is_success() {
            let message = serde_json::from_str::<GeminiErrorEnvelope>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(GenerationError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: GenerateContentResponse = serde_json::from_str(&body)
            .map_err(|e| GenerationError::Decode(e.to_string()))?;
        Ok(extract_text(parsed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn configured() -> GeminiConfig {
        GeminiConfig {
            api_key: "real-key".to_string(),
            ..GeminiConfig::default()
        }
    }

    #[test]
    fn test_url_targets_configured_model() {
        let client = GeminiClient::new(&configured()).unwrap();
        assert_eq!(
            client.url().as_str(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-1.5-flash:generateContent"
        );
        assert!(client.url().query().is_none());
    }

    #[test]
    fn test_rejects_invalid_endpoint() {
        let config = GeminiConfig {
            endpoint: "definitely not a url".to_string(),
            ..configured()
        };
        assert!(matches!(
            GeminiClient::new(&config),
            Err(GenerationError::InvalidEndpoint(_))
        ));
    }

    #[test]
    fn test_request_body_shape() {
        let client = GeminiClient::new(&configured()).unwrap();
        let body = client.build_request_body("Hello");
        assert_eq!(body["contents"][0]["parts"][0]["text"], "Hello");
        assert_eq!(body["generationConfig"]["topK"], 40);
        assert_eq!(body["generationConfig"]["maxOutputTokens"], 1024);
        let settings = body["safetySettings"].as_array().unwrap();
        assert_eq!(settings.len(), 4);
        assert!(settings
            .iter()
            .all(|s| s["threshold"] == "BLOCK_MEDIUM_AND_ABOVE"));
    }

    #[test]
    fn test_extract_text_joins_parts_and_trims() {
        let response: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{
                "content": { "parts": [{ "text": "  Hello " }, { "text": "there!\n" }] },
                "finishReason": "STOP"
            }]
        }))
        .unwrap();
        assert_eq!(extract_text(response).as_deref(), Some("Hello there!"));
    }

    #[test]
    fn test_extract_text_empty_cases() {
        let none: GenerateContentResponse = serde_json::from_value(json!({})).unwrap();
        assert!(extract_text(none).is_none());

        let blocked: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{ "finishReason": "SAFETY" }]
        }))
        .unwrap();
        assert!(extract_text(blocked).is_none());

        let blank: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{ "content": { "parts": [{ "text": "   " }] } }]
        }))
        .unwrap();
        assert!(extract_text(blank).is_none());
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_transport_error() {
        let config = GeminiConfig {
            endpoint: "http://127.0.0.1:1/v1beta".to_string(),
            ..configured()
        };
        let client = GeminiClient::new(&config).unwrap();
        let err = client.generate("hi").await.unwrap_err();
        assert!(matches!(err, GenerationError::Transport(_)));
    }
}
