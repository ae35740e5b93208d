//! Reply generation with one-way live -> mock degradation.
//!
//! While live, replies come from the generation backend. The first backend
//! failure switches the generator to deterministic templates for the rest of
//! the process lifetime; the failing call is answered from the templates too.

use std::sync::Arc;

use tracing::{error, info, warn};

use helpdesk_core::config::GeminiConfig;
use helpdesk_core::mode::BackendMode;
use helpdesk_core::types::Message;

use crate::backend::GenerationBackend;
use crate::error::GenerationError;
use crate::gemini::GeminiClient;
use crate::prompt::{build_context_prompt, build_simple_prompt, SYSTEM_PROMPT};

/// Returned when the backend answers a contextual request with no text.
pub const EMPTY_RESPONSE_FALLBACK: &str = "I apologize, but I'm having trouble generating a response right now. Could you please try again or rephrase your question?";

/// Returned when the backend answers a single-turn request with no text.
pub const EMPTY_SIMPLE_RESPONSE_FALLBACK: &str =
    "Thank you for your message. How can I help you today?";

/// Number of templates the contextual mock cycles through.
pub const MOCK_TEMPLATE_COUNT: usize = 5;

// =============================================================================
// Mock templates
// =============================================================================

/// Contextual mock reply: template `history_len % MOCK_TEMPLATE_COUNT`.
pub fn mock_response(user_message: &str, history_len: usize) -> String {
    match history_len % MOCK_TEMPLATE_COUNT {
        0 => format!(
            "Thank you for contacting our support team! I understand you mentioned: '{}'. I'm here to help you resolve this issue.",
            user_message
        ),
        1 => format!(
            "I see you're asking about '{}'. Let me provide you with some assistance on this matter.",
            user_message
        ),
        2 => format!(
            "Thanks for reaching out! Regarding '{}', I'd be happy to help. Could you provide a bit more detail about your specific situation?",
            user_message
        ),
        3 => format!(
            "I appreciate you contacting us about '{}'. Based on your message, I can offer some guidance to help resolve this.",
            user_message
        ),
        _ => format!(
            "Hello! I've received your message about '{}'. I'm here to provide support and find the best solution for you.",
            user_message
        ),
    }
}

/// Single-turn mock reply; independent of history.
pub fn mock_simple_response(user_message: &str) -> String {
    format!(
        "Thank you for your message: '{}'. I'm here to help! Could you please tell me more about what you need assistance with?",
        user_message
    )
}

// =============================================================================
// ResponseGenerator
// =============================================================================

/// Produces support-agent replies.
pub struct ResponseGenerator {
    backend: Option<Arc<dyn GenerationBackend>>,
    mode: BackendMode,
}

impl ResponseGenerator {
    /// Build the generator from configuration.
    ///
    /// Live only when the API key differs from the placeholder and the client
    /// can be built.
    pub fn from_config(config: &GeminiConfig) -> Self {
        if !config.is_configured() {
            info!("Using mock response generator (no Gemini API key configured)");
            return Self::mock();
        }

        match GeminiClient::new(config) {
            Ok(client) => {
                info!(model = %config.model, "Gemini client configured");
                Self::with_backend(Arc::new(client))
            }
            Err(e) => {
                warn!(error = %e, "Could not configure Gemini client, using mock responses");
                Self::mock()
            }
        }
    }

    /// A generator that only ever uses the templates.
    pub fn mock() -> Self {
        Self {
            backend: None,
            mode: BackendMode::mock(),
        }
    }

    /// A live generator backed by the given backend.
    pub fn with_backend(backend: Arc<dyn GenerationBackend>) -> Self {
        Self {
            backend: Some(backend),
            mode: BackendMode::live(),
        }
    }

    pub fn is_mock(&self) -> bool {
        self.mode.is_mock()
    }

    fn live(&self) -> Option<&dyn GenerationBackend> {
        if self.mode.is_mock() {
            return None;
        }
        self.backend.as_deref()
    }

    fn degrade(&self, operation: &'static str, err: &GenerationError) {
        error!(operation, error = %err, "Generation request failed");
        if self.mode.trip() {
            warn!(operation, "Response generator switched to mock mode");
        }
    }

    /// Reply to `user_message` using the last turns of `history` as context.
    pub async fn generate_response(&self, user_message: &str, history: &[Message]) -> String {
        if let Some(backend) = self.live() {
            let prompt = build_context_prompt(SYSTEM_PROMPT, history, user_message);
            match backend.generate(&prompt).await {
                Ok(Some(text)) => return text,
                Ok(None) => {
                    warn!("Empty response from generation backend");
                    return EMPTY_RESPONSE_FALLBACK.to_string();
                }
                Err(e) => self.degrade("generate_response", &e),
            }
        }
        mock_response(user_message, history.len())
    }

    /// Reply to `user_message` without conversation context.
    pub async fn generate_simple_response(&self, user_message: &str) -> String {
        if let Some(backend) = self.live() {
            let prompt = build_simple_prompt(SYSTEM_PROMPT, user_message);
            match backend.generate(&prompt).await {
                Ok(Some(text)) => return text,
                Ok(None) => {
                    warn!("Empty simple response from generation backend");
                    return EMPTY_SIMPLE_RESPONSE_FALLBACK.to_string();
                }
                Err(e) => self.degrade("generate_simple_response", &e),
            }
        }
        mock_simple_response(user_message)
    }
}

impl std::fmt::Debug for ResponseGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResponseGenerator")
            .field("mode", &self.mode.to_string())
            .field("has_backend", &self.backend.is_some())
            .finish()
    }
}

// =============================================================================
// Tests
// =============================================================================
