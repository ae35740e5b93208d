//! Chat orchestrator: runs one request/response cycle.
//!
//! The store and generator degrade on their own, so every step here checks
//! its own result, logs failures and carries on. A reply is always produced.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, error, info};

use helpdesk_core::types::{new_session_id, Message, Role};
use helpdesk_storage::ConversationStore;

use crate::error::ChatError;
use crate::response::ResponseGenerator;
use crate::types::{ChatHistory, ChatReply};

/// Reply used when generation itself could not complete.
pub const TECHNICAL_DIFFICULTIES: &str =
    "I'm sorry, I'm experiencing technical difficulties right now. Please try again in a moment.";

/// Central coordinator wiring the conversation store and response generator.
pub struct ChatOrchestrator {
    store: Arc<ConversationStore>,
    generator: Arc<ResponseGenerator>,
}

impl ChatOrchestrator {
    pub fn new(store: Arc<ConversationStore>, generator: Arc<ResponseGenerator>) -> Self {
        Self { store, generator }
    }

    pub fn store(&self) -> &ConversationStore {
        &self.store
    }

    pub fn generator(&self) -> &ResponseGenerator {
        &self.generator
    }

    /// Handle an incoming chat message.
    ///
    /// A missing or empty `session_id` starts a new session.
    pub async fn handle_chat(&self, message: &str, session_id: Option<String>) -> ChatReply {
        let session_id = match session_id {
            Some(id) if !id.is_empty() => id,
            _ => {
                let id = new_session_id();
                debug!(session_id = %id, "Started new session");
                id
            }
        };

        if let Err(e) = self.store.create_conversation(&session_id).await {
            error!(session_id = %session_id, error = %e, "Failed to create conversation");
        }

        let history = match self.store.get_conversation_messages(&session_id).await {
            Ok(messages) => messages,
            Err(e) => {
                error!(session_id = %session_id, error = %e, "Failed to load history");
                Vec::new()
            }
        };

        if let Err(e) = self.store.add_message(&session_id, Role::User, message).await {
            error!(session_id = %session_id, error = %e, "Failed to store user message");
        }

        let response = self.generate(message, history).await;

        if let Err(e) = self
            .store
            .add_message(&session_id, Role::Assistant, &response)
            .await
        {
            error!(session_id = %session_id, error = %e, "Failed to store assistant message");
        }

        info!(session_id = %session_id, "Chat turn completed");

        ChatReply {
            response,
            session_id,
            timestamp: Utc::now(),
        }
    }

    /// Generate on a separate task so a panic inside the backend still
    /// yields a reply.
    async fn generate(&self, message: &str, history: Vec<Message>) -> String {
        let generator = Arc::clone(&self.generator);
        let message = message.to_string();

        let task = tokio::spawn(async move {
            if history.is_empty() {
                generator.generate_simple_response(&message).await
            } else {
                generator.generate_response(&message, &history).await
            }
        });

        match task.await {
            Ok(response) => response,
            Err(e) => {
                error!(error = %e, "Response generation task failed");
                TECHNICAL_DIFFICULTIES.to_string()
            }
        }
    }

    /// Conversation metadata and ordered messages for a session.
    pub async fn get_history(&self, session_id: &str) -> Result<ChatHistory, ChatError> {
        let conversation = self
            .store
            .get_conversation(session_id)
            .await?
            .ok_or_else(|| ChatError::SessionNotFound(session_id.to_string()))?;
        let messages = self.store.get_conversation_messages(session_id).await?;

        Ok(ChatHistory {
            session_id: session_id.to_string(),
            conversation,
            messages,
        })
    }
}

impl std::fmt::Debug for ChatOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatOrchestrator")
            .field("store", &self.store)
            .field("generator", &self.generator)
            .finish()
    }
}

// =============================================================================
// Tests
// =============================================================================
