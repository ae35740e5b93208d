//! Types returned by the chat orchestrator.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use helpdesk_core::types::{Conversation, Message};

/// Reply to a single chat turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatReply {
    pub response: String,
    pub session_id: String,
    pub timestamp: DateTime<Utc>,
}

/// A conversation and its messages, oldest first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatHistory {
    pub session_id: String,
    pub conversation: Conversation,
    pub messages: Vec<Message>,
}
