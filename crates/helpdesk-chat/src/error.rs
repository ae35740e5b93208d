//! Error types for the chat engine.

use helpdesk_core::error::HelpdeskError;
use helpdesk_storage::StorageError;

/// Errors from the chat orchestrator.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("session not found: {0}")]
    SessionNotFound(String),
    #[error("storage error: {0}")]
    Storage(String),
}

impl From<StorageError> for ChatError {
    fn from(err: StorageError) -> Self {
        ChatError::Storage(err.to_string())
    }
}

impl From<ChatError> for HelpdeskError {
    fn from(err: ChatError) -> Self {
        HelpdeskError::Storage(err.to_string())
    }
}

/// Failure reported by a text-generation backend.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("generation API returned {status}: {message}")]
    Status { status: u16, message: String },
    #[error("could not decode generation response: {0}")]
    Decode(String),
    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(String),
}

impl From<GenerationError> for HelpdeskError {
    fn from(err: GenerationError) -> Self {
        HelpdeskError::Generation(err.to_string())
    }
}
