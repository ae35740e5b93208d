//! Error types for conversation storage.

use helpdesk_core::error::HelpdeskError;

/// Failure reported by a remote document store.
///
/// `NotFound` and `Conflict` carry meaning for the store's fallback policy;
/// everything else is an unhandled failure that trips the store into mock mode.
#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
    #[error("document not found: {0}")]
    NotFound(String),
    #[error("document already exists: {0}")]
    Conflict(String),
    #[error("remote returned {status}: {message}")]
    Status { status: u16, message: String },
    #[error("transport error: {0}")]
    Transport(String),
    #[error("could not decode remote response: {0}")]
    Decode(String),
    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(String),
}

impl RemoteError {
    /// Classify a non-success HTTP status and its response body.
    pub fn from_status(status: u16, message: String) -> Self {
        match status {
            404 => RemoteError::NotFound(message),
            409 => RemoteError::Conflict(message),
            _ => RemoteError::Status { status, message },
        }
    }

    /// Whether the remote answered with an HTTP error (as opposed to the
    /// request never completing or the answer being unreadable).
    pub fn is_http_error(&self) -> bool {
        matches!(
            self,
            RemoteError::NotFound(_) | RemoteError::Conflict(_) | RemoteError::Status { .. }
        )
    }
}

/// Errors surfaced by `ConversationStore` after fallback has been applied.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("in-memory store lock poisoned: {0}")]
    LockPoisoned(String),
}

impl From<StorageError> for HelpdeskError {
    fn from(err: StorageError) -> Self {
        HelpdeskError::Storage(err.to_string())
    }
}
