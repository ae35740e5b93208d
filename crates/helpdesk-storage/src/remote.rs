//! Remote document store abstraction.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use helpdesk_core::types::{Conversation, Message};

use crate::error::RemoteError;

/// Operations the conversation store needs from a hosted document database.
///
/// Implementations report missing documents as `RemoteError::NotFound` and
/// duplicate ids as `RemoteError::Conflict`; the store decides what those mean.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Create the conversation document keyed by its session id.
    async fn create_conversation(
        &self,
        conversation: &Conversation,
    ) -> Result<Conversation, RemoteError>;

    /// Fetch the conversation document for a session id.
    async fn get_conversation(&self, session_id: &str) -> Result<Conversation, RemoteError>;

    /// Set the conversation's `updated_at`.
    async fn touch_conversation(
        &self,
        session_id: &str,
        updated_at: DateTime<Utc>,
    ) -> Result<(), RemoteError>;

    /// Create a message document keyed by the message id.
    async fn create_message(&self, message: &Message) -> Result<Message, RemoteError>;

    /// All messages of a session, newest first.
    async fn list_messages_newest_first(
        &self,
        session_id: &str,
    ) -> Result<Vec<Message>, RemoteError>;
}
