//! Conversation store with one-way live -> mock degradation.
//!
//! Every operation first tries the remote document store while the store is
//! live. A remote "not found" is an ordinary answer. Any other remote failure
//! trips the store into mock mode and the same operation is then served by
//! the in-memory store; from then on the remote is never contacted again.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, error, info, warn};

use helpdesk_core::config::AppwriteConfig;
use helpdesk_core::mode::BackendMode;
use helpdesk_core::types::{Conversation, Message, Role};

use crate::appwrite::AppwriteClient;
use crate::error::{RemoteError, StorageError};
use crate::memory::MemoryStore;
use crate::remote::RemoteStore;

/// Conversation and message persistence for the chat service.
pub struct ConversationStore {
    remote: Option<Arc<dyn RemoteStore>>,
    mode: BackendMode,
    memory: MemoryStore,
}

impl ConversationStore {
    /// Build the store from configuration.
    ///
    /// Connects to Appwrite only when both the project id and API key differ
    /// from their placeholders; otherwise, or if the client cannot be built,
    /// the store starts in mock mode.
    pub fn from_config(config: &AppwriteConfig) -> Self {
        if !config.is_configured() {
            info!("Using in-memory conversation store (no Appwrite credentials configured)");
            return Self::in_memory();
        }

        match AppwriteClient::new(config) {
            Ok(client) => {
                info!(endpoint = %config.endpoint, "Appwrite client initialized");
                Self::with_remote(Arc::new(client))
            }
            Err(e) => {
                warn!(error = %e, "Could not initialize Appwrite client, using in-memory store");
                Self::in_memory()
            }
        }
    }

    /// A store that starts, and stays, in mock mode.
    pub fn in_memory() -> Self {
        Self {
            remote: None,
            mode: BackendMode::mock(),
            memory: MemoryStore::new(),
        }
    }

    /// A live store backed by the given remote.
    pub fn with_remote(remote: Arc<dyn RemoteStore>) -> Self {
        Self {
            remote: Some(remote),
            mode: BackendMode::live(),
            memory: MemoryStore::new(),
        }
    }

    pub fn is_mock(&self) -> bool {
        self.mode.is_mock()
    }

    fn live(&self) -> Option<&dyn RemoteStore> {
        if self.mode.is_mock() {
            return None;
        }
        self.remote.as_deref()
    }

    fn degrade(&self, operation: &'static str, err: &RemoteError) {
        error!(operation, error = %err, "Remote conversation store request failed");
        if self.mode.trip() {
            warn!(operation, "Conversation store switched to in-memory mode");
        }
    }

    /// Return the session's conversation, creating it if it does not exist.
    ///
    /// An existing conversation is returned untouched.
    pub async fn create_conversation(&self, session_id: &str) -> Result<Conversation, StorageError> {
        if let Some(remote) = self.live() {
            match remote
                .create_conversation(&Conversation::new(session_id))
                .await
            {
                Ok(conversation) => return Ok(conversation),
                Err(RemoteError::Conflict(_)) => match remote.get_conversation(session_id).await {
                    Ok(conversation) => return Ok(conversation),
                    Err(e) => self.degrade("create_conversation", &e),
                },
                Err(e) => self.degrade("create_conversation", &e),
            }
        }
        self.memory.create_conversation(session_id)
    }

    /// Look up a conversation without creating it.
    pub async fn get_conversation(
        &self,
        session_id: &str,
    ) -> Result<Option<Conversation>, StorageError> {
        if let Some(remote) = self.live() {
            match remote.get_conversation(session_id).await {
                Ok(conversation) => return Ok(Some(conversation)),
                Err(RemoteError::NotFound(_)) => return Ok(None),
                Err(e) => self.degrade("get_conversation", &e),
            }
        }
        self.memory.get_conversation(session_id)
    }

    /// Store a new message and refresh the conversation's `updated_at`.
    pub async fn add_message(
        &self,
        session_id: &str,
        role: Role,
        content: &str,
    ) -> Result<Message, StorageError> {
        let message = Message::new(session_id, role, content);

        if let Some(remote) = self.live() {
            match remote.create_message(&message).await {
                Ok(stored) => {
                    self.update_conversation_timestamp(session_id).await?;
                    return Ok(stored);
                }
                Err(e) => self.degrade("add_message", &e),
            }
        }
        self.memory.add_message(message)
    }

    /// Messages of a session, oldest first. Unknown sessions yield nothing.
    pub async fn get_conversation_messages(
        &self,
        session_id: &str,
    ) -> Result<Vec<Message>, StorageError> {
        if let Some(remote) = self.live() {
            match remote.list_messages_newest_first(session_id).await {
                Ok(mut messages) => {
                    messages.reverse();
                    return Ok(messages);
                }
                Err(e) => self.degrade("get_conversation_messages", &e),
            }
        }
        self.memory.messages(session_id)
    }

    /// Refresh the conversation's `updated_at`.
    ///
    /// When the remote rejects the update (typically because the conversation
    /// document is missing) the conversation is created instead.
    pub async fn update_conversation_timestamp(&self, session_id: &str) -> Result<(), StorageError> {
        if let Some(remote) = self.live() {
            match remote.touch_conversation(session_id, Utc::now()).await {
                Ok(()) => return Ok(()),
                Err(e) if e.is_http_error() => {
                    debug!(session_id, error = %e, "Conversation update rejected, creating it");
                    self.create_conversation(session_id).await?;
                    return Ok(());
                }
                Err(e) => self.degrade("update_conversation_timestamp", &e),
            }
        }
        self.memory.touch(session_id)
    }
}

#[cfg(any(test, feature = "test-util"))]
impl ConversationStore {
    /// Break the in-memory store so mock-mode operations fail.
    pub fn poison_memory(&self) {
        self.memory.poison();
    }
}

impl std::fmt::Debug for ConversationStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConversationStore")
            .field("mode", &self.mode.to_string())
            .field("has_remote", &self.remote.is_some())
            .finish()
    }
}

// =============================================================================
// Tests
// =============================================================================
