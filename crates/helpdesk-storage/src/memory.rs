//! In-memory conversation storage used in mock mode.
//!
//! Wraps a session map in a Mutex. Contents are lost when the process exits.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use chrono::Utc;

use helpdesk_core::types::{Conversation, Message};

use crate::error::StorageError;

#[derive(Debug)]
struct SessionRecord {
    conversation: Conversation,
    messages: Vec<Message>,
}

impl SessionRecord {
    fn new(session_id: &str) -> Self {
        Self {
            conversation: Conversation::new(session_id),
            messages: Vec::new(),
        }
    }
}

/// Transient session map: session id -> conversation and its messages.
#[derive(Debug, Default)]
pub struct MemoryStore {
    sessions: Mutex<HashMap<String, SessionRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<String, SessionRecord>>, StorageError> {
        self.sessions
            .lock()
            .map_err(|e| StorageError::LockPoisoned(e.to_string()))
    }

    /// Return the existing conversation or create one stamped with now.
    pub fn create_conversation(&self, session_id: &str) -> Result<Conversation, StorageError> {
        let mut sessions = self.lock()?;
        let record = sessions
            .entry(session_id.to_string())
            .or_insert_with(|| SessionRecord::new(session_id));
        Ok(record.conversation.clone())
    }

    pub fn get_conversation(&self, session_id: &str) -> Result<Option<Conversation>, StorageError> {
        let sessions = self.lock()?;
        Ok(sessions.get(session_id).map(|r| r.conversation.clone()))
    }

    /// Append a message, creating its conversation first if needed, and
    /// refresh the conversation's `updated_at`.
    pub fn add_message(&self, message: Message) -> Result<Message, StorageError> {
        let mut sessions = self.lock()?;
        let record = sessions
            .entry(message.session_id.clone())
            .or_insert_with(|| SessionRecord::new(&message.session_id));
        record.messages.push(message.clone());
        record.conversation.updated_at = Utc::now();
        Ok(message)
    }

    /// Refresh `updated_at`. Unknown sessions are left alone.
    pub fn touch(&self, session_id: &str) -> Result<(), StorageError> {
        let mut sessions = self.lock()?;
        if let Some(record) = sessions.get_mut(session_id) {
            record.conversation.updated_at = Utc::now();
        }
        Ok(())
    }

    /// Messages in insertion order; empty for unknown sessions.
    pub fn messages(&self, session_id: &str) -> Result<Vec<Message>, StorageError> {
        let sessions = self.lock()?;
        Ok(sessions
            .get(session_id)
            .map(|r| r.messages.clone())
            .unwrap_or_default())
    }

    #[cfg(test)]
    fn session_count(&self) -> Result<usize, StorageError> {
        Ok(self.lock()?.len())
    }

    /// Poison the session lock so every later call fails with
    /// `StorageError::LockPoisoned`.
    #[cfg(any(test, feature = "test-util"))]
    pub fn poison(&self) {
        let _ = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _guard = self.sessions.lock();
            panic!("session map poisoned on request");
        }));
    }
}
