//! Application state shared across all route handlers.

use std::sync::Arc;
use std::time::Instant;

use tracing::info;

use helpdesk_chat::{ChatOrchestrator, ResponseGenerator};
use helpdesk_core::config::HelpdeskConfig;
use helpdesk_storage::ConversationStore;

/// Shared application state.
///
/// All fields use `Arc` for cheap cloning across handler tasks.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<HelpdeskConfig>,
    /// Chat orchestrator owning the store and response generator.
    pub orchestrator: Arc<ChatOrchestrator>,
    /// Server start time for uptime logging.
    pub start_time: Instant,
}

impl AppState {
    pub fn new(config: HelpdeskConfig, orchestrator: ChatOrchestrator) -> Self {
        Self {
            config: Arc::new(config),
            orchestrator: Arc::new(orchestrator),
            start_time: Instant::now(),
        }
    }

    /// Build the store, generator and orchestrator from configuration.
    ///
    /// Each service picks live or mock mode on its own.
    pub fn from_config(config: HelpdeskConfig) -> Self {
        let store = Arc::new(ConversationStore::from_config(&config.appwrite));
        let generator = Arc::new(ResponseGenerator::from_config(&config.gemini));
        info!(
            storage_mock = store.is_mock(),
            generator_mock = generator.is_mock(),
            "Services initialized"
        );
        Self::new(config, ChatOrchestrator::new(store, generator))
    }
}
