//! Chat engine for the support agent.
//!
//! Provides the response generator (Gemini with a deterministic mock
//! fallback), prompt construction, and the orchestrator that runs one
//! request/response cycle against the conversation store.

pub mod backend;
pub mod error;
pub mod gemini;
pub mod orchestrator;
pub mod prompt;
pub mod response;
pub mod types;

pub use backend::GenerationBackend;
pub use error::{ChatError, GenerationError};
pub use gemini::GeminiClient;
pub use orchestrator::ChatOrchestrator;
pub use response::ResponseGenerator;
pub use types::{ChatHistory, ChatReply};
