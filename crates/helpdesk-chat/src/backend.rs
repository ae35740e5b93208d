//! Text-generation backend abstraction.

use async_trait::async_trait;

use crate::error::GenerationError;

/// A hosted model that completes a text prompt.
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Complete `prompt`.
    ///
    /// `Ok(None)` means the backend answered but produced no usable text.
    async fn generate(&self, prompt: &str) -> Result<Option<String>, GenerationError>;
}
