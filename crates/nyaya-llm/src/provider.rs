use std::pin::Pin;

use crate::error::LlmError;

/// Boxed embedding future, used where the provider must be erased behind a
/// closure (ingestion, summarization).
pub type EmbedFuture = Pin<Box<dyn Future<Output = Result<Vec<f32>, LlmError>> + Send>>;

pub trait LlmProvider: Send + Sync {
    /// Send a fully-formed prompt to the model and return the completion text.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider fails to communicate or the response
    /// is invalid.
    fn generate(&self, prompt: &str) -> impl Future<Output = Result<String, LlmError>> + Send;

    /// Embed a single text into a dense vector.
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::EmbedUnsupported`] for generation-only backends,
    /// or a transport/API error.
    fn embed(&self, text: &str) -> impl Future<Output = Result<Vec<f32>, LlmError>> + Send;

    fn supports_embeddings(&self) -> bool {
        false
    }

    fn name(&self) -> &str;
}
