//! Chat model trait for grounded answer generation.

use async_trait::async_trait;

use crate::error::Result;

/// A language model invoked with a composed prompt to produce an answer.
///
/// Implementations must bound the call with a timeout: a slow backend
/// reports [`RagError::Generation`](crate::error::RagError::Generation)
/// rather than hanging the caller indefinitely.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// A short name identifying the backend, used in error reports.
    fn name(&self) -> &str;

    /// Generate a plain-text completion for the given prompt.
    ///
    /// Returns the model's text output unmodified.
    async fn generate(&self, prompt: &str) -> Result<String>;
}
