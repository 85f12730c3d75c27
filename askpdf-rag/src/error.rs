//! Error types for the `askpdf-rag` crate.

use thiserror::Error;

/// Errors that can occur while indexing a document or answering a question.
#[derive(Debug, Error)]
pub enum RagError {
    /// The document could not be read or parsed.
    #[error("Load error ({path}): {message}")]
    Load {
        /// The path that failed to load.
        path: String,
        /// A description of the failure.
        message: String,
    },

    /// The embedding provider was unreachable or returned malformed vectors.
    #[error("Embedding error ({provider}): {message}")]
    Embedding {
        /// The embedding provider that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// A question was asked before any document was successfully indexed.
    #[error("no document has been indexed yet")]
    NotReady,

    /// The language model call failed or timed out.
    #[error("Generation error ({provider}): {message}")]
    Generation {
        /// The language model provider that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// A configuration validation error.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// A convenience result type for RAG operations.
pub type Result<T> = std::result::Result<T, RagError>;
