//! Configuration for the question-answering session.

use std::time::Duration;

use crate::error::{RagError, Result};

/// Default number of segments retrieved per question.
const DEFAULT_TOP_K: usize = 6;

/// Default cap on segment length in characters.
const DEFAULT_MAX_SEGMENT_CHARS: usize = 2000;

/// Default overlap between sub-page segments in characters.
const DEFAULT_SEGMENT_OVERLAP: usize = 200;

/// Configuration parameters for a [`RagSession`](crate::session::RagSession).
#[derive(Debug, Clone, PartialEq)]
pub struct RagConfig {
    /// Number of top results to retrieve per question.
    pub top_k: usize,
    /// Maximum segment size in characters. Pages longer than this are
    /// split into overlapping sub-page segments.
    pub max_segment_chars: usize,
    /// Number of overlapping characters between consecutive sub-page segments.
    pub segment_overlap: usize,
    /// Model identifier for the embedding provider.
    pub embedding_model: String,
    /// Requested embedding dimensionality, for models that support
    /// truncated output. `None` uses the model's native size.
    pub embedding_dimensions: Option<usize>,
    /// Model identifier for the chat model.
    pub chat_model: String,
    /// Bound on every embedding and chat-model HTTP call.
    pub request_timeout: Duration,
}

impl Default for RagConfig {
    fn default() -> Self {
        Self {
            top_k: DEFAULT_TOP_K,
            max_segment_chars: DEFAULT_MAX_SEGMENT_CHARS,
            segment_overlap: DEFAULT_SEGMENT_OVERLAP,
            embedding_model: "text-embedding-3-small".into(),
            embedding_dimensions: None,
            chat_model: "gpt-4o-mini".into(),
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl RagConfig {
    /// Create a new builder for constructing a [`RagConfig`].
    pub fn builder() -> RagConfigBuilder {
        RagConfigBuilder::default()
    }
}

/// Builder for constructing a validated [`RagConfig`].
#[derive(Debug, Clone, Default)]
pub struct RagConfigBuilder {
    config: RagConfig,
}

impl RagConfigBuilder {
    /// Set the number of top results to retrieve per question.
    pub fn top_k(mut self, k: usize) -> Self {
        self.config.top_k = k;
        self
    }

    /// Set the maximum segment size in characters.
    pub fn max_segment_chars(mut self, chars: usize) -> Self {
        self.config.max_segment_chars = chars;
        self
    }

    /// Set the overlap between consecutive sub-page segments in characters.
    pub fn segment_overlap(mut self, overlap: usize) -> Self {
        self.config.segment_overlap = overlap;
        self
    }

    /// Set the embedding model identifier.
    pub fn embedding_model(mut self, model: impl Into<String>) -> Self {
        self.config.embedding_model = model.into();
        self
    }

    /// Set the embedding dimensionality requested from the provider.
    pub fn embedding_dimensions(mut self, dims: usize) -> Self {
        self.config.embedding_dimensions = Some(dims);
        self
    }

    /// Set the chat model identifier.
    pub fn chat_model(mut self, model: impl Into<String>) -> Self {
        self.config.chat_model = model.into();
        self
    }

    /// Set the timeout applied to every provider HTTP call.
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.config.request_timeout = timeout;
        self
    }

    /// Build the [`RagConfig`], validating that parameters are consistent.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Config`] if:
    /// - `top_k == 0`
    /// - `segment_overlap >= max_segment_chars`
    /// - `embedding_dimensions` is `Some(0)`
    /// - `request_timeout` is zero
    pub fn build(self) -> Result<RagConfig> {
        if self.config.top_k == 0 {
            return Err(RagError::Config("top_k must be greater than zero".to_string()));
        }
        if self.config.segment_overlap >= self.config.max_segment_chars {
            return Err(RagError::Config(format!(
                "segment_overlap ({}) must be less than max_segment_chars ({})",
                self.config.segment_overlap, self.config.max_segment_chars
            )));
        }
        if self.config.embedding_dimensions == Some(0) {
            return Err(RagError::Config(
                "embedding_dimensions must be greater than zero".to_string(),
            ));
        }
        if self.config.request_timeout.is_zero() {
            return Err(RagError::Config("request_timeout must be non-zero".to_string()));
        }
        Ok(self.config)
    }
}
