//! OpenAI-backed providers for embeddings and chat completions.
//!
//! Both providers call the OpenAI HTTP API directly through `reqwest`
//! and apply a bounded per-request timeout. A timed-out or failed call
//! surfaces as [`RagError::Embedding`] or [`RagError::Generation`];
//! it never hangs the caller.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};
use crate::generation::ChatModel;

const OPENAI_EMBEDDINGS_URL: &str = "https://api.openai.com/v1/embeddings";
const OPENAI_CHAT_URL: &str = "https://api.openai.com/v1/chat/completions";

/// The default model for OpenAI embeddings.
const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-3-small";

/// The default dimensionality for `text-embedding-3-small`.
const DEFAULT_DIMENSIONS: usize = 1536;

/// The default chat model.
const DEFAULT_CHAT_MODEL: &str = "gpt-4o-mini";

/// The default bound on provider HTTP calls.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: String,
}

/// Extract a readable message from an OpenAI error body, falling back
/// to the raw body text.
fn api_error_detail(body: String) -> String {
    serde_json::from_str::<ErrorResponse>(&body)
        .map(|e| e.error.message)
        .unwrap_or(body)
}

// ── Embeddings ─────────────────────────────────────────────────────

/// An [`EmbeddingProvider`] backed by the OpenAI embeddings API.
///
/// # Configuration
///
/// - `model` – defaults to `text-embedding-3-small`.
/// - `dimensions` – must match the chosen model; see
///   [`with_dimensions`](OpenAiEmbeddings::with_dimensions).
/// - `timeout` – per-request bound, defaults to 30 seconds.
/// - `api_key` – from the constructor or [`from_env`](OpenAiEmbeddings::from_env).
pub struct OpenAiEmbeddings {
    client: reqwest::Client,
    api_key: String,
    model: String,
    dimensions: usize,
    /// If set, passed to the API for Matryoshka dimension truncation.
    request_dimensions: Option<usize>,
    timeout: Duration,
}

impl OpenAiEmbeddings {
    /// Create a new provider with the given API key.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Embedding`] if the key is empty.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(RagError::Embedding {
                provider: "OpenAI".into(),
                message: "API key must not be empty".into(),
            });
        }

        Ok(Self {
            client: reqwest::Client::new(),
            api_key,
            model: DEFAULT_EMBEDDING_MODEL.into(),
            dimensions: DEFAULT_DIMENSIONS,
            request_dimensions: None,
            timeout: DEFAULT_TIMEOUT,
        })
    }

    /// Create a new provider using the `OPENAI_API_KEY` environment variable.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("OPENAI_API_KEY").map_err(|_| RagError::Embedding {
            provider: "OpenAI".into(),
            message: "OPENAI_API_KEY environment variable not set".into(),
        })?;
        Self::new(api_key)
    }

    /// Set the model name (e.g. `text-embedding-3-large`).
    ///
    /// Pair this with [`with_dimensions`](OpenAiEmbeddings::with_dimensions)
    /// whenever the model's native dimensionality differs from the
    /// default 1536 — the index rejects vectors that do not match the
    /// advertised [`dimensions()`](EmbeddingProvider::dimensions).
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the output dimensions (Matryoshka support).
    ///
    /// When set, the API returns embeddings truncated to this size.
    /// This also updates the value returned by
    /// [`dimensions()`](EmbeddingProvider::dimensions).
    pub fn with_dimensions(mut self, dims: usize) -> Self {
        self.dimensions = dims;
        self.request_dimensions = Some(dims);
        self
    }

    /// Set the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: Vec<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    dimensions: Option<usize>,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

#[async_trait]
impl EmbeddingProvider for OpenAiEmbeddings {
    fn name(&self) -> &str {
        "OpenAI"
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let results = self.embed_batch(&[text]).await?;
        results.into_iter().next().ok_or_else(|| RagError::Embedding {
            provider: "OpenAI".into(),
            message: "API returned empty response".into(),
        })
    }

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        debug!(
            provider = "OpenAI",
            batch_size = texts.len(),
            model = %self.model,
            "embedding batch"
        );

        let request_body = EmbeddingRequest {
            model: &self.model,
            input: texts.to_vec(),
            dimensions: self.request_dimensions,
        };

        let response = self
            .client
            .post(OPENAI_EMBEDDINGS_URL)
            .bearer_auth(&self.api_key)
            .timeout(self.timeout)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| {
                error!(provider = "OpenAI", error = %e, "embedding request failed");
                RagError::Embedding {
                    provider: "OpenAI".into(),
                    message: if e.is_timeout() {
                        format!("request timed out after {:?}", self.timeout)
                    } else {
                        format!("request failed: {e}")
                    },
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = api_error_detail(response.text().await.unwrap_or_default());
            error!(provider = "OpenAI", %status, "embeddings API error");
            return Err(RagError::Embedding {
                provider: "OpenAI".into(),
                message: format!("API returned {status}: {detail}"),
            });
        }

        let embedding_response: EmbeddingResponse = response.json().await.map_err(|e| {
            error!(provider = "OpenAI", error = %e, "failed to parse embeddings response");
            RagError::Embedding {
                provider: "OpenAI".into(),
                message: format!("failed to parse response: {e}"),
            }
        })?;

        Ok(embedding_response.data.into_iter().map(|d| d.embedding).collect())
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}

// ── Chat completions ───────────────────────────────────────────────

/// A [`ChatModel`] backed by the OpenAI chat completions API.
pub struct OpenAiChat {
    client: reqwest::Client,
    api_key: String,
    model: String,
    timeout: Duration,
}

impl OpenAiChat {
    /// Create a new chat model with the given API key.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Generation`] if the key is empty.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(RagError::Generation {
                provider: "OpenAI".into(),
                message: "API key must not be empty".into(),
            });
        }

        Ok(Self {
            client: reqwest::Client::new(),
            api_key,
            model: DEFAULT_CHAT_MODEL.into(),
            timeout: DEFAULT_TIMEOUT,
        })
    }

    /// Create a new chat model using the `OPENAI_API_KEY` environment variable.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("OPENAI_API_KEY").map_err(|_| RagError::Generation {
            provider: "OpenAI".into(),
            message: "OPENAI_API_KEY environment variable not set".into(),
        })?;
        Self::new(api_key)
    }

    /// Set the model name (e.g. `gpt-4o`).
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

#[async_trait]
impl ChatModel for OpenAiChat {
    fn name(&self) -> &str {
        "OpenAI"
    }

    async fn generate(&self, prompt: &str) -> Result<String> {
        debug!(provider = "OpenAI", model = %self.model, prompt_len = prompt.len(), "generating answer");

        let request_body = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage { role: "user", content: prompt }],
        };

        let response = self
            .client
            .post(OPENAI_CHAT_URL)
            .bearer_auth(&self.api_key)
            .timeout(self.timeout)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| {
                error!(provider = "OpenAI", error = %e, "chat request failed");
                RagError::Generation {
                    provider: "OpenAI".into(),
                    message: if e.is_timeout() {
                        format!("request timed out after {:?}", self.timeout)
                    } else {
                        format!("request failed: {e}")
                    },
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = api_error_detail(response.text().await.unwrap_or_default());
            error!(provider = "OpenAI", %status, "chat API error");
            return Err(RagError::Generation {
                provider: "OpenAI".into(),
                message: format!("API returned {status}: {detail}"),
            });
        }

        let chat_response: ChatResponse = response.json().await.map_err(|e| {
            error!(provider = "OpenAI", error = %e, "failed to parse chat response");
            RagError::Generation {
                provider: "OpenAI".into(),
                message: format!("failed to parse response: {e}"),
            }
        })?;

        chat_response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| RagError::Generation {
                provider: "OpenAI".into(),
                message: "API returned no completion".into(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn with_dimensions_updates_advertised_dimensionality() {
        let provider = OpenAiEmbeddings::new("sk-test")
            .unwrap()
            .with_model("text-embedding-3-large")
            .with_dimensions(3072);
        assert_eq!(provider.dimensions(), 3072);
        assert_eq!(provider.request_dimensions, Some(3072));
    }

    #[test]
    fn default_provider_advertises_small_model_dimensionality() {
        let provider = OpenAiEmbeddings::new("sk-test").unwrap();
        assert_eq!(provider.dimensions(), 1536);
        assert_eq!(provider.request_dimensions, None);
    }

    #[test]
    fn dimensions_are_sent_to_the_api_only_when_set() {
        let with_dims = EmbeddingRequest {
            model: "text-embedding-3-large",
            input: vec!["hello"],
            dimensions: Some(3072),
        };
        let body = serde_json::to_value(&with_dims).unwrap();
        assert_eq!(body["dimensions"], 3072);

        let without_dims = EmbeddingRequest {
            model: "text-embedding-3-small",
            input: vec!["hello"],
            dimensions: None,
        };
        let body = serde_json::to_value(&without_dims).unwrap();
        assert!(body.get("dimensions").is_none());
    }

    #[test]
    fn empty_api_key_is_rejected() {
        assert!(OpenAiEmbeddings::new("").is_err());
        assert!(OpenAiChat::new("").is_err());
    }
}
