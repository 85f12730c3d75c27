//! The question-answering session: readiness state and orchestration.
//!
//! A [`RagSession`] owns the one piece of mutable shared state in the
//! crate — the active [`VectorIndex`] — behind a single swappable
//! handle. `setup` builds a complete new index before swapping it in,
//! so a question answered mid-rebuild observes either the fully-old or
//! fully-new index, never a partial one.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{error, info};

use crate::config::RagConfig;
use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};
use crate::generation::ChatModel;
use crate::index::VectorIndex;
use crate::loader::load_pdf;
use crate::prompt::compose_prompt;

/// Whether a session has an active index.
///
/// There is no transition back to [`NotReady`](ReadyState::NotReady):
/// a session serves one document lifetime per process run, and a
/// failed re-setup keeps the previous index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadyState {
    /// No document has been indexed yet.
    NotReady,
    /// An index is active and questions can be answered.
    Ready,
}

/// A single-document question-answering session.
///
/// Cheap to share: wrap it in an `Arc` and call [`setup`](RagSession::setup)
/// and [`answer_question`](RagSession::answer_question) from as many
/// concurrent tasks as needed.
pub struct RagSession {
    config: RagConfig,
    embedder: Arc<dyn EmbeddingProvider>,
    chat: Arc<dyn ChatModel>,
    index: RwLock<Option<Arc<VectorIndex>>>,
}

impl RagSession {
    /// Create a session with no active index.
    pub fn new(
        config: RagConfig,
        embedder: Arc<dyn EmbeddingProvider>,
        chat: Arc<dyn ChatModel>,
    ) -> Self {
        Self { config, embedder, chat, index: RwLock::new(None) }
    }

    /// Return a reference to the session configuration.
    pub fn config(&self) -> &RagConfig {
        &self.config
    }

    /// Load and index the document at `path`, replacing any active index.
    ///
    /// The new index becomes visible to concurrent questions only once
    /// fully built. On failure the prior state is left untouched: a
    /// Ready session stays Ready with its old index, a NotReady session
    /// stays NotReady.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Load`] if the file cannot be read or parsed,
    /// or [`RagError::Embedding`] if the provider fails.
    pub async fn setup(&self, path: &Path) -> Result<()> {
        let owned: PathBuf = path.to_path_buf();
        let config = self.config.clone();
        let display = path.display().to_string();
        // PDF parsing is CPU-bound; keep it off the async executor.
        let segments = tokio::task::spawn_blocking(move || load_pdf(&owned, &config))
            .await
            .map_err(|e| RagError::Load {
                path: display,
                message: format!("extraction task failed: {e}"),
            })??;

        let index = VectorIndex::build(segments, self.embedder.as_ref())
            .await
            .inspect_err(|e| error!(error = %e, "setup failed, keeping prior index"))?;

        let mut guard = self.index.write().await;
        *guard = Some(Arc::new(index));
        info!(path = %path.display(), "session ready");
        Ok(())
    }

    /// Answer a question from the indexed document.
    ///
    /// Embeds the question, retrieves the configured top-k segments,
    /// composes the answering prompt, and invokes the chat model. The
    /// search runs against a stable snapshot of the index, so many
    /// questions can be in flight at once.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::NotReady`] if no document has been indexed,
    /// [`RagError::Embedding`] if the question cannot be embedded, or
    /// [`RagError::Generation`] if the chat model call fails.
    pub async fn answer_question(&self, question: &str) -> Result<String> {
        let index = self.index.read().await.clone().ok_or(RagError::NotReady)?;

        let query_embedding = self.embedder.embed(question).await?;
        let hits = index.search(&query_embedding, self.config.top_k);
        info!(retrieved = hits.len(), "retrieved segments for question");

        let prompt = compose_prompt(question, &hits);
        self.chat.generate(&prompt).await
    }

    /// Whether an index is active.
    pub async fn is_ready(&self) -> bool {
        self.state().await == ReadyState::Ready
    }

    /// Current readiness state.
    pub async fn state(&self) -> ReadyState {
        if self.index.read().await.is_some() {
            ReadyState::Ready
        } else {
            ReadyState::NotReady
        }
    }
}
