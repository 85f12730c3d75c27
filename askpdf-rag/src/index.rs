//! In-memory vector index over one document's segments.
//!
//! A [`VectorIndex`] is built once from a document's segments and is
//! immutable afterwards: replacing the active document means building a
//! new index and swapping the handle, never mutating in place. That is
//! what lets many concurrent searches run against a stable index while
//! a rebuild happens on the side.

use tracing::info;

use crate::document::{ScoredSegment, Segment};
use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};

/// A similarity-searchable index of (segment, embedding) pairs.
///
/// Embeddings never leave this type; callers only see [`ScoredSegment`]s.
#[derive(Debug)]
pub struct VectorIndex {
    entries: Vec<(Segment, Vec<f32>)>,
    dimensions: usize,
}

impl VectorIndex {
    /// Embed all segments and build a new index.
    ///
    /// The whole batch is embedded before anything is stored, so a
    /// failed build leaves nothing half-constructed.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Embedding`] if the provider fails or returns
    /// a wrong number of vectors or vectors of the wrong dimensionality.
    pub async fn build(
        segments: Vec<Segment>,
        provider: &dyn EmbeddingProvider,
    ) -> Result<Self> {
        let dimensions = provider.dimensions();
        let texts: Vec<&str> = segments.iter().map(|s| s.text.as_str()).collect();

        let embeddings = provider.embed_batch(&texts).await?;
        if embeddings.len() != segments.len() {
            return Err(RagError::Embedding {
                provider: provider.name().to_string(),
                message: format!(
                    "expected {} embeddings, got {}",
                    segments.len(),
                    embeddings.len()
                ),
            });
        }
        for embedding in &embeddings {
            if embedding.len() != dimensions {
                return Err(RagError::Embedding {
                    provider: provider.name().to_string(),
                    message: format!(
                        "malformed embedding: expected {dimensions} dimensions, got {}",
                        embedding.len()
                    ),
                });
            }
        }

        let entries: Vec<(Segment, Vec<f32>)> =
            segments.into_iter().zip(embeddings).collect();

        info!(segment_count = entries.len(), dimensions, "built vector index");
        Ok(Self { entries, dimensions })
    }

    /// Number of indexed segments.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the index holds no segments.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Dimensionality of the stored embeddings.
    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// Return the `k` segments most similar to `query_embedding`,
    /// ordered by descending cosine similarity.
    ///
    /// Ties are broken by segment id, so the ranking is fully
    /// deterministic for a fixed index and query.
    pub fn search(&self, query_embedding: &[f32], k: usize) -> Vec<ScoredSegment> {
        let mut scored: Vec<ScoredSegment> = self
            .entries
            .iter()
            .map(|(segment, embedding)| ScoredSegment {
                segment: segment.clone(),
                score: cosine_similarity(embedding, query_embedding),
            })
            .collect();

        scored.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.segment.id.cmp(&b.segment.id))
        });
        scored.truncate(k);
        scored
    }
}

/// Compute cosine similarity between two vectors.
///
/// Returns 0.0 if either vector has zero magnitude.
fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}
