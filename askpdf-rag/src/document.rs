//! Data types for extracted segments and retrieval results.

use serde::{Deserialize, Serialize};

/// A unit of text extracted from one page of a document.
///
/// The loader produces one segment per page, or several per page when
/// the page text exceeds the configured size cap. Segments are
/// immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Segment {
    /// Unique identifier, `{document_id}_p{page}_{index}`.
    pub id: String,
    /// The extracted text content.
    pub text: String,
    /// 1-based page number this segment came from.
    pub page: usize,
    /// Identifier of the owning document.
    pub document_id: String,
}

/// A retrieved [`Segment`] paired with a relevance score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredSegment {
    /// The retrieved segment.
    pub segment: Segment,
    /// Cosine similarity to the query embedding (higher is more relevant).
    pub score: f32,
}
