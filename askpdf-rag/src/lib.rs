//! Retrieval-augmented question answering over a single PDF document.
//!
//! The crate covers the whole pipeline: load a PDF into page-level
//! [`Segment`]s, embed and index them in an in-memory [`VectorIndex`],
//! retrieve the top-k segments for a question, and compose a grounded
//! answer through a [`ChatModel`].
//!
//! A [`RagSession`] ties the stages together and tracks readiness: it
//! answers [`RagError::NotReady`] until the first successful
//! [`setup`](RagSession::setup), and a failed re-setup keeps the prior
//! index active.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use askpdf_rag::{OpenAiChat, OpenAiEmbeddings, RagConfig, RagSession};
//!
//! let config = RagConfig::builder().top_k(6).build()?;
//! let session = RagSession::new(
//!     config,
//!     Arc::new(OpenAiEmbeddings::from_env()?),
//!     Arc::new(OpenAiChat::from_env()?),
//! );
//!
//! session.setup("manual.pdf".as_ref()).await?;
//! let answer = session.answer_question("what does chapter 2 cover?").await?;
//! ```

mod chunking;
pub mod config;
pub mod document;
pub mod embedding;
pub mod error;
pub mod generation;
pub mod index;
pub mod loader;
pub mod openai;
pub mod prompt;
pub mod session;

pub use config::{RagConfig, RagConfigBuilder};
pub use document::{ScoredSegment, Segment};
pub use embedding::EmbeddingProvider;
pub use error::{RagError, Result};
pub use generation::ChatModel;
pub use index::VectorIndex;
pub use loader::load_pdf;
pub use openai::{OpenAiChat, OpenAiEmbeddings};
pub use prompt::{compose_prompt, format_context};
pub use session::{RagSession, ReadyState};
