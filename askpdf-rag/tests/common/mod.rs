//! Shared test fixtures: generated PDFs and deterministic mock providers.

#![allow(dead_code)]

use std::path::Path;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, Stream, dictionary};

use askpdf_rag::{ChatModel, EmbeddingProvider, RagError, Result};

/// Write a minimal PDF with one text block per page.
pub fn write_pdf(path: &Path, pages: &[&str]) {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids: Vec<Object> = Vec::new();
    for text in pages {
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 12.into()]),
                Operation::new("Td", vec![50.into(), 700.into()]),
                Operation::new("Tj", vec![Object::string_literal(*text)]),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id =
            doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.save(path).unwrap();
}

/// Deterministic hash-based embeddings: the vector direction depends
/// only on the text content, so retrieval is reproducible without any
/// API keys. `fail_next_batch` arms a one-shot batch failure to test
/// setup rollback.
pub struct HashEmbeddings {
    dimensions: usize,
    fail_batch: AtomicBool,
}

impl HashEmbeddings {
    pub fn new(dimensions: usize) -> Self {
        Self { dimensions, fail_batch: AtomicBool::new(false) }
    }

    pub fn fail_next_batch(&self) {
        self.fail_batch.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl EmbeddingProvider for HashEmbeddings {
    fn name(&self) -> &str {
        "mock"
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let hash = text
            .bytes()
            .fold(0u64, |acc, b| acc.wrapping_mul(31).wrapping_add(b as u64));
        let mut embedding = vec![0.0f32; self.dimensions];
        for (i, v) in embedding.iter_mut().enumerate() {
            *v = ((hash.wrapping_add(i as u64)) as f32).sin();
        }
        // L2-normalise so cosine similarity is just the dot product.
        let norm: f32 = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            embedding.iter_mut().for_each(|x| *x /= norm);
        }
        Ok(embedding)
    }

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        if self.fail_batch.swap(false, Ordering::SeqCst) {
            return Err(RagError::Embedding {
                provider: "mock".into(),
                message: "provider unreachable".into(),
            });
        }
        let mut results = Vec::with_capacity(texts.len());
        for text in texts {
            results.push(self.embed(text).await?);
        }
        Ok(results)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}

/// A chat model that records every prompt it receives and returns a
/// fixed answer, so tests can assert on the composed prompt.
/// `fail_next_generation` arms a one-shot failure to test that a
/// generation error does not poison the session.
pub struct RecordingChat {
    pub prompts: Mutex<Vec<String>>,
    fail_generation: AtomicBool,
}

impl RecordingChat {
    pub fn new() -> Self {
        Self { prompts: Mutex::new(Vec::new()), fail_generation: AtomicBool::new(false) }
    }

    pub fn fail_next_generation(&self) {
        self.fail_generation.store(true, Ordering::SeqCst);
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.prompts.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl ChatModel for RecordingChat {
    fn name(&self) -> &str {
        "mock"
    }

    async fn generate(&self, prompt: &str) -> Result<String> {
        if self.fail_generation.swap(false, Ordering::SeqCst) {
            return Err(RagError::Generation {
                provider: "mock".into(),
                message: "model unavailable".into(),
            });
        }
        self.prompts.lock().unwrap().push(prompt.to_string());
        Ok("mock answer".to_string())
    }
}
