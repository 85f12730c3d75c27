//! PDF document loader.
//!
//! Extracts text one page at a time by walking each page's content
//! stream, producing [`Segment`]s in document order. Pages whose text
//! exceeds the configured cap are split into overlapping sub-page
//! segments that keep the owning page number.

use std::path::Path;

use lopdf::content::Content;
use lopdf::{Document, Object};
use tracing::{debug, info};

use crate::chunking::split_page_text;
use crate::config::RagConfig;
use crate::document::Segment;
use crate::error::{RagError, Result};

/// Load a PDF and extract its text as ordered [`Segment`]s.
///
/// Reads the file once; no other side effects.
///
/// # Errors
///
/// Returns [`RagError::Load`] if the path does not exist, cannot be
/// read, is not parseable as a PDF, or contains no extractable text.
pub fn load_pdf(path: &Path, config: &RagConfig) -> Result<Vec<Segment>> {
    let load_error = |message: String| RagError::Load {
        path: path.display().to_string(),
        message,
    };

    std::fs::metadata(path).map_err(|e| load_error(format!("cannot read file: {e}")))?;

    let doc = Document::load(path).map_err(|e| load_error(format!("not a parseable PDF: {e}")))?;

    let document_id = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("document")
        .to_string();

    let mut segments = Vec::new();
    for (page_number, page_id) in doc.get_pages() {
        let text = match extract_page_text(&doc, page_id) {
            Some(text) => text,
            None => {
                debug!(page = page_number, "skipping page with no decodable content");
                continue;
            }
        };
        if text.is_empty() {
            continue;
        }

        let pieces = split_page_text(&text, config.max_segment_chars, config.segment_overlap);
        for (index, piece) in pieces.into_iter().enumerate() {
            segments.push(Segment {
                id: format!("{document_id}_p{page_number}_{index}"),
                text: piece,
                page: page_number as usize,
                document_id: document_id.clone(),
            });
        }
    }

    if segments.is_empty() {
        return Err(load_error("document contains no extractable text".to_string()));
    }

    info!(
        document_id = %document_id,
        segment_count = segments.len(),
        "loaded document"
    );
    Ok(segments)
}

/// Walk a page's content stream and collect the text it shows.
///
/// Returns `None` if the page content cannot be fetched or decoded.
/// Text-showing operators (`Tj`, `TJ`, `'`, `"`) append text; the
/// positioning operators (`Td`, `TD`, `T*`) and `ET` break lines.
fn extract_page_text(doc: &Document, page_id: lopdf::ObjectId) -> Option<String> {
    let content = doc.get_page_content(page_id).ok()?;
    let operations = Content::decode(&content).ok()?.operations;

    let mut text = String::new();
    for op in operations {
        match op.operator.as_str() {
            "Tj" => {
                if let Some(Object::String(bytes, _)) = op.operands.first() {
                    push_decoded(&mut text, bytes);
                }
            }
            "TJ" => {
                if let Some(Object::Array(items)) = op.operands.first() {
                    for item in items {
                        if let Object::String(bytes, _) = item {
                            push_decoded(&mut text, bytes);
                        }
                    }
                }
            }
            "'" => {
                break_line(&mut text);
                if let Some(Object::String(bytes, _)) = op.operands.first() {
                    push_decoded(&mut text, bytes);
                }
            }
            "\"" => {
                break_line(&mut text);
                if let Some(Object::String(bytes, _)) = op.operands.get(2) {
                    push_decoded(&mut text, bytes);
                }
            }
            "Td" | "TD" | "T*" | "ET" => break_line(&mut text),
            _ => {}
        }
    }

    Some(text.trim().to_string())
}

fn break_line(text: &mut String) {
    if !text.is_empty() && !text.ends_with('\n') {
        text.push('\n');
    }
}

/// Decode a PDF string into UTF-8 and append it.
///
/// Handles UTF-16BE (with BOM) and falls back to treating bytes as
/// Latin-1, which covers unencoded ASCII literals.
fn push_decoded(text: &mut String, bytes: &[u8]) {
    if bytes.is_empty() {
        return;
    }

    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let units: Vec<u16> = bytes[2..]
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();
        if let Ok(decoded) = String::from_utf16(&units) {
            text.push_str(&decoded);
        }
        return;
    }

    match std::str::from_utf8(bytes) {
        Ok(s) => text.push_str(s),
        Err(_) => text.extend(bytes.iter().map(|&b| b as char)),
    }
}
