//! Prompt composition for grounded answering.

use crate::document::ScoredSegment;

/// Join retrieved segment texts, in ranking order, into a single
/// context block separated by blank lines.
pub fn format_context(segments: &[ScoredSegment]) -> String {
    segments
        .iter()
        .map(|s| s.segment.text.as_str())
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Fill the fixed answering template with the question and the
/// retrieved context.
pub fn compose_prompt(question: &str, segments: &[ScoredSegment]) -> String {
    let context = format_context(segments);
    format!(
        "You are an assistant for question-answering tasks. \
         Use the following pieces of retrieved context to answer the question. \
         If you don't know the answer, just say that you don't know. \
         Use three sentences maximum and keep the answer concise.\n\
         Question: {question}\n\
         Context: {context}\n\
         Answer:"
    )
}
