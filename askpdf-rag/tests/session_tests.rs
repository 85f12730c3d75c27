//! Session lifecycle: readiness transitions, rollback on failed setup,
//! prompt grounding, and concurrent question answering.

mod common;

use std::path::PathBuf;
use std::sync::Arc;

use askpdf_rag::{RagConfig, RagError, RagSession, ReadyState};
use common::{HashEmbeddings, RecordingChat, write_pdf};

const DIM: usize = 64;

struct Fixture {
    session: Arc<RagSession>,
    embedder: Arc<HashEmbeddings>,
    chat: Arc<RecordingChat>,
    _dir: tempfile::TempDir,
    pdf_path: PathBuf,
}

fn fixture(pages: &[&str]) -> Fixture {
    let dir = tempfile::tempdir().unwrap();
    let pdf_path = dir.path().join("doc.pdf");
    write_pdf(&pdf_path, pages);

    let embedder = Arc::new(HashEmbeddings::new(DIM));
    let chat = Arc::new(RecordingChat::new());
    let session = Arc::new(RagSession::new(
        RagConfig::default(),
        embedder.clone(),
        chat.clone(),
    ));

    Fixture { session, embedder, chat, _dir: dir, pdf_path }
}

#[tokio::test]
async fn not_ready_before_setup_ready_after() {
    let f = fixture(&["some page text"]);

    assert!(!f.session.is_ready().await);
    assert_eq!(f.session.state().await, ReadyState::NotReady);

    f.session.setup(&f.pdf_path).await.unwrap();

    assert!(f.session.is_ready().await);
    assert_eq!(f.session.state().await, ReadyState::Ready);
}

#[tokio::test]
async fn question_before_setup_is_not_ready_error() {
    let f = fixture(&["some page text"]);

    let err = f.session.answer_question("anything?").await.unwrap_err();
    assert!(matches!(err, RagError::NotReady));
}

#[tokio::test]
async fn failed_setup_on_missing_file_keeps_not_ready() {
    let f = fixture(&["some page text"]);

    let err = f.session.setup("/no/such/file.pdf".as_ref()).await.unwrap_err();
    assert!(matches!(err, RagError::Load { .. }));
    assert_eq!(f.session.state().await, ReadyState::NotReady);
}

#[tokio::test]
async fn failed_setup_keeps_prior_index_answering() {
    let f = fixture(&["alpha page", "beta page"]);
    f.session.setup(&f.pdf_path).await.unwrap();

    f.session.answer_question("what is alpha?").await.unwrap();
    let prompt_before = f.chat.last_prompt().unwrap();

    // Provider outage while indexing a replacement document must leave
    // the old index active.
    let replacement = f._dir.path().join("replacement.pdf");
    write_pdf(&replacement, &["gamma page", "delta page"]);
    f.embedder.fail_next_batch();
    let err = f.session.setup(&replacement).await.unwrap_err();
    assert!(matches!(err, RagError::Embedding { .. }));
    assert!(f.session.is_ready().await);

    f.session.answer_question("what is alpha?").await.unwrap();
    let prompt_after = f.chat.last_prompt().unwrap();
    assert_eq!(prompt_before, prompt_after);
    assert!(prompt_after.contains("alpha page"));
    assert!(!prompt_after.contains("gamma page"));
}

#[tokio::test]
async fn generation_failure_surfaces_and_session_recovers() {
    let f = fixture(&["alpha page", "beta page"]);
    f.session.setup(&f.pdf_path).await.unwrap();

    // A model outage fails that one question only.
    f.chat.fail_next_generation();
    let err = f.session.answer_question("what is alpha?").await.unwrap_err();
    assert!(matches!(err, RagError::Generation { .. }));
    assert!(f.session.is_ready().await);

    let answer = f.session.answer_question("what is alpha?").await.unwrap();
    assert_eq!(answer, "mock answer");
    assert!(f.chat.last_prompt().unwrap().contains("alpha page"));
}

#[tokio::test]
async fn retrieval_is_deterministic_for_fixed_index_and_question() {
    let f = fixture(&["first page", "second page", "third page"]);
    f.session.setup(&f.pdf_path).await.unwrap();

    f.session.answer_question("which page?").await.unwrap();
    let first = f.chat.last_prompt().unwrap();
    f.session.answer_question("which page?").await.unwrap();
    let second = f.chat.last_prompt().unwrap();

    assert_eq!(first, second);
}

#[tokio::test]
async fn composed_prompt_grounds_answer_in_retrieved_page() {
    let f = fixture(&["page one filler", "invariant X holds", "page three filler"]);
    f.session.setup(&f.pdf_path).await.unwrap();

    let answer = f.session.answer_question("what holds?").await.unwrap();
    assert_eq!(answer, "mock answer");

    // top_k (6) exceeds the page count, so page 2 must be retrieved
    // and quoted verbatim in the context block.
    let prompt = f.chat.last_prompt().unwrap();
    assert!(prompt.contains("invariant X holds"));
    assert!(prompt.contains("Question: what holds?"));
}

#[tokio::test]
async fn concurrent_questions_all_complete_against_stable_index() {
    let f = fixture(&["shared page text"]);
    f.session.setup(&f.pdf_path).await.unwrap();

    let mut handles = Vec::new();
    for i in 0..16 {
        let session = f.session.clone();
        handles.push(tokio::spawn(async move {
            session.answer_question(&format!("question {i}?")).await
        }));
    }

    for handle in handles {
        let answer = handle.await.unwrap().unwrap();
        assert_eq!(answer, "mock answer");
    }

    // Every composed prompt reflects the one indexed page.
    let prompts = f.chat.prompts.lock().unwrap();
    assert_eq!(prompts.len(), 16);
    assert!(prompts.iter().all(|p| p.contains("shared page text")));
}
