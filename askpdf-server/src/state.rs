//! Shared application state for the HTTP handlers.

use std::path::PathBuf;
use std::sync::Arc;

use askpdf_rag::RagSession;

use crate::slack::SlackClient;

#[derive(Clone)]
pub struct AppState {
    pub session: Arc<RagSession>,
    pub slack: SlackClient,
    pub bot_user_id: String,
    pub upload_dir: PathBuf,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState").finish_non_exhaustive()
    }
}
