//! askpdf-server: HTTP surface for the askpdf question-answering core.
//!
//! Exposes a PDF upload form at `/` and a Slack Events API endpoint at
//! `/slack/events`, both translating into the core's three calls:
//! `setup`, `answer_question`, and `is_ready`.

mod config;
mod routes;
mod slack;
mod state;

use std::sync::Arc;

use anyhow::Context;
use tracing::info;

use askpdf_rag::{OpenAiChat, OpenAiEmbeddings, RagConfig, RagSession};

use crate::config::ServerConfig;
use crate::routes::app_router;
use crate::slack::SlackClient;
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "askpdf_server=info,askpdf_rag=info,tower_http=info".into()),
        )
        .init();

    let server_config = ServerConfig::from_env()?;
    tokio::fs::create_dir_all(&server_config.upload_dir)
        .await
        .with_context(|| {
            format!("could not create upload dir {}", server_config.upload_dir.display())
        })?;

    let rag_config = RagConfig::default();
    let mut embedder = OpenAiEmbeddings::new(server_config.openai_api_key.clone())?
        .with_model(rag_config.embedding_model.clone())
        .with_timeout(rag_config.request_timeout);
    if let Some(dims) = rag_config.embedding_dimensions {
        embedder = embedder.with_dimensions(dims);
    }
    let chat = OpenAiChat::new(server_config.openai_api_key.clone())?
        .with_model(rag_config.chat_model.clone())
        .with_timeout(rag_config.request_timeout);
    let session = Arc::new(RagSession::new(rag_config, Arc::new(embedder), Arc::new(chat)));

    let state = AppState {
        session,
        slack: SlackClient::new(server_config.slack_bot_token.clone()),
        bot_user_id: server_config.slack_bot_user_id.clone(),
        upload_dir: server_config.upload_dir.clone(),
    };

    let app = app_router(state);
    let listener = tokio::net::TcpListener::bind(server_config.bind_addr).await?;
    info!("askpdf listening on http://{}", server_config.bind_addr);
    axum::serve(listener, app).await?;
    Ok(())
}
