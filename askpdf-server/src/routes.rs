//! HTTP routes: the upload form and the Slack events endpoint.

use std::path::Path;

use axum::Router;
use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse};
use axum::routing::{get, post};
use axum::Json;
use serde::Deserialize;
use serde_json::{Value, json};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use askpdf_rag::RagError;

use crate::config::MAX_UPLOAD_BYTES;
use crate::slack;
use crate::state::AppState;

pub fn app_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(upload_form).post(upload_pdf))
        .route("/slack/events", post(slack_events))
        .with_state(state)
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(TraceLayer::new_for_http())
}

async fn upload_form() -> Html<&'static str> {
    Html(
        "<!doctype html>\
         <title>askpdf</title>\
         <h1>Upload a PDF</h1>\
         <form method=post enctype=multipart/form-data>\
         <input type=file name=file accept=.pdf>\
         <input type=submit value=Upload>\
         </form>",
    )
}

/// Accept a multipart PDF upload, save it, and index it.
async fn upload_pdf(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> impl IntoResponse {
    let (filename, bytes) = loop {
        match multipart.next_field().await {
            Ok(Some(field)) if field.name() == Some("file") => {
                let filename = field.file_name().unwrap_or_default().to_string();
                match field.bytes().await {
                    Ok(bytes) => break (filename, bytes),
                    Err(e) => {
                        return (StatusCode::BAD_REQUEST, format!("upload failed: {e}"));
                    }
                }
            }
            Ok(Some(_)) => continue,
            Ok(None) => {
                return (StatusCode::BAD_REQUEST, "no file field in upload".to_string());
            }
            Err(e) => {
                return (StatusCode::BAD_REQUEST, format!("malformed upload: {e}"));
            }
        }
    };

    let filename = sanitize_filename(&filename);
    if !filename.to_lowercase().ends_with(".pdf") {
        return (StatusCode::BAD_REQUEST, "only .pdf files are accepted".to_string());
    }

    let path = state.upload_dir.join(&filename);
    if let Err(e) = tokio::fs::write(&path, &bytes).await {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("could not save upload: {e}"),
        );
    }
    info!(filename = %filename, bytes = bytes.len(), "saved upload");

    index_saved_upload(&state, &path, &filename).await
}

/// Index a freshly saved upload, removing the file again when indexing
/// rejects it so failed uploads do not accumulate on disk.
async fn index_saved_upload(
    state: &AppState,
    path: &Path,
    filename: &str,
) -> (StatusCode, String) {
    match state.session.setup(path).await {
        Ok(()) => (
            StatusCode::OK,
            format!(
                "File uploaded and processed successfully. \
                 You can now ask questions about {filename}."
            ),
        ),
        Err(err @ RagError::Load { .. }) => {
            warn!(error = %err, "rejected upload");
            remove_upload(path).await;
            (StatusCode::BAD_REQUEST, err.to_string())
        }
        Err(err) => {
            warn!(error = %err, "indexing failed");
            remove_upload(path).await;
            (StatusCode::BAD_GATEWAY, err.to_string())
        }
    }
}

async fn remove_upload(path: &Path) {
    if let Err(e) = tokio::fs::remove_file(path).await {
        warn!(path = %path.display(), error = %e, "could not remove failed upload");
    }
}

/// Keep only filename characters that are safe to write to disk.
fn sanitize_filename(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'))
        .collect();
    if cleaned.trim_matches('.').is_empty() {
        "upload.pdf".to_string()
    } else {
        cleaned
    }
}

// ── Slack events ───────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum SlackCallback {
    UrlVerification { challenge: String },
    EventCallback { event: SlackEvent },
    #[serde(other)]
    Other,
}

#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum SlackEvent {
    AppMention {
        text: String,
        user: String,
        channel: String,
    },
    #[serde(other)]
    Other,
}

/// Slack Events API endpoint.
///
/// Mentions are handled in a spawned task so Slack gets its ack within
/// the delivery deadline regardless of how long answering takes.
async fn slack_events(
    State(state): State<AppState>,
    Json(payload): Json<Value>,
) -> impl IntoResponse {
    let callback: SlackCallback = match serde_json::from_value(payload) {
        Ok(callback) => callback,
        Err(e) => {
            warn!(error = %e, "unparseable Slack payload");
            return (StatusCode::BAD_REQUEST, Json(json!({"error": "bad payload"})));
        }
    };

    match callback {
        SlackCallback::UrlVerification { challenge } => {
            (StatusCode::OK, Json(json!({ "challenge": challenge })))
        }
        SlackCallback::EventCallback {
            event: SlackEvent::AppMention { text, user, channel },
        } => {
            tokio::spawn(slack::handle_mention(state, text, user, channel));
            (StatusCode::OK, Json(json!({})))
        }
        _ => (StatusCode::OK, Json(json!({}))),
    }
}
