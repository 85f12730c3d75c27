//! Slack bot surface: command parsing and Web API replies.
//!
//! Mentions are parsed into [`Command`]s after stripping the bot's own
//! mention tag. Question replies are posted in two steps: a canned
//! "thinking" message first, then an update with the real answer.

use askpdf_rag::RagError;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::state::AppState;

const SLACK_POST_MESSAGE_URL: &str = "https://slack.com/api/chat.postMessage";
const SLACK_UPDATE_URL: &str = "https://slack.com/api/chat.update";

const LOADING_MESSAGES: &[&str] = &[
    "Hmm, let me think about that for a second...",
    "Searching through the document forest...",
    "Consulting my digital crystal ball...",
    "Crunching numbers and letters...",
    "Let me dig into that for you...",
];

const HELP_MESSAGE: &str = "Here's how you can interact with me:\n\
    • Ask a question by starting your message with 'q!' or 'question!'\n\
    • Type 'help' to see this message again\n\
    • Say 'hello' or 'hi' for a friendly greeting\n\
    • Use 'status' to check if a PDF has been uploaded";

/// A parsed mention directed at the bot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `q! …` or `question! …`
    Question(String),
    Help,
    Greeting,
    Status,
    Unknown,
}

/// Parse a mention's text into a [`Command`], stripping the bot's own
/// `<@…>` mention tag first.
pub fn parse_command(text: &str, bot_user_id: &str) -> Command {
    let mention = format!("<@{bot_user_id}>");
    let text = text.replace(&mention, "");
    let text = text.trim();
    let lower = text.to_lowercase();

    // The prefixes are ASCII, so byte offsets into the original text
    // line up with the lowercased copy.
    if lower.starts_with("question!") {
        return Command::Question(text[9..].trim().to_string());
    }
    if lower.starts_with("q!") {
        return Command::Question(text[2..].trim().to_string());
    }

    match lower.as_str() {
        "help" => Command::Help,
        "hello" | "hi" | "hey" => Command::Greeting,
        "status" => Command::Status,
        _ => Command::Unknown,
    }
}

/// Map a core error to the text shown to the asking user.
pub fn user_facing_message(err: &RagError) -> String {
    match err {
        RagError::NotReady => {
            "No PDF has been uploaded yet. Please upload a document first.".to_string()
        }
        RagError::Generation { .. } => {
            "I couldn't get an answer from the model right now. Please try again later."
                .to_string()
        }
        other => format!("Something went wrong: {other}"),
    }
}

// ── Slack Web API client ───────────────────────────────────────────

#[derive(Clone)]
pub struct SlackClient {
    http: reqwest::Client,
    token: String,
}

#[derive(Serialize)]
struct PostMessage<'a> {
    channel: &'a str,
    text: &'a str,
}

#[derive(Serialize)]
struct UpdateMessage<'a> {
    channel: &'a str,
    ts: &'a str,
    text: &'a str,
}

#[derive(Deserialize)]
struct SlackApiResponse {
    ok: bool,
    ts: Option<String>,
    error: Option<String>,
}

impl SlackClient {
    pub fn new(token: impl Into<String>) -> Self {
        Self { http: reqwest::Client::new(), token: token.into() }
    }

    /// Post a message, returning its timestamp for later updates.
    pub async fn post_message(&self, channel: &str, text: &str) -> anyhow::Result<String> {
        let response: SlackApiResponse = self
            .http
            .post(SLACK_POST_MESSAGE_URL)
            .bearer_auth(&self.token)
            .json(&PostMessage { channel, text })
            .send()
            .await?
            .json()
            .await?;

        if !response.ok {
            anyhow::bail!(
                "chat.postMessage failed: {}",
                response.error.unwrap_or_else(|| "unknown error".into())
            );
        }
        response.ts.ok_or_else(|| anyhow::anyhow!("chat.postMessage returned no ts"))
    }

    /// Replace the text of a previously posted message.
    pub async fn update_message(
        &self,
        channel: &str,
        ts: &str,
        text: &str,
    ) -> anyhow::Result<()> {
        let response: SlackApiResponse = self
            .http
            .post(SLACK_UPDATE_URL)
            .bearer_auth(&self.token)
            .json(&UpdateMessage { channel, ts, text })
            .send()
            .await?
            .json()
            .await?;

        if !response.ok {
            anyhow::bail!(
                "chat.update failed: {}",
                response.error.unwrap_or_else(|| "unknown error".into())
            );
        }
        Ok(())
    }
}

// ── Mention handling ───────────────────────────────────────────────

/// Handle one `app_mention` event end to end.
///
/// Runs in its own task so the events endpoint can ack Slack
/// immediately; reply failures are logged, never propagated.
pub async fn handle_mention(state: AppState, text: String, user: String, channel: String) {
    match parse_command(&text, &state.bot_user_id) {
        Command::Question(question) => {
            answer_in_channel(&state, &question, &user, &channel).await;
        }
        Command::Help => {
            say(&state, &channel, HELP_MESSAGE).await;
        }
        Command::Greeting => {
            let greetings = [
                format!("Hello there, <@{user}>! How can I assist you today?"),
                format!("Hi <@{user}>! Got any interesting questions for me?"),
                format!("Hey <@{user}>! Ready to explore some documents?"),
            ];
            let pick = rand::thread_rng().gen_range(0..greetings.len());
            say(&state, &channel, &greetings[pick]).await;
        }
        Command::Status => {
            let message = if state.session.is_ready().await {
                format!("<@{user}> A PDF has been uploaded and I'm ready to answer questions!")
            } else {
                format!("<@{user}> No PDF has been uploaded yet. Please upload a document first.")
            };
            say(&state, &channel, &message).await;
        }
        Command::Unknown => {
            let message =
                format!("<@{user}> Not sure what you mean. Type 'help' to see what I can do!");
            say(&state, &channel, &message).await;
        }
    }
}

async fn answer_in_channel(state: &AppState, question: &str, user: &str, channel: &str) {
    let loading = LOADING_MESSAGES[rand::thread_rng().gen_range(0..LOADING_MESSAGES.len())];

    let ts = match state.slack.post_message(channel, &format!("<@{user}> {loading}")).await {
        Ok(ts) => ts,
        Err(e) => {
            error!(error = %e, "failed to post loading message");
            return;
        }
    };

    let reply = match state.session.answer_question(question).await {
        Ok(answer) => {
            info!(question_len = question.len(), "answered question");
            format!("<@{user}> Here's what I found:\n\n{answer}")
        }
        Err(err) => {
            error!(error = %err, "failed to answer question");
            format!("<@{user}> {}", user_facing_message(&err))
        }
    };

    if let Err(e) = state.slack.update_message(channel, &ts, &reply).await {
        error!(error = %e, "failed to update message with answer");
    }
}

async fn say(state: &AppState, channel: &str, text: &str) {
    if let Err(e) = state.slack.post_message(channel, text).await {
        error!(error = %e, "failed to post message");
    }
}
