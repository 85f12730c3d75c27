//! Environment-driven server configuration.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Context;

/// Maximum accepted upload size (16 MiB).
pub const MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;

/// Server configuration, read from the environment.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub openai_api_key: String,
    pub slack_bot_token: String,
    pub slack_bot_user_id: String,
    pub upload_dir: PathBuf,
    pub bind_addr: SocketAddr,
}

impl ServerConfig {
    /// Read configuration from the environment.
    ///
    /// `OPENAI_API_KEY`, `SLACK_BOT_TOKEN`, and `SLACK_BOT_USER_ID`
    /// are required; `ASKPDF_UPLOAD_DIR` defaults to `uploads` and
    /// `ASKPDF_BIND_ADDR` to `0.0.0.0:3000`.
    pub fn from_env() -> anyhow::Result<Self> {
        let openai_api_key =
            std::env::var("OPENAI_API_KEY").context("OPENAI_API_KEY is not set")?;
        let slack_bot_token =
            std::env::var("SLACK_BOT_TOKEN").context("SLACK_BOT_TOKEN is not set")?;
        let slack_bot_user_id =
            std::env::var("SLACK_BOT_USER_ID").context("SLACK_BOT_USER_ID is not set")?;

        let upload_dir = std::env::var("ASKPDF_UPLOAD_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("uploads"));

        let bind_addr = std::env::var("ASKPDF_BIND_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:3000".to_string())
            .parse()
            .context("ASKPDF_BIND_ADDR is not a valid socket address")?;

        Ok(Self {
            openai_api_key,
            slack_bot_token,
            slack_bot_user_id,
            upload_dir,
            bind_addr,
        })
    }
}
