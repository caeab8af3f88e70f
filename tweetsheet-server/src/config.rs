//! Environment-driven server configuration.
//!
//! The generation API key is read once at startup and handed to the
//! pipeline explicitly; request handling never touches ambient environment
//! state. The `*_BASE` overrides exist so integration tests can point the
//! service at local mock servers.

use std::time::Duration;

use tweetsheet_common::{Result, TweetsheetError};
use tweetsheet_llm::gemini::DEFAULT_GEMINI_MODEL;
use tweetsheet_pipeline::POST_DELAY;

const DEFAULT_BIND: &str = "127.0.0.1:8080";

// No Debug impl: the Gemini key must never reach the logs.
#[derive(Clone)]
pub struct ServerConfig {
    pub bind_addr: String,
    /// Process-wide secret for the generation service.
    pub gemini_api_key: String,
    pub gemini_model: String,
    /// Pause after each successful publish.
    pub post_delay: Duration,
    /// Endpoint overrides for tests; production leaves these unset.
    pub sheets_base: Option<String>,
    pub gemini_base: Option<String>,
    pub twitter_base: Option<String>,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self> {
        let gemini_api_key = std::env::var("GEMINI_API_KEY")
            .map_err(|_| TweetsheetError::Config("GEMINI_API_KEY is not set".to_string()))?;

        let post_delay = match std::env::var("TWEETSHEET_POST_DELAY_MS") {
            Ok(raw) => Duration::from_millis(raw.parse().map_err(|_| {
                TweetsheetError::Config(format!(
                    "TWEETSHEET_POST_DELAY_MS must be an integer, got '{}'",
                    raw
                ))
            })?),
            Err(_) => POST_DELAY,
        };

        Ok(Self {
            bind_addr: std::env::var("TWEETSHEET_BIND").unwrap_or_else(|_| DEFAULT_BIND.into()),
            gemini_api_key,
            gemini_model: std::env::var("GEMINI_MODEL")
                .unwrap_or_else(|_| DEFAULT_GEMINI_MODEL.into()),
            post_delay,
            sheets_base: std::env::var("TWEETSHEET_SHEETS_BASE").ok(),
            gemini_base: std::env::var("TWEETSHEET_GEMINI_BASE").ok(),
            twitter_base: std::env::var("TWEETSHEET_TWITTER_BASE").ok(),
        })
    }
}
