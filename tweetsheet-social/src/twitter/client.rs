//! Minimal wrapper around the Twitter/X v2 create-tweet endpoint.
//!
//! Handles user-context auth and request shaping before delegating to the
//! shared HTTP client. Clients are cheap to build and are constructed fresh
//! for every inbound request; credentials never outlive the call.

use crate::twitter::oauth;
use crate::twitter::types::{CreateTweetRequest, CreateTweetResponse, PostedTweet};
use reqwest::header::{HeaderValue, AUTHORIZATION};
use tweetsheet_common::{Result, TweetsheetError};
use tweetsheet_http::{Auth, HttpClient, RequestOpts};

const TWITTER_BASE_URL: &str = "https://api.twitter.com";

/// The four per-request secrets identifying the posting user.
///
/// Never persisted and never logged; the `Debug` impl redacts every field.
#[derive(Clone)]
pub struct TwitterCredentials {
    pub consumer_key: String,
    pub consumer_secret: String,
    pub access_token: String,
    pub access_token_secret: String,
}

impl std::fmt::Debug for TwitterCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TwitterCredentials")
            .field("consumer_key", &"<redacted>")
            .field("consumer_secret", &"<redacted>")
            .field("access_token", &"<redacted>")
            .field("access_token_secret", &"<redacted>")
            .finish()
    }
}

#[derive(Clone)]
pub struct TwitterApi {
    http: HttpClient,
    base: String,
    creds: TwitterCredentials,
}

impl TwitterApi {
    pub fn new(creds: TwitterCredentials) -> Result<Self> {
        Self::with_base_url(creds, TWITTER_BASE_URL)
    }

    /// Point the client at a different host (used by tests against a mock
    /// server).
    pub fn with_base_url(creds: TwitterCredentials, base: &str) -> Result<Self> {
        let http = HttpClient::new(base)
            .map_err(|e| TweetsheetError::Publish(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self {
            http,
            base: base.trim_end_matches('/').to_string(),
            creds,
        })
    }

    /// Publish one tweet with the given text.
    pub async fn create_tweet(&self, text: &str) -> Result<PostedTweet> {
        let url = format!("{}/2/tweets", self.base);
        let header = oauth::authorization_header(&self.creds, "POST", &url);
        let value = HeaderValue::from_str(&header)
            .map_err(|e| TweetsheetError::Publish(format!("Invalid credentials: {}", e)))?;

        let body = CreateTweetRequest {
            text: text.to_string(),
        };

        let resp: CreateTweetResponse = self
            .http
            .post_json(
                "2/tweets",
                &body,
                RequestOpts {
                    auth: Some(Auth::Header {
                        name: AUTHORIZATION,
                        value,
                    }),
                    ..Default::default()
                },
            )
            .await
            .map_err(|e| TweetsheetError::Publish(format!("Tweet create failed: {}", e)))?;

        tracing::debug!(tweet_id = %resp.data.id, "twitter.tweet_created");
        Ok(resp.data)
    }
}
