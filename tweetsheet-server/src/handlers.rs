use std::sync::Arc;

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;

use crate::config::ServerConfig;
use crate::error::{AppError, Result};
use tweetsheet_llm::GeminiClient;
use tweetsheet_pipeline::{LlmComposer, TweetPipeline};
use tweetsheet_sheets::SheetSource;
use tweetsheet_social::{TwitterApi, TwitterCredentials};

/// Root endpoint providing basic information about the API.
pub async fn index() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "message": "This API takes a sheet name and access tokens and posts all the tweets from the sheet!"
    }))
}

// No Debug impl: four of these fields are secrets.
#[derive(Deserialize)]
pub struct PostTweetsRequest {
    pub consumer_key: String,
    pub consumer_secret: String,
    pub access_token: String,
    pub access_token_secret: String,
    pub sheet_name: String,
    pub sheet_id: String,
}

impl PostTweetsRequest {
    /// Required fields are validated eagerly; an empty secret would only
    /// fail deep inside a downstream call with a confusing message.
    fn validate(&self) -> Result<()> {
        let fields = [
            ("consumer_key", &self.consumer_key),
            ("consumer_secret", &self.consumer_secret),
            ("access_token", &self.access_token),
            ("access_token_secret", &self.access_token_secret),
            ("sheet_name", &self.sheet_name),
            ("sheet_id", &self.sheet_id),
        ];
        for (name, value) in fields {
            if value.trim().is_empty() {
                return Err(AppError::BadRequest(format!("'{}' must not be empty", name)));
            }
        }
        Ok(())
    }
}

/// Fetch the sheet, then drive every row through generate-and-publish.
///
/// Blocks (asynchronously) for the whole loop, inter-post pauses included;
/// the response only says that the loop finished, not how many rows
/// published.
pub async fn post_tweets(
    config: web::Data<ServerConfig>,
    body: web::Json<PostTweetsRequest>,
) -> Result<HttpResponse> {
    let req = body.into_inner();
    req.validate()?;

    let creds = TwitterCredentials {
        consumer_key: req.consumer_key,
        consumer_secret: req.consumer_secret,
        access_token: req.access_token,
        access_token_secret: req.access_token_secret,
    };

    // Clients are built fresh per request and dropped with it.
    let mut gemini = GeminiClient::new(config.gemini_api_key.clone(), config.gemini_model.clone())?;
    if let Some(base) = &config.gemini_base {
        gemini = gemini.with_base_url(base)?;
    }
    let twitter = match &config.twitter_base {
        Some(base) => TwitterApi::with_base_url(creds, base)?,
        None => TwitterApi::new(creds)?,
    };
    let sheets = match &config.sheets_base {
        Some(base) => SheetSource::with_base_url(base)?,
        None => SheetSource::new()?,
    };

    let rows = sheets.fetch_rows(&req.sheet_id, &req.sheet_name).await?;
    tracing::info!(
        sheet_id = %req.sheet_id,
        sheet_name = %req.sheet_name,
        rows = rows.len(),
        "post_tweets.start"
    );

    let pipeline = TweetPipeline::new(LlmComposer::new(Arc::new(gemini)), twitter)
        .with_post_delay(config.post_delay);
    let report = pipeline.run(&rows).await;

    tracing::info!(
        published = report.published(),
        skipped = report.skipped(),
        "post_tweets.finished"
    );

    Ok(HttpResponse::Ok().json(json!({ "message": "Tweets posted successfully!" })))
}
