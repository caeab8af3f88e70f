use crate::traits::{LlmClient, LlmResponse};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::time::Duration;
use tweetsheet_common::{Result, TweetsheetError};
use tweetsheet_http::{Auth, HttpClient, HttpError, RequestOpts};

const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/";
const GEMINI_TIMEOUT: Duration = Duration::from_secs(60);

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";

#[derive(Debug, Serialize)]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GeminiGenerationConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    safety_settings: Option<Vec<GeminiSafetySetting>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<GeminiSystemInstruction>,
}

#[derive(Debug, Serialize)]
struct GeminiSystemInstruction {
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize)]
struct GeminiContent {
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize)]
struct GeminiPart {
    text: String,
}

#[derive(Debug, Serialize)]
struct GeminiGenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
}

#[derive(Debug, Serialize)]
struct GeminiSafetySetting {
    category: String,
    threshold: String,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    candidates: Vec<GeminiCandidate>,
    #[serde(rename = "usageMetadata")]
    usage_metadata: Option<GeminiUsageMetadata>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: GeminiResponseContent,
    #[serde(rename = "finishReason")]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponseContent {
    parts: Vec<GeminiResponsePart>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponsePart {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GeminiUsageMetadata {
    #[serde(rename = "totalTokenCount")]
    total_token_count: Option<u32>,
}

/// Google Gemini API client.
///
/// Requires a valid API key and internet access. Delegates transport to the
/// shared HTTP client, with the API key carried as a query parameter (which
/// the client's logging redacts).
pub struct GeminiClient {
    http: HttpClient,
    api_key: String,
    model: String,
}

impl GeminiClient {
    /// Create a new client using the provided API key and model.
    pub fn new(api_key: String, model: String) -> Result<Self> {
        let http = new_http(GEMINI_BASE_URL)?;
        Ok(Self {
            http,
            api_key,
            model,
        })
    }

    /// Point the client at a different endpoint (used by tests against a
    /// mock server).
    pub fn with_base_url(mut self, base_url: &str) -> Result<Self> {
        self.http = new_http(base_url)?;
        Ok(self)
    }

    fn create_safety_settings() -> Vec<GeminiSafetySetting> {
        [
            "HARM_CATEGORY_HARASSMENT",
            "HARM_CATEGORY_HATE_SPEECH",
            "HARM_CATEGORY_SEXUALLY_EXPLICIT",
            "HARM_CATEGORY_DANGEROUS_CONTENT",
        ]
        .iter()
        .map(|category| GeminiSafetySetting {
            category: (*category).to_string(),
            threshold: "BLOCK_MEDIUM_AND_ABOVE".to_string(),
        })
        .collect()
    }
}

fn new_http(base: &str) -> Result<HttpClient> {
    Ok(HttpClient::new(base)
        .map_err(|e| TweetsheetError::Generation(format!("Failed to create HTTP client: {}", e)))?
        .with_timeout(GEMINI_TIMEOUT))
}

/// Keep the well-known failure modes recognisable in logs and skip reasons.
fn map_http_error(err: HttpError) -> TweetsheetError {
    match err {
        HttpError::Api { status, .. } if status.as_u16() == 429 => {
            TweetsheetError::Generation("Rate limit exceeded".to_string())
        }
        HttpError::Api { status, .. } if status.as_u16() == 401 => {
            TweetsheetError::Generation("Invalid API key".to_string())
        }
        HttpError::Api { status, .. } if status.as_u16() == 403 => {
            TweetsheetError::Generation("API access forbidden".to_string())
        }
        HttpError::Api { status, message } => {
            TweetsheetError::Generation(format!("Gemini API error ({}): {}", status, message))
        }
        HttpError::Decode(message, _) => {
            TweetsheetError::Generation(format!("Failed to parse Gemini response: {}", message))
        }
        other => TweetsheetError::Generation(format!("Gemini request failed: {}", other)),
    }
}

#[async_trait]
impl LlmClient for GeminiClient {
    async fn generate(
        &self,
        prompt: &str,
        system_prompt: Option<&str>,
        max_tokens: Option<u32>,
        temperature: Option<f32>,
    ) -> Result<LlmResponse> {
        let path = format!("models/{}:generateContent", self.model);

        let generation_config = if max_tokens.is_some() || temperature.is_some() {
            Some(GeminiGenerationConfig {
                temperature,
                max_output_tokens: max_tokens,
            })
        } else {
            None
        };

        // Handle system instruction (Gemini's system prompt)
        let system_instruction = system_prompt.map(|sys_prompt| GeminiSystemInstruction {
            parts: vec![GeminiPart {
                text: sys_prompt.to_string(),
            }],
        });

        let request = GeminiRequest {
            contents: vec![GeminiContent {
                parts: vec![GeminiPart {
                    text: prompt.to_string(),
                }],
            }],
            generation_config,
            safety_settings: Some(Self::create_safety_settings()),
            system_instruction,
        };

        tracing::debug!(model = %self.model, "Sending Gemini request");

        let gemini_response: GeminiResponse = self
            .http
            .post_json(
                &path,
                &request,
                RequestOpts {
                    auth: Some(Auth::Query {
                        name: "key",
                        value: Cow::Borrowed(&self.api_key),
                    }),
                    ..Default::default()
                },
            )
            .await
            .map_err(map_http_error)?;

        if gemini_response.candidates.is_empty() {
            return Err(TweetsheetError::Generation(
                "No candidates returned from Gemini".to_string(),
            ));
        }

        let candidate = &gemini_response.candidates[0];

        // Check for safety blocks
        if let Some(finish_reason) = &candidate.finish_reason {
            if finish_reason == "SAFETY" {
                return Err(TweetsheetError::Generation(
                    "Content blocked by Gemini safety filters".to_string(),
                ));
            }
        }

        if candidate.content.parts.is_empty() {
            return Err(TweetsheetError::Generation(
                "No content parts in Gemini response".to_string(),
            ));
        }

        let text = candidate.content.parts[0].text.clone();
        let tokens_used = gemini_response
            .usage_metadata
            .and_then(|u| u.total_token_count);

        Ok(LlmResponse {
            text,
            model: Some(self.model.clone()),
            tokens_used,
        })
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
