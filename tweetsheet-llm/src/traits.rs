use async_trait::async_trait;
use tweetsheet_common::Result;

#[derive(Debug, Clone)]
pub struct LlmResponse {
    pub text: String,
    pub model: Option<String>,
    pub tokens_used: Option<u32>,
}

#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Generate a response to the given prompt with optional system prompt
    async fn generate(
        &self,
        prompt: &str,
        system_prompt: Option<&str>,
        max_tokens: Option<u32>,
        temperature: Option<f32>,
    ) -> Result<LlmResponse>;

    /// Get the model name being used
    fn model_name(&self) -> &str;

    /// Turn one sheet row into post text.
    ///
    /// The prompt embeds the row's content and hashtag verbatim; the first
    /// candidate is returned trimmed of surrounding whitespace.
    async fn compose_tweet(&self, content: &str, tag: &str) -> Result<String> {
        let prompt = format!(
            "Generate a tweet from this text: '{}' and this hashtag: '{}'",
            content, tag
        );

        tracing::debug!("Prompt: {}", prompt);
        let response = self.generate(&prompt, None, None, None).await?;
        tracing::debug!("LLM response: {}", response.text);

        Ok(response.text.trim().to_string())
    }
}
