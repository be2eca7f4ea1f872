//! Anthropic Messages API client
//!
//! Text-generation provider used for pitch drafting. One prompt in, one text
//! block out; the model and token budget come from configuration.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use super::trait_::{PitchProvider, ProviderError};

const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Pitch text provider backed by the Anthropic Messages API.
pub struct AnthropicPitchProvider {
    http: reqwest::Client,
    api_base: String,
    api_key: String,
    model: String,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: Option<String>,
}

impl AnthropicPitchProvider {
    pub fn new(api_base: String, api_key: String, model: String, max_tokens: u32) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_base,
            api_key,
            model,
            max_tokens,
        }
    }

    /// Models sometimes wrap the pitch in quotes despite instructions.
    fn strip_surrounding_quotes(text: &str) -> &str {
        let trimmed = text.trim();
        if trimmed.len() >= 2 && trimmed.starts_with('"') && trimmed.ends_with('"') {
            &trimmed[1..trimmed.len() - 1]
        } else {
            trimmed
        }
    }
}

#[async_trait]
impl PitchProvider for AnthropicPitchProvider {
    async fn complete(&self, prompt: &str) -> Result<String, ProviderError> {
        if self.api_key.is_empty() {
            return Err(ProviderError::configuration(
                "Anthropic API key is not configured; set LEADSCOUT_ANTHROPIC_API_KEY",
            ));
        }

        let body = json!({
            "model": self.model,
            "max_tokens": self.max_tokens,
            "messages": [
                { "role": "user", "content": prompt }
            ],
        });

        let response = self
            .http
            .post(format!(
                "{}/v1/messages",
                self.api_base.trim_end_matches('/')
            ))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.ok();
            return Err(ProviderError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: MessagesResponse = response.json().await?;
        let text = parsed
            .content
            .first()
            .and_then(|block| block.text.as_deref())
            .ok_or_else(|| ProviderError::malformed("response contained no text block"))?;

        Ok(Self::strip_surrounding_quotes(text).to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_surrounding_quotes_only_when_paired() {
        assert_eq!(
            AnthropicPitchProvider::strip_surrounding_quotes("\"Goedemiddag!\""),
            "Goedemiddag!"
        );
        assert_eq!(
            AnthropicPitchProvider::strip_surrounding_quotes("  Goedemiddag!  "),
            "Goedemiddag!"
        );
        assert_eq!(
            AnthropicPitchProvider::strip_surrounding_quotes("\"Goedemiddag"),
            "\"Goedemiddag"
        );
    }
}
