//! OpenAI-compatible chat completions client.
//!
//! Talks to any provider exposing `POST {base_url}/chat/completions` (Groq by
//! default). Requests are sent exactly once; failures are returned to the
//! caller.

use super::Generator;
use crate::config::LlmSettings;
use crate::error::{Result, TubetalkError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, instrument};

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<Message<'a>>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

/// Chat completions generator.
pub struct ChatCompletionsGenerator {
    client: reqwest::Client,
    base_url: String,
    model: String,
    api_key_env: String,
    temperature: f32,
}

impl ChatCompletionsGenerator {
    /// Create a generator. The API key is read from `api_key_env` on each call.
    pub fn new(
        base_url: &str,
        model: &str,
        api_key_env: &str,
        temperature: f32,
        timeout: Duration,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TubetalkError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key_env: api_key_env.to_string(),
            temperature,
        })
    }

    /// Create a generator from settings.
    pub fn from_settings(settings: &LlmSettings) -> Result<Self> {
        Self::new(
            &settings.base_url,
            &settings.model,
            &settings.api_key_env,
            settings.temperature,
            Duration::from_secs(settings.timeout_seconds),
        )
    }

    fn endpoint(&self) -> String {
        if self.base_url.ends_with("/chat/completions") {
            self.base_url.clone()
        } else {
            format!("{}/chat/completions", self.base_url)
        }
    }

    fn api_key(&self) -> Result<String> {
        match std::env::var(&self.api_key_env) {
            Ok(key) if !key.trim().is_empty() => Ok(key),
            _ => Err(TubetalkError::Config(format!(
                "{} is not set. Export it or add it to a .env file.",
                self.api_key_env
            ))),
        }
    }
}

#[async_trait]
impl Generator for ChatCompletionsGenerator {
    #[instrument(skip(self, prompt), fields(model = %self.model, prompt_chars = prompt.len()))]
    async fn generate(&self, prompt: &str) -> Result<String> {
        let api_key = self.api_key()?;

        let request = ChatRequest {
            model: &self.model,
            messages: vec![Message {
                role: "user",
                content: prompt,
            }],
            temperature: self.temperature,
        };

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| TubetalkError::Generation(format!("Request failed: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| TubetalkError::Generation(format!("Failed to read response: {}", e)))?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorBody>(&body)
                .map(|b| b.error.message)
                .unwrap_or(body);
            return Err(TubetalkError::Generation(format!("{}: {}", status, message)));
        }

        let parsed: ChatResponse = serde_json::from_str(&body)
            .map_err(|e| TubetalkError::Generation(format!("Unparsable response: {}", e)))?;

        let text = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| TubetalkError::Generation("Response contained no answer".to_string()))?;

        debug!("Generated {} chars", text.len());
        Ok(text)
    }

    fn model(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generator(base_url: &str, key_env: &str) -> ChatCompletionsGenerator {
        ChatCompletionsGenerator::new(base_url, "test-model", key_env, 0.7, Duration::from_secs(5))
            .unwrap()
    }

    #[test]
    fn test_endpoint() {
        assert_eq!(
            generator("https://api.groq.com/openai/v1/", "K").endpoint(),
            "https://api.groq.com/openai/v1/chat/completions"
        );
        assert_eq!(
            generator("http://localhost/v1/chat/completions", "K").endpoint(),
            "http://localhost/v1/chat/completions"
        );
    }

    #[tokio::test]
    async fn test_missing_key_is_config_error() {
        let generator = generator("http://127.0.0.1:9", "TUBETALK_TEST_UNSET_KEY");
        let err = generator.generate("hi").await.unwrap_err();
        assert!(matches!(err, TubetalkError::Config(msg) if msg.contains("TUBETALK_TEST_UNSET_KEY")));
    }

    #[test]
    fn test_from_settings() {
        let generator = ChatCompletionsGenerator::from_settings(&LlmSettings::default()).unwrap();
        assert_eq!(generator.model(), "llama-3.1-8b-instant");
    }
}
