//! Groq chat-completions client.
//!
//! Groq exposes an OpenAI-compatible `POST /chat/completions` endpoint.
//! Only the non-streaming form is used: one system message, one user
//! message, and the text of the first choice back.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::{DecomposerError, Result};
use crate::TextGenerator;

/// Environment variable holding the Groq API key.
pub const ENV_API_KEY: &str = "GROQ_API_KEY";
/// Environment variable overriding the API base URL.
pub const ENV_BASE_URL: &str = "GROQ_BASE_URL";
/// Environment variable overriding the model identifier.
pub const ENV_MODEL: &str = "GROQ_MODEL";
/// Environment variable overriding the request timeout in milliseconds.
pub const ENV_TIMEOUT_MS: &str = "GROQ_TIMEOUT_MS";

/// Default Groq OpenAI-compatible API root.
pub const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";
/// Model used for goal decomposition.
pub const DEFAULT_MODEL: &str = "llama-3.1-8b-instant";

/// Configuration for the [`GroqClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroqConfig {
    /// Bearer token sent with every request.
    pub api_key: String,
    /// API root; `/chat/completions` is appended.
    pub base_url: String,
    /// Model identifier.
    pub model: String,
    /// Request timeout in milliseconds.
    pub timeout_ms: u64,
}

impl Default for GroqConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout_ms: 20_000,
        }
    }
}

impl GroqConfig {
    /// Loads the configuration from the environment, falling back to defaults.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(key) = std::env::var(ENV_API_KEY) {
            config.api_key = key;
        }
        if let Ok(url) = std::env::var(ENV_BASE_URL) {
            if !url.trim().is_empty() {
                config.base_url = url;
            }
        }
        if let Ok(model) = std::env::var(ENV_MODEL) {
            if !model.trim().is_empty() {
                config.model = model;
            }
        }
        if let Ok(timeout) = std::env::var(ENV_TIMEOUT_MS) {
            if let Ok(ms) = timeout.parse::<u64>() {
                config.timeout_ms = ms;
            }
        }

        config
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = api_key.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Checks that the client can be built from this configuration.
    pub fn validate(&self) -> Result<()> {
        if self.api_key.trim().is_empty() {
            return Err(DecomposerError::Config(format!("{} is not set", ENV_API_KEY)));
        }
        if self.model.trim().is_empty() {
            return Err(DecomposerError::Config("model cannot be empty".to_string()));
        }
        if self.timeout_ms == 0 {
            return Err(DecomposerError::Config(
                "timeout must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

#[derive(Serialize, Debug)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Serialize, Debug)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
}

#[derive(Deserialize, Debug)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize, Debug)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize, Debug)]
struct ChoiceMessage {
    content: Option<String>,
}

/// Text generator backed by the Groq API.
pub struct GroqClient {
    config: GroqConfig,
    http: reqwest::Client,
}

impl GroqClient {
    /// Create a client; fails if the configuration is incomplete.
    pub fn new(config: GroqConfig) -> Result<Self> {
        config.validate()?;
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| DecomposerError::Config(e.to_string()))?;
        Ok(Self { config, http })
    }

    pub fn config(&self) -> &GroqConfig {
        &self.config
    }
}

#[async_trait]
impl TextGenerator for GroqClient {
    async fn generate(&self, system_prompt: &str, user_prompt: &str) -> Result<String> {
        let body = ChatCompletionRequest {
            model: &self.config.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: user_prompt,
                },
            ],
        };

        debug!(model = %self.config.model, "requesting chat completion");
        let resp = self
            .http
            .post(self.config.completions_url())
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let detail = resp.text().await.unwrap_or_default();
            warn!(%status, "chat completion rejected");
            return Err(DecomposerError::DecompositionFailed(format!(
                "model API returned {}: {}",
                status,
                detail.trim()
            )));
        }

        let completion: ChatCompletionResponse = resp.json().await.map_err(|e| {
            DecomposerError::DecompositionFailed(format!("failed to parse model response: {}", e))
        })?;

        completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| {
                DecomposerError::DecompositionFailed("model response had no content".to_string())
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GroqConfig::default();
        assert_eq!(config.base_url, "https://api.groq.com/openai/v1");
        assert_eq!(config.model, "llama-3.1-8b-instant");
        assert_eq!(config.timeout_ms, 20_000);
    }

    #[test]
    fn test_validate_requires_api_key() {
        assert!(matches!(
            GroqConfig::default().validate(),
            Err(DecomposerError::Config(_))
        ));
        assert!(GroqConfig::default().with_api_key("gsk_test").validate().is_ok());
        assert!(GroqConfig::default()
            .with_api_key("gsk_test")
            .with_timeout_ms(0)
            .validate()
            .is_err());
    }

    #[test]
    fn test_completions_url() {
        let config = GroqConfig::default().with_base_url("http://127.0.0.1:9000/v1/");
        assert_eq!(
            config.completions_url(),
            "http://127.0.0.1:9000/v1/chat/completions"
        );
    }

    #[test]
    fn test_request_body_shape() {
        let body = ChatCompletionRequest {
            model: DEFAULT_MODEL,
            messages: [
                ChatMessage {
                    role: "system",
                    content: "sys",
                },
                ChatMessage {
                    role: "user",
                    content: "usr",
                },
            ],
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({
                "model": "llama-3.1-8b-instant",
                "messages": [
                    {"role": "system", "content": "sys"},
                    {"role": "user", "content": "usr"}
                ]
            })
        );
    }
}
