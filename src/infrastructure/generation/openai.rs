//! OpenAI chat completions provider.

use async_trait::async_trait;
use reqwest::Client as ReqwestClient;
use serde::Deserialize;
use tracing::debug;

use crate::domain::models::ProviderConfig;
use crate::domain::ports::{GenerationError, GenerationRequest};

use super::registry::GenerationProvider;

const DEFAULT_BASE_URL: &str = "https://api.openai.com";

pub struct OpenAiProvider {
    http: ReqwestClient,
    api_key: String,
    model: String,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    #[serde(default)]
    content: String,
}

impl OpenAiProvider {
    /// Build from config, falling back to `OPENAI_API_KEY`. `None` means
    /// unavailable, not misconfigured.
    pub fn from_config(config: &ProviderConfig, http: ReqwestClient) -> Option<Self> {
        let api_key = config
            .api_key
            .clone()
            .or_else(|| std::env::var("OPENAI_API_KEY").ok())
            .filter(|k| !k.is_empty())?;
        Some(Self {
            http,
            api_key,
            model: config.model.clone(),
            base_url: config
                .base_url
                .clone()
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        })
    }
}

#[async_trait]
impl GenerationProvider for OpenAiProvider {
    fn provider_id(&self) -> &'static str {
        "openai"
    }

    async fn generate_raw(&self, request: &GenerationRequest) -> Result<String, GenerationError> {
        let body = serde_json::json!({
            "model": self.model,
            "max_tokens": request.max_tokens,
            "temperature": request.temperature,
            "messages": [
                { "role": "system", "content": request.system_prompt },
                { "role": "user", "content": request.user_prompt },
            ],
        });

        let response = self
            .http
            .post(format!("{}/v1/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&body)
            .send()
            .await
            .map_err(|e| GenerationError::ProviderFailed {
                provider: "openai".to_string(),
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GenerationError::ProviderFailed {
                provider: "openai".to_string(),
                message: format!("{status}: {body}"),
            });
        }

        let parsed: ChatResponse =
            response
                .json()
                .await
                .map_err(|e| GenerationError::ProviderFailed {
                    provider: "openai".to_string(),
                    message: format!("malformed response: {e}"),
                })?;

        let text = parsed
            .choices
            .first()
            .map(|choice| choice.message.content.clone())
            .unwrap_or_default();
        debug!(chars = text.len(), "openai generation complete");
        if text.trim().is_empty() {
            return Err(GenerationError::EmptyResponse("openai".to_string()));
        }
        Ok(text)
    }
}
