//! Anthropic messages API provider.

use async_trait::async_trait;
use reqwest::Client as ReqwestClient;
use serde::Deserialize;
use tracing::debug;

use crate::domain::models::ProviderConfig;
use crate::domain::ports::{GenerationError, GenerationRequest};

use super::registry::GenerationProvider;

const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
const API_VERSION: &str = "2023-06-01";

pub struct AnthropicProvider {
    http: ReqwestClient,
    api_key: String,
    model: String,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: String,
}

impl AnthropicProvider {
    /// Build from config, falling back to `ANTHROPIC_API_KEY`. Returns
    /// `None` when no key is available, which marks the provider
    /// unavailable rather than misconfigured.
    pub fn from_config(config: &ProviderConfig, http: ReqwestClient) -> Option<Self> {
        let api_key = config
            .api_key
            .clone()
            .or_else(|| std::env::var("ANTHROPIC_API_KEY").ok())
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
impl GenerationProvider for AnthropicProvider {
    fn provider_id(&self) -> &'static str {
        "anthropic"
    }

    async fn generate_raw(&self, request: &GenerationRequest) -> Result<String, GenerationError> {
        let body = serde_json::json!({
            "model": self.model,
            "max_tokens": request.max_tokens,
            "temperature": request.temperature,
            "system": request.system_prompt,
            "messages": [{ "role": "user", "content": request.user_prompt }],
        });

        let response = self
            .http
            .post(format!("{}/v1/messages", self.base_url))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .json(&body)
            .send()
            .await
            .map_err(|e| GenerationError::ProviderFailed {
                provider: "anthropic".to_string(),
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GenerationError::ProviderFailed {
                provider: "anthropic".to_string(),
                message: format!("{status}: {body}"),
            });
        }

        let parsed: MessagesResponse =
            response
                .json()
                .await
                .map_err(|e| GenerationError::ProviderFailed {
                    provider: "anthropic".to_string(),
                    message: format!("malformed response: {e}"),
                })?;

        let text = parsed
            .content
            .first()
            .map(|block| block.text.clone())
            .unwrap_or_default();
        debug!(chars = text.len(), "anthropic generation complete");
        if text.trim().is_empty() {
            return Err(GenerationError::EmptyResponse("anthropic".to_string()));
        }
        Ok(text)
    }
}
