//! Provider registry with priority-ordered fallback.
//!
//! Providers register in the order configured under `generation.priority`.
//! `generate` tries the highest-priority available provider; when it fails,
//! exactly one retry goes to the next available provider before the call
//! gives up. All raw output passes through response cleaning before it
//! reaches callers.

use async_trait::async_trait;
use reqwest::Client as ReqwestClient;
use std::time::Duration;
use tracing::{info, instrument, warn};

use crate::domain::models::GenerationConfig;
use crate::domain::ports::{GenerationError, GenerationRequest, TextGenerator};

use super::anthropic::AnthropicProvider;
use super::cleaning::clean_response;
use super::openai::OpenAiProvider;

/// A single generation backend. Implementations return raw model output;
/// the registry owns cleaning and fallback.
#[async_trait]
pub trait GenerationProvider: Send + Sync {
    fn provider_id(&self) -> &'static str;

    async fn generate_raw(&self, request: &GenerationRequest) -> Result<String, GenerationError>;
}

/// Priority-ordered set of generation providers.
pub struct ProviderRegistry {
    providers: Vec<Box<dyn GenerationProvider>>,
}

impl ProviderRegistry {
    /// Build the registry from configuration. Providers without an API key
    /// (config or environment) are skipped rather than erroring, so the
    /// registry can be constructed even when generation is unusable.
    pub fn from_config(config: &GenerationConfig) -> Result<Self, GenerationError> {
        let http = ReqwestClient::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| GenerationError::ProviderFailed {
                provider: "registry".to_string(),
                message: format!("failed to build http client: {e}"),
            })?;

        let mut providers: Vec<Box<dyn GenerationProvider>> = Vec::new();
        for id in &config.priority {
            match id.as_str() {
                "anthropic" => {
                    if let Some(provider) =
                        AnthropicProvider::from_config(&config.anthropic, http.clone())
                    {
                        providers.push(Box::new(provider));
                    }
                }
                "openai" => {
                    if let Some(provider) =
                        OpenAiProvider::from_config(&config.openai, http.clone())
                    {
                        providers.push(Box::new(provider));
                    }
                }
                other => {
                    warn!(provider = other, "unknown provider id in priority list, skipping");
                }
            }
        }

        info!(
            available = providers.len(),
            "generation provider registry initialized"
        );
        Ok(Self { providers })
    }

    #[cfg(test)]
    pub fn with_providers(providers: Vec<Box<dyn GenerationProvider>>) -> Self {
        Self { providers }
    }
}

#[async_trait]
impl TextGenerator for ProviderRegistry {
    #[instrument(skip(self, request))]
    async fn generate(&self, request: GenerationRequest) -> Result<String, GenerationError> {
        if self.providers.is_empty() {
            return Err(GenerationError::NoProviderAvailable);
        }

        // Primary attempt plus at most one fallback to the next provider.
        let mut last: Option<(&'static str, GenerationError)> = None;
        for provider in self.providers.iter().take(2) {
            match provider.generate_raw(&request).await {
                Ok(raw) => {
                    let cleaned = clean_response(&raw);
                    if cleaned.is_empty() {
                        last = Some((
                            provider.provider_id(),
                            GenerationError::EmptyResponse(provider.provider_id().into()),
                        ));
                        continue;
                    }
                    return Ok(cleaned);
                }
                Err(e) => {
                    warn!(
                        provider = provider.provider_id(),
                        error = %e,
                        "generation provider failed"
                    );
                    last = Some((provider.provider_id(), e));
                }
            }
        }

        let (provider, error) =
            last.map_or(("none", GenerationError::NoProviderAvailable), |l| l);
        Err(GenerationError::AllProvidersFailed {
            provider: provider.to_string(),
            message: error.to_string(),
        })
    }

    fn is_available(&self) -> bool {
        !self.providers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct ScriptedProvider {
        id: &'static str,
        responses: Vec<Result<String, String>>,
        calls: AtomicUsize,
    }

    impl ScriptedProvider {
        fn ok(id: &'static str, text: &str) -> Self {
            Self {
                id,
                responses: vec![Ok(text.to_string())],
                calls: AtomicUsize::new(0),
            }
        }

        fn failing(id: &'static str) -> Self {
            Self {
                id,
                responses: vec![Err("boom".to_string())],
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl GenerationProvider for ScriptedProvider {
        fn provider_id(&self) -> &'static str {
            self.id
        }

        async fn generate_raw(
            &self,
            _request: &GenerationRequest,
        ) -> Result<String, GenerationError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            let response = self.responses.get(call.min(self.responses.len() - 1));
            match response {
                Some(Ok(text)) => Ok(text.clone()),
                Some(Err(message)) => Err(GenerationError::ProviderFailed {
                    provider: self.id.to_string(),
                    message: message.clone(),
                }),
                None => unreachable!(),
            }
        }
    }

    fn request() -> GenerationRequest {
        GenerationRequest::new("system", "user")
    }

    #[tokio::test]
    async fn uses_highest_priority_provider() {
        let registry = ProviderRegistry::with_providers(vec![
            Box::new(ScriptedProvider::ok("first", "from first")),
            Box::new(ScriptedProvider::ok("second", "from second")),
        ]);
        assert_eq!(registry.generate(request()).await.unwrap(), "from first");
    }

    #[tokio::test]
    async fn falls_back_exactly_once() {
        let registry = ProviderRegistry::with_providers(vec![
            Box::new(ScriptedProvider::failing("first")),
            Box::new(ScriptedProvider::ok("second", "from second")),
        ]);
        assert_eq!(registry.generate(request()).await.unwrap(), "from second");
    }

    #[tokio::test]
    async fn third_provider_is_never_tried() {
        let registry = ProviderRegistry::with_providers(vec![
            Box::new(ScriptedProvider::failing("first")),
            Box::new(ScriptedProvider::failing("second")),
            Box::new(ScriptedProvider::ok("third", "from third")),
        ]);
        let err = registry.generate(request()).await.unwrap_err();
        assert!(matches!(err, GenerationError::AllProvidersFailed { .. }));
    }

    #[tokio::test]
    async fn empty_registry_reports_no_provider() {
        let registry = ProviderRegistry::with_providers(vec![]);
        assert!(!registry.is_available());
        let err = registry.generate(request()).await.unwrap_err();
        assert!(matches!(err, GenerationError::NoProviderAvailable));
    }

    #[tokio::test]
    async fn output_is_cleaned() {
        let registry = ProviderRegistry::with_providers(vec![Box::new(ScriptedProvider::ok(
            "first",
            "```\ncleaned text\n```",
        ))]);
        assert_eq!(registry.generate(request()).await.unwrap(), "cleaned text");
    }
}
