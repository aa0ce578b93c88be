//! Text generation port.
//!
//! Uniform "generate text" call over whichever LLM backend is available.
//! Provider selection and fallback live behind this trait in
//! `infrastructure::generation`.

use async_trait::async_trait;

use super::errors::GenerationError;

/// A single text generation request.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub system_prompt: String,
    pub user_prompt: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl GenerationRequest {
    pub fn new(system_prompt: impl Into<String>, user_prompt: impl Into<String>) -> Self {
        Self {
            system_prompt: system_prompt.into(),
            user_prompt: user_prompt.into(),
            max_tokens: 1024,
            temperature: 0.7,
        }
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }
}

/// Port trait for text generation backends.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate text, already passed through response cleaning.
    async fn generate(&self, request: GenerationRequest) -> Result<String, GenerationError>;

    /// Whether at least one backend is currently available.
    fn is_available(&self) -> bool;
}
