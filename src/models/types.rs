use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE};

/// Credentials and model selection, passed explicitly with every call
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub model: String,
    pub api_key: String,
}

impl Credentials {
    pub fn new(model: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            api_key: api_key.into(),
        }
    }

    pub fn is_complete(&self) -> bool {
        !self.model.trim().is_empty() && !self.api_key.trim().is_empty()
    }
}

// Keep the key out of logs
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("model", &self.model)
            .field("api_key", &"***")
            .finish()
    }
}

/// Configuration for model parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    pub temperature: Option<f32>,
    pub max_tokens: Option<usize>,
    pub system_prompt: Option<String>,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            temperature: Some(DEFAULT_TEMPERATURE),
            max_tokens: Some(DEFAULT_MAX_TOKENS),
            system_prompt: Some(
                "You are a design systems expert. You document UI components and audit them \
                against design token and accessibility best practices. Respond with JSON only."
                    .to_string(),
            ),
        }
    }
}

/// One generation call: prompt text in, text out
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub credentials: Credentials,
    pub prompt: String,
    pub config: ModelConfig,
}

/// Response from a model
#[derive(Debug, Clone, PartialEq)]
pub struct ModelResponse {
    /// The actual response text
    pub content: String,
    /// Usage statistics if available
    pub usage: Option<TokenUsage>,
    /// Model that generated the response
    pub model_name: String,
}

impl ModelResponse {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            usage: None,
            model_name: String::new(),
        }
    }
}

/// Token usage statistics
#[derive(Debug, Clone, PartialEq)]
pub struct TokenUsage {
    pub prompt_tokens: usize,
    pub completion_tokens: usize,
    pub total_tokens: usize,
}

/// Failure modes of the generation service callers can tell apart
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GenerationError {
    #[error("network error: {0}")]
    Network(String),

    #[error("authorization rejected: {0}")]
    Authorization(String),

    #[error("rate limited: {0}")]
    RateLimited(String),

    #[error("no response within {0}s")]
    Timeout(u64),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("unexpected response shape: {0}")]
    InvalidResponse(String),
}
