use async_trait::async_trait;

use super::types::{GenerationError, GenerationRequest, ModelResponse};

/// Core trait that all generation backends must implement
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Model: Send + Sync {
    /// Send one prompt to the model and get its text back
    async fn generate(&self, request: &GenerationRequest) -> Result<ModelResponse, GenerationError>;
}
