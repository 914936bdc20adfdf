// Gateway module for models - follows the Train Station Pattern
// All external access must go through this gateway

// Private submodules - not directly accessible from outside
mod factory;
mod traits;
mod types;
mod unified;

// Public re-exports - the ONLY way to access model functionality
pub use factory::ModelFactory;
pub use traits::Model;
#[cfg(test)]
pub use traits::MockModel;
pub use types::{
    Credentials, GenerationError, GenerationRequest, ModelConfig, ModelResponse, TokenUsage,
};
pub use unified::UnifiedModel;
