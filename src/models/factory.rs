use std::sync::Arc;

use super::traits::Model;
use super::types::{Credentials, GenerationError, ModelConfig};
use super::unified::UnifiedModel;
use crate::app::GenerationSettings;
use crate::utils::InputError;

/// Factory for creating model backends and the per-call inputs they need
pub struct ModelFactory;

impl ModelFactory {
    /// Create the configured generation backend
    pub fn create(settings: &GenerationSettings) -> Result<Arc<dyn Model>, GenerationError> {
        Ok(Arc::new(UnifiedModel::new(&settings.base_url)?))
    }

    /// Resolve credentials from the environment variable named in settings.
    ///
    /// `model_override` replaces the configured model id. A missing or
    /// empty key is an input error, raised before anything touches the
    /// network.
    pub fn credentials(
        settings: &GenerationSettings,
        model_override: Option<&str>,
    ) -> Result<Credentials, InputError> {
        let model = model_override
            .map(str::to_string)
            .unwrap_or_else(|| settings.model.clone());
        let api_key = std::env::var(&settings.api_key_env).unwrap_or_default();

        let credentials = Credentials::new(model.clone(), api_key);
        if credentials.is_complete() {
            Ok(credentials)
        } else {
            Err(InputError::MissingCredential { model })
        }
    }

    /// Model parameters derived from settings
    pub fn model_config(settings: &GenerationSettings) -> ModelConfig {
        ModelConfig {
            temperature: Some(settings.temperature),
            max_tokens: Some(settings.max_tokens),
            ..ModelConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_key_is_input_error() {
        let settings = GenerationSettings {
            api_key_env: "COMPONENT_AUDIT_TEST_KEY_THAT_IS_NEVER_SET".to_string(),
            ..GenerationSettings::default()
        };
        let err = ModelFactory::credentials(&settings, Some("custom-model")).unwrap_err();
        assert_eq!(
            err,
            InputError::MissingCredential {
                model: "custom-model".to_string()
            }
        );
    }

    #[test]
    fn test_model_config_uses_settings() {
        let settings = GenerationSettings {
            temperature: 0.0,
            max_tokens: 1024,
            ..GenerationSettings::default()
        };
        let config = ModelFactory::model_config(&settings);
        assert_eq!(config.temperature, Some(0.0));
        assert_eq!(config.max_tokens, Some(1024));
        assert!(config.system_prompt.is_some());
    }
}
