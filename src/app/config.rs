use anyhow::{Context, Result};
use directories::ProjectDirs;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::constants::{
    AI_SUGGESTION_CAP, ANALYSIS_CACHE_TTL_MS, DEFAULT_API_KEY_ENV, DEFAULT_GENERATION_BASE_URL,
    DEFAULT_GENERATION_MODEL, DEFAULT_KNOWLEDGE_BASE_URL, DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE,
    GENERATION_TIMEOUT_SECS, KNOWLEDGE_PROBE_TIMEOUT_MS, KNOWLEDGE_QUERY_TIMEOUT_MS,
    KNOWLEDGE_RESULTS_PER_TOPIC,
};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Generation service configuration
    #[serde(default)]
    pub generation: GenerationSettings,

    /// Knowledge service configuration
    #[serde(default)]
    pub knowledge: KnowledgeSettings,

    /// Analysis cache configuration
    #[serde(default)]
    pub cache: CacheSettings,

    /// Token classifier configuration
    #[serde(default)]
    pub tokens: TokenSettings,
}

/// Generation service settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationSettings {
    /// Base URL of an OpenAI-compatible endpoint
    pub base_url: String,
    /// Model identifier sent with each request
    pub model: String,
    /// Environment variable containing the API key
    pub api_key_env: String,
    /// Temperature for generation
    pub temperature: f32,
    /// Maximum tokens to generate
    pub max_tokens: usize,
    /// Upper bound on a single generation call
    pub timeout_secs: u64,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_GENERATION_BASE_URL.to_string(),
            model: DEFAULT_GENERATION_MODEL.to_string(),
            api_key_env: DEFAULT_API_KEY_ENV.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            timeout_secs: GENERATION_TIMEOUT_SECS,
        }
    }
}

impl GenerationSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Knowledge service settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnowledgeSettings {
    /// When false, the built-in knowledge is used without any network call
    pub enabled: bool,
    pub base_url: String,
    pub probe_timeout_ms: u64,
    pub query_timeout_ms: u64,
    pub results_per_topic: usize,
}

impl Default for KnowledgeSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: DEFAULT_KNOWLEDGE_BASE_URL.to_string(),
            probe_timeout_ms: KNOWLEDGE_PROBE_TIMEOUT_MS,
            query_timeout_ms: KNOWLEDGE_QUERY_TIMEOUT_MS,
            results_per_topic: KNOWLEDGE_RESULTS_PER_TOPIC,
        }
    }
}

impl KnowledgeSettings {
    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_timeout_ms)
    }

    pub fn query_timeout(&self) -> Duration {
        Duration::from_millis(self.query_timeout_ms)
    }
}

/// Analysis cache settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheSettings {
    pub ttl_ms: i64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            ttl_ms: ANALYSIS_CACHE_TTL_MS,
        }
    }
}

impl CacheSettings {
    pub fn ttl(&self) -> chrono::Duration {
        chrono::Duration::milliseconds(self.ttl_ms)
    }
}

/// Token classifier settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenSettings {
    /// Maximum generator-suggested tokens admitted per category
    pub ai_suggestion_cap: usize,
}

impl Default for TokenSettings {
    fn default() -> Self {
        Self {
            ai_suggestion_cap: AI_SUGGESTION_CAP,
        }
    }
}

/// Load configuration from multiple sources
pub fn load_config() -> Result<Config> {
    let global_config = get_config_dir()?.join("config.toml");
    let local_config = PathBuf::from(".component-audit/config.toml");
    build_figment(&[global_config, local_config])
        .extract()
        .context("Failed to load configuration")
}

/// Load configuration from one explicit file, still honoring env overrides
pub fn load_config_from(path: &Path) -> Result<Config> {
    if !path.exists() {
        anyhow::bail!("Configuration file not found: {}", path.display());
    }
    build_figment(&[path.to_path_buf()])
        .extract()
        .with_context(|| format!("Failed to load configuration from {}", path.display()))
}

fn build_figment(files: &[PathBuf]) -> Figment {
    let mut figment = Figment::from(Serialized::defaults(Config::default()));

    for file in files {
        if file.exists() {
            figment = figment.merge(Toml::file(file));
        }
    }

    // COMPONENT_AUDIT_GENERATION__MODEL=... style overrides
    figment.merge(Env::prefixed("COMPONENT_AUDIT_").split("__"))
}

/// Get the configuration directory
pub fn get_config_dir() -> Result<PathBuf> {
    if let Some(proj_dirs) = ProjectDirs::from("", "", "component-audit") {
        let config_dir = proj_dirs.config_dir();
        std::fs::create_dir_all(config_dir)?;
        Ok(config_dir.to_path_buf())
    } else {
        let home = std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .context("Could not determine home directory")?;
        let config_dir = PathBuf::from(home).join(".config").join("component-audit");
        std::fs::create_dir_all(&config_dir)?;
        Ok(config_dir)
    }
}

/// Save configuration to file
pub fn save_config(config: &Config, path: Option<PathBuf>) -> Result<PathBuf> {
    let path = match path {
        Some(p) => p,
        None => get_config_dir()?.join("config.toml"),
    };

    let toml_string = toml::to_string_pretty(config)?;
    std::fs::write(&path, toml_string)
        .with_context(|| format!("Failed to write config to {}", path.display()))?;

    Ok(path)
}

/// Create a default configuration file if it doesn't exist
pub fn init_config() -> Result<Option<PathBuf>> {
    let config_file = get_config_dir()?.join("config.toml");
    if config_file.exists() {
        return Ok(None);
    }
    save_config(&Config::default(), Some(config_file)).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.cache.ttl_ms, 86_400_000);
        assert_eq!(config.knowledge.probe_timeout(), Duration::from_secs(5));
        assert_eq!(config.knowledge.query_timeout(), Duration::from_secs(5));
        assert!(config.knowledge.enabled);
    }

    #[test]
    fn test_file_overrides_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[generation]\nmodel = \"local-model\"\n\n[knowledge]\nenabled = false\n",
        )
        .unwrap();

        let config = load_config_from(&path).unwrap();
        assert_eq!(config.generation.model, "local-model");
        assert!(!config.knowledge.enabled);
        // Untouched sections keep defaults
        assert_eq!(config.tokens.ai_suggestion_cap, AI_SUGGESTION_CAP);
        assert_eq!(config.generation.api_key_env, DEFAULT_API_KEY_ENV);
    }

    #[test]
    fn test_save_round_trips_through_loader() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        let mut config = Config::default();
        config.cache.ttl_ms = 1_000;
        save_config(&config, Some(path.clone())).unwrap();

        assert_eq!(load_config_from(&path).unwrap().cache.ttl_ms, 1_000);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        assert!(load_config_from(&temp_dir.path().join("nope.toml")).is_err());
    }
}
