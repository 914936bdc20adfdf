/// Constants module to avoid magic numbers in the codebase

// Network Configuration
pub const DEFAULT_GENERATION_BASE_URL: &str = "https://api.openai.com";
pub const DEFAULT_GENERATION_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_API_KEY_ENV: &str = "OPENAI_API_KEY";
pub const DEFAULT_KNOWLEDGE_BASE_URL: &str = "http://localhost:8765";

// Timeouts
pub const KNOWLEDGE_PROBE_TIMEOUT_MS: u64 = 5_000;
pub const KNOWLEDGE_QUERY_TIMEOUT_MS: u64 = 5_000;
pub const GENERATION_TIMEOUT_SECS: u64 = 120;

// Cache
pub const ANALYSIS_CACHE_TTL_MS: i64 = 86_400_000; // 24 hours

// Knowledge queries
pub const KNOWLEDGE_RESULTS_PER_TOPIC: usize = 5;
pub const FALLBACK_KNOWLEDGE_VERSION: &str = "builtin-1";

// Token classification
pub const AI_SUGGESTION_CAP: usize = 8;
pub const RADIUS_FULL_THRESHOLD: f64 = 999.0;

// Default generation parameters
pub const DEFAULT_TEMPERATURE: f32 = 0.2;
pub const DEFAULT_MAX_TOKENS: usize = 4096;

// Node kinds that can be analyzed as a component
pub const ANALYZABLE_NODE_TYPES: &[&str] = &["COMPONENT", "COMPONENT_SET", "INSTANCE", "FRAME"];
