use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Grounding text used to steer generation and validation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeBase {
    pub version: String,
    /// Family label to guidance; always contains `generic`
    pub per_family_guidance: BTreeMap<String, String>,
    pub token_guidance: String,
    pub accessibility_guidance: String,
    pub scoring_guidance: String,
    pub last_updated: DateTime<Utc>,
}

impl KnowledgeBase {
    /// Guidance for a family, falling back to the generic entry
    pub fn guidance_for(&self, family: &str) -> &str {
        self.per_family_guidance
            .get(family)
            .or_else(|| self.per_family_guidance.get("generic"))
            .map(String::as_str)
            .unwrap_or_default()
    }
}

/// One search hit from the knowledge service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeDocument {
    pub title: String,
    pub content: String,
}

/// The four topics fetched after a successful probe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KnowledgeTopic {
    ComponentBestPractices,
    TokenConventions,
    Accessibility,
    Scoring,
}

impl KnowledgeTopic {
    pub const ALL: [KnowledgeTopic; 4] = [
        KnowledgeTopic::ComponentBestPractices,
        KnowledgeTopic::TokenConventions,
        KnowledgeTopic::Accessibility,
        KnowledgeTopic::Scoring,
    ];

    pub fn query(&self) -> &'static str {
        match self {
            KnowledgeTopic::ComponentBestPractices => {
                "component best practices states variants properties"
            }
            KnowledgeTopic::TokenConventions => "design token naming conventions semantic tokens",
            KnowledgeTopic::Accessibility => "component accessibility requirements WCAG keyboard aria",
            KnowledgeTopic::Scoring => "component readiness scoring methodology rubric",
        }
    }

    pub fn category(&self) -> &'static str {
        match self {
            KnowledgeTopic::ComponentBestPractices => "components",
            KnowledgeTopic::TokenConventions => "tokens",
            KnowledgeTopic::Accessibility => "accessibility",
            KnowledgeTopic::Scoring => "scoring",
        }
    }
}

/// Where the memoized knowledge came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum KnowledgeSource {
    Remote,
    Fallback,
}

/// Provider lifecycle as seen from outside
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum KnowledgeStatus {
    Unloaded,
    Probing,
    LoadedRemote,
    LoadedFallback,
}

impl KnowledgeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            KnowledgeStatus::Unloaded => "unloaded",
            KnowledgeStatus::Probing => "probing",
            KnowledgeStatus::LoadedRemote => "loaded (remote)",
            KnowledgeStatus::LoadedFallback => "loaded (built-in fallback)",
        }
    }
}

/// Connectivity failures talking to the knowledge service. Always absorbed
/// by the provider; never returned from the engine.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum KnowledgeError {
    #[error("knowledge service unreachable: {0}")]
    Unreachable(String),

    #[error("knowledge service timed out after {0}ms")]
    Timeout(u64),

    #[error("knowledge service returned {status}")]
    Status { status: u16 },

    #[error("malformed knowledge response: {0}")]
    Malformed(String),
}
