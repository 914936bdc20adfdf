use serde::{Deserialize, Serialize};
use std::fmt;

/// A property a component family is expected to expose
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpectedProperty {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub values: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// How a profile was chosen for a family
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", tag = "kind", content = "name")]
pub enum ProfileSource {
    Canonical,
    Archetype(String),
    Default,
}

/// Expected behavior for a component family
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentBestPractices {
    pub family: String,
    pub source: ProfileSource,
    /// Missing states are warnings only for interactive profiles
    pub interactive: bool,
    pub expected_states: Vec<String>,
    pub expected_properties: Vec<ExpectedProperty>,
    pub accessibility_requirements: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GapCategory {
    States,
    Properties,
    Accessibility,
}

impl fmt::Display for GapCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            GapCategory::States => "states",
            GapCategory::Properties => "properties",
            GapCategory::Accessibility => "accessibility",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GapSeverity {
    Error,
    Warning,
    Info,
}

impl fmt::Display for GapSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            GapSeverity::Error => "error",
            GapSeverity::Warning => "warning",
            GapSeverity::Info => "info",
        })
    }
}

/// Difference between what a component reports and what its family expects
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BestPracticesGap {
    pub category: GapCategory,
    pub severity: GapSeverity,
    pub message: String,
    pub suggestion: String,
    pub missing_items: Vec<String>,
}
