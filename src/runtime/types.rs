use serde::{Deserialize, Serialize};

use crate::cache::Fingerprint;
use crate::gaps::BestPracticesGap;
use crate::tokens::{TokenAnalysis, TokenCategory, TokenOrigin};
use crate::validation::{ComponentMetadata, Correction, PropSpec, ReadinessScore, VariantSpec};

/// Where an audit finding came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FindingSource {
    /// Reported by the generator
    Generated,
    /// Derived from the token classification
    Tokens,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditFinding {
    pub severity: String,
    pub source: FindingSource,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

/// One row of the property cheat-sheet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyCheat {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub values: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
}

impl PropertyCheat {
    pub fn from_prop(prop: &PropSpec) -> Self {
        Self {
            name: prop.name.clone(),
            kind: if prop.kind.is_empty() {
                "string".to_string()
            } else {
                prop.kind.clone()
            },
            values: prop.values.clone(),
            default: prop.default.clone(),
        }
    }

    pub fn from_variant(variant: &VariantSpec) -> Self {
        Self {
            name: variant.name.clone(),
            kind: "variant".to_string(),
            values: variant.values.clone(),
            default: variant.values.first().cloned(),
        }
    }
}

/// Everything produced for one component
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub family: String,
    pub metadata: ComponentMetadata,
    pub score: ReadinessScore,
    pub tokens: TokenAnalysis,
    pub audit: Vec<AuditFinding>,
    pub property_cheat_sheet: Vec<PropertyCheat>,
    pub corrections: Vec<Correction>,
}

impl AnalysisResult {
    /// Findings for categories that still use literal values
    pub fn token_findings(tokens: &TokenAnalysis) -> Vec<AuditFinding> {
        let summary = tokens.summary();
        TokenCategory::ALL
            .iter()
            .filter_map(|category| {
                let counts = summary.by_category.get(category)?;
                if counts.hard_coded == 0 {
                    return None;
                }
                let suggested: Vec<&str> = tokens
                    .tokens(*category)
                    .iter()
                    .filter(|t| t.origin == TokenOrigin::HardCoded && !t.suggestion.is_empty())
                    .map(|t| t.suggestion.as_str())
                    .take(3)
                    .collect();
                Some(AuditFinding {
                    severity: "warning".to_string(),
                    source: FindingSource::Tokens,
                    message: format!(
                        "{} hard-coded {} value{}",
                        counts.hard_coded,
                        category,
                        if counts.hard_coded == 1 { "" } else { "s" }
                    ),
                    suggestion: (!suggested.is_empty())
                        .then(|| format!("Bind to tokens such as {}", suggested.join(", "))),
                })
            })
            .collect()
    }
}

/// The cached unit: a result plus its gaps
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub result: AnalysisResult,
    pub gaps: Vec<BestPracticesGap>,
}

/// What callers get back from the engine
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisOutcome {
    pub fingerprint: Fingerprint,
    pub from_cache: bool,
    pub report: AnalysisReport,
}
