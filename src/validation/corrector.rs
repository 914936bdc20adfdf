use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::warn;

use super::schema::{AuditItem, GeneratedMetadata, PropSpec, SlotSpec, VariantSpec};
use crate::scene::ComponentSnapshot;
use crate::tokens::SuggestedToken;

/// States a button must report; injected when none are present
pub const CANONICAL_BUTTON_STATES: [&str; 4] = ["hover", "focus", "active", "disabled"];

const DEFAULT_AVATAR_SIZES: [&str; 3] = ["sm", "md", "lg"];

const SEMANTIC_MARKERS: [&str; 3] = ["semantic-", "primary", "secondary"];

/// Documentation fields of an analysis, after correction
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComponentMetadata {
    pub component: String,
    pub description: String,
    pub props: Vec<PropSpec>,
    pub states: Vec<String>,
    pub slots: Vec<SlotSpec>,
    pub variants: Vec<VariantSpec>,
    pub usage: Vec<String>,
    pub accessibility: Vec<String>,
    pub tokens: Vec<SuggestedToken>,
    pub audit: Vec<AuditItem>,
}

/// Readiness score, always within 0..=100
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReadinessScore {
    pub overall: f64,
    pub breakdown: BTreeMap<String, f64>,
}

/// An invariant the generated metadata failed
#[derive(Debug, Clone, PartialEq)]
pub enum Violation {
    EmptyName,
    EmptyDescription,
    ScoreMissing,
    ScoreOutOfRange(f64),
    MissingInteractiveStates,
    MissingSizeVariant,
    NonSemanticTokens,
}

/// A deterministic fix applied to generated metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Correction {
    pub rule: String,
    pub detail: String,
}

impl Correction {
    fn new(rule: &str, detail: impl Into<String>) -> Self {
        Self {
            rule: rule.to_string(),
            detail: detail.into(),
        }
    }
}

/// Metadata that satisfies every invariant, plus what it took to get there
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedMetadata {
    pub metadata: ComponentMetadata,
    pub score: ReadinessScore,
    pub corrections: Vec<Correction>,
}

/// Check generated metadata against the invariants for its family
pub fn check_invariants(generated: &GeneratedMetadata, family: &str) -> Vec<Violation> {
    let mut violations = Vec::new();

    if generated.component.trim().is_empty() {
        violations.push(Violation::EmptyName);
    }
    if generated.description.trim().is_empty() {
        violations.push(Violation::EmptyDescription);
    }

    match overall_score(&generated.score) {
        None => violations.push(Violation::ScoreMissing),
        Some(score) if !(0.0..=100.0).contains(&score) => {
            violations.push(Violation::ScoreOutOfRange(score))
        }
        Some(_) => {}
    }

    if family == "button" && !has_any_state(&generated.states, &CANONICAL_BUTTON_STATES) {
        violations.push(Violation::MissingInteractiveStates);
    }
    if family == "avatar" && !has_size_axis(&generated.props, &generated.variants) {
        violations.push(Violation::MissingSizeVariant);
    }

    if !generated.tokens.is_empty()
        && !generated.tokens.iter().any(|t| is_semantic_name(&t.name))
    {
        violations.push(Violation::NonSemanticTokens);
    }

    violations
}

/// Apply rule-based corrections until every invariant holds.
///
/// Never calls back into the generator. Each correction is logged and
/// returned alongside the corrected metadata.
pub fn correct(generated: GeneratedMetadata, snapshot: &ComponentSnapshot) -> ValidatedMetadata {
    let violations = check_invariants(&generated, &snapshot.family);
    let GeneratedMetadata {
        component,
        description,
        score,
        props,
        mut states,
        slots,
        mut variants,
        usage,
        accessibility,
        mut tokens,
        audit,
    } = generated;

    let mut metadata_name = component.trim().to_string();
    let mut metadata_description = description.trim().to_string();
    let mut readiness = normalize_score(&score);
    let mut corrections = Vec::new();

    for violation in &violations {
        let correction = match violation {
            Violation::EmptyName => {
                metadata_name = snapshot.name.clone();
                Correction::new("component-name", format!("used node name \"{}\"", snapshot.name))
            }
            Violation::EmptyDescription => {
                metadata_description = format!(
                    "{} component ({} family).",
                    if metadata_name.is_empty() { &snapshot.name } else { &metadata_name },
                    snapshot.family
                );
                Correction::new("description", "generated a templated description")
            }
            Violation::ScoreMissing => {
                readiness.overall = breakdown_mean(&readiness.breakdown);
                Correction::new(
                    "score",
                    format!("overall score missing; derived {}", readiness.overall),
                )
            }
            Violation::ScoreOutOfRange(raw) => {
                readiness.overall = (*raw).clamp(0.0, 100.0);
                Correction::new(
                    "score",
                    format!("clamped {} to {}", raw, readiness.overall),
                )
            }
            Violation::MissingInteractiveStates => {
                states.extend(CANONICAL_BUTTON_STATES.iter().map(|s| s.to_string()));
                Correction::new(
                    "button-states",
                    format!("added {}", CANONICAL_BUTTON_STATES.join(", ")),
                )
            }
            Violation::MissingSizeVariant => {
                variants.push(VariantSpec {
                    name: "size".to_string(),
                    values: DEFAULT_AVATAR_SIZES.iter().map(|s| s.to_string()).collect(),
                });
                Correction::new(
                    "avatar-size",
                    format!("added size variant ({})", DEFAULT_AVATAR_SIZES.join(", ")),
                )
            }
            Violation::NonSemanticTokens => {
                for token in &mut tokens {
                    token.name = format!("semantic-{}", token.name.trim());
                }
                Correction::new(
                    "token-names",
                    format!("prefixed {} token names with semantic-", tokens.len()),
                )
            }
        };
        warn!(rule = %correction.rule, "corrected generated metadata: {}", correction.detail);
        corrections.push(correction);
    }

    ValidatedMetadata {
        metadata: ComponentMetadata {
            component: metadata_name,
            description: metadata_description,
            props,
            states,
            slots,
            variants,
            usage,
            accessibility,
            tokens,
            audit,
        },
        score: readiness,
        corrections,
    }
}

fn number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().trim_end_matches('%').parse().ok(),
        _ => None,
    }
}

/// The raw overall score: a bare number or `{"overall": n}`
fn overall_score(score: &Value) -> Option<f64> {
    match score {
        Value::Object(map) => map
            .get("overall")
            .or_else(|| map.get("total"))
            .and_then(number),
        other => number(other),
    }
    .filter(|n| n.is_finite())
}

fn normalize_score(score: &Value) -> ReadinessScore {
    let breakdown = score
        .get("breakdown")
        .and_then(Value::as_object)
        .map(|map| {
            map.iter()
                .filter_map(|(k, v)| number(v).map(|n| (k.clone(), n.clamp(0.0, 100.0))))
                .collect()
        })
        .unwrap_or_default();

    ReadinessScore {
        overall: overall_score(score).unwrap_or_default(),
        breakdown,
    }
}

fn breakdown_mean(breakdown: &BTreeMap<String, f64>) -> f64 {
    if breakdown.is_empty() {
        return 0.0;
    }
    (breakdown.values().sum::<f64>() / breakdown.len() as f64).round()
}

fn has_any_state(observed: &[String], expected: &[&str]) -> bool {
    observed.iter().any(|state| {
        let state = state.to_lowercase();
        expected.iter().any(|e| state.contains(e))
    })
}

fn has_size_axis(props: &[PropSpec], variants: &[VariantSpec]) -> bool {
    props
        .iter()
        .map(|p| &p.name)
        .chain(variants.iter().map(|v| &v.name))
        .any(|name| name.to_lowercase().contains("size"))
}

fn is_semantic_name(name: &str) -> bool {
    let name = name.to_lowercase();
    SEMANTIC_MARKERS.iter().any(|m| name.contains(m))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::SceneNode;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn snapshot(name: &str) -> ComponentSnapshot {
        let node = SceneNode {
            name: name.to_string(),
            node_type: "COMPONENT".to_string(),
            ..SceneNode::default()
        };
        ComponentSnapshot::from_node(&node).unwrap()
    }

    fn valid() -> GeneratedMetadata {
        GeneratedMetadata {
            component: "Button".to_string(),
            description: "Triggers an action".to_string(),
            score: json!({"overall": 80, "breakdown": {"tokens": 70, "states": 90}}),
            states: vec!["default".into(), "Hover".into()],
            ..GeneratedMetadata::default()
        }
    }

    #[test]
    fn test_valid_metadata_is_untouched() {
        let generated = valid();
        assert!(check_invariants(&generated, "button").is_empty());

        let validated = correct(generated, &snapshot("Button"));
        assert!(validated.corrections.is_empty());
        assert_eq!(validated.score.overall, 80.0);
        assert_eq!(validated.score.breakdown["states"], 90.0);
        assert_eq!(validated.metadata.states, vec!["default", "Hover"]);
    }

    #[test]
    fn test_button_states_injected() {
        let generated = GeneratedMetadata {
            states: vec!["default".into()],
            ..valid()
        };
        assert_eq!(
            check_invariants(&generated, "button"),
            vec![Violation::MissingInteractiveStates]
        );

        let validated = correct(generated, &snapshot("Button"));
        assert_eq!(
            validated.metadata.states,
            vec!["default", "hover", "focus", "active", "disabled"]
        );
        assert_eq!(validated.corrections[0].rule, "button-states");
    }

    #[test]
    fn test_avatar_size_variant_injected() {
        let generated = GeneratedMetadata {
            component: "Avatar".into(),
            ..valid()
        };
        let validated = correct(generated, &snapshot("Avatar"));
        assert_eq!(validated.metadata.variants.len(), 1);
        assert_eq!(validated.metadata.variants[0].name, "size");
        assert_eq!(validated.metadata.variants[0].values, vec!["sm", "md", "lg"]);
    }

    #[test]
    fn test_avatar_with_size_prop_passes() {
        let generated = GeneratedMetadata {
            props: vec![PropSpec {
                name: "Size".into(),
                kind: "enum".into(),
                ..PropSpec::default()
            }],
            ..valid()
        };
        assert!(check_invariants(&generated, "avatar").is_empty());
    }

    #[test]
    fn test_empty_fields_and_score_corrected() {
        let generated = GeneratedMetadata {
            component: "  ".into(),
            description: String::new(),
            score: json!({"overall": 140}),
            ..valid()
        };
        let validated = correct(generated, &snapshot("Card/Elevated"));
        assert_eq!(validated.metadata.component, "Card/Elevated");
        assert_eq!(validated.metadata.description, "Card/Elevated component (card family).");
        assert_eq!(validated.score.overall, 100.0);
        assert_eq!(validated.corrections.len(), 3);
    }

    #[test]
    fn test_missing_score_uses_breakdown_mean() {
        let generated = GeneratedMetadata {
            score: json!({"breakdown": {"tokens": "60", "states": 75}}),
            ..valid()
        };
        let validated = correct(generated, &snapshot("Card"));
        assert_eq!(validated.score.overall, 68.0);

        let bare = GeneratedMetadata {
            score: json!(55),
            ..valid()
        };
        assert_eq!(correct(bare, &snapshot("Card")).score.overall, 55.0);

        let absent = GeneratedMetadata {
            score: Value::Null,
            ..valid()
        };
        assert_eq!(correct(absent, &snapshot("Card")).score.overall, 0.0);
    }

    #[test]
    fn test_non_semantic_tokens_prefixed() {
        let generated = GeneratedMetadata {
            tokens: vec![SuggestedToken {
                name: "blue-500".into(),
                value: "#3b82f6".into(),
                category: "color".into(),
                recommendation: None,
            }],
            ..valid()
        };
        let validated = correct(generated, &snapshot("Card"));
        assert_eq!(validated.metadata.tokens[0].name, "semantic-blue-500");

        let already = GeneratedMetadata {
            tokens: vec![SuggestedToken {
                name: "color-primary".into(),
                ..SuggestedToken::default()
            }],
            ..valid()
        };
        assert!(check_invariants(&already, "card").is_empty());
    }
}
