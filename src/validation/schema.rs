use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::tokens::SuggestedToken;
use crate::utils::{lenient_string, lenient_vec, optional_string, string_list};

/// Generator output as decoded from JSON.
///
/// Every field is optional on the wire; generators drift between strings,
/// arrays and objects, so list fields accept any of those and are
/// flattened into strings.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct GeneratedMetadata {
    #[serde(default, deserialize_with = "lenient_string")]
    pub component: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub description: String,
    /// Left untyped; normalized by the corrector
    #[serde(default, alias = "readiness")]
    pub score: Value,
    #[serde(default, alias = "properties", deserialize_with = "lenient_vec")]
    pub props: Vec<PropSpec>,
    #[serde(default, deserialize_with = "string_list")]
    pub states: Vec<String>,
    #[serde(default, deserialize_with = "lenient_vec")]
    pub slots: Vec<SlotSpec>,
    #[serde(default, deserialize_with = "lenient_vec")]
    pub variants: Vec<VariantSpec>,
    #[serde(default, deserialize_with = "string_list")]
    pub usage: Vec<String>,
    #[serde(default, deserialize_with = "string_list")]
    pub accessibility: Vec<String>,
    #[serde(default, alias = "designTokens", deserialize_with = "lenient_vec")]
    pub tokens: Vec<SuggestedToken>,
    #[serde(default, alias = "issues", deserialize_with = "lenient_vec")]
    pub audit: Vec<AuditItem>,
}

impl GeneratedMetadata {
    /// Property names plus variant axes, as the generator reported them
    pub fn observed_properties(&self) -> Vec<String> {
        self.props
            .iter()
            .map(|p| p.name.clone())
            .chain(self.variants.iter().map(|v| v.name.clone()))
            .filter(|name| !name.is_empty())
            .collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PropSpec {
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(default, rename = "type", deserialize_with = "lenient_string")]
    pub kind: String,
    #[serde(default, alias = "options", deserialize_with = "string_list")]
    pub values: Vec<String>,
    #[serde(default, alias = "defaultValue", deserialize_with = "optional_string")]
    pub default: Option<String>,
    #[serde(default, deserialize_with = "optional_string")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SlotSpec {
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(default, deserialize_with = "optional_string")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VariantSpec {
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(default, alias = "options", deserialize_with = "string_list")]
    pub values: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuditItem {
    #[serde(default, deserialize_with = "lenient_string")]
    pub severity: String,
    #[serde(default, alias = "issue", deserialize_with = "lenient_string")]
    pub message: String,
    #[serde(default, alias = "recommendation", deserialize_with = "optional_string")]
    pub suggestion: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_lenient_fields() {
        let json = r##"{
            "component": "Button",
            "description": "Triggers an action",
            "score": 82,
            "props": [{"name": "disabled", "type": "boolean", "values": [true, false], "default": false}, "junk"],
            "states": ["hover", {"name": "focus"}, ""],
            "usage": {"do": ["Use verbs"], "dont": ["Stack many primaries"]},
            "accessibility": "Needs a visible focus ring",
            "tokens": [{"name": "semantic-color-action", "value": "#0055ff", "category": "color"}],
            "audit": [{"severity": "warning", "issue": "Hard-coded fill"}]
        }"##;
        let parsed: GeneratedMetadata = serde_json::from_str(json).unwrap();

        assert_eq!(parsed.component, "Button");
        assert_eq!(parsed.props.len(), 1);
        assert_eq!(parsed.props[0].values, vec!["true", "false"]);
        assert_eq!(parsed.props[0].default.as_deref(), Some("false"));
        assert_eq!(parsed.states, vec!["hover", "focus"]);
        assert_eq!(parsed.usage.len(), 2);
        assert_eq!(parsed.accessibility, vec!["Needs a visible focus ring"]);
        assert_eq!(parsed.tokens[0].name, "semantic-color-action");
        assert_eq!(parsed.audit[0].message, "Hard-coded fill");
        assert!(parsed.slots.is_empty());
    }

    #[test]
    fn test_numeric_token_values_are_kept() {
        let json = r##"{
            "tokens": [
                {"name": "semantic-space-md", "value": 16, "category": "spacing"},
                {"name": "semantic-color-bg", "value": "#fff", "category": "color", "recommendation": 3}
            ]
        }"##;
        let parsed: GeneratedMetadata = serde_json::from_str(json).unwrap();

        let tokens: Vec<(&str, &str)> = parsed
            .tokens
            .iter()
            .map(|t| (t.name.as_str(), t.value.as_str()))
            .collect();
        assert_eq!(tokens, vec![("semantic-space-md", "16"), ("semantic-color-bg", "#fff")]);
        assert_eq!(parsed.tokens[1].recommendation.as_deref(), Some("3"));
    }
}
