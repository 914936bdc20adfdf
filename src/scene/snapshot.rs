use serde::{Deserialize, Serialize};

use super::types::{LayoutMode, SceneNode};
use crate::constants::ANALYZABLE_NODE_TYPES;
use crate::utils::InputError;

/// Immutable, position-free view of a component, built fresh per request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentSnapshot {
    pub name: String,
    pub node_type: String,
    pub hierarchy: Vec<HierarchyEntry>,
    pub frame: FrameMetrics,
    pub styles: StyleFlags,
    pub family: String,
    pub interactive: bool,
}

/// One node of the normalized hierarchy, in pre-order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HierarchyEntry {
    pub name: String,
    pub node_type: String,
    pub depth: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameMetrics {
    pub width: f64,
    pub height: f64,
    pub layout_mode: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleFlags {
    pub has_fills: bool,
    pub has_strokes: bool,
    pub has_effects: bool,
    pub corner_radius: Option<f64>,
}

/// Family keyword table, matched top-down against the lowercased base name.
/// Order matters: "ToggleButton" is a toggle, "IconButton" is a button.
const FAMILY_RULES: &[(&str, &[&str])] = &[
    ("checkbox", &["checkbox", "check box"]),
    ("toggle", &["toggle", "switch"]),
    ("button", &["button", "btn"]),
    ("avatar", &["avatar"]),
    ("input", &["input", "textfield", "text field", "text-field", "field"]),
    ("badge", &["badge"]),
    ("card", &["card"]),
    ("icon", &["icon"]),
];

const INTERACTIVE_KEYWORDS: &[&str] = &[
    "button", "btn", "input", "field", "checkbox", "toggle", "switch", "radio", "link", "tabbar",
    "tablist", "select", "dropdown", "menu", "slider", "chip", "search", "stepper", "rating",
];

/// Too short to match inside other words ("table", "stable")
const INTERACTIVE_WORDS: &[&str] = &["tab", "tabs"];

impl ComponentSnapshot {
    /// Build a snapshot from the selected node.
    ///
    /// Text, vector and other leaf nodes are rejected before anything else
    /// happens.
    pub fn from_node(node: &SceneNode) -> Result<Self, InputError> {
        let kind = node.node_type.to_ascii_uppercase();
        if !ANALYZABLE_NODE_TYPES.contains(&kind.as_str()) {
            return Err(InputError::InvalidNodeKind {
                name: node.name.clone(),
                kind,
            });
        }

        let mut hierarchy = Vec::new();
        collect_hierarchy(node, 0, &mut hierarchy);

        let family = detect_family(&node.name);
        let interactive = is_interactive_family(&family);

        Ok(Self {
            name: node.name.trim().to_string(),
            node_type: kind,
            hierarchy,
            frame: FrameMetrics {
                width: node.width.unwrap_or(0.0),
                height: node.height.unwrap_or(0.0),
                layout_mode: node.layout_mode.unwrap_or(LayoutMode::None).as_str().to_string(),
            },
            styles: StyleFlags {
                has_fills: node.fills.iter().any(|p| p.visible),
                has_strokes: node.strokes.iter().any(|p| p.visible),
                has_effects: node.effects.iter().any(|e| e.visible),
                corner_radius: node.corner_radius.filter(|r| *r > 0.0),
            },
            family,
            interactive,
        })
    }

    /// Human-readable summary used in prompts
    pub fn describe(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("Component name: {}\n", self.name));
        out.push_str(&format!("Node type: {}\n", self.node_type));
        out.push_str(&format!("Detected family: {}\n", self.family));
        out.push_str(&format!("Interactive: {}\n", if self.interactive { "yes" } else { "no" }));
        out.push_str(&format!(
            "Frame: {}x{} (layout: {})\n",
            self.frame.width, self.frame.height, self.frame.layout_mode
        ));
        out.push_str(&format!(
            "Styles: fills={} strokes={} effects={} corner_radius={}\n",
            self.styles.has_fills,
            self.styles.has_strokes,
            self.styles.has_effects,
            self.styles
                .corner_radius
                .map(|r| r.to_string())
                .unwrap_or_else(|| "none".to_string())
        ));
        out.push_str("Structure:\n");
        for entry in &self.hierarchy {
            out.push_str(&format!(
                "{}- {} ({})\n",
                "  ".repeat(entry.depth),
                entry.name,
                entry.node_type
            ));
        }
        out
    }
}

fn collect_hierarchy(node: &SceneNode, depth: usize, out: &mut Vec<HierarchyEntry>) {
    out.push(HierarchyEntry {
        name: node.name.trim().to_lowercase(),
        node_type: node.node_type.to_ascii_uppercase(),
        depth,
    });
    for child in &node.children {
        collect_hierarchy(child, depth + 1, out);
    }
}

/// Map a component name onto a family label.
///
/// Variant paths ("Button/Primary") are reduced to their first segment.
/// Names that match no rule keep their normalized base name so the gap
/// analyzer can still classify them by archetype.
pub fn detect_family(name: &str) -> String {
    let base = name
        .split('/')
        .next()
        .unwrap_or_default()
        .trim()
        .to_lowercase();

    if base.is_empty() || base.contains('=') {
        return "generic".to_string();
    }

    FAMILY_RULES
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| base.contains(k)))
        .map(|(family, _)| family.to_string())
        .unwrap_or(base)
}

pub fn is_interactive_family(family: &str) -> bool {
    let family = family.to_lowercase();
    INTERACTIVE_KEYWORDS.iter().any(|k| family.contains(k))
        || family
            .split(|c: char| !c.is_alphanumeric())
            .any(|word| INTERACTIVE_WORDS.contains(&word))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(name: &str) -> SceneNode {
        SceneNode {
            name: name.to_string(),
            node_type: "COMPONENT".to_string(),
            width: Some(120.0),
            height: Some(40.0),
            ..Default::default()
        }
    }

    #[test]
    fn test_family_detection_rules() {
        assert_eq!(detect_family("Button/Primary"), "button");
        assert_eq!(detect_family("IconButton"), "button");
        assert_eq!(detect_family("Toggle Button"), "toggle");
        assert_eq!(detect_family("User Avatar"), "avatar");
        assert_eq!(detect_family("Text Field"), "input");
        assert_eq!(detect_family("Checkbox"), "checkbox");
        assert_eq!(detect_family("Data Table"), "data table");
        assert_eq!(detect_family("Size=Large, State=Hover"), "generic");
        assert_eq!(detect_family("   "), "generic");
    }

    #[test]
    fn test_interactivity() {
        assert!(is_interactive_family("button"));
        assert!(is_interactive_family("dropdown menu"));
        assert!(!is_interactive_family("avatar"));
        assert!(!is_interactive_family("toast"));
        assert!(is_interactive_family("tabs"));
        assert!(is_interactive_family("nav tab"));
        assert!(is_interactive_family("tabbar"));
        assert!(!is_interactive_family("data table"));
        assert!(!is_interactive_family("stable header"));
    }

    #[test]
    fn test_rejects_text_nodes() {
        let mut node = frame("Label");
        node.node_type = "TEXT".to_string();
        let err = ComponentSnapshot::from_node(&node).unwrap_err();
        assert!(matches!(err, InputError::InvalidNodeKind { .. }));
    }

    #[test]
    fn test_hierarchy_is_normalized_and_positionless() {
        let mut root = frame("  Button ");
        root.x = Some(10.0);
        let mut label = frame("Label");
        label.node_type = "TEXT".to_string();
        label.y = Some(99.0);
        root.children.push(label);

        let snapshot = ComponentSnapshot::from_node(&root).unwrap();
        assert_eq!(snapshot.name, "Button");
        assert_eq!(
            snapshot.hierarchy,
            vec![
                HierarchyEntry { name: "button".into(), node_type: "COMPONENT".into(), depth: 0 },
                HierarchyEntry { name: "label".into(), node_type: "TEXT".into(), depth: 1 },
            ]
        );
        assert!(snapshot.interactive);
        assert_eq!(snapshot.frame.layout_mode, "none");
    }
}
