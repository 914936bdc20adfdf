use serde::Serialize;
use std::fmt;

use crate::scene::{ComponentSnapshot, FrameMetrics, HierarchyEntry, StyleFlags};
use crate::tokens::TokenAnalysis;

/// Deterministic cache key for a component's structure
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, serde::Deserialize)]
pub struct Fingerprint(String);

impl Fingerprint {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Fingerprint {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Canonical form that gets hashed. Field order is fixed by the struct.
#[derive(Serialize)]
struct CanonicalStructure<'a> {
    hierarchy: &'a [HierarchyEntry],
    frame: &'a FrameMetrics,
    styles: &'a StyleFlags,
    tokens: String,
    flags: StaticFlags<'a>,
}

#[derive(Serialize)]
struct StaticFlags<'a> {
    interactive: bool,
    family: &'a str,
}

/// Fingerprint a snapshot together with its token classification.
///
/// Only origin/kind information of tokens participates, not their values.
pub fn fingerprint(snapshot: &ComponentSnapshot, tokens: &TokenAnalysis) -> Fingerprint {
    let token_fingerprint = string_hash(&tokens.fingerprint_triples().join("|"));

    let canonical = CanonicalStructure {
        hierarchy: &snapshot.hierarchy,
        frame: &snapshot.frame,
        styles: &snapshot.styles,
        tokens: token_fingerprint,
        flags: StaticFlags {
            interactive: snapshot.interactive,
            family: &snapshot.family,
        },
    };

    // Serializing plain structs of strings, numbers and bools cannot fail
    let serialized = serde_json::to_string(&canonical).unwrap_or_default();
    Fingerprint(string_hash(&serialized))
}

/// 31-multiplier rolling hash over UTF-16 code units with 32-bit signed
/// wraparound, rendered as the absolute value in base 36.
pub fn string_hash(input: &str) -> String {
    let mut h: i32 = 0;
    for unit in input.encode_utf16() {
        h = h.wrapping_mul(31).wrapping_add(unit as i32);
    }
    to_base36(h.unsigned_abs())
}

fn to_base36(mut n: u32) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if n == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while n > 0 {
        out.push(DIGITS[(n % 36) as usize]);
        n /= 36;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::SceneNode;
    use crate::tokens::TokenClassifier;

    fn node(x: f64, y: f64) -> SceneNode {
        let child = SceneNode {
            name: "Icon".into(),
            node_type: "VECTOR".into(),
            x: Some(x + 4.0),
            y: Some(y + 4.0),
            width: Some(16.0),
            height: Some(16.0),
            ..Default::default()
        };
        SceneNode {
            name: "Button".into(),
            node_type: "COMPONENT".into(),
            x: Some(x),
            y: Some(y),
            width: Some(120.0),
            height: Some(40.0),
            corner_radius: Some(6.0),
            children: vec![child],
            ..Default::default()
        }
    }

    fn key(n: &SceneNode) -> Fingerprint {
        let snapshot = ComponentSnapshot::from_node(n).unwrap();
        let tokens = TokenClassifier::default().classify(n, snapshot.interactive);
        fingerprint(&snapshot, &tokens)
    }

    #[test]
    fn test_hash_matches_reference_values() {
        assert_eq!(string_hash(""), "0");
        // 'a' = 97
        assert_eq!(string_hash("a"), "2p");
        // 97*31 + 98 = 3105
        assert_eq!(string_hash("ab"), "2e9");
    }

    #[test]
    fn test_hash_wraps_like_32_bit_signed() {
        let long = "component-structure-".repeat(50);
        let hashed = string_hash(&long);
        assert!(!hashed.is_empty());
        assert!(hashed.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_eq!(hashed, string_hash(&long));
    }

    #[test]
    fn test_position_does_not_affect_fingerprint() {
        assert_eq!(key(&node(0.0, 0.0)), key(&node(340.0, -12.5)));
    }

    #[test]
    fn test_structure_affects_fingerprint() {
        let base = node(0.0, 0.0);
        let mut wider = base.clone();
        wider.width = Some(160.0);
        assert_ne!(key(&base), key(&wider));

        let mut renamed = base.clone();
        renamed.children[0].name = "Chevron".into();
        assert_ne!(key(&base), key(&renamed));
    }

    #[test]
    fn test_name_normalization() {
        let base = node(0.0, 0.0);
        let mut spaced = base.clone();
        spaced.children[0].name = "  ICON ".into();
        assert_eq!(key(&base), key(&spaced));
    }
}
