use crate::knowledge::KnowledgeBase;
use crate::scene::ComponentSnapshot;

/// Shape the generator must answer with. Parsed by `validation::parse_response`.
pub const OUTPUT_CONTRACT: &str = r#"Respond with a single JSON object and nothing else. Use exactly these fields:
{
  "component": "<component name>",
  "description": "<one or two sentences on purpose and usage>",
  "score": {
    "overall": <number 0-100>,
    "breakdown": {
      "tokens": <number 0-100>,
      "states": <number 0-100>,
      "accessibility": <number 0-100>,
      "documentation": <number 0-100>,
      "consistency": <number 0-100>
    }
  },
  "props": [{"name": "", "type": "boolean|string|enum|number|slot", "values": [""], "default": "", "description": ""}],
  "states": ["<state name>"],
  "slots": [{"name": "", "description": ""}],
  "variants": [{"name": "", "values": [""]}],
  "usage": ["<usage guideline>"],
  "accessibility": ["<accessibility requirement>"],
  "tokens": [{"name": "semantic-...", "value": "", "category": "color|spacing|typography|effect|border", "recommendation": ""}],
  "audit": [{"severity": "error|warning|info", "message": "", "suggestion": ""}]
}
Omit nothing: use empty arrays when a section does not apply."#;

/// Build the instruction text for one component.
///
/// Pure function of its inputs: the same snapshot and knowledge base always
/// produce the same text.
pub fn assemble_prompt(snapshot: &ComponentSnapshot, knowledge: &KnowledgeBase) -> String {
    let sections = [
        (
            "TASK",
            "Document this UI component and audit it for design-system readiness.".to_string(),
        ),
        ("COMPONENT", snapshot.describe()),
        (
            "FAMILY GUIDANCE",
            knowledge.guidance_for(&snapshot.family).to_string(),
        ),
        ("TOKEN CONVENTIONS", knowledge.token_guidance.clone()),
        ("ACCESSIBILITY", knowledge.accessibility_guidance.clone()),
        ("SCORING RUBRIC", knowledge.scoring_guidance.clone()),
        ("OUTPUT FORMAT", OUTPUT_CONTRACT.to_string()),
    ];

    sections
        .iter()
        .map(|(title, body)| format!("## {}\n{}", title, body.trim_end()))
        .collect::<Vec<_>>()
        .join("\n\n")
}
