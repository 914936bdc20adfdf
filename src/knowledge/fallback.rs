use chrono::Utc;
use std::collections::BTreeMap;

use super::types::KnowledgeBase;
use crate::constants::FALLBACK_KNOWLEDGE_VERSION;

const FAMILY_GUIDANCE: &[(&str, &str)] = &[
    (
        "button",
        "Buttons trigger actions. Provide hover, focus, active and disabled states with a \
         visible focus ring. Expose variant (primary, secondary, tertiary, destructive), size \
         and disabled properties. Labels are verbs; icon-only buttons need an accessible name. \
         Minimum touch target 44x44px.",
    ),
    (
        "avatar",
        "Avatars represent a person or entity. Offer size variants (sm, md, lg), an image, \
         initials and icon fallback, and an optional status indicator. Decorative avatars are \
         hidden from assistive technology; meaningful ones need alt text.",
    ),
    (
        "card",
        "Cards group related content. Keep padding on the spacing scale, use elevation tokens \
         for shadows, and define slots for media, header, body and actions. Clickable cards \
         need hover and focus states and a single primary action.",
    ),
    (
        "badge",
        "Badges convey status or counts. Provide semantic variants (neutral, info, success, \
         warning, error) and a size property. Do not rely on color alone; pair with text.",
    ),
    (
        "input",
        "Inputs collect text. Provide default, hover, focus, filled, error and disabled states, \
         a persistent visible label, helper and error text slots, and placeholder that never \
         replaces the label. Error state must be announced to assistive technology.",
    ),
    (
        "icon",
        "Icons are sized on a fixed grid (16, 20, 24px) and inherit color from a token. \
         Decorative icons are aria-hidden; standalone icons need an accessible label.",
    ),
    (
        "generic",
        "Document the component's purpose, its properties and variants, and every interactive \
         state it supports. Use design tokens instead of literal colors, spacing and type \
         values. Meet WCAG 2.1 AA: 4.5:1 text contrast, keyboard operability and visible focus.",
    ),
];

const TOKEN_GUIDANCE: &str = "Name tokens by intent, not value: semantic-{category}-{role}-{state} \
    (e.g. semantic-color-action-primary-hover). Reference primitives through semantic tokens. \
    Spacing follows a 4px scale (xs=4, sm=8, md=16, lg=24, xl=32). Typography tokens bundle \
    family, size, weight and line height. Hard-coded values are findings.";

const ACCESSIBILITY_GUIDANCE: &str = "WCAG 2.1 AA: text contrast 4.5:1 (3:1 for large text and UI \
    boundaries); every interactive element is reachable and operable by keyboard with a visible \
    focus indicator; touch targets at least 44x44px; states are exposed through ARIA \
    (aria-pressed, aria-expanded, aria-disabled, aria-invalid); information is never conveyed \
    by color alone.";

const SCORING_GUIDANCE: &str = "Score readiness 0-100 as the mean of five 0-100 dimensions: \
    tokens (share of values bound to design tokens), states (coverage of expected interactive \
    states), accessibility (contrast, focus, labelling), documentation (props, slots, usage \
    completeness) and consistency (naming and structure). 90+ is production ready, 70-89 needs \
    minor work, below 70 needs significant work.";

/// Built-in knowledge used whenever the remote service is unavailable
pub fn fallback_knowledge() -> KnowledgeBase {
    let per_family_guidance: BTreeMap<String, String> = FAMILY_GUIDANCE
        .iter()
        .map(|(family, text)| (family.to_string(), text.to_string()))
        .collect();

    KnowledgeBase {
        version: FALLBACK_KNOWLEDGE_VERSION.to_string(),
        per_family_guidance,
        token_guidance: TOKEN_GUIDANCE.to_string(),
        accessibility_guidance: ACCESSIBILITY_GUIDANCE.to_string(),
        scoring_guidance: SCORING_GUIDANCE.to_string(),
        last_updated: Utc::now(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_covers_canonical_families() {
        let kb = fallback_knowledge();
        for family in ["button", "avatar", "card", "badge", "input", "icon", "generic"] {
            assert!(!kb.guidance_for(family).is_empty(), "{family}");
        }
        assert_eq!(kb.guidance_for("carousel"), kb.guidance_for("generic"));
        assert!(!kb.scoring_guidance.is_empty());
    }
}
