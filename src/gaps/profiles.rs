use super::types::{ComponentBestPractices, ExpectedProperty, ProfileSource};

/// `(name, type, enum values)`; an empty value list means free-form
type PropertyRow = (&'static str, &'static str, &'static [&'static str]);

/// Static shape of a profile, materialized on lookup
struct Template {
    states: &'static [&'static str],
    properties: &'static [PropertyRow],
    accessibility: &'static [&'static str],
    interactive: bool,
}

const SIZES: &[&str] = &["sm", "md", "lg"];

/// Built-in profiles, matched by exact family label
const CANONICAL: &[(&str, Template)] = &[
    (
        "button",
        Template {
            states: &["hover", "focus", "active", "disabled"],
            properties: &[
                ("variant", "enum", &["primary", "secondary", "tertiary", "destructive"]),
                ("size", "enum", SIZES),
                ("disabled", "boolean", &[]),
                ("label", "string", &[]),
            ],
            accessibility: &[
                "Visible focus indicator",
                "Activates with Enter and Space",
                "Accessible name for icon-only buttons",
                "Touch target at least 44x44px",
            ],
            interactive: true,
        },
    ),
    (
        "input",
        Template {
            states: &["default", "hover", "focus", "filled", "error", "disabled"],
            properties: &[
                ("label", "string", &[]),
                ("placeholder", "string", &[]),
                ("helperText", "string", &[]),
                ("error", "boolean", &[]),
                ("disabled", "boolean", &[]),
                ("size", "enum", SIZES),
            ],
            accessibility: &[
                "Persistent visible label associated with the field",
                "Error text announced via aria-invalid and aria-describedby",
                "Placeholder never replaces the label",
            ],
            interactive: true,
        },
    ),
    (
        "card",
        Template {
            states: &["default", "hover", "focus"],
            properties: &[
                ("elevation", "enum", &["flat", "raised", "overlay"]),
                ("clickable", "boolean", &[]),
                ("media", "slot", &[]),
            ],
            accessibility: &[
                "Single primary action per card",
                "Heading level fits the page outline",
            ],
            interactive: true,
        },
    ),
    (
        "avatar",
        Template {
            states: &["default"],
            properties: &[
                ("size", "enum", &["xs", "sm", "md", "lg", "xl"]),
                ("src", "string", &[]),
                ("initials", "string", &[]),
                ("status", "enum", &["online", "away", "busy", "offline"]),
            ],
            accessibility: &["Alt text for meaningful avatars, hidden when decorative"],
            interactive: true,
        },
    ),
    (
        "icon",
        Template {
            states: &["default"],
            properties: &[("size", "enum", &["16", "20", "24"]), ("color", "string", &[])],
            accessibility: &["aria-hidden when decorative, labelled when standalone"],
            interactive: true,
        },
    ),
    (
        "badge",
        Template {
            states: &["default"],
            properties: &[
                ("variant", "enum", &["neutral", "info", "success", "warning", "error"]),
                ("size", "enum", SIZES),
            ],
            accessibility: &["Meaning not conveyed by color alone"],
            interactive: true,
        },
    ),
    (
        "checkbox",
        Template {
            states: &["unchecked", "checked", "indeterminate", "hover", "focus", "disabled"],
            properties: &[
                ("checked", "boolean", &[]),
                ("indeterminate", "boolean", &[]),
                ("disabled", "boolean", &[]),
                ("label", "string", &[]),
            ],
            accessibility: &[
                "Toggles with Space",
                "Exposes aria-checked including the mixed state",
                "Label is clickable",
            ],
            interactive: true,
        },
    ),
    (
        "toggle",
        Template {
            states: &["off", "on", "hover", "focus", "disabled"],
            properties: &[
                ("checked", "boolean", &[]),
                ("disabled", "boolean", &[]),
                ("label", "string", &[]),
            ],
            accessibility: &["role=switch with aria-checked", "Toggles with Space"],
            interactive: true,
        },
    ),
];

/// Interaction archetypes, matched top-down by keyword. `table` must stay
/// ahead of `tabs` so "DataTable" is not read as a tab set.
const ARCHETYPES: &[(&str, &[&str], Template)] = &[
    (
        "modal",
        &["modal", "dialog"],
        Template {
            states: &["open", "closed"],
            properties: &[
                ("open", "boolean", &[]),
                ("title", "string", &[]),
                ("dismissible", "boolean", &[]),
                ("size", "enum", SIZES),
            ],
            accessibility: &[
                "Focus is trapped while open and restored on close",
                "Escape closes the dialog",
                "aria-modal and a labelled title",
            ],
            interactive: true,
        },
    ),
    (
        "dropdown",
        &["dropdown", "menu", "select", "combobox"],
        Template {
            states: &["closed", "open", "hover", "focus", "selected", "disabled"],
            properties: &[
                ("options", "array", &[]),
                ("placeholder", "string", &[]),
                ("disabled", "boolean", &[]),
            ],
            accessibility: &[
                "Arrow keys move between options",
                "aria-expanded reflects the open state",
            ],
            interactive: true,
        },
    ),
    (
        "tooltip",
        &["tooltip", "popover"],
        Template {
            states: &["hidden", "visible"],
            properties: &[
                ("placement", "enum", &["top", "right", "bottom", "left"]),
                ("content", "string", &[]),
            ],
            accessibility: &[
                "Shown on focus as well as hover",
                "Linked with aria-describedby",
            ],
            interactive: true,
        },
    ),
    (
        "table",
        &["table", "grid"],
        Template {
            states: &["default", "hover", "selected", "sorted", "loading", "empty"],
            properties: &[
                ("columns", "array", &[]),
                ("sortable", "boolean", &[]),
                ("selectable", "boolean", &[]),
            ],
            accessibility: &[
                "Header cells use th with scope",
                "Sort state exposed via aria-sort",
            ],
            interactive: true,
        },
    ),
    (
        "tabs",
        &["tab"],
        Template {
            states: &["default", "hover", "focus", "selected", "disabled"],
            properties: &[("selectedIndex", "number", &[]), ("orientation", "enum", &["horizontal", "vertical"])],
            accessibility: &[
                "role=tablist with aria-selected tabs",
                "Arrow keys move between tabs",
            ],
            interactive: true,
        },
    ),
    (
        "accordion",
        &["accordion", "collapse", "expand", "disclosure"],
        Template {
            states: &["collapsed", "expanded", "hover", "focus", "disabled"],
            properties: &[("expanded", "boolean", &[]), ("title", "string", &[])],
            accessibility: &["Header button exposes aria-expanded and aria-controls"],
            interactive: true,
        },
    ),
    (
        "stepper",
        &["stepper", "wizard"],
        Template {
            states: &["upcoming", "current", "completed", "error"],
            properties: &[("currentStep", "number", &[]), ("orientation", "enum", &["horizontal", "vertical"])],
            accessibility: &["Current step marked with aria-current=step"],
            interactive: true,
        },
    ),
    (
        "chip",
        &["chip", "tag", "pill"],
        Template {
            states: &["default", "hover", "focus", "selected", "disabled"],
            properties: &[("selected", "boolean", &[]), ("removable", "boolean", &[]), ("label", "string", &[])],
            accessibility: &["Remove action has an accessible name"],
            interactive: true,
        },
    ),
    (
        "slider",
        &["slider", "range"],
        Template {
            states: &["default", "hover", "focus", "dragging", "disabled"],
            properties: &[
                ("min", "number", &[]),
                ("max", "number", &[]),
                ("step", "number", &[]),
                ("value", "number", &[]),
            ],
            accessibility: &["Exposes aria-valuemin, aria-valuemax and aria-valuenow", "Arrow keys adjust the value"],
            interactive: true,
        },
    ),
    (
        "rating",
        &["rating", "star"],
        Template {
            states: &["empty", "filled", "hover", "focus", "disabled"],
            properties: &[("value", "number", &[]), ("max", "number", &[]), ("readOnly", "boolean", &[])],
            accessibility: &["Current value announced as text"],
            interactive: true,
        },
    ),
    (
        "list",
        &["list", "item"],
        Template {
            states: &["default", "hover", "selected", "disabled"],
            properties: &[("leading", "slot", &[]), ("trailing", "slot", &[]), ("divider", "boolean", &[])],
            accessibility: &["Uses list semantics"],
            interactive: true,
        },
    ),
    (
        "alert",
        &["alert", "banner", "toast", "snackbar", "announcement"],
        Template {
            states: &["info", "success", "warning", "error"],
            properties: &[
                ("variant", "enum", &["info", "success", "warning", "error"]),
                ("dismissible", "boolean", &[]),
                ("title", "string", &[]),
            ],
            accessibility: &[
                "role=alert or role=status depending on urgency",
                "Auto-dismiss timing leaves enough time to read",
            ],
            interactive: false,
        },
    ),
    (
        "progress",
        &["progress", "loader", "spinner", "loading"],
        Template {
            states: &["determinate", "indeterminate", "complete"],
            properties: &[("value", "number", &[]), ("size", "enum", SIZES)],
            accessibility: &["role=progressbar with aria-valuenow when determinate"],
            interactive: true,
        },
    ),
    (
        "navigation",
        &["navigation", "navbar", "nav bar", "sidebar", "breadcrumb", "pagination"],
        Template {
            states: &["default", "hover", "focus", "active", "current"],
            properties: &[("items", "array", &[]), ("collapsed", "boolean", &[])],
            accessibility: &["Wrapped in a nav landmark", "Current page marked with aria-current=page"],
            interactive: true,
        },
    ),
    (
        "generic-interactive",
        &["link", "radio", "control", "action", "search", "picker"],
        Template {
            states: &["default", "hover", "focus", "active", "disabled"],
            properties: &[("disabled", "boolean", &[])],
            accessibility: &["Keyboard operable with a visible focus indicator"],
            interactive: true,
        },
    ),
    (
        "container",
        &["container", "layout", "section", "panel", "wrapper", "stack", "group"],
        Template {
            states: &["default"],
            properties: &[("padding", "enum", SIZES), ("direction", "enum", &["horizontal", "vertical"])],
            accessibility: &["Landmark or heading structure where it groups page content"],
            interactive: true,
        },
    ),
];

const DEFAULT_TEMPLATE: Template = Template {
    states: &["default", "hover", "focus", "disabled"],
    properties: &[("disabled", "boolean", &[])],
    accessibility: &["Keyboard operable with a visible focus indicator"],
    interactive: true,
};

impl Template {
    fn materialize(&self, family: &str, source: ProfileSource) -> ComponentBestPractices {
        ComponentBestPractices {
            family: family.to_string(),
            source,
            interactive: self.interactive,
            expected_states: self.states.iter().map(|s| s.to_string()).collect(),
            expected_properties: self
                .properties
                .iter()
                .map(|(name, kind, values)| ExpectedProperty {
                    name: name.to_string(),
                    kind: kind.to_string(),
                    values: (!values.is_empty())
                        .then(|| values.iter().map(|v| v.to_string()).collect()),
                    description: None,
                })
                .collect(),
            accessibility_requirements: self.accessibility.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Expected profile for a family label.
///
/// Canonical families match exactly; anything else is classified by
/// archetype keyword, and failing that gets a minimal default.
pub fn resolve_profile(family: &str) -> ComponentBestPractices {
    let label = family.trim().to_lowercase();

    if let Some((_, template)) = CANONICAL.iter().find(|(name, _)| *name == label) {
        return template.materialize(&label, ProfileSource::Canonical);
    }

    if let Some((archetype, _, template)) = ARCHETYPES
        .iter()
        .find(|(_, keywords, _)| keywords.iter().any(|k| label.contains(k)))
    {
        return template.materialize(&label, ProfileSource::Archetype(archetype.to_string()));
    }

    DEFAULT_TEMPLATE.materialize(&label, ProfileSource::Default)
}

/// Canonical family labels with built-in profiles
pub fn canonical_families() -> impl Iterator<Item = &'static str> {
    CANONICAL.iter().map(|(name, _)| *name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn archetype_of(family: &str) -> ProfileSource {
        resolve_profile(family).source
    }

    #[test]
    fn test_canonical_profiles() {
        for family in canonical_families() {
            let profile = resolve_profile(family);
            assert_eq!(profile.source, ProfileSource::Canonical);
            assert!(!profile.expected_states.is_empty(), "{family}");
        }
        assert_eq!(
            resolve_profile("Button").expected_states,
            vec!["hover", "focus", "active", "disabled"]
        );
    }

    #[test]
    fn test_archetype_order() {
        assert_eq!(archetype_of("data table"), ProfileSource::Archetype("table".into()));
        assert_eq!(archetype_of("datatable"), ProfileSource::Archetype("table".into()));
        assert_eq!(archetype_of("tabs"), ProfileSource::Archetype("tabs".into()));
        assert_eq!(archetype_of("confirm dialog"), ProfileSource::Archetype("modal".into()));
        assert_eq!(archetype_of("menu item"), ProfileSource::Archetype("dropdown".into()));
        assert_eq!(archetype_of("toast"), ProfileSource::Archetype("alert".into()));
        assert_eq!(archetype_of("faq accordion"), ProfileSource::Archetype("accordion".into()));
        assert_eq!(archetype_of("page layout"), ProfileSource::Archetype("container".into()));
    }

    #[test]
    fn test_alert_archetype_is_not_interactive() {
        for family in ["toast", "banner", "snackbar", "announcement", "alert"] {
            assert!(!resolve_profile(family).interactive, "{family}");
        }
        assert!(resolve_profile("slider").interactive);
    }

    #[test]
    fn test_unmatched_family_gets_default() {
        let profile = resolve_profile("hero illustration");
        assert_eq!(profile.source, ProfileSource::Default);
        assert_eq!(profile.expected_states, vec!["default", "hover", "focus", "disabled"]);
        assert_eq!(profile.expected_properties.len(), 1);
        assert_eq!(profile.expected_properties[0].name, "disabled");
        assert_eq!(profile.expected_properties[0].kind, "boolean");
    }
}
