use tracing::debug;

use super::profiles::resolve_profile;
use super::types::{BestPracticesGap, ComponentBestPractices, GapCategory, GapSeverity};

/// Expected items with no case-insensitive substring match among observed
fn missing_items<'a>(expected: impl Iterator<Item = &'a str>, observed: &[String]) -> Vec<String> {
    let observed: Vec<String> = observed.iter().map(|o| o.to_lowercase()).collect();
    expected
        .filter(|item| {
            let item = item.to_lowercase();
            !observed.iter().any(|o| o.contains(&item))
        })
        .map(str::to_string)
        .collect()
}

/// Compare observed states, properties and accessibility notes with a
/// profile.
pub fn analyze_profile(
    profile: &ComponentBestPractices,
    observed_states: &[String],
    observed_properties: &[String],
    observed_accessibility: &[String],
) -> Vec<BestPracticesGap> {
    let mut gaps = Vec::new();

    let states = missing_items(profile.expected_states.iter().map(String::as_str), observed_states);
    if !states.is_empty() {
        gaps.push(BestPracticesGap {
            category: GapCategory::States,
            severity: if profile.interactive {
                GapSeverity::Warning
            } else {
                GapSeverity::Info
            },
            message: format!(
                "{} of {} expected states missing for {}",
                states.len(),
                profile.expected_states.len(),
                profile.family
            ),
            suggestion: format!("Add variants for: {}", states.join(", ")),
            missing_items: states,
        });
    }

    let properties = missing_items(
        profile.expected_properties.iter().map(|p| p.name.as_str()),
        observed_properties,
    );
    if !properties.is_empty() {
        gaps.push(BestPracticesGap {
            category: GapCategory::Properties,
            severity: GapSeverity::Info,
            message: format!(
                "{} of {} expected properties missing for {}",
                properties.len(),
                profile.expected_properties.len(),
                profile.family
            ),
            suggestion: format!("Consider exposing: {}", properties.join(", ")),
            missing_items: properties,
        });
    }

    if observed_accessibility.is_empty() && !profile.accessibility_requirements.is_empty() {
        gaps.push(BestPracticesGap {
            category: GapCategory::Accessibility,
            severity: GapSeverity::Info,
            message: format!("No accessibility notes documented for {}", profile.family),
            suggestion: "Document how the component meets each requirement".to_string(),
            missing_items: profile.accessibility_requirements.clone(),
        });
    }

    debug!(family = %profile.family, gaps = gaps.len(), "gap analysis complete");
    gaps
}

/// Resolve the family's profile and report its gaps
pub fn analyze_gaps(
    family: &str,
    observed_states: &[String],
    observed_properties: &[String],
    observed_accessibility: &[String],
) -> Vec<BestPracticesGap> {
    let profile = resolve_profile(family);
    analyze_profile(&profile, observed_states, observed_properties, observed_accessibility)
}
