use colored::Colorize;
use serde::Serialize;

use super::OutputFormat;
use crate::gaps::{BestPracticesGap, ComponentBestPractices, GapSeverity};
use crate::runtime::AnalysisOutcome;
use crate::tokens::{TokenAnalysis, TokenCategory};

/// Pretty JSON, or an error object if serialization fails
pub fn to_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value)
        .unwrap_or_else(|e| format!("{{\"error\": \"Failed to serialize result: {}\"}}", e))
}

fn severity_label(severity: &str) -> String {
    match severity {
        "error" => severity.red().bold().to_string(),
        "warning" => severity.yellow().to_string(),
        _ => severity.cyan().to_string(),
    }
}

fn gap_severity_label(severity: GapSeverity) -> String {
    severity_label(&severity.to_string())
}

/// Render one analysis for the terminal or as Markdown
pub fn render_report(outcome: &AnalysisOutcome, format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => to_json(outcome),
        OutputFormat::Text => render_report_text(outcome),
        OutputFormat::Markdown => render_report_markdown(outcome),
    }
}

fn render_report_text(outcome: &AnalysisOutcome) -> String {
    let result = &outcome.report.result;
    let meta = &result.metadata;
    let mut out = String::new();

    out.push_str(&format!(
        "{} {} ({})\n",
        meta.component.bold(),
        format!("[{}]", result.family).dimmed(),
        if outcome.from_cache { "cached" } else { "fresh" }
    ));
    out.push_str(&format!("  {}\n", meta.description));
    out.push_str(&format!(
        "  Readiness: {}/100   fingerprint {}\n",
        format!("{:.0}", result.score.overall).green().bold(),
        outcome.fingerprint.as_str().dimmed()
    ));
    for (dimension, value) in &result.score.breakdown {
        out.push_str(&format!("    {:<14} {:.0}\n", dimension, value));
    }

    if !meta.states.is_empty() {
        out.push_str(&format!("\n  States: {}\n", meta.states.join(", ")));
    }

    if !result.property_cheat_sheet.is_empty() {
        out.push_str("\n  Properties:\n");
        for prop in &result.property_cheat_sheet {
            out.push_str(&format!("    • {} ({})", prop.name.green(), prop.kind));
            if !prop.values.is_empty() {
                out.push_str(&format!(": {}", prop.values.join(" | ")));
            }
            if let Some(default) = &prop.default {
                out.push_str(&format!(" [default {}]", default));
            }
            out.push('\n');
        }
    }

    out.push('\n');
    out.push_str(&render_token_summary_text(&result.tokens));

    if !result.audit.is_empty() {
        out.push_str("\n  Audit:\n");
        for finding in &result.audit {
            out.push_str(&format!(
                "    [{}] {}\n",
                severity_label(&finding.severity),
                finding.message
            ));
            if let Some(suggestion) = &finding.suggestion {
                out.push_str(&format!("        {}\n", suggestion.dimmed()));
            }
        }
    }

    if !outcome.report.gaps.is_empty() {
        out.push_str("\n  Best-practice gaps:\n");
        out.push_str(&render_gap_lines_text(&outcome.report.gaps));
    }

    if !result.corrections.is_empty() {
        out.push_str("\n  Corrections applied:\n");
        for correction in &result.corrections {
            out.push_str(&format!("    • {}: {}\n", correction.rule, correction.detail));
        }
    }

    out
}

fn render_report_markdown(outcome: &AnalysisOutcome) -> String {
    let result = &outcome.report.result;
    let meta = &result.metadata;
    let mut out = String::new();

    out.push_str(&format!("# {}\n\n", meta.component));
    out.push_str(&format!("{}\n\n", meta.description));
    out.push_str(&format!(
        "**Family:** {}  \n**Readiness:** {:.0}/100  \n**Fingerprint:** `{}`\n\n",
        result.family,
        result.score.overall,
        outcome.fingerprint
    ));

    if !result.property_cheat_sheet.is_empty() {
        out.push_str("## Properties\n\n| Name | Type | Values | Default |\n|---|---|---|---|\n");
        for prop in &result.property_cheat_sheet {
            out.push_str(&format!(
                "| {} | {} | {} | {} |\n",
                prop.name,
                prop.kind,
                prop.values.join(", "),
                prop.default.as_deref().unwrap_or("")
            ));
        }
        out.push('\n');
    }

    if !meta.states.is_empty() {
        out.push_str("## States\n\n");
        for state in &meta.states {
            out.push_str(&format!("- {}\n", state));
        }
        out.push('\n');
    }

    if !meta.slots.is_empty() {
        out.push_str("## Slots\n\n");
        for slot in &meta.slots {
            match &slot.description {
                Some(description) => out.push_str(&format!("- **{}**: {}\n", slot.name, description)),
                None => out.push_str(&format!("- **{}**\n", slot.name)),
            }
        }
        out.push('\n');
    }

    if !meta.usage.is_empty() {
        out.push_str("## Usage\n\n");
        for line in &meta.usage {
            out.push_str(&format!("- {}\n", line));
        }
        out.push('\n');
    }

    if !meta.accessibility.is_empty() {
        out.push_str("## Accessibility\n\n");
        for line in &meta.accessibility {
            out.push_str(&format!("- {}\n", line));
        }
        out.push('\n');
    }

    out.push_str("## Tokens\n\n| Category | Name | Value | Origin |\n|---|---|---|---|\n");
    for token in result.tokens.iter() {
        out.push_str(&format!(
            "| {} | {} | `{}` | {} |\n",
            token.category,
            token.name,
            token.value,
            token.origin.as_str()
        ));
    }
    out.push('\n');

    if !result.audit.is_empty() {
        out.push_str("## Audit\n\n");
        for finding in &result.audit {
            out.push_str(&format!("- **{}** {}\n", finding.severity, finding.message));
        }
        out.push('\n');
    }

    if !outcome.report.gaps.is_empty() {
        out.push_str("## Best-practice gaps\n\n");
        for gap in &outcome.report.gaps {
            out.push_str(&format!(
                "- **{}** ({}): {}. {}\n",
                gap.severity, gap.category, gap.message, gap.suggestion
            ));
        }
        out.push('\n');
    }

    out.push_str("---\n");
    out
}

fn render_token_summary_text(tokens: &TokenAnalysis) -> String {
    let summary = tokens.summary();
    let mut out = format!(
        "  Tokens: {} total, {} bound, {} hard-coded, {} suggested\n",
        summary.total_tokens,
        summary.actual_tokens.to_string().green(),
        summary.hard_coded_values.to_string().yellow(),
        summary.ai_suggestions
    );
    for category in TokenCategory::ALL {
        let list = tokens.tokens(category);
        if list.is_empty() {
            continue;
        }
        out.push_str(&format!("    {}\n", category.to_string().bold()));
        for token in list {
            let name = if token.is_actual_token() {
                token.name.green()
            } else {
                token.name.yellow()
            };
            out.push_str(&format!(
                "      {:<32} {:<20} {}\n",
                name,
                token.value,
                token.origin.as_str().dimmed()
            ));
        }
    }
    out
}

/// Token listing for the `tokens` command
pub fn render_tokens(name: &str, fingerprint: &str, tokens: &TokenAnalysis, format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => to_json(&serde_json::json!({
            "component": name,
            "fingerprint": fingerprint,
            "tokens": tokens,
        })),
        OutputFormat::Text => format!(
            "{} {}\n{}",
            name.bold(),
            fingerprint.dimmed(),
            render_token_summary_text(tokens)
        ),
        OutputFormat::Markdown => {
            let summary = tokens.summary();
            let mut out = format!(
                "# {}\n\n{} tokens: {} bound, {} hard-coded\n\n| Category | Name | Value | Origin |\n|---|---|---|---|\n",
                name, summary.total_tokens, summary.actual_tokens, summary.hard_coded_values
            );
            for token in tokens.iter() {
                out.push_str(&format!(
                    "| {} | {} | `{}` | {} |\n",
                    token.category,
                    token.name,
                    token.value,
                    token.origin.as_str()
                ));
            }
            out
        }
    }
}

fn render_gap_lines_text(gaps: &[BestPracticesGap]) -> String {
    let mut out = String::new();
    for gap in gaps {
        out.push_str(&format!(
            "    [{}] {}: {}\n        {}\n",
            gap_severity_label(gap.severity),
            gap.category,
            gap.message,
            gap.suggestion.dimmed()
        ));
    }
    out
}

/// Profile and gaps for the `gaps` command
pub fn render_gaps(profile: &ComponentBestPractices, gaps: &[BestPracticesGap], format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => to_json(&serde_json::json!({
            "profile": profile,
            "gaps": gaps,
        })),
        OutputFormat::Text => {
            let mut out = format!(
                "{} ({:?})\n  Expected states: {}\n",
                profile.family.bold(),
                profile.source,
                profile.expected_states.join(", ")
            );
            if gaps.is_empty() {
                out.push_str(&format!("  {}\n", "No gaps found".green()));
            } else {
                out.push_str(&render_gap_lines_text(gaps));
            }
            out
        }
        OutputFormat::Markdown => {
            let mut out = format!("# {} best practices\n\n", profile.family);
            out.push_str(&format!(
                "Expected states: {}\n\n",
                profile.expected_states.join(", ")
            ));
            for gap in gaps {
                out.push_str(&format!(
                    "- **{}** ({}): {}. Missing: {}\n",
                    gap.severity,
                    gap.category,
                    gap.message,
                    gap.missing_items.join(", ")
                ));
            }
            out
        }
    }
}
