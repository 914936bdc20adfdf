use serde::{Deserialize, Serialize};
use tracing::debug;

use super::naming::{
    color_name, font_size_bucket, format_number, format_px, normalize_value, shadow_bucket,
    spacing_bucket, ColorContext, ColorUsage,
};
use super::types::{DesignToken, TokenAnalysis, TokenCategory, TokenOrigin};
use crate::constants::{AI_SUGGESTION_CAP, RADIUS_FULL_THRESHOLD};
use crate::scene::{Effect, EffectKind, Paint, PaintKind, SceneNode};
use crate::utils::{lenient_string, optional_string};

/// A token proposed by the generator, before classification
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SuggestedToken {
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub value: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub category: String,
    #[serde(default, deserialize_with = "optional_string")]
    pub recommendation: Option<String>,
}

/// Turns raw node attributes into a [`TokenAnalysis`]
#[derive(Debug, Clone)]
pub struct TokenClassifier {
    ai_suggestion_cap: usize,
}

impl Default for TokenClassifier {
    fn default() -> Self {
        Self {
            ai_suggestion_cap: AI_SUGGESTION_CAP,
        }
    }
}

impl TokenClassifier {
    pub fn new(ai_suggestion_cap: usize) -> Self {
        Self { ai_suggestion_cap }
    }

    /// Classify every visual attribute of `root` and its descendants.
    /// Traversal is depth-first in child order, so "first occurrence" is
    /// stable for a given tree.
    pub fn classify(&self, root: &SceneNode, interactive: bool) -> TokenAnalysis {
        let mut analysis = TokenAnalysis::new();
        self.visit(root, 0, interactive, &mut analysis);
        debug!(
            total = analysis.summary().total_tokens,
            "classified tokens for '{}'", root.name
        );
        analysis
    }

    fn visit(&self, node: &SceneNode, depth: usize, interactive: bool, out: &mut TokenAnalysis) {
        for paint in &node.fills {
            let ctx = ColorContext {
                is_text: node.is_text(),
                interactive,
                usage: ColorUsage::Fill,
                depth,
            };
            if let Some(token) = color_token(paint, node.bindings.fill_style.as_deref(), ctx) {
                out.push(token);
            }
        }

        for paint in &node.strokes {
            let ctx = ColorContext {
                is_text: false,
                interactive,
                usage: ColorUsage::Stroke,
                depth,
            };
            if let Some(token) = color_token(paint, node.bindings.stroke_style.as_deref(), ctx) {
                out.push(token);
            }
        }

        for effect in node.effects.iter().filter(|e| e.visible) {
            out.push(effect_token(effect, node.bindings.effect_style.as_deref()));
        }

        if let Some(padding) = node.padding {
            let sides = [
                ("paddingTop", padding.top),
                ("paddingRight", padding.right),
                ("paddingBottom", padding.bottom),
                ("paddingLeft", padding.left),
            ];
            for (property, px) in sides {
                if px > 0.0 {
                    out.push(spacing_token(px, node.bindings.variable(property)));
                }
            }
        }
        if let Some(px) = node.item_spacing.filter(|px| *px > 0.0) {
            out.push(spacing_token(px, node.bindings.variable("itemSpacing")));
        }

        if let Some(font) = &node.font {
            if font.size > 0.0 {
                let binding = node
                    .bindings
                    .text_style
                    .as_deref()
                    .or_else(|| node.bindings.variable("fontSize"));
                let value = format_px(font.size);
                let synthesized = format!("font-size-{}", font_size_bucket(font.size));
                out.push(make_token(TokenCategory::Typography, value, synthesized, binding));
            }
            if let Some(weight) = font.weight {
                let binding = node.bindings.variable("fontWeight");
                out.push(make_token(
                    TokenCategory::Typography,
                    weight.to_string(),
                    format!("font-weight-{}", weight),
                    binding,
                ));
            }
        }

        if let Some(radius) = node.corner_radius.filter(|r| *r > 0.0) {
            let synthesized = if radius >= RADIUS_FULL_THRESHOLD {
                "radius-full".to_string()
            } else {
                format!("radius-{}", spacing_bucket(radius))
            };
            out.push(make_token(
                TokenCategory::Border,
                format_px(radius),
                synthesized,
                node.bindings.variable("cornerRadius"),
            ));
        }

        let has_visible_stroke = node.strokes.iter().any(|p| p.visible);
        if let Some(weight) = node.stroke_weight.filter(|w| *w > 0.0 && has_visible_stroke) {
            out.push(make_token(
                TokenCategory::Border,
                format_px(weight),
                format!("border-width-{}", format_number(weight)),
                node.bindings.variable("strokeWeight"),
            ));
        }

        for child in &node.children {
            self.visit(child, depth + 1, interactive, out);
        }
    }

    /// Merge generator-proposed tokens into an inspected analysis.
    ///
    /// A suggestion is admitted only when its category is recognized, its
    /// value is not already present from inspection, and the category is
    /// still under the cap. Returns how many were admitted.
    pub fn admit_suggestions(&self, analysis: &mut TokenAnalysis, suggestions: &[SuggestedToken]) -> usize {
        let mut admitted = 0;
        for suggestion in suggestions {
            let Some(category) = TokenCategory::from_label(&suggestion.category) else {
                continue;
            };
            if suggestion.value.trim().is_empty() || suggestion.name.trim().is_empty() {
                continue;
            }

            let value = normalize_value(category, &suggestion.value);
            if analysis.contains_value(category, &value) {
                continue;
            }
            if analysis.count_origin(category, TokenOrigin::AiSuggestion) >= self.ai_suggestion_cap {
                continue;
            }

            let name = suggestion.name.trim().to_string();
            let added = analysis.push(DesignToken {
                suggestion: name.clone(),
                name,
                value,
                category,
                origin: TokenOrigin::AiSuggestion,
                recommendation: suggestion
                    .recommendation
                    .clone()
                    .filter(|r| !r.trim().is_empty())
                    .unwrap_or_else(|| "Suggested by analysis; not present in the inspected component".to_string()),
            });
            if added {
                admitted += 1;
            }
        }
        admitted
    }
}

fn make_token(
    category: TokenCategory,
    value: String,
    synthesized: String,
    binding: Option<&str>,
) -> DesignToken {
    match binding.map(str::trim).filter(|b| !b.is_empty()) {
        Some(bound) => DesignToken {
            name: bound.to_string(),
            recommendation: format!("Bound to design system reference '{}'", bound),
            suggestion: bound.to_string(),
            value,
            category,
            origin: TokenOrigin::DesignSystemReference,
        },
        None => DesignToken {
            name: synthesized.clone(),
            recommendation: format!(
                "Replace hard-coded {} value {} with a design token",
                category, value
            ),
            suggestion: synthesized,
            value,
            category,
            origin: TokenOrigin::HardCoded,
        },
    }
}

fn color_token(paint: &Paint, style: Option<&str>, ctx: ColorContext) -> Option<DesignToken> {
    if !paint.visible || paint.kind != PaintKind::Solid {
        return None;
    }
    let color = paint.color?;
    let value = color.to_hex(paint.opacity);
    let synthesized = color_name(color.channels_255(), ctx);
    let binding = paint.bound_variable.as_deref().or(style);
    Some(make_token(TokenCategory::Color, value, synthesized, binding))
}

fn spacing_token(px: f64, binding: Option<&str>) -> DesignToken {
    make_token(
        TokenCategory::Spacing,
        format_px(px),
        format!("spacing-{}", spacing_bucket(px)),
        binding,
    )
}

fn effect_token(effect: &Effect, style: Option<&str>) -> DesignToken {
    let (value, synthesized) = match effect.kind {
        EffectKind::DropShadow | EffectKind::InnerShadow => {
            let kind = if effect.kind == EffectKind::DropShadow {
                "drop-shadow"
            } else {
                "inner-shadow"
            };
            let color = effect
                .color
                .map(|c| c.to_hex(1.0))
                .unwrap_or_else(|| "#000000".to_string());
            (
                format!(
                    "{} {} {} {} {} {}",
                    kind,
                    format_px(effect.offset_x),
                    format_px(effect.offset_y),
                    format_px(effect.radius),
                    format_px(effect.spread),
                    color
                ),
                format!("shadow-{}", shadow_bucket(effect.radius)),
            )
        }
        EffectKind::LayerBlur | EffectKind::BackgroundBlur => {
            let kind = if effect.kind == EffectKind::LayerBlur {
                "layer-blur"
            } else {
                "background-blur"
            };
            (
                format!("{} {}", kind, format_px(effect.radius)),
                format!("blur-{}", spacing_bucket(effect.radius)),
            )
        }
    };
    let binding = effect.bound_variable.as_deref().or(style);
    make_token(TokenCategory::Effect, value, synthesized, binding)
}
