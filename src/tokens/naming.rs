//! Name synthesis for values that carry no design-system binding.
//!
//! Thresholds are part of the output contract: changing any of them changes
//! token names and therefore cached results.

use once_cell::sync::Lazy;
use regex::Regex;

use super::types::TokenCategory;

/// How a color is used on its node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorUsage {
    Fill,
    Stroke,
}

impl ColorUsage {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColorUsage::Fill => "background",
            ColorUsage::Stroke => "border",
        }
    }
}

/// Where a color sits, for naming purposes
#[derive(Debug, Clone, Copy)]
pub struct ColorContext {
    pub is_text: bool,
    pub interactive: bool,
    pub usage: ColorUsage,
    pub depth: usize,
}

/// Average of the three channels on a 0..=255 scale
pub fn brightness(rgb: [u8; 3]) -> f64 {
    (rgb[0] as f64 + rgb[1] as f64 + rgb[2] as f64) / 3.0
}

pub fn hierarchy_label(depth: usize) -> &'static str {
    match depth {
        0 => "primary",
        1 => "secondary",
        _ => "tertiary",
    }
}

pub fn color_name(rgb: [u8; 3], ctx: ColorContext) -> String {
    let brightness = brightness(rgb);

    if ctx.is_text {
        return if brightness < 80.0 {
            "text-primary-dark".to_string()
        } else if brightness > 200.0 {
            "text-primary-light".to_string()
        } else {
            "text-primary-default".to_string()
        };
    }

    if brightness > 240.0 {
        return "surface-primary".to_string();
    }
    if brightness < 40.0 {
        return "surface-inverse".to_string();
    }

    let max = *rgb.iter().max().unwrap_or(&0);
    let min = *rgb.iter().min().unwrap_or(&0);
    if max - min < 15 {
        let step = (brightness / 25.5).round() as u32 * 100;
        return format!("neutral-{}", step);
    }

    let hierarchy = hierarchy_label(ctx.depth);
    if ctx.interactive {
        return format!("interactive-{}-{}", hierarchy, ctx.usage.as_str());
    }

    format!("color-{}-{}", hierarchy, ctx.usage.as_str())
}

/// Spacing scale; each upper bound is inclusive
pub fn spacing_bucket(px: f64) -> &'static str {
    if px <= 4.0 {
        "xs"
    } else if px <= 8.0 {
        "sm"
    } else if px <= 16.0 {
        "md"
    } else if px <= 24.0 {
        "lg"
    } else if px <= 32.0 {
        "xl"
    } else {
        "xxl"
    }
}

/// Font size scale; each upper bound is inclusive
pub fn font_size_bucket(px: f64) -> &'static str {
    if px <= 12.0 {
        "xs"
    } else if px <= 14.0 {
        "sm"
    } else if px <= 16.0 {
        "base"
    } else if px <= 18.0 {
        "lg"
    } else if px <= 24.0 {
        "xl"
    } else {
        "xxl"
    }
}

pub fn shadow_bucket(blur_radius: f64) -> &'static str {
    if blur_radius <= 4.0 {
        "sm"
    } else if blur_radius <= 12.0 {
        "md"
    } else {
        "lg"
    }
}

/// `16` -> `16px`, `1.5` -> `1.5px`
pub fn format_px(value: f64) -> String {
    format!("{}px", format_number(value))
}

pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        let rounded = (value * 100.0).round() / 100.0;
        format!("{}", rounded)
    }
}

static HEX_COLOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#([0-9a-fA-F]{3}|[0-9a-fA-F]{6}|[0-9a-fA-F]{8})$").unwrap());
static RGB_COLOR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^rgba?\(\s*(\d{1,3})\s*,\s*(\d{1,3})\s*,\s*(\d{1,3})\s*(?:,\s*([0-9.]+)\s*)?\)$")
        .unwrap()
});
static PX_VALUE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(-?[0-9]*\.?[0-9]+)\s*(px)?$").unwrap());

/// Bring a free-form value into the same shape the classifier emits, so a
/// suggested `rgb(255, 255, 255)` is recognized as the inspected `#ffffff`.
pub fn normalize_value(category: TokenCategory, raw: &str) -> String {
    let trimmed = raw.trim();
    match category {
        TokenCategory::Color => normalize_color(trimmed).unwrap_or_else(|| trimmed.to_lowercase()),
        TokenCategory::Spacing | TokenCategory::Typography | TokenCategory::Border => {
            match PX_VALUE.captures(trimmed).and_then(|c| c[1].parse::<f64>().ok()) {
                Some(px) => format_px(px),
                None => trimmed.to_lowercase(),
            }
        }
        TokenCategory::Effect => trimmed.to_lowercase(),
    }
}

fn normalize_color(raw: &str) -> Option<String> {
    if let Some(caps) = HEX_COLOR.captures(raw) {
        let hex = caps[1].to_lowercase();
        return Some(match hex.len() {
            3 => {
                let expanded: String = hex.chars().flat_map(|c| [c, c]).collect();
                format!("#{}", expanded)
            }
            8 if hex.ends_with("ff") => format!("#{}", &hex[..6]),
            _ => format!("#{}", hex),
        });
    }

    let caps = RGB_COLOR.captures(raw)?;
    let channel = |i: usize| caps[i].parse::<u16>().ok().map(|v| v.min(255) as u8);
    let (r, g, b) = (channel(1)?, channel(2)?, channel(3)?);
    let alpha = caps
        .get(4)
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .unwrap_or(1.0)
        .clamp(0.0, 1.0);

    if alpha < 1.0 {
        let a = (alpha * 255.0).round() as u8;
        Some(format!("#{:02x}{:02x}{:02x}{:02x}", r, g, b, a))
    } else {
        Some(format!("#{:02x}{:02x}{:02x}", r, g, b))
    }
}
