use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One node of an exported scene tree.
///
/// The engine only reads these; nothing here is ever written back to the
/// host document. `x`/`y` are accepted so exports deserialize cleanly but are
/// never copied into a snapshot.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneNode {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default = "default_node_type")]
    pub node_type: String,
    #[serde(default)]
    pub x: Option<f64>,
    #[serde(default)]
    pub y: Option<f64>,
    #[serde(default)]
    pub width: Option<f64>,
    #[serde(default)]
    pub height: Option<f64>,
    #[serde(default)]
    pub layout_mode: Option<LayoutMode>,
    #[serde(default)]
    pub children: Vec<SceneNode>,
    #[serde(default)]
    pub fills: Vec<Paint>,
    #[serde(default)]
    pub strokes: Vec<Paint>,
    #[serde(default)]
    pub stroke_weight: Option<f64>,
    #[serde(default)]
    pub effects: Vec<Effect>,
    #[serde(default)]
    pub corner_radius: Option<f64>,
    #[serde(default)]
    pub padding: Option<Padding>,
    #[serde(default)]
    pub item_spacing: Option<f64>,
    #[serde(default)]
    pub font: Option<FontMetrics>,
    #[serde(default)]
    pub bindings: Bindings,
}

fn default_node_type() -> String {
    "FRAME".to_string()
}

impl SceneNode {
    pub fn is_text(&self) -> bool {
        self.node_type.eq_ignore_ascii_case("TEXT")
    }
}

/// Auto-layout direction of a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LayoutMode {
    None,
    Horizontal,
    Vertical,
}

impl LayoutMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            LayoutMode::None => "none",
            LayoutMode::Horizontal => "horizontal",
            LayoutMode::Vertical => "vertical",
        }
    }
}

/// RGBA color with channels in 0.0..=1.0
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    #[serde(default = "opaque")]
    pub a: f64,
}

fn opaque() -> f64 {
    1.0
}

impl Rgba {
    /// Channels scaled to 0..=255
    pub fn channels_255(&self) -> [u8; 3] {
        [to_255(self.r), to_255(self.g), to_255(self.b)]
    }

    /// Lowercase hex, with an alpha byte only when not fully opaque
    pub fn to_hex(&self, opacity: f64) -> String {
        let [r, g, b] = self.channels_255();
        let alpha = (self.a * opacity).clamp(0.0, 1.0);
        if alpha < 1.0 {
            format!("#{:02x}{:02x}{:02x}{:02x}", r, g, b, to_255(alpha))
        } else {
            format!("#{:02x}{:02x}{:02x}", r, g, b)
        }
    }
}

fn to_255(channel: f64) -> u8 {
    (channel.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Fill or stroke paint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paint {
    #[serde(rename = "type", default = "solid")]
    pub kind: PaintKind,
    #[serde(default = "visible")]
    pub visible: bool,
    #[serde(default = "full_opacity")]
    pub opacity: f64,
    #[serde(default)]
    pub color: Option<Rgba>,
    /// Name of a bound color variable, if any
    #[serde(default)]
    pub bound_variable: Option<String>,
}

fn solid() -> PaintKind {
    PaintKind::Solid
}

fn visible() -> bool {
    true
}

fn full_opacity() -> f64 {
    1.0
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaintKind {
    Solid,
    GradientLinear,
    GradientRadial,
    Image,
}

/// Shadow or blur effect
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Effect {
    #[serde(rename = "type")]
    pub kind: EffectKind,
    #[serde(default = "visible")]
    pub visible: bool,
    #[serde(default)]
    pub radius: f64,
    #[serde(default)]
    pub spread: f64,
    #[serde(default)]
    pub offset_x: f64,
    #[serde(default)]
    pub offset_y: f64,
    #[serde(default)]
    pub color: Option<Rgba>,
    #[serde(default)]
    pub bound_variable: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EffectKind {
    DropShadow,
    InnerShadow,
    LayerBlur,
    BackgroundBlur,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Padding {
    #[serde(default)]
    pub top: f64,
    #[serde(default)]
    pub right: f64,
    #[serde(default)]
    pub bottom: f64,
    #[serde(default)]
    pub left: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FontMetrics {
    #[serde(default)]
    pub family: Option<String>,
    pub size: f64,
    #[serde(default)]
    pub weight: Option<u16>,
    #[serde(default)]
    pub line_height: Option<f64>,
    #[serde(default)]
    pub letter_spacing: Option<f64>,
}

/// Explicit design-system references attached to a node
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bindings {
    #[serde(default)]
    pub fill_style: Option<String>,
    #[serde(default)]
    pub stroke_style: Option<String>,
    #[serde(default)]
    pub effect_style: Option<String>,
    #[serde(default)]
    pub text_style: Option<String>,
    /// Property name (`paddingTop`, `cornerRadius`, ...) to bound variable name
    #[serde(default)]
    pub variables: BTreeMap<String, String>,
}

impl Bindings {
    pub fn variable(&self, property: &str) -> Option<&str> {
        self.variables.get(property).map(String::as_str)
    }
}
