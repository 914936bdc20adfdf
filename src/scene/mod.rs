// Gateway module for scene input - follows the Train Station Pattern
// All external access must go through this gateway

// Private submodules - not directly accessible from outside
mod snapshot;
mod types;

// Public re-exports - the ONLY way to access scene functionality
pub use snapshot::{
    detect_family, is_interactive_family, ComponentSnapshot, FrameMetrics, HierarchyEntry,
    StyleFlags,
};
pub use types::{
    Bindings, Effect, EffectKind, FontMetrics, LayoutMode, Padding, Paint, PaintKind, Rgba,
    SceneNode,
};

use std::path::Path;

/// Load one scene file. A file holds either a single node or an array of
/// nodes (a multi-selection export).
pub fn load_scene_file(path: &Path) -> anyhow::Result<Vec<SceneNode>> {
    use anyhow::Context;

    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read scene file {}", path.display()))?;
    let value: serde_json::Value = serde_json::from_str(&text)
        .with_context(|| format!("Scene file {} is not valid JSON", path.display()))?;

    let nodes = if value.is_array() {
        serde_json::from_value(value)?
    } else {
        vec![serde_json::from_value(value)?]
    };
    Ok(nodes)
}
