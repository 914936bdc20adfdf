// Gateway module for tokens - follows the Train Station Pattern
// All external access must go through this gateway

// Private submodules - not directly accessible from outside
mod classifier;
mod naming;
mod types;

// Public re-exports - the ONLY way to access token functionality
pub use classifier::{SuggestedToken, TokenClassifier};
pub use naming::{
    brightness, color_name, font_size_bucket, normalize_value, spacing_bucket, ColorContext,
    ColorUsage,
};
pub use types::{
    CategoryCounts, DesignToken, TokenAnalysis, TokenCategory, TokenOrigin, TokenSummary,
};
