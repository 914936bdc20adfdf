// Gateway module for gaps - follows the Train Station Pattern
// All external access must go through this gateway

// Private submodules - not directly accessible from outside
mod analyzer;
mod profiles;
mod types;

// Public re-exports - the ONLY way to access gap analysis functionality
pub use analyzer::{analyze_gaps, analyze_profile};
pub use profiles::{canonical_families, resolve_profile};
pub use types::{
    BestPracticesGap, ComponentBestPractices, ExpectedProperty, GapCategory, GapSeverity,
    ProfileSource,
};
