// Gateway module for runtime - follows the Train Station Pattern
// All external access must go through this gateway

// Private submodules - not directly accessible from outside
mod engine;
mod types;

// Public re-exports - the ONLY way to access the engine
pub use engine::Engine;
pub use types::{
    AnalysisOutcome, AnalysisReport, AnalysisResult, AuditFinding, FindingSource, PropertyCheat,
};
