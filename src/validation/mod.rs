// Gateway module for validation - follows the Train Station Pattern
// All external access must go through this gateway

// Private submodules - not directly accessible from outside
mod corrector;
mod parser;
mod schema;

// Public re-exports - the ONLY way to access validation functionality
pub use corrector::{
    check_invariants, correct, ComponentMetadata, Correction, ReadinessScore, ValidatedMetadata,
    Violation, CANONICAL_BUTTON_STATES,
};
pub use parser::{extract_json_object, parse_response, ParseError};
pub use schema::{AuditItem, GeneratedMetadata, PropSpec, SlotSpec, VariantSpec};
