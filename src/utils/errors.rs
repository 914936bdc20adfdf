use thiserror::Error;

use crate::models::GenerationError;
use crate::validation::ParseError;

/// Main error type for the audit engine
#[derive(Error, Debug)]
pub enum AuditError {
    #[error("Input error: {0}")]
    Input(#[from] InputError),

    #[error("Analysis failed: {0}")]
    Parse(#[from] ParseError),

    #[error("Generation failed: {0}")]
    Generation(#[from] GenerationError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Problems with what the caller handed us, raised before any network activity
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    #[error("no component selected")]
    NoSelection,

    #[error("node '{name}' is a {kind} node; select a component, component set, instance or frame")]
    InvalidNodeKind { name: String, kind: String },

    #[error("missing API credential for model '{model}'")]
    MissingCredential { model: String },
}
