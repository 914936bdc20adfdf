pub mod app;
pub mod cache;
pub mod cli;
pub mod constants;
pub mod gaps;
pub mod knowledge;
pub mod models;
pub mod prompt;
pub mod runtime;
pub mod scene;
pub mod tokens;
pub mod utils;
pub mod validation;

pub use app::{load_config, Config};
pub use models::{Credentials, Model, ModelFactory};
pub use runtime::{AnalysisOutcome, AnalysisReport, Engine};
pub use utils::{AuditError, InputError};
