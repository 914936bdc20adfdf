// Gateway module for utils - follows the Train Station Pattern
// All external access must go through this gateway

// Private submodules - not directly accessible from outside
mod errors;
mod lenient;
mod logger;

// Public re-exports - the ONLY way to access utils functionality
pub use errors::{AuditError, InputError};
pub use lenient::{lenient_string, lenient_vec, optional_string, string_list};
pub use logger::{init_logger, log_progress};
