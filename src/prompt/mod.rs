// Gateway module for prompt - follows the Train Station Pattern
// All external access must go through this gateway

// Private submodules - not directly accessible from outside
mod assembler;

// Public re-exports - the ONLY way to access prompt functionality
pub use assembler::{assemble_prompt, OUTPUT_CONTRACT};
