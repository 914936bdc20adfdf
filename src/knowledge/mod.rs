// Gateway module for knowledge - follows the Train Station Pattern
// All external access must go through this gateway

// Private submodules - not directly accessible from outside
mod fallback;
mod provider;
mod service;
mod types;

// Public re-exports - the ONLY way to access knowledge functionality
pub use fallback::fallback_knowledge;
pub use provider::{route_title, KnowledgeProvider};
pub use service::{HttpKnowledgeService, KnowledgeService};
pub use types::{
    KnowledgeBase, KnowledgeDocument, KnowledgeError, KnowledgeSource, KnowledgeStatus,
    KnowledgeTopic,
};
