mod analysis_cache;
mod clock;
mod fingerprint;
mod types;

pub use analysis_cache::AnalysisCache;
pub use clock::{Clock, SystemClock};
pub use fingerprint::{fingerprint, string_hash, Fingerprint};
pub use types::{CacheEntry, CacheStats};
