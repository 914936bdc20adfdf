use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::fingerprint::Fingerprint;

/// A cached analysis and the context it was produced under
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry<T> {
    pub fingerprint: Fingerprint,
    pub data: T,
    pub created_at: DateTime<Utc>,
    pub knowledge_version: String,
}

/// Cache statistics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub entries: usize,
    pub hits: usize,
    pub misses: usize,
    pub expired: usize,
}

impl CacheStats {
    pub fn hit_rate(&self) -> f32 {
        let total = self.hits + self.misses;
        if total > 0 {
            (self.hits as f32 / total as f32) * 100.0
        } else {
            0.0
        }
    }

    /// Format cache stats for display
    pub fn format(&self) -> String {
        format!(
            "Cache: {} entries | Hit rate: {:.1}% ({} hits, {} misses, {} expired)",
            self.entries,
            self.hit_rate(),
            self.hits,
            self.misses,
            self.expired
        )
    }
}
