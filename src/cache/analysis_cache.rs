use chrono::Duration;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

use super::clock::{Clock, SystemClock};
use super::fingerprint::Fingerprint;
use super::types::{CacheEntry, CacheStats};
use crate::constants::ANALYSIS_CACHE_TTL_MS;

/// Fingerprint-keyed, in-process store with lazy TTL eviction.
///
/// Expired entries are dropped when they are looked up; there is no
/// background sweep. Concurrent stores for the same fingerprint are not
/// coordinated: the last write wins.
pub struct AnalysisCache<T> {
    inner: Mutex<MemoryCache<T>>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

struct MemoryCache<T> {
    entries: HashMap<Fingerprint, CacheEntry<T>>,
    hits: usize,
    misses: usize,
    expired: usize,
}

impl<T> Default for MemoryCache<T> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
            hits: 0,
            misses: 0,
            expired: 0,
        }
    }
}

impl<T: Clone> Default for AnalysisCache<T> {
    fn default() -> Self {
        Self::new(Duration::milliseconds(ANALYSIS_CACHE_TTL_MS), Arc::new(SystemClock))
    }
}

impl<T: Clone> AnalysisCache<T> {
    pub fn new(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            inner: Mutex::new(MemoryCache::default()),
            ttl,
            clock,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Return a copy of the cached value, or `None` on miss or expiry
    pub fn lookup(&self, fingerprint: &Fingerprint) -> Option<T> {
        let now = self.clock.now();
        let mut cache = self.inner.lock();

        let expired = match cache.entries.get(fingerprint) {
            Some(entry) => now - entry.created_at > self.ttl,
            None => {
                cache.misses += 1;
                return None;
            }
        };

        if expired {
            cache.entries.remove(fingerprint);
            cache.expired += 1;
            cache.misses += 1;
            debug!(%fingerprint, "cache entry expired");
            return None;
        }

        cache.hits += 1;
        cache.entries.get(fingerprint).map(|entry| entry.data.clone())
    }

    /// Insert or replace the entry for `fingerprint`
    pub fn store(&self, fingerprint: Fingerprint, data: T, knowledge_version: &str) {
        let entry = CacheEntry {
            fingerprint: fingerprint.clone(),
            data,
            created_at: self.clock.now(),
            knowledge_version: knowledge_version.to_string(),
        };
        self.inner.lock().entries.insert(fingerprint, entry);
    }

    pub fn contains(&self, fingerprint: &Fingerprint) -> bool {
        self.inner.lock().entries.contains_key(fingerprint)
    }

    pub fn remove(&self, fingerprint: &Fingerprint) -> bool {
        self.inner.lock().entries.remove(fingerprint).is_some()
    }

    /// Drop entries produced under a different knowledge version
    pub fn retain_knowledge_version(&self, version: &str) -> usize {
        let mut cache = self.inner.lock();
        let before = cache.entries.len();
        cache.entries.retain(|_, entry| entry.knowledge_version == version);
        before - cache.entries.len()
    }

    /// Clear all entries and counters
    pub fn clear(&self) {
        *self.inner.lock() = MemoryCache::default();
    }

    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> CacheStats {
        let cache = self.inner.lock();
        CacheStats {
            entries: cache.entries.len(),
            hits: cache.hits,
            misses: cache.misses,
            expired: cache.expired,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};

    struct ManualClock(Mutex<DateTime<Utc>>);

    impl ManualClock {
        fn at(t: DateTime<Utc>) -> Arc<Self> {
            Arc::new(Self(Mutex::new(t)))
        }

        fn advance(&self, by: Duration) {
            let mut now = self.0.lock();
            *now = *now + by;
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> DateTime<Utc> {
            *self.0.lock()
        }
    }

    fn cache_with(clock: Arc<ManualClock>) -> AnalysisCache<String> {
        AnalysisCache::new(Duration::milliseconds(ANALYSIS_CACHE_TTL_MS), clock)
    }

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_served_just_before_ttl() {
        let clock = ManualClock::at(t0());
        let cache = cache_with(clock.clone());
        let key = Fingerprint::from("abc");
        cache.store(key.clone(), "result".to_string(), "v1");

        clock.advance(Duration::hours(23) + Duration::minutes(59));
        assert_eq!(cache.lookup(&key), Some("result".to_string()));
    }

    #[test]
    fn test_absent_just_after_ttl() {
        let clock = ManualClock::at(t0());
        let cache = cache_with(clock.clone());
        let key = Fingerprint::from("abc");
        cache.store(key.clone(), "result".to_string(), "v1");

        clock.advance(Duration::hours(24) + Duration::seconds(1));
        assert_eq!(cache.lookup(&key), None);
        // Lazily evicted on that lookup
        assert!(!cache.contains(&key));
        assert_eq!(cache.stats().expired, 1);
    }

    #[test]
    fn test_last_write_wins() {
        let cache = cache_with(ManualClock::at(t0()));
        let key = Fingerprint::from("abc");
        cache.store(key.clone(), "first".to_string(), "v1");
        cache.store(key.clone(), "second".to_string(), "v1");
        assert_eq!(cache.lookup(&key), Some("second".to_string()));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_stats_and_version_retention() {
        let cache = cache_with(ManualClock::at(t0()));
        cache.store(Fingerprint::from("a"), "x".to_string(), "v1");
        cache.store(Fingerprint::from("b"), "y".to_string(), "v2");

        assert!(cache.lookup(&Fingerprint::from("a")).is_some());
        assert!(cache.lookup(&Fingerprint::from("zzz")).is_none());
        let stats = cache.stats();
        assert_eq!((stats.hits, stats.misses, stats.entries), (1, 1, 2));

        assert_eq!(cache.retain_knowledge_version("v2"), 1);
        assert!(!cache.contains(&Fingerprint::from("a")));

        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.stats(), CacheStats::default());
    }
}
