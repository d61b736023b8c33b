//! In-memory result cache.
//!
//! Maps a resolution key (the domain name) to the last successful result and
//! the instant it was written. The cache never judges staleness itself: `get`
//! returns whatever is stored and the resolver compares the entry's age
//! against the configured expiry. Entries are removed only by `clear`, by
//! being overwritten, or by least-recently-used eviction once the capacity
//! bound is reached.

use std::num::NonZeroUsize;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use log::{debug, warn};
use lru::LruCache;
use serde::{Deserialize, Serialize};
use tokio::time::Instant;

use crate::models::ResolutionResult;

/// A cached result and the instant it was stored.
#[derive(Clone, Debug)]
pub struct CacheEntry {
    pub result: ResolutionResult,
    pub timestamp: Instant,
}

impl CacheEntry {
    pub fn age(&self) -> Duration {
        Instant::now().saturating_duration_since(self.timestamp)
    }

    /// An entry is stale once its age reaches the expiry.
    pub fn is_stale(&self, expiry: Duration) -> bool {
        self.age() >= expiry
    }
}

/// Snapshot of cache occupancy.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStats {
    pub size: usize,
    /// Configured expiry, in seconds
    pub max_age: u64,
    pub capacity: usize,
}

/// Thread-safe, capacity-bounded result cache.
///
/// The least recently used entry is the first to go when the cache is full.
pub struct ResultCache {
    entries: Mutex<LruCache<String, CacheEntry>>,
    max_age: Duration,
}

impl ResultCache {
    pub fn new(max_age: Duration, capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
            max_age,
        }
    }

    /// Lock the entries mutex, recovering from poison if necessary.
    ///
    /// A poisoned cache only ever holds complete entries, so recovering
    /// cannot expose a half-written result.
    fn lock_entries(&self) -> MutexGuard<'_, LruCache<String, CacheEntry>> {
        self.entries.lock().unwrap_or_else(|poisoned| {
            warn!("Result cache mutex was poisoned, recovering");
            poisoned.into_inner()
        })
    }

    /// Look up an entry and mark it as most recently used.
    pub fn get(&self, key: &str) -> Option<CacheEntry> {
        self.lock_entries().get(key).cloned()
    }

    /// Store a result, replacing any previous entry for the key.
    pub fn set(&self, key: &str, result: ResolutionResult) {
        let entry = CacheEntry {
            result,
            timestamp: Instant::now(),
        };

        // `push` hands back either the replaced entry or the evicted one.
        if let Some((evicted, _)) = self.lock_entries().push(key.to_string(), entry) {
            if evicted != key {
                debug!("Result cache full, evicted '{}'", evicted);
            }
        }
    }

    /// Drop every entry, returning how many were removed.
    pub fn clear(&self) -> usize {
        let mut entries = self.lock_entries();
        let removed = entries.len();
        entries.clear();
        removed
    }

    pub fn stats(&self) -> CacheStats {
        let entries = self.lock_entries();
        CacheStats {
            size: entries.len(),
            max_age: self.max_age.as_secs(),
            capacity: entries.cap().get(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ContractMetadata, ResolverCapabilities};
    use chrono::Utc;

    fn result(name: &str) -> ResolutionResult {
        let now = Utc::now();
        ResolutionResult {
            address: "0x00000000000000000000000000000000000000aa".to_string(),
            name: name.to_string(),
            resolver: "0x00000000000000000000000000000000000000bb".to_string(),
            network: "mainnet".to_string(),
            verified: false,
            metadata: ContractMetadata::default(),
            capabilities: ResolverCapabilities::default(),
            resolved_at: now,
            last_verified_at: now,
        }
    }

    #[test]
    fn test_set_and_get() {
        let cache = ResultCache::new(Duration::from_secs(60), 10);
        assert!(cache.get("a.eth").is_none());

        cache.set("a.eth", result("a.eth"));
        let entry = cache.get("a.eth").unwrap();
        assert_eq!(entry.result.name, "a.eth");
        assert_eq!(cache.stats().size, 1);
    }

    #[test]
    fn test_overwrite_keeps_single_entry() {
        let cache = ResultCache::new(Duration::from_secs(60), 10);
        cache.set("a.eth", result("a.eth"));
        cache.set("a.eth", result("a.eth"));
        assert_eq!(cache.stats().size, 1);
    }

    #[test]
    fn test_evicts_least_recently_used() {
        let cache = ResultCache::new(Duration::from_secs(60), 2);
        cache.set("a.eth", result("a.eth"));
        cache.set("b.eth", result("b.eth"));

        // Touch a.eth so b.eth becomes the eviction candidate
        assert!(cache.get("a.eth").is_some());
        cache.set("c.eth", result("c.eth"));

        assert_eq!(cache.stats().size, 2);
        assert!(cache.get("a.eth").is_some());
        assert!(cache.get("b.eth").is_none());
        assert!(cache.get("c.eth").is_some());
    }

    #[test]
    fn test_large_cache_stays_bounded() {
        let cache = ResultCache::new(Duration::from_secs(60), 1_000);
        for i in 0..1_500 {
            let name = format!("name{}.eth", i);
            cache.set(&name, result(&name));
        }

        assert_eq!(cache.stats().size, 1_000);
        assert!(cache.get("name499.eth").is_none());
        assert!(cache.get("name500.eth").is_some());
        assert!(cache.get("name1499.eth").is_some());
    }

    #[test]
    fn test_zero_capacity_holds_one_entry() {
        let cache = ResultCache::new(Duration::from_secs(60), 0);
        cache.set("a.eth", result("a.eth"));
        cache.set("b.eth", result("b.eth"));

        assert_eq!(cache.stats().capacity, 1);
        assert!(cache.get("a.eth").is_none());
        assert!(cache.get("b.eth").is_some());
    }

    #[test]
    fn test_clear_and_stats() {
        let cache = ResultCache::new(Duration::from_secs(300), 5);
        cache.set("a.eth", result("a.eth"));
        cache.set("b.eth", result("b.eth"));

        assert_eq!(
            cache.stats(),
            CacheStats {
                size: 2,
                max_age: 300,
                capacity: 5,
            }
        );

        assert_eq!(cache.clear(), 2);
        assert_eq!(cache.stats().size, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_staleness_is_age_based() {
        let cache = ResultCache::new(Duration::from_secs(10), 5);
        cache.set("a.eth", result("a.eth"));

        let entry = cache.get("a.eth").unwrap();
        assert!(!entry.is_stale(Duration::from_secs(10)));

        tokio::time::advance(Duration::from_secs(10)).await;

        // Still stored, but stale
        let entry = cache.get("a.eth").unwrap();
        assert!(entry.is_stale(Duration::from_secs(10)));
    }
}
