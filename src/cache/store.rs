//! Cache Store Module
//!
//! Key to timestamped payload mapping with lazy, access-driven expiration.
//! Nothing sweeps the map in the background: a stale entry lingers until the
//! next `get`/`has` on its key, but is never returned.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tracing::trace;

use crate::cache::{CacheEntry, CacheStats, Clock, SystemClock};

/// A store shared between the foreground path, the prefetcher and the
/// stats reporter.
pub type SharedCache<T> = Arc<RwLock<CacheStore<T>>>;

// == Cache Store ==
/// In-memory cache with per-entry TTL.
#[derive(Debug)]
pub struct CacheStore<T> {
    /// Key-value storage
    entries: HashMap<String, CacheEntry<T>>,
    /// TTL applied when `set` is called without one
    default_ttl: Duration,
    /// Source of the current time
    clock: Arc<dyn Clock>,
}

impl<T: Clone> CacheStore<T> {
    // == Constructor ==
    /// Creates an empty store on the system clock.
    pub fn new(default_ttl: Duration) -> Self {
        Self::with_clock(default_ttl, Arc::new(SystemClock))
    }

    /// Creates an empty store reading time from `clock`.
    pub fn with_clock(default_ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: HashMap::new(),
            default_ttl,
            clock,
        }
    }

    /// Wraps the store for sharing across tasks.
    pub fn into_shared(self) -> SharedCache<T> {
        Arc::new(RwLock::new(self))
    }

    // == Set ==
    /// Stores `value` under `key`, replacing any previous entry outright.
    ///
    /// # Arguments
    /// * `key` - The key to store
    /// * `value` - The payload to store
    /// * `ttl` - Lifetime of the entry (uses the default TTL if None)
    pub fn set(&mut self, key: impl Into<String>, value: T, ttl: Option<Duration>) {
        let key = key.into();
        let ttl = ttl.unwrap_or(self.default_ttl);
        let entry = CacheEntry::new(value, self.clock.now_ms(), ttl);

        trace!(key = %key, ttl_ms = ttl.as_millis() as u64, "cache set");
        self.entries.insert(key, entry);
    }

    // == Get ==
    /// Returns the payload for `key` if present and unexpired.
    ///
    /// An expired entry is removed as a side effect.
    pub fn get(&mut self, key: &str) -> Option<T> {
        self.live_entry(key).map(|entry| entry.value.clone())
    }

    // == Has ==
    /// Same expiry check as [`get`](Self::get) without cloning the payload.
    pub fn has(&mut self, key: &str) -> bool {
        self.live_entry(key).is_some()
    }

    /// Looks up `key`, evicting it if it has expired.
    fn live_entry(&mut self, key: &str) -> Option<&CacheEntry<T>> {
        let now = self.clock.now_ms();

        let expired = self.entries.get(key)?.is_expired_at(now);
        if expired {
            self.entries.remove(key);
            trace!(key, "evicted expired entry on access");
            return None;
        }

        self.entries.get(key)
    }

    // == Clear ==
    /// Removes every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    // == Length ==
    /// Returns the raw number of entries, expired-but-unevicted ones included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    // == Is Empty ==
    /// Returns true if the store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    // == Stats ==
    /// Classifies every entry as valid or expired without evicting anything.
    pub fn stats(&self) -> CacheStats {
        let now = self.clock.now_ms();

        self.entries
            .values()
            .fold(CacheStats::new(), |mut stats, entry| {
                stats.record(entry.created_at, entry.is_expired_at(now));
                stats
            })
    }

    /// Returns the TTL applied when none is given.
    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }
}
