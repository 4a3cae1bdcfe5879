//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL support.

use std::time::Duration;

// == Cache Entry ==
/// A single timestamped payload.
///
/// Entries are never mutated after creation; a `set` on an existing key
/// replaces the whole entry.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry<T> {
    /// The stored payload
    pub value: T,
    /// Creation timestamp (Unix milliseconds)
    pub created_at: u64,
    /// Expiration timestamp (Unix milliseconds)
    pub expires_at: u64,
}

impl<T> CacheEntry<T> {
    // == Constructor ==
    /// Creates an entry stamped at `now_ms` that lives for `ttl`.
    pub fn new(value: T, now_ms: u64, ttl: Duration) -> Self {
        let ttl_ms = u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX);

        Self {
            value,
            created_at: now_ms,
            expires_at: now_ms.saturating_add(ttl_ms),
        }
    }

    // == Is Expired ==
    /// Checks whether the entry is expired at `now_ms`.
    ///
    /// Boundary condition: an entry is expired once `now_ms >= expires_at`,
    /// so a zero TTL produces an entry that is never readable.
    pub fn is_expired_at(&self, now_ms: u64) -> bool {
        now_ms >= self.expires_at
    }

    // == Time To Live ==
    /// Returns the remaining lifetime at `now_ms`, zero once expired.
    pub fn ttl_remaining_at(&self, now_ms: u64) -> Duration {
        Duration::from_millis(self.expires_at.saturating_sub(now_ms))
    }
}
