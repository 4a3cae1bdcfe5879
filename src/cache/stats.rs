//! Cache Statistics Module
//!
//! Point-in-time counts of valid and expired entries.

use serde::Serialize;

// == Cache Stats ==
/// Snapshot produced by a read-only scan of the store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Raw number of entries, stale ones included
    pub total: usize,
    /// Entries still within their TTL
    pub valid: usize,
    /// Entries past their TTL that have not been evicted yet
    pub expired: usize,
    /// Creation time (Unix milliseconds) of the oldest entry, if any
    pub oldest_entry_timestamp: Option<u64>,
}

impl CacheStats {
    // == Constructor ==
    /// Creates an empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    // == Record ==
    /// Counts one entry created at `created_at`.
    pub fn record(&mut self, created_at: u64, expired: bool) {
        self.total += 1;
        if expired {
            self.expired += 1;
        } else {
            self.valid += 1;
        }
        self.oldest_entry_timestamp = Some(match self.oldest_entry_timestamp {
            Some(oldest) => oldest.min(created_at),
            None => created_at,
        });
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_new() {
        let stats = CacheStats::new();
        assert_eq!(stats.total, 0);
        assert_eq!(stats.valid, 0);
        assert_eq!(stats.expired, 0);
        assert!(stats.oldest_entry_timestamp.is_none());
    }

    #[test]
    fn test_record_classifies_and_tracks_oldest() {
        let mut stats = CacheStats::new();
        stats.record(300, false);
        stats.record(100, true);
        stats.record(200, false);

        assert_eq!(stats.total, 3);
        assert_eq!(stats.valid, 2);
        assert_eq!(stats.expired, 1);
        assert_eq!(stats.oldest_entry_timestamp, Some(100));
    }
}
