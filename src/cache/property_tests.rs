//! Property-Based Tests for Cache Module
//!
//! Uses proptest to check TTL, eviction, bucketing and stats behavior
//! against a manually driven clock.

use proptest::prelude::*;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use crate::cache::{build_key, CacheStore, Location, ManualClock};

// == Test Configuration ==
const START: u64 = 1_700_000_000_000;
const TEST_DEFAULT_TTL: Duration = Duration::from_secs(300);

fn test_store() -> (CacheStore<String>, ManualClock) {
    let clock = ManualClock::new(START);
    let store = CacheStore::with_clock(TEST_DEFAULT_TTL, Arc::new(clock.clone()));
    (store, clock)
}

// == Strategies ==
/// Generates cache keys
fn key_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_]{1,64}"
}

/// Generates payloads
fn value_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 ]{1,256}"
}

/// Generates TTLs between 1 ms and one day
fn ttl_strategy() -> impl Strategy<Value = Duration> {
    (1u64..86_400_000).prop_map(Duration::from_millis)
}

/// Generates non-blank query text
fn query_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z][a-zA-Z ]{0,20}"
}

/// Generates in-range coordinates, kept clear of the poles and antimeridian
/// so that jitter cannot push them out of range
fn location_strategy() -> impl Strategy<Value = (f64, f64)> {
    (-89.0f64..89.0, -179.0f64..179.0)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // set(k, v, ttl) then get(k) yields v; once ttl has elapsed, both get
    // and has report absence.
    #[test]
    fn prop_ttl_correctness(
        key in key_strategy(),
        value in value_strategy(),
        ttl in ttl_strategy()
    ) {
        let (mut store, clock) = test_store();

        store.set(key.clone(), value.clone(), Some(ttl));
        prop_assert_eq!(store.get(&key), Some(value));

        clock.advance(ttl);
        prop_assert!(store.get(&key).is_none(), "Entry should be gone after TTL");
        prop_assert!(!store.has(&key), "has() should agree with get()");
    }

    // Reading an expired key removes exactly that entry.
    #[test]
    fn prop_expired_get_evicts(
        keys in prop::collection::hash_set(key_strategy(), 2..20),
        value in value_strategy()
    ) {
        let (mut store, clock) = test_store();
        let keys: Vec<String> = keys.into_iter().collect();

        store.set(keys[0].clone(), value.clone(), Some(Duration::from_secs(1)));
        for key in &keys[1..] {
            store.set(key.clone(), value.clone(), None);
        }
        clock.advance(Duration::from_secs(1));

        let before = store.len();
        prop_assert!(store.get(&keys[0]).is_none());
        prop_assert_eq!(store.len(), before - 1);
    }

    // Overwriting keeps a single entry holding the latest value.
    #[test]
    fn prop_overwrite_semantics(
        key in key_strategy(),
        value1 in value_strategy(),
        value2 in value_strategy()
    ) {
        let (mut store, _) = test_store();

        store.set(key.clone(), value1, None);
        store.set(key.clone(), value2.clone(), None);

        prop_assert_eq!(store.get(&key), Some(value2));
        prop_assert_eq!(store.len(), 1);
    }

    // n fresh + m expired entries are reported as such, with no eviction.
    #[test]
    fn prop_stats_consistency(
        keys in prop::collection::hash_set(key_strategy(), 0..40),
        split in 0usize..40
    ) {
        let (mut store, clock) = test_store();
        let keys: Vec<String> = keys.into_iter().collect();
        let m = split.min(keys.len());
        let n = keys.len() - m;

        for key in &keys[..m] {
            store.set(key.clone(), "stale".to_string(), Some(Duration::from_secs(1)));
        }
        clock.advance(Duration::from_secs(2));
        for key in &keys[m..] {
            store.set(key.clone(), "fresh".to_string(), None);
        }

        let stats = store.stats();
        prop_assert_eq!(stats.total, n + m);
        prop_assert_eq!(stats.valid, n);
        prop_assert_eq!(stats.expired, m);
        prop_assert_eq!(store.len(), n + m);
    }

    // Sub-bucket jitter never changes the key.
    #[test]
    fn prop_jitter_within_bucket_collides(
        query in query_strategy(),
        (lat, lon) in location_strategy()
    ) {
        // Snap to a bucket centre, then move less than half a bucket
        let lat_c = (lat * 1000.0).round() / 1000.0;
        let lon_c = (lon * 1000.0).round() / 1000.0;
        let a = Location::new(lat_c, lon_c);
        let b = Location::new(lat_c + 0.0004, lon_c - 0.0004);

        prop_assert_eq!(build_key(&query, Some(&a)), build_key(&query, Some(&b)));
    }

    // Moving a full 0.01 degrees always changes the key.
    #[test]
    fn prop_distant_locations_differ(
        query in query_strategy(),
        (lat, lon) in location_strategy()
    ) {
        let a = Location::new(lat, lon);
        let b = Location::new(lat + 0.01, lon);

        prop_assert_ne!(build_key(&query, Some(&a)), build_key(&query, Some(&b)));
    }

    // Surrounding whitespace and case never change the key.
    #[test]
    fn prop_query_normalization(
        query in query_strategy(),
        pad_left in "[ \t]{0,3}",
        pad_right in "[ \t]{0,3}",
        (lat, lon) in location_strategy()
    ) {
        let loc = Location::new(lat, lon);
        let noisy = format!("{}{}{}", pad_left, query.to_uppercase(), pad_right);

        prop_assert_eq!(build_key(&noisy, Some(&loc)), build_key(&query, Some(&loc)));
    }

    // Distinct keys never interfere with each other.
    #[test]
    fn prop_distinct_keys_independent(
        entries in prop::collection::vec((key_strategy(), value_strategy()), 1..50)
    ) {
        let (mut store, _) = test_store();
        let mut seen = HashSet::new();

        for (key, value) in entries.iter().rev() {
            if seen.insert(key.clone()) {
                store.set(key.clone(), value.clone(), None);
            }
        }

        prop_assert_eq!(store.len(), seen.len());
        for key in &seen {
            prop_assert!(store.has(key));
        }
    }
}
