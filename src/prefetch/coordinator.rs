//! Prefetch coordinator.
//!
//! Warms the cache for a handful of likely queries using idle time. Each
//! cycle picks one candidate term and, if nobody owns its key yet, claims
//! the key with a short-lived placeholder before going to the network.
//! The size guard, the ownership check and the claim happen under a single
//! write guard. A claimed key also stays in the coordinator's in-flight set
//! until its request settles, so a lapsed placeholder never lets a second
//! request for the same key through.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use rand::seq::SliceRandom;
use tracing::{debug, info};

use crate::cache::{build_key, Location};
use crate::search::{
    fetch_with_timeout, CachedSearch, SearchBackend, SearchCache, SearchRequest,
    DEFAULT_REQUEST_TIMEOUT,
};

use super::events::{EventBus, PrefetchEvent};

/// Search categories worth keeping warm when nothing else is configured.
pub const DEFAULT_CANDIDATE_TERMS: &[&str] = &[
    "restaurants",
    "coffee",
    "gas stations",
    "grocery stores",
    "pharmacies",
    "parks",
];

// == Configuration ==
/// Tunables of the prefetch cycle.
#[derive(Debug, Clone)]
pub struct PrefetchConfig {
    /// Terms a cycle may choose from
    pub candidate_terms: Vec<String>,
    /// Prefetch only while the store holds fewer entries than this
    pub max_cache_size: usize,
    /// Lifetime of the in-flight placeholder
    pub placeholder_ttl: Duration,
    /// Lifetime of a prefetched result
    pub result_ttl: Duration,
    /// Bound on the prefetch request, capped at `placeholder_ttl`
    pub request_timeout: Duration,
    /// Wait before running anyway when the foreground never goes idle
    pub fallback_delay: Duration,
    /// Pause between idle opportunities
    pub interval: Duration,
}

impl Default for PrefetchConfig {
    fn default() -> Self {
        Self {
            candidate_terms: DEFAULT_CANDIDATE_TERMS
                .iter()
                .map(|t| t.to_string())
                .collect(),
            max_cache_size: 3,
            placeholder_ttl: Duration::from_secs(30),
            result_ttl: Duration::from_secs(3600),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            fallback_delay: Duration::from_secs(2),
            interval: Duration::from_secs(15),
        }
    }
}

// == Outcomes ==
/// Why a cycle did nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The store already holds `max_cache_size` entries or more
    CacheWarm,
    /// No usable current location
    NoLocation,
    /// The candidate list is empty
    NoCandidates,
    /// The key is already cached or claimed by another prefetch
    AlreadyCached,
}

/// Result of one prefetch cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrefetchOutcome {
    Skipped(SkipReason),
    /// The term's results were fetched and cached
    Populated { term: String, key: String },
    /// The request failed; the placeholder is left to expire
    Failed { term: String, key: String },
}

impl PrefetchConfig {
    /// Bound actually applied to a prefetch request.
    ///
    /// Never longer than the placeholder lives, so the claim covers the
    /// whole request.
    pub fn effective_timeout(&self) -> Duration {
        self.request_timeout.min(self.placeholder_ttl)
    }
}

// == In-Flight Claims ==
type InFlightKeys = Arc<Mutex<HashSet<String>>>;

/// Releases a claimed key when the request settles or the cycle is dropped.
struct Claim {
    keys: InFlightKeys,
    key: String,
}

impl Drop for Claim {
    fn drop(&mut self) {
        let mut keys = self.keys.lock().unwrap_or_else(|e| e.into_inner());
        keys.remove(&self.key);
    }
}

// == Coordinator ==
/// Best-effort background cache warmer.
#[derive(Clone)]
pub struct PrefetchCoordinator {
    cache: SearchCache,
    backend: Arc<dyn SearchBackend>,
    events: EventBus,
    config: PrefetchConfig,
    in_flight: InFlightKeys,
}

impl PrefetchCoordinator {
    pub fn new(
        cache: SearchCache,
        backend: Arc<dyn SearchBackend>,
        events: EventBus,
        config: PrefetchConfig,
    ) -> Self {
        Self {
            cache,
            backend,
            events,
            config,
            in_flight: Arc::default(),
        }
    }

    pub fn config(&self) -> &PrefetchConfig {
        &self.config
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    // == Run Cycle ==
    /// Runs one prefetch attempt around `location`.
    ///
    /// Never returns an error: failures are logged and surface only as a
    /// missing cache entry.
    pub async fn run_cycle(&self, location: Option<&Location>) -> PrefetchOutcome {
        let Some(location) = location.filter(|loc| loc.is_valid()) else {
            return PrefetchOutcome::Skipped(SkipReason::NoLocation);
        };

        let Some(term) = self
            .config
            .candidate_terms
            .choose(&mut rand::thread_rng())
            .cloned()
        else {
            return PrefetchOutcome::Skipped(SkipReason::NoCandidates);
        };

        let Some(key) = build_key(&term, Some(location)) else {
            return PrefetchOutcome::Skipped(SkipReason::NoCandidates);
        };
        let key = key.into_string();

        let _claim = {
            let mut cache = self.cache.write().await;

            if cache.len() >= self.config.max_cache_size {
                debug!(size = cache.len(), "cache warm enough, skipping prefetch");
                return PrefetchOutcome::Skipped(SkipReason::CacheWarm);
            }

            let mut in_flight = self.in_flight.lock().unwrap_or_else(|e| e.into_inner());
            if in_flight.contains(&key) || cache.has(&key) {
                debug!(key = %key, "key already owned, skipping prefetch");
                return PrefetchOutcome::Skipped(SkipReason::AlreadyCached);
            }

            cache.set(
                key.clone(),
                CachedSearch::InFlight,
                Some(self.config.placeholder_ttl),
            );
            in_flight.insert(key.clone());
            Claim {
                keys: self.in_flight.clone(),
                key: key.clone(),
            }
        };

        self.events.publish(PrefetchEvent::Started {
            term: term.clone(),
            key: key.clone(),
        });
        debug!(term = %term, key = %key, "prefetch started");

        let request = SearchRequest::new(term.clone(), location.clone());
        let result = fetch_with_timeout(
            self.backend.as_ref(),
            &request,
            self.config.effective_timeout(),
        )
        .await;

        let outcome = match result {
            Ok(ranked_results) => {
                self.cache.write().await.set(
                    key.clone(),
                    CachedSearch::Ready(ranked_results),
                    Some(self.config.result_ttl),
                );
                info!(term = %term, key = %key, "prefetched results cached");
                PrefetchOutcome::Populated {
                    term: term.clone(),
                    key: key.clone(),
                }
            }
            Err(e) => {
                debug!(term = %term, key = %key, error = %e, "prefetch failed");
                PrefetchOutcome::Failed {
                    term: term.clone(),
                    key: key.clone(),
                }
            }
        };

        self.events.publish(PrefetchEvent::Ended {
            term,
            key,
            success: matches!(outcome, PrefetchOutcome::Populated { .. }),
        });

        outcome
    }
}
