//! Stats Reporter Task
//!
//! Polls the cache on a fixed interval and publishes a display snapshot.
//! The only way it can change the cache is the lazy eviction done by the
//! `has()` check on the current query's key.

use std::time::Duration;

use serde::Serialize;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use crate::cache::CacheStats;
use crate::prefetch::{EventBus, PrefetchEvent};
use crate::search::SearchCache;
use crate::session::SharedSession;

// == Cache Status ==
/// What a passive cache indicator shows.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CacheStatus {
    #[serde(flatten)]
    pub stats: CacheStats,
    /// Whether the session's current query is cached; None without one
    pub current_query_cached: Option<bool>,
    /// True while at least one prefetch request is outstanding
    pub prefetching: bool,
}

/// Computes cache counts and the current query's cache status.
pub async fn collect_status(cache: &SearchCache, session: &SharedSession) -> CacheStatus {
    let current_key = session.read().await.current_key();

    let (stats, current_query_cached) = {
        let mut cache = cache.write().await;
        let stats = cache.stats();
        let cached = current_key.map(|key| cache.has(key.as_str()));
        (stats, cached)
    };

    CacheStatus {
        stats,
        current_query_cached,
        prefetching: false,
    }
}

/// Spawns the reporter.
///
/// Every `interval` the task recomputes the [`CacheStatus`] and publishes it
/// on the returned watch channel. Prefetch events keep the `prefetching` flag
/// current between polls.
///
/// # Returns
/// The task handle, for aborting on shutdown, and the status receiver.
pub fn spawn_stats_reporter(
    cache: SearchCache,
    session: SharedSession,
    events: &EventBus,
    interval: Duration,
) -> (JoinHandle<()>, watch::Receiver<CacheStatus>) {
    let (tx, rx) = watch::channel(CacheStatus::default());
    let mut event_rx = events.subscribe();

    let handle = tokio::spawn(async move {
        info!(
            "Starting stats reporter with interval of {}ms",
            interval.as_millis()
        );

        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut in_flight: usize = 0;
        let mut events_open = true;

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let mut status = collect_status(&cache, &session).await;
                    status.prefetching = in_flight > 0;
                    tx.send_replace(status);
                }
                event = event_rx.recv(), if events_open => {
                    match event {
                        Ok(PrefetchEvent::Started { .. }) => in_flight += 1,
                        Ok(PrefetchEvent::Ended { .. }) => in_flight = in_flight.saturating_sub(1),
                        Err(broadcast::error::RecvError::Lagged(skipped)) => {
                            debug!(skipped, "stats reporter lagged behind prefetch events");
                            continue;
                        }
                        Err(broadcast::error::RecvError::Closed) => {
                            events_open = false;
                            continue;
                        }
                    }
                    let prefetching = in_flight > 0;
                    tx.send_modify(|status| status.prefetching = prefetching);
                }
            }
        }
    });

    (handle, rx)
}
