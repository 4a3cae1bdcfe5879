//! Idle-time scheduling for background prefetch.
//!
//! The foreground path marks itself busy through an [`ActivityTracker`]; an
//! [`IdleScheduler`] decides when the prefetcher may run.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::watch;
use tracing::trace;

// == Activity Tracker ==
/// Counts foreground searches currently waiting on the network.
#[derive(Debug, Clone)]
pub struct ActivityTracker {
    in_flight: Arc<watch::Sender<usize>>,
}

impl ActivityTracker {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(0);
        Self {
            in_flight: Arc::new(tx),
        }
    }

    /// Marks one unit of foreground work; it ends when the guard drops.
    pub fn begin(&self) -> ActivityGuard {
        self.in_flight.send_modify(|n| *n += 1);
        ActivityGuard {
            in_flight: self.in_flight.clone(),
        }
    }

    pub fn in_flight(&self) -> usize {
        *self.in_flight.borrow()
    }

    pub fn is_idle(&self) -> bool {
        self.in_flight() == 0
    }

    /// Resolves as soon as no foreground work is in flight.
    pub async fn wait_idle(&self) {
        let mut rx = self.in_flight.subscribe();
        // The sender lives in `self`, so the channel cannot close here
        let _ = rx.wait_for(|n| *n == 0).await;
    }
}

impl Default for ActivityTracker {
    fn default() -> Self {
        Self::new()
    }
}

/// Guard returned by [`ActivityTracker::begin`].
#[derive(Debug)]
pub struct ActivityGuard {
    in_flight: Arc<watch::Sender<usize>>,
}

impl Drop for ActivityGuard {
    fn drop(&mut self) {
        self.in_flight.send_modify(|n| *n = n.saturating_sub(1));
    }
}

// == Idle Scheduler ==
/// Decides when background work may start.
#[async_trait]
pub trait IdleScheduler: Send + Sync {
    /// Resolves at the next opportunity to run background work.
    async fn until_idle(&self);
}

/// Runs after a fixed delay, regardless of foreground activity.
#[derive(Debug, Clone)]
pub struct DelayScheduler {
    delay: Duration,
}

impl DelayScheduler {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait]
impl IdleScheduler for DelayScheduler {
    async fn until_idle(&self) {
        tokio::time::sleep(self.delay).await;
    }
}

/// Runs once the foreground is idle, or after `fallback` if it never is.
#[derive(Debug, Clone)]
pub struct ActivityScheduler {
    activity: ActivityTracker,
    fallback: Duration,
}

impl ActivityScheduler {
    pub fn new(activity: ActivityTracker, fallback: Duration) -> Self {
        Self { activity, fallback }
    }
}

#[async_trait]
impl IdleScheduler for ActivityScheduler {
    async fn until_idle(&self) {
        if tokio::time::timeout(self.fallback, self.activity.wait_idle())
            .await
            .is_err()
        {
            trace!(
                fallback_ms = self.fallback.as_millis() as u64,
                "foreground still busy, running after fallback delay"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::Instant;

    #[test]
    fn test_guard_tracks_in_flight() {
        let tracker = ActivityTracker::new();
        assert!(tracker.is_idle());

        let a = tracker.begin();
        let b = tracker.clone().begin();
        assert_eq!(tracker.in_flight(), 2);

        drop(a);
        assert_eq!(tracker.in_flight(), 1);
        drop(b);
        assert!(tracker.is_idle());
    }

    #[tokio::test(start_paused = true)]
    async fn test_activity_scheduler_runs_immediately_when_idle() {
        let scheduler = ActivityScheduler::new(ActivityTracker::new(), Duration::from_secs(2));

        let start = Instant::now();
        scheduler.until_idle().await;
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_activity_scheduler_waits_for_foreground() {
        let tracker = ActivityTracker::new();
        let scheduler = ActivityScheduler::new(tracker.clone(), Duration::from_secs(10));
        let guard = tracker.begin();

        let release = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(3)).await;
            drop(guard);
        });

        let start = Instant::now();
        scheduler.until_idle().await;
        assert_eq!(start.elapsed(), Duration::from_secs(3));
        release.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_activity_scheduler_falls_back_after_delay() {
        let tracker = ActivityTracker::new();
        let scheduler = ActivityScheduler::new(tracker.clone(), Duration::from_secs(2));
        let _busy = tracker.begin();

        let start = Instant::now();
        scheduler.until_idle().await;
        assert_eq!(start.elapsed(), Duration::from_secs(2));
    }

    #[tokio::test(start_paused = true)]
    async fn test_delay_scheduler() {
        let scheduler = DelayScheduler::new(Duration::from_millis(500));

        let start = Instant::now();
        scheduler.until_idle().await;
        assert_eq!(start.elapsed(), Duration::from_millis(500));
    }
}
