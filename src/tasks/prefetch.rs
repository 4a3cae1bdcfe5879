//! Prefetch Task
//!
//! Background loop that hands the prefetch coordinator one idle opportunity
//! per interval.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::prefetch::{IdleScheduler, PrefetchCoordinator, PrefetchOutcome};
use crate::session::SharedSession;

/// Spawns the prefetch loop.
///
/// Each iteration sleeps for the coordinator's configured interval, waits for
/// the scheduler to report an idle opportunity, then runs a single cycle at
/// the session's current location. Cycle failures never stop the loop.
///
/// # Returns
/// A JoinHandle for the spawned task, which can be used to abort the task
/// during graceful shutdown.
pub fn spawn_prefetch_task(
    coordinator: PrefetchCoordinator,
    scheduler: Arc<dyn IdleScheduler>,
    session: SharedSession,
) -> JoinHandle<()> {
    let interval = coordinator.config().interval;

    tokio::spawn(async move {
        info!(
            "Starting prefetch task with interval of {} seconds",
            interval.as_secs()
        );

        loop {
            tokio::time::sleep(interval).await;
            scheduler.until_idle().await;

            let location = session.read().await.location.clone();
            match coordinator.run_cycle(location.as_ref()).await {
                PrefetchOutcome::Skipped(reason) => debug!(?reason, "prefetch skipped"),
                outcome => debug!(?outcome, "prefetch cycle finished"),
            }
        }
    })
}
