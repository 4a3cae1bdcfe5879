//! Background Tasks Module
//!
//! Contains background tasks that run periodically for the lifetime of the
//! session.
//!
//! # Tasks
//! - Prefetch: warms the cache on idle opportunities
//! - Stats reporter: publishes cache status snapshots for display

mod prefetch;
mod stats_reporter;

pub use prefetch::spawn_prefetch_task;
pub use stats_reporter::{collect_status, spawn_stats_reporter, CacheStatus};
