//! Prefetch Module
//!
//! Background cache warming: the coordinator, its event bus, and the idle
//! scheduling it runs on.

mod coordinator;
mod events;
mod scheduler;

pub use coordinator::{
    PrefetchConfig, PrefetchCoordinator, PrefetchOutcome, SkipReason, DEFAULT_CANDIDATE_TERMS,
};
pub use events::{EventBus, PrefetchEvent};
pub use scheduler::{
    ActivityGuard, ActivityScheduler, ActivityTracker, DelayScheduler, IdleScheduler,
};
