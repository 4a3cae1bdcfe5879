//! Cache Module
//!
//! Provides the in-memory result cache: TTL entries with lazy expiration,
//! an injectable clock, and the (query, location) key builder.

mod clock;
mod entry;
mod key;
mod stats;
mod store;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use clock::{Clock, ManualClock, SystemClock};
pub use entry::CacheEntry;
pub use key::{build_key, normalize_query, CacheKey, Location, COORDINATE_PRECISION};
pub use stats::CacheStats;
pub use store::{CacheStore, SharedCache};
