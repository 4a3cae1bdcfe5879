//! Search Cache - client-side result cache for location-based search
//!
//! Serves repeated searches from memory with bounded staleness and warms
//! the cache in the background using idle time.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod prefetch;
pub mod search;
pub mod session;
pub mod tasks;

pub use api::{AppState, BackgroundTasks};
pub use config::Config;
pub use error::SearchError;
pub use search::{HttpSearchClient, SearchService};
