//! Search Module
//!
//! Contract with the remote search service and the foreground lookup path.

mod client;
mod models;
mod service;

#[cfg(test)]
pub(crate) mod testing;

pub use client::{
    fetch_with_timeout, interpret_envelope, HttpSearchClient, SearchBackend,
    DEFAULT_REQUEST_TIMEOUT, SEARCH_PATH,
};
pub use models::{
    CachedSearch, RankedResults, SearchCache, SearchData, SearchEnvelope, SearchRequest,
};
pub use service::{SearchOutcome, SearchService};
