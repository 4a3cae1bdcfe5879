//! Session Module
//!
//! The caller's current search context: the last query and the last known
//! location. The prefetcher reads the location, the stats reporter reads
//! both to tell whether the current query is cached.

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::cache::{build_key, CacheKey, Location};

/// Session shared between handlers and background tasks.
pub type SharedSession = Arc<RwLock<SearchSession>>;

// == Search Session ==
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchSession {
    pub current_query: Option<String>,
    pub location: Option<Location>,
}

impl SearchSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_shared(self) -> SharedSession {
        Arc::new(RwLock::new(self))
    }

    /// Remembers the query and location of a search the caller issued.
    pub fn record_search(&mut self, query: &str, location: Option<Location>) {
        self.current_query = Some(query.to_string());
        if location.is_some() {
            self.location = location;
        }
    }

    pub fn set_location(&mut self, location: Location) {
        self.location = Some(location);
    }

    /// Key of the current query at the current location, if both are usable.
    pub fn current_key(&self) -> Option<CacheKey> {
        build_key(self.current_query.as_deref()?, self.location.as_ref())
    }
}
