//! Foreground search path: cache lookup first, network on a miss.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::cache::{build_key, CacheKey, Location};
use crate::error::{Result, SearchError};
use crate::prefetch::ActivityTracker;

use super::client::{fetch_with_timeout, SearchBackend};
use super::models::{CachedSearch, RankedResults, SearchCache, SearchRequest};

// == Search Outcome ==
/// Result of a foreground search.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOutcome {
    pub key: CacheKey,
    /// The validated location the key was built from
    pub location: Location,
    pub ranked_results: RankedResults,
    /// True when served from the cache without a network call
    pub cached: bool,
}

// == Search Service ==
/// Serves searches from the cache, falling back to the search service.
///
/// Successful network results are cached at the store's default TTL.
/// Failures are returned to the caller and never cached.
#[derive(Clone)]
pub struct SearchService {
    cache: SearchCache,
    backend: Arc<dyn SearchBackend>,
    activity: ActivityTracker,
    timeout: Duration,
}

impl SearchService {
    pub fn new(
        cache: SearchCache,
        backend: Arc<dyn SearchBackend>,
        activity: ActivityTracker,
        timeout: Duration,
    ) -> Self {
        Self {
            cache,
            backend,
            activity,
            timeout,
        }
    }

    pub fn cache(&self) -> &SearchCache {
        &self.cache
    }

    pub fn activity(&self) -> &ActivityTracker {
        &self.activity
    }

    // == Search ==
    /// Looks `query` up near `location`.
    ///
    /// A cached result is returned as is, without refreshing its TTL. A
    /// prefetch placeholder counts as a miss.
    pub async fn search(&self, query: &str, location: Option<&Location>) -> Result<SearchOutcome> {
        let (key, location) = resolve(query, location)?;

        let hit = self
            .cache
            .write()
            .await
            .get(key.as_str())
            .and_then(CachedSearch::ready);

        if let Some(ranked_results) = hit {
            debug!(key = %key, "cache hit");
            return Ok(SearchOutcome {
                key,
                location: location.clone(),
                ranked_results,
                cached: true,
            });
        }

        debug!(key = %key, "cache miss, querying search service");
        let request = SearchRequest::new(query.trim(), location.clone());

        let result = {
            let _busy = self.activity.begin();
            fetch_with_timeout(self.backend.as_ref(), &request, self.timeout).await
        };

        match result {
            Ok(ranked_results) => {
                self.cache.write().await.set(
                    key.as_str(),
                    CachedSearch::Ready(ranked_results.clone()),
                    None,
                );
                info!(key = %key, "search result cached");
                Ok(SearchOutcome {
                    key,
                    location: location.clone(),
                    ranked_results,
                    cached: false,
                })
            }
            Err(e) => {
                warn!(key = %key, error = %e, "search failed");
                Err(e)
            }
        }
    }
}

/// Builds the cache key, explaining why when none can be built.
fn resolve<'a>(query: &str, location: Option<&'a Location>) -> Result<(CacheKey, &'a Location)> {
    if query.trim().is_empty() {
        return Err(SearchError::CannotSearch(
            "Search query is required".to_string(),
        ));
    }

    let location = location.ok_or_else(|| {
        SearchError::CannotSearch("Location data is required".to_string())
    })?;

    let key = build_key(query, Some(location)).ok_or_else(|| {
        SearchError::CannotSearch("Valid location coordinates are required".to_string())
    })?;

    Ok((key, location))
}
