//! API Handlers
//!
//! HTTP request handlers for each endpoint.

use std::sync::Arc;

use axum::{extract::State, Json};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::info;

use crate::cache::{CacheStore, Location};
use crate::config::Config;
use crate::error::Result;
use crate::models::{
    requests::validate_location, ClearResponse, HealthResponse, LocationResponse, SearchBody,
    SearchResponse,
};
use crate::prefetch::{ActivityScheduler, ActivityTracker, EventBus, PrefetchCoordinator};
use crate::search::{SearchBackend, SearchService};
use crate::session::{SearchSession, SharedSession};
use crate::tasks::{collect_status, spawn_prefetch_task, spawn_stats_reporter, CacheStatus};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Foreground search path, which owns the shared cache
    pub search: SearchService,
    /// Current query and location
    pub session: SharedSession,
    /// Latest snapshot from the stats reporter
    pub status: watch::Receiver<CacheStatus>,
}

impl AppState {
    /// Creates a new AppState.
    pub fn new(
        search: SearchService,
        session: SharedSession,
        status: watch::Receiver<CacheStatus>,
    ) -> Self {
        Self {
            search,
            session,
            status,
        }
    }

    /// Wires the cache, search path, prefetcher and stats reporter from
    /// configuration, spawning the background tasks.
    ///
    /// Must be called from within a tokio runtime.
    pub fn from_config(config: &Config, backend: Arc<dyn SearchBackend>) -> (Self, BackgroundTasks) {
        let cache = CacheStore::new(config.default_ttl()).into_shared();
        let session = SearchSession::new().into_shared();
        let activity = ActivityTracker::new();
        let events = EventBus::default();
        let prefetch = config.prefetch();

        let search = SearchService::new(
            cache.clone(),
            backend.clone(),
            activity.clone(),
            config.request_timeout(),
        );

        let scheduler = Arc::new(ActivityScheduler::new(activity, prefetch.fallback_delay));
        let coordinator = PrefetchCoordinator::new(cache.clone(), backend, events.clone(), prefetch);
        let prefetch_handle = spawn_prefetch_task(coordinator, scheduler, session.clone());

        let (stats_handle, status) =
            spawn_stats_reporter(cache, session.clone(), &events, config.stats_interval());

        let tasks = BackgroundTasks {
            prefetch: prefetch_handle,
            stats: stats_handle,
        };
        (Self::new(search, session, status), tasks)
    }
}

/// Handles of the tasks spawned by [`AppState::from_config`].
#[derive(Debug)]
pub struct BackgroundTasks {
    pub prefetch: JoinHandle<()>,
    pub stats: JoinHandle<()>,
}

impl BackgroundTasks {
    /// Stops both tasks.
    pub fn abort(&self) {
        self.prefetch.abort();
        self.stats.abort();
    }
}

/// Handler for POST /api/search
///
/// Serves the search from the cache when possible. The query and location
/// become the session's current context either way.
pub async fn search_handler(
    State(state): State<AppState>,
    Json(body): Json<SearchBody>,
) -> Result<Json<SearchResponse>> {
    let query = body.query().trim().to_string();

    if !query.is_empty() {
        state
            .session
            .write()
            .await
            .record_search(&query, body.location.clone().filter(Location::is_valid));
    }

    let outcome = state.search.search(&query, body.location.as_ref()).await?;

    Ok(Json(SearchResponse::new(
        query,
        outcome.location,
        outcome.ranked_results,
        outcome.cached,
    )))
}

/// Handler for GET /api/cache/stats
///
/// Counts are computed on demand; the prefetch flag comes from the
/// stats reporter.
pub async fn stats_handler(State(state): State<AppState>) -> Json<CacheStatus> {
    let mut status = collect_status(state.search.cache(), &state.session).await;
    status.prefetching = state.status.borrow().prefetching;

    Json(status)
}

/// Handler for DELETE /api/cache
pub async fn clear_handler(State(state): State<AppState>) -> Json<ClearResponse> {
    let cleared = {
        let mut cache = state.search.cache().write().await;
        let count = cache.len();
        cache.clear();
        count
    };

    info!(cleared, "cache cleared");
    Json(ClearResponse::new(cleared))
}

/// Handler for PUT /api/location
///
/// Updates the location used by background prefetch.
pub async fn location_handler(
    State(state): State<AppState>,
    Json(location): Json<Location>,
) -> Result<Json<LocationResponse>> {
    validate_location(&location)?;

    state.session.write().await.set_location(location.clone());
    Ok(Json(LocationResponse::new(location)))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
