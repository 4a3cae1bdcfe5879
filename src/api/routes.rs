//! API Routes
//!
//! Configures the Axum router with all endpoints.

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    clear_handler, health_handler, location_handler, search_handler, stats_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `POST /api/search` - Cached search around a location
/// - `GET /api/cache/stats` - Cache counts and current-query status
/// - `DELETE /api/cache` - Clear the cache
/// - `PUT /api/location` - Update the location used for prefetch
/// - `GET /health` - Health check endpoint
///
/// # Middleware
/// - CORS: Allows any origin, for a browser UI served elsewhere
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    // Configure CORS middleware
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/search", post(search_handler))
        .route("/api/cache/stats", get(stats_handler))
        .route("/api/cache", delete(clear_handler))
        .route("/api/location", put(location_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
