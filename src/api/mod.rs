//! API Module
//!
//! HTTP handlers and routing that let a UI drive the cache.
//!
//! # Endpoints
//! - `POST /api/search` - Cached search around a location
//! - `GET /api/cache/stats` - Cache counts and current-query status
//! - `DELETE /api/cache` - Clear the cache
//! - `PUT /api/location` - Update the prefetch location
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
