//! Response DTOs for the HTTP API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::cache::Location;
use crate::search::RankedResults;

/// Payload of a successful search
#[derive(Debug, Clone, Serialize)]
pub struct SearchResponseData {
    /// The query as submitted
    pub query: String,
    /// The location searched around
    pub location: Location,
    /// Opaque ranked result set from the search service
    pub ranked_results: RankedResults,
}

/// Response body for POST /api/search
#[derive(Debug, Clone, Serialize)]
pub struct SearchResponse {
    pub success: bool,
    pub data: SearchResponseData,
    /// True when served from the cache
    pub cached: bool,
}

impl SearchResponse {
    /// Creates a successful SearchResponse
    pub fn new(
        query: impl Into<String>,
        location: Location,
        ranked_results: RankedResults,
        cached: bool,
    ) -> Self {
        Self {
            success: true,
            data: SearchResponseData {
                query: query.into(),
                location,
                ranked_results,
            },
            cached,
        }
    }
}

/// Response body for DELETE /api/cache
#[derive(Debug, Clone, Serialize)]
pub struct ClearResponse {
    pub success: bool,
    pub message: String,
    /// Number of entries removed, stale ones included
    pub cleared: usize,
}

impl ClearResponse {
    pub fn new(cleared: usize) -> Self {
        Self {
            success: true,
            message: format!("Cleared {} cache entries", cleared),
            cleared,
        }
    }
}

/// Response body for PUT /api/location
#[derive(Debug, Clone, Serialize)]
pub struct LocationResponse {
    pub success: bool,
    pub location: Location,
}

impl LocationResponse {
    pub fn new(location: Location) -> Self {
        Self {
            success: true,
            location,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    /// Error message describing what went wrong
    pub error: String,
    /// Machine-readable error code
    pub error_code: String,
    /// Whether repeating the same request might succeed
    pub retryable: bool,
}

impl ErrorResponse {
    /// Creates a new ErrorResponse
    pub fn new(error: impl Into<String>, error_code: impl Into<String>, retryable: bool) -> Self {
        Self {
            success: false,
            error: error.into(),
            error_code: error_code.into(),
            retryable,
        }
    }
}
