//! Error types for the search cache
//!
//! Provides unified error handling using thiserror.

use std::time::Duration;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

// == Search Error Enum ==
/// Failure of a search attempt. None of these are ever written to the cache.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SearchError {
    /// The search service did not answer within the bound
    #[error("Search timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    /// Transport-level failure reaching the search service
    #[error("Network error: {0}")]
    Network(String),

    /// The search service answered with `success: false`
    #[error("{0}")]
    Application(String),

    /// Query or location missing, so no search can be issued
    #[error("Cannot search: {0}")]
    CannotSearch(String),

    /// Malformed request to this service
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl SearchError {
    /// Returns true if repeating the same search might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            SearchError::Timeout(_) | SearchError::Network(_) | SearchError::Application(_)
        )
    }

    /// Machine-readable error code for response bodies.
    pub fn code(&self) -> &'static str {
        match self {
            SearchError::Timeout(_) => "SEARCH_TIMEOUT",
            SearchError::Network(_) => "NETWORK_ERROR",
            SearchError::Application(_) => "SEARCH_ERROR",
            SearchError::CannotSearch(_) => "CANNOT_SEARCH",
            SearchError::InvalidRequest(_) => "INVALID_REQUEST",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            SearchError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            SearchError::Network(_) | SearchError::Application(_) => StatusCode::BAD_GATEWAY,
            SearchError::CannotSearch(_) | SearchError::InvalidRequest(_) => {
                StatusCode::BAD_REQUEST
            }
        }
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for SearchError {
    fn into_response(self) -> Response {
        let body = Json(ErrorResponse::new(
            self.to_string(),
            self.code(),
            self.is_retryable(),
        ));

        (self.status(), body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for search operations.
pub type Result<T> = std::result::Result<T, SearchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_application_error_is_verbatim() {
        let err = SearchError::Application("Search failed: quota exceeded".to_string());
        assert_eq!(err.to_string(), "Search failed: quota exceeded");
    }

    #[test]
    fn test_timeout_message() {
        let err = SearchError::Timeout(Duration::from_secs(120));
        assert_eq!(err.to_string(), "Search timed out after 120s");
    }

    #[test]
    fn test_retryable_classification() {
        assert!(SearchError::Timeout(Duration::from_secs(1)).is_retryable());
        assert!(SearchError::Network("reset".into()).is_retryable());
        assert!(SearchError::Application("nope".into()).is_retryable());
        assert!(!SearchError::CannotSearch("no location".into()).is_retryable());
        assert!(!SearchError::InvalidRequest("bad".into()).is_retryable());
    }

    #[test]
    fn test_status_mapping() {
        let resp = SearchError::Timeout(Duration::from_secs(1)).into_response();
        assert_eq!(resp.status(), StatusCode::GATEWAY_TIMEOUT);

        let resp = SearchError::Application("x".into()).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);

        let resp = SearchError::CannotSearch("x".into()).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_response_body_flags_retryable() {
        let resp = SearchError::Timeout(Duration::from_secs(120)).into_response();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["error_code"], "SEARCH_TIMEOUT");
        assert_eq!(json["retryable"], true);

        let resp = SearchError::CannotSearch("no location".into()).into_response();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["retryable"], false);
    }
}
