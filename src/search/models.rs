//! Wire types for the remote search service, plus the payload stored in the
//! cache for each search key.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::cache::{Location, SharedCache};

/// Ranked result set returned by the search service. Opaque to the cache.
pub type RankedResults = Value;

/// Cache shared by all search collaborators.
pub type SearchCache = SharedCache<CachedSearch>;

// == Request ==
/// Body sent to the search service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchRequest {
    pub query: String,
    pub location: Location,
}

impl SearchRequest {
    pub fn new(query: impl Into<String>, location: Location) -> Self {
        Self {
            query: query.into(),
            location,
        }
    }
}

// == Response ==
/// Envelope of every search service response.
///
/// `{ success: true, data: { ranked_results } }` or
/// `{ success: false, error }`.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchEnvelope {
    pub success: bool,
    #[serde(default)]
    pub data: Option<SearchData>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub error_code: Option<String>,
}

/// Success payload. Other fields the service includes are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchData {
    pub ranked_results: RankedResults,
}

// == Cached Payload ==
/// What the cache holds for a search key.
#[derive(Debug, Clone, PartialEq)]
pub enum CachedSearch {
    /// Placeholder claimed by the prefetcher while its request is in flight
    InFlight,
    /// Resolved result set
    Ready(RankedResults),
}

impl CachedSearch {
    /// Returns the result set, or None for a placeholder.
    pub fn ready(self) -> Option<RankedResults> {
        match self {
            CachedSearch::Ready(results) => Some(results),
            CachedSearch::InFlight => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_serializes_location_inline() {
        let req = SearchRequest::new("coffee", Location::new(37.7749, -122.4194));
        let json = serde_json::to_value(&req).unwrap();

        assert_eq!(json["query"], "coffee");
        assert_eq!(json["location"]["latitude"], 37.7749);
        assert_eq!(json["location"]["longitude"], -122.4194);
    }

    #[test]
    fn test_success_envelope() {
        let body = r#"{
            "success": true,
            "data": {"query": "coffee", "ranked_results": {"ranked_places": [1, 2]}},
            "meta": {"total_ranked": 2}
        }"#;
        let env: SearchEnvelope = serde_json::from_str(body).unwrap();

        assert!(env.success);
        assert_eq!(
            env.data.unwrap().ranked_results,
            json!({"ranked_places": [1, 2]})
        );
    }

    #[test]
    fn test_failure_envelope() {
        let body = r#"{"success": false, "error": "Search failed: boom", "error_code": "SEARCH_ERROR"}"#;
        let env: SearchEnvelope = serde_json::from_str(body).unwrap();

        assert!(!env.success);
        assert!(env.data.is_none());
        assert_eq!(env.error.as_deref(), Some("Search failed: boom"));
        assert_eq!(env.error_code.as_deref(), Some("SEARCH_ERROR"));
    }

    #[test]
    fn test_placeholder_is_not_ready() {
        assert!(CachedSearch::InFlight.ready().is_none());
        assert_eq!(CachedSearch::Ready(json!([1])).ready(), Some(json!([1])));
    }
}
