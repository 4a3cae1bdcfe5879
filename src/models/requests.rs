//! Request DTOs for the HTTP API
//!
//! Defines the structure of incoming HTTP request bodies.

use serde::Deserialize;

use crate::cache::Location;
use crate::error::SearchError;

/// Request body for POST /api/search
///
/// Both fields are optional at the wire level so that a missing query or
/// location is reported as "cannot search" rather than a decoding failure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchBody {
    /// Free-text query
    #[serde(default)]
    pub query: Option<String>,
    /// Where to search around
    #[serde(default)]
    pub location: Option<Location>,
}

impl SearchBody {
    /// The query text, empty when absent.
    pub fn query(&self) -> &str {
        self.query.as_deref().unwrap_or_default()
    }
}

/// Validates the body of PUT /api/location.
pub fn validate_location(location: &Location) -> Result<(), SearchError> {
    if location.is_valid() {
        Ok(())
    } else {
        Err(SearchError::InvalidRequest(
            "Valid location coordinates are required".to_string(),
        ))
    }
}
