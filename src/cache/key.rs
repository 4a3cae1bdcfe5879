//! Cache Key Module
//!
//! Turns a (query, location) pair into a cache key. Coordinates are rounded
//! to three decimal places (roughly 100 m) so that sensor jitter between
//! runs still lands on the same entry.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Decimal places kept from each coordinate.
pub const COORDINATE_PRECISION: i32 = 3;

// == Location ==
/// A geographic position as sent to the search service.
///
/// Fields other than latitude/longitude (accuracy, address, ...) are carried
/// through untouched but never influence the key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Location {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            extra: Map::new(),
        }
    }

    /// Returns true if both coordinates are finite and within range.
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}

// == Cache Key ==
/// Opaque key of the form `search_{query}_{lat}_{lon}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CacheKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// == Normalization ==
/// Trims and lowercases query text.
pub fn normalize_query(query: &str) -> String {
    query.trim().to_lowercase()
}

/// Rounds a coordinate to the bucket precision, half away from zero.
fn bucket(coordinate: f64) -> String {
    let scale = 10f64.powi(COORDINATE_PRECISION);
    // `+ 0.0` folds -0.0 into 0.0
    let rounded = (coordinate * scale).round() / scale + 0.0;
    format!("{:.*}", COORDINATE_PRECISION as usize, rounded)
}

// == Build Key ==
/// Builds the cache key for a search.
///
/// Returns `None` when the query is blank, the location is missing, or the
/// coordinates are out of range; such searches must bypass the cache.
pub fn build_key(query: &str, location: Option<&Location>) -> Option<CacheKey> {
    let query = normalize_query(query);
    if query.is_empty() {
        return None;
    }

    let location = location.filter(|loc| loc.is_valid())?;

    Some(CacheKey(format!(
        "search_{}_{}_{}",
        query,
        bucket(location.latitude),
        bucket(location.longitude)
    )))
}
