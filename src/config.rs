//! Configuration Module
//!
//! Handles loading and managing configuration from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::prefetch::{PrefetchConfig, DEFAULT_CANDIDATE_TERMS};

/// Runtime configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// Base URL of the remote search service
    pub search_api_url: String,
    /// TTL in seconds for results cached by foreground searches
    pub default_ttl: u64,
    /// Bound in seconds on every search request
    pub request_timeout: u64,
    /// Terms the prefetcher chooses from
    pub prefetch_terms: Vec<String>,
    /// Prefetch only while the cache holds fewer entries than this
    pub prefetch_max_cache_size: usize,
    /// TTL in seconds of the prefetch placeholder
    pub prefetch_placeholder_ttl: u64,
    /// TTL in seconds of prefetched results
    pub prefetch_result_ttl: u64,
    /// Fallback delay in milliseconds when the foreground never goes idle
    pub prefetch_fallback_delay_ms: u64,
    /// Seconds between prefetch opportunities
    pub prefetch_interval: u64,
    /// Stats reporter polling interval in milliseconds
    pub stats_interval_ms: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `SEARCH_API_URL` - Search service base URL (default: http://127.0.0.1:5000)
    /// - `DEFAULT_TTL` - Foreground result TTL in seconds (default: 300)
    /// - `REQUEST_TIMEOUT` - Search request bound in seconds (default: 120)
    /// - `PREFETCH_TERMS` - Comma-separated prefetch candidates
    /// - `PREFETCH_MAX_CACHE_SIZE` - Prefetch size guard (default: 3)
    /// - `PREFETCH_PLACEHOLDER_TTL` - Placeholder TTL in seconds (default: 30)
    /// - `PREFETCH_RESULT_TTL` - Prefetched result TTL in seconds (default: 3600)
    /// - `PREFETCH_FALLBACK_DELAY_MS` - Idle fallback delay (default: 2000)
    /// - `PREFETCH_INTERVAL` - Seconds between prefetch cycles (default: 15)
    /// - `STATS_INTERVAL_MS` - Stats polling interval (default: 1000)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            server_port: env_or("SERVER_PORT", defaults.server_port),
            search_api_url: env::var("SEARCH_API_URL")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(defaults.search_api_url),
            default_ttl: env_or("DEFAULT_TTL", defaults.default_ttl),
            request_timeout: env_or("REQUEST_TIMEOUT", defaults.request_timeout),
            prefetch_terms: env::var("PREFETCH_TERMS")
                .ok()
                .map(|v| parse_terms(&v))
                .unwrap_or(defaults.prefetch_terms),
            prefetch_max_cache_size: env_or(
                "PREFETCH_MAX_CACHE_SIZE",
                defaults.prefetch_max_cache_size,
            ),
            prefetch_placeholder_ttl: env_or(
                "PREFETCH_PLACEHOLDER_TTL",
                defaults.prefetch_placeholder_ttl,
            ),
            prefetch_result_ttl: env_or("PREFETCH_RESULT_TTL", defaults.prefetch_result_ttl),
            prefetch_fallback_delay_ms: env_or(
                "PREFETCH_FALLBACK_DELAY_MS",
                defaults.prefetch_fallback_delay_ms,
            ),
            prefetch_interval: env_or("PREFETCH_INTERVAL", defaults.prefetch_interval),
            stats_interval_ms: env_or("STATS_INTERVAL_MS", defaults.stats_interval_ms),
        }
    }

    pub fn default_ttl(&self) -> Duration {
        Duration::from_secs(self.default_ttl)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }

    pub fn stats_interval(&self) -> Duration {
        Duration::from_millis(self.stats_interval_ms.max(1))
    }

    /// Prefetch tunables derived from this configuration.
    pub fn prefetch(&self) -> PrefetchConfig {
        PrefetchConfig {
            candidate_terms: self.prefetch_terms.clone(),
            max_cache_size: self.prefetch_max_cache_size,
            placeholder_ttl: Duration::from_secs(self.prefetch_placeholder_ttl),
            result_ttl: Duration::from_secs(self.prefetch_result_ttl),
            request_timeout: self.request_timeout(),
            fallback_delay: Duration::from_millis(self.prefetch_fallback_delay_ms),
            interval: Duration::from_secs(self.prefetch_interval),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 3000,
            search_api_url: "http://127.0.0.1:5000".to_string(),
            default_ttl: 300,
            request_timeout: 120,
            prefetch_terms: DEFAULT_CANDIDATE_TERMS
                .iter()
                .map(|t| t.to_string())
                .collect(),
            prefetch_max_cache_size: 3,
            prefetch_placeholder_ttl: 30,
            prefetch_result_ttl: 3600,
            prefetch_fallback_delay_ms: 2000,
            prefetch_interval: 15,
            stats_interval_ms: 1000,
        }
    }
}

fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

/// Splits a comma-separated term list, dropping blanks.
fn parse_terms(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}
