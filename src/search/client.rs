//! Search service client.
//!
//! [`SearchBackend`] is the seam between the cache and the remote search
//! service. Both the foreground path and the prefetcher talk to it through
//! [`fetch_with_timeout`], which enforces the caller-side time bound.

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::error::{Result, SearchError};

use super::models::{RankedResults, SearchEnvelope, SearchRequest};

/// Default bound on a single search request.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Path of the search endpoint on the remote service.
pub const SEARCH_PATH: &str = "/api/search";

// == Backend Trait ==
/// A remote search service.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    /// Runs one search. Implementations do not retry.
    async fn search(&self, request: &SearchRequest) -> Result<RankedResults>;
}

/// Runs `request` against `backend`, abandoning it after `timeout`.
pub async fn fetch_with_timeout(
    backend: &dyn SearchBackend,
    request: &SearchRequest,
    timeout: Duration,
) -> Result<RankedResults> {
    match tokio::time::timeout(timeout, backend.search(request)).await {
        Ok(result) => result,
        Err(_) => Err(SearchError::Timeout(timeout)),
    }
}

// == HTTP Client ==
/// [`SearchBackend`] over HTTP, posting JSON to `{base_url}/api/search`.
#[derive(Debug, Clone)]
pub struct HttpSearchClient {
    client: reqwest::Client,
    endpoint: String,
    timeout: Duration,
}

impl HttpSearchClient {
    /// Creates a client for the service rooted at `base_url` whose requests
    /// give up after `timeout`.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SearchError::Network(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self::with_client(client, base_url, timeout))
    }

    /// Creates a client reusing an existing reqwest client. `timeout` is the
    /// bound reported when that client times out.
    pub fn with_client(client: reqwest::Client, base_url: &str, timeout: Duration) -> Self {
        Self {
            client,
            endpoint: format!("{}{}", base_url.trim_end_matches('/'), SEARCH_PATH),
            timeout,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn map_transport_error(&self, err: reqwest::Error) -> SearchError {
        if err.is_timeout() {
            SearchError::Timeout(self.timeout)
        } else {
            SearchError::Network(err.to_string())
        }
    }
}

#[async_trait]
impl SearchBackend for HttpSearchClient {
    async fn search(&self, request: &SearchRequest) -> Result<RankedResults> {
        debug!(endpoint = %self.endpoint, query = %request.query, "sending search request");

        let response = self
            .client
            .post(&self.endpoint)
            .json(request)
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        let status = response.status();
        let body = response.bytes().await.map_err(|e| self.map_transport_error(e))?;

        let envelope: SearchEnvelope = serde_json::from_slice(&body).map_err(|e| {
            SearchError::Network(format!("unreadable response (HTTP {}): {}", status, e))
        })?;

        interpret_envelope(envelope)
    }
}

/// Turns a decoded response envelope into results or an application error.
pub fn interpret_envelope(envelope: SearchEnvelope) -> Result<RankedResults> {
    if !envelope.success {
        return Err(SearchError::Application(
            envelope
                .error
                .unwrap_or_else(|| "Search failed".to_string()),
        ));
    }

    envelope
        .data
        .map(|data| data.ranked_results)
        .ok_or_else(|| SearchError::Application("Search response missing data".to_string()))
}
