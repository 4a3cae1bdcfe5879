//! Scripted search backend for unit tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Semaphore;

use crate::error::{Result, SearchError};

use super::client::SearchBackend;
use super::models::{RankedResults, SearchRequest};

/// Counts calls and answers with a fixed result. With a gate, each call
/// blocks until the test releases a permit.
pub(crate) struct MockBackend {
    calls: AtomicUsize,
    response: Mutex<Result<RankedResults>>,
    requests: Mutex<Vec<SearchRequest>>,
    gate: Option<Arc<Semaphore>>,
}

impl MockBackend {
    pub(crate) fn ok(results: RankedResults) -> Self {
        Self::with_response(Ok(results))
    }

    pub(crate) fn failing(err: SearchError) -> Self {
        Self::with_response(Err(err))
    }

    fn with_response(response: Result<RankedResults>) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            response: Mutex::new(response),
            requests: Mutex::new(Vec::new()),
            gate: None,
        }
    }

    /// Holds every call until a permit is added to the returned semaphore.
    pub(crate) fn gated(mut self) -> (Self, Arc<Semaphore>) {
        let gate = Arc::new(Semaphore::new(0));
        self.gate = Some(gate.clone());
        (self, gate)
    }

    pub(crate) fn set_response(&self, response: Result<RankedResults>) {
        *self.response.lock().unwrap() = response;
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub(crate) fn requests(&self) -> Vec<SearchRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl SearchBackend for MockBackend {
    async fn search(&self, request: &SearchRequest) -> Result<RankedResults> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request.clone());

        if let Some(gate) = &self.gate {
            gate.acquire().await.unwrap().forget();
        }

        self.response.lock().unwrap().clone()
    }
}
