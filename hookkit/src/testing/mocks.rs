//! Mock fetchers for testing extractors without a network.

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use super::fixtures::envelope;
use crate::cancellation::CancellationToken;
use crate::errors::ExtractorError;
use crate::extractor::{ExtractorFetcher, ExtractorRequest};

type Responder = Box<dyn Fn(&ExtractorRequest) -> Result<Value, ExtractorError> + Send + Sync>;

/// A fetcher that records requests and answers from a closure.
///
/// With a delay configured, each call sleeps on the Tokio clock first and
/// settles with [`ExtractorError::Aborted`] if its token fires meanwhile,
/// unless cancellation is ignored.
pub struct MockFetcher {
    responder: Responder,
    delay: Duration,
    honor_cancellation: bool,
    requests: Mutex<Vec<ExtractorRequest>>,
    aborted: AtomicUsize,
}

impl MockFetcher {
    /// Creates a fetcher answering with `responder`.
    pub fn new<F>(responder: F) -> Self
    where
        F: Fn(&ExtractorRequest) -> Result<Value, ExtractorError> + Send + Sync + 'static,
    {
        Self {
            responder: Box::new(responder),
            delay: Duration::ZERO,
            honor_cancellation: true,
            requests: Mutex::new(Vec::new()),
            aborted: AtomicUsize::new(0),
        }
    }

    /// Creates a fetcher answering every request with `payload` wrapped in
    /// a 200 envelope for the requested URL.
    #[must_use]
    pub fn with_payload(payload: Value) -> Self {
        Self::new(move |request| Ok(envelope(&request.url, payload.clone())))
    }

    /// Creates a fetcher failing every request with `error`.
    #[must_use]
    pub fn failing(error: ExtractorError) -> Self {
        Self::new(move |_| Err(error.clone()))
    }

    /// Delays every response.
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Delays every response by `ms` milliseconds.
    #[must_use]
    pub fn with_delay_ms(self, ms: u64) -> Self {
        self.with_delay(Duration::from_millis(ms))
    }

    /// Keeps answering after the token fires.
    #[must_use]
    pub fn ignoring_cancellation(mut self) -> Self {
        self.honor_cancellation = false;
        self
    }

    /// Returns the number of requests received.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.requests.lock().len()
    }

    /// Returns the requests in arrival order.
    #[must_use]
    pub fn requests(&self) -> Vec<ExtractorRequest> {
        self.requests.lock().clone()
    }

    /// Returns the number of requests that settled as aborted.
    #[must_use]
    pub fn aborted_count(&self) -> usize {
        self.aborted.load(Ordering::SeqCst)
    }

    /// Resets call tracking.
    pub fn reset(&self) {
        self.requests.lock().clear();
        self.aborted.store(0, Ordering::SeqCst);
    }
}

impl std::fmt::Debug for MockFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockFetcher")
            .field("delay", &self.delay)
            .field("honor_cancellation", &self.honor_cancellation)
            .field("calls", &self.call_count())
            .finish()
    }
}

#[async_trait]
impl ExtractorFetcher for MockFetcher {
    async fn fetch(
        &self,
        request: &ExtractorRequest,
        cancel: &CancellationToken,
    ) -> Result<Value, ExtractorError> {
        self.requests.lock().push(request.clone());

        if self.honor_cancellation {
            tokio::select! {
                biased;
                () = cancel.cancelled() => {
                    self.aborted.fetch_add(1, Ordering::SeqCst);
                    return Err(ExtractorError::Aborted);
                }
                () = tokio::time::sleep(self.delay) => {}
            }
        } else {
            tokio::time::sleep(self.delay).await;
        }

        (self.responder)(request)
    }
}
