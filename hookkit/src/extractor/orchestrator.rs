//! The website extractor orchestrator.
//!
//! [`WebsiteExtractor`] turns a changing URL into a published
//! [`ExtractorState`]: URL input settles through a debounce stage, each
//! evaluation supersedes the previous request, successful results are
//! cached per request key, and `refresh()` calls coalesce into one forced
//! fetch.

use parking_lot::Mutex;
use serde_json::Value;
use std::sync::{Arc, Weak};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::cache::{CachedExtract, ExtractorCache, RequestKey};
use super::client::{ExtractorFetcher, ExtractorRequest};
use super::config::ExtractorOptions;
use super::endpoints::ExtractorEndpoint;
use super::envelope::{split_envelope, WebsiteExtractMeta};
use crate::cancellation::CancellationToken;
use crate::errors::ExtractorError;
use crate::observability::SpanTimer;
use crate::timing::{DebounceOptions, DebouncedValue, Debouncer};

/// Published state of an extractor.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractorState<D> {
    /// Whether a request is in flight.
    pub loading: bool,
    /// Data of the last successful request.
    pub data: Option<D>,
    /// Full response of the last successful request.
    pub raw: Option<Value>,
    /// Metadata of the last successful request.
    pub meta: Option<WebsiteExtractMeta>,
    /// Error of the last failed request.
    pub error: Option<ExtractorError>,
}

impl<D> ExtractorState<D> {
    /// The quiescent state: nothing loading, nothing held.
    #[must_use]
    pub fn idle() -> Self {
        Self {
            loading: false,
            data: None,
            raw: None,
            meta: None,
            error: None,
        }
    }

    fn from_cached(entry: CachedExtract<D>) -> Self {
        Self {
            loading: false,
            data: Some(entry.data),
            raw: Some(entry.raw),
            meta: Some(entry.meta),
            error: None,
        }
    }
}

impl<D> Default for ExtractorState<D> {
    fn default() -> Self {
        Self::idle()
    }
}

struct InFlight {
    id: u64,
    token: Arc<CancellationToken>,
}

struct Control {
    options: ExtractorOptions,
    /// URL as delivered by the debounce stage.
    settled_url: String,
    refresh_token: u64,
    refresh_handled: u64,
    in_flight: Option<InFlight>,
    next_request_id: u64,
    disposed: bool,
}

impl Control {
    fn abort_in_flight(&mut self, reason: &str) {
        if let Some(previous) = self.in_flight.take() {
            previous.token.cancel(reason);
        }
    }
}

struct ExtractorCore<E: ExtractorEndpoint> {
    endpoint: E,
    fetcher: Arc<dyn ExtractorFetcher>,
    control: Mutex<Control>,
    cache: ExtractorCache<E::Data>,
    state: watch::Sender<ExtractorState<E::Data>>,
}

impl<E: ExtractorEndpoint> ExtractorCore<E> {
    /// Runs one evaluation cycle. State is only written under the control
    /// lock, so publications are totally ordered.
    fn evaluate(self: &Arc<Self>, control: &mut Control) {
        if control.disposed {
            return;
        }
        control.abort_in_flight("superseded");

        let url = control.settled_url.clone();
        if !control.options.enabled || url.is_empty() {
            self.state.send_replace(ExtractorState::idle());
            return;
        }
        if self.endpoint.should_skip(&url) {
            debug!(endpoint = self.endpoint.name(), "URL matches skip list, not requesting");
            self.state.send_replace(ExtractorState::idle());
            return;
        }

        let request = ExtractorRequest {
            endpoint: self.endpoint.name().to_string(),
            url,
            api_key: control.options.api_key.clone(),
            base_url: control.options.base_url.clone(),
        };
        let key = request.key();

        let forced = control.refresh_token != control.refresh_handled;
        if forced {
            control.refresh_handled = control.refresh_token;
        }

        let cache_enabled = control.options.cache;
        if cache_enabled && !forced {
            if let Some(entry) = self.cache.get(&key) {
                debug!(endpoint = self.endpoint.name(), key = %key.digest(), "Serving extractor result from cache");
                self.state.send_replace(ExtractorState::from_cached(entry));
                return;
            }
        }

        control.next_request_id += 1;
        let id = control.next_request_id;
        let token = Arc::new(CancellationToken::new());
        control.in_flight = Some(InFlight {
            id,
            token: Arc::clone(&token),
        });

        self.state.send_modify(|state| {
            state.loading = true;
            state.error = None;
        });
        info!(endpoint = self.endpoint.name(), key = %key.digest(), forced, "Extractor request started");

        let core = Arc::clone(self);
        let timer = SpanTimer::start(self.endpoint.name());
        tokio::spawn(async move {
            let outcome = core.fetcher.fetch(&request, &token).await;
            core.settle(id, &token, key, cache_enabled, outcome, &timer);
        });
    }

    fn settle(
        &self,
        id: u64,
        token: &CancellationToken,
        key: RequestKey,
        cache_enabled: bool,
        outcome: Result<Value, ExtractorError>,
        timer: &SpanTimer,
    ) {
        let mut control = self.control.lock();
        let current = control.in_flight.as_ref().is_some_and(|f| f.id == id);
        if token.is_cancelled() || !current {
            debug!(endpoint = self.endpoint.name(), key = %key.digest(), "Dropping superseded extractor result");
            return;
        }
        control.in_flight = None;

        match outcome.and_then(|raw| self.decode(raw)) {
            Ok(entry) => {
                info!(
                    endpoint = self.endpoint.name(),
                    key = %key.digest(),
                    status = entry.meta.status,
                    duration_ms = timer.elapsed_ms(),
                    "Extractor request finished"
                );
                if cache_enabled {
                    self.cache.insert(key, entry.clone());
                }
                self.state.send_replace(ExtractorState::from_cached(entry));
            }
            Err(err) => {
                warn!(
                    endpoint = self.endpoint.name(),
                    key = %key.digest(),
                    duration_ms = timer.elapsed_ms(),
                    error = %err,
                    "Extractor request failed"
                );
                self.state.send_modify(|state| {
                    state.loading = false;
                    state.error = Some(err);
                });
            }
        }
    }

    fn decode(&self, raw: Value) -> Result<CachedExtract<E::Data>, ExtractorError> {
        let (meta, payload) = split_envelope(&raw)?;
        let payload: E::Payload = serde_json::from_value(Value::Object(payload))
            .map_err(|e| ExtractorError::Decode(e.to_string()))?;
        let data = self.endpoint.select_data(payload, &raw, &meta);
        Ok(CachedExtract { data, raw, meta })
    }
}

/// Fetches and publishes extractor data for a changing URL.
///
/// Construction evaluates the initial URL right away; later URLs settle
/// for `debounce_ms` first. Must be created and driven inside a Tokio
/// runtime. Dropping the extractor aborts its in-flight request and any
/// pending debounce.
///
/// `debounce_ms` and `refresh_debounce_ms` are read once at construction.
pub struct WebsiteExtractor<E: ExtractorEndpoint> {
    core: Arc<ExtractorCore<E>>,
    url_stage: DebouncedValue<String>,
    refresh_stage: Debouncer<()>,
}

impl<E: ExtractorEndpoint> WebsiteExtractor<E> {
    /// Creates an extractor and evaluates its initial options.
    pub fn new(endpoint: E, options: ExtractorOptions, fetcher: Arc<dyn ExtractorFetcher>) -> Self {
        let initial_url = options.normalized_url();
        let url_delay = options.debounce();
        let refresh_delay = options.refresh_debounce();

        let core = Arc::new(ExtractorCore {
            endpoint,
            fetcher,
            control: Mutex::new(Control {
                options,
                settled_url: initial_url.clone(),
                refresh_token: 0,
                refresh_handled: 0,
                in_flight: None,
                next_request_id: 0,
                disposed: false,
            }),
            cache: ExtractorCache::new(),
            state: watch::Sender::new(ExtractorState::idle()),
        });

        let weak: Weak<ExtractorCore<E>> = Arc::downgrade(&core);
        let url_stage = DebouncedValue::with_observer(
            initial_url,
            url_delay,
            DebounceOptions::default(),
            move |url: &String| {
                if let Some(core) = weak.upgrade() {
                    let mut control = core.control.lock();
                    control.settled_url.clone_from(url);
                    core.evaluate(&mut control);
                }
            },
        );

        let weak: Weak<ExtractorCore<E>> = Arc::downgrade(&core);
        let refresh_stage = Debouncer::new(
            move |()| {
                if let Some(core) = weak.upgrade() {
                    let mut control = core.control.lock();
                    control.refresh_token += 1;
                    core.evaluate(&mut control);
                }
            },
            refresh_delay,
            DebounceOptions::default(),
        );

        {
            let mut control = core.control.lock();
            core.evaluate(&mut control);
        }

        Self {
            core,
            url_stage,
            refresh_stage,
        }
    }

    /// Returns a snapshot of the current state.
    #[must_use]
    pub fn state(&self) -> ExtractorState<E::Data> {
        self.core.state.borrow().clone()
    }

    /// Subscribes to state changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<ExtractorState<E::Data>> {
        self.core.state.subscribe()
    }

    /// Waits until no request is in flight and returns that state.
    pub async fn settled(&self) -> ExtractorState<E::Data> {
        let mut rx = self.core.state.subscribe();
        let settled = rx.wait_for(|state| !state.loading).await.map(|state| state.clone());
        settled.unwrap_or_else(|_| self.state())
    }

    /// Requests a forced re-fetch; calls within `refresh_debounce_ms`
    /// coalesce into one.
    pub fn refresh(&self) {
        self.refresh_stage.invoke(());
    }

    /// Changes the target URL; it is trimmed and settles for `debounce_ms`.
    pub fn set_url(&self, url: impl Into<String>) {
        let url = url.into();
        let normalized = url.trim().to_string();
        self.core.control.lock().options.url = Some(url);
        self.url_stage.set(normalized);
    }

    /// Replaces the options.
    ///
    /// A change to `enabled`, `cache`, `api_key` or `base_url` re-evaluates
    /// immediately; the URL goes through the debounce stage.
    pub fn set_options(&self, options: ExtractorOptions) {
        let url = options.normalized_url();
        {
            let mut control = self.core.control.lock();
            let changed = control.options.request_settings_differ(&options);
            control.options = options;
            if changed {
                self.core.evaluate(&mut control);
            }
        }
        self.url_stage.set(url);
    }

    /// Returns the current options.
    #[must_use]
    pub fn options(&self) -> ExtractorOptions {
        self.core.control.lock().options.clone()
    }

    /// Returns the result cache.
    #[must_use]
    pub fn cache(&self) -> &ExtractorCache<E::Data> {
        &self.core.cache
    }

    /// Returns the endpoint adapter.
    #[must_use]
    pub fn endpoint(&self) -> &E {
        &self.core.endpoint
    }
}

impl<E: ExtractorEndpoint> Drop for WebsiteExtractor<E> {
    fn drop(&mut self) {
        self.url_stage.cancel();
        self.refresh_stage.cancel();
        let mut control = self.core.control.lock();
        control.disposed = true;
        control.abort_in_flight("extractor dropped");
    }
}

impl<E: ExtractorEndpoint> std::fmt::Debug for WebsiteExtractor<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let control = self.core.control.lock();
        f.debug_struct("WebsiteExtractor")
            .field("endpoint", &self.core.endpoint.name())
            .field("url", &control.settled_url)
            .field("loading", &self.core.state.borrow().loading)
            .field("cached", &self.core.cache.len())
            .finish()
    }
}
