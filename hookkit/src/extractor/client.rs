//! Request building and the fetcher seam for the extractor API.
//!
//! [`ExtractorFetcher`] is the pluggable transport; [`HttpExtractorFetcher`]
//! is the reqwest-backed implementation available with the `http` feature.

use async_trait::async_trait;
use serde_json::Value;
use url::Url;

use super::cache::RequestKey;
use super::config::DEFAULT_BASE_URL;
use crate::cancellation::CancellationToken;
use crate::errors::ExtractorError;

#[cfg(feature = "http")]
use super::config::FetchConfig;
#[cfg(feature = "http")]
use tracing::debug;

/// Path prefix of the extraction API; the endpoint name is appended.
pub const EXTRACT_PATH: &str = "/api/v1/extract";

/// One call to an extractor endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractorRequest {
    /// Endpoint name, e.g. `links`.
    pub endpoint: String,
    /// Target page URL.
    pub url: String,
    /// Optional API key.
    pub api_key: Option<String>,
    /// Optional base URL override.
    pub base_url: Option<String>,
}

impl ExtractorRequest {
    /// Creates a request with no API key and the default base URL.
    #[must_use]
    pub fn new(endpoint: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            url: url.into(),
            api_key: None,
            base_url: None,
        }
    }

    /// Sets the API key.
    #[must_use]
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Sets the base URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// The cache identity of this request.
    #[must_use]
    pub fn key(&self) -> RequestKey {
        RequestKey::new(
            &self.endpoint,
            self.base_url.as_deref(),
            self.api_key.as_deref(),
            &self.url,
        )
    }
}

/// Builds the absolute endpoint URL for a request.
///
/// Trailing slashes on the base URL are dropped. The query carries `url`
/// and then `api_key` when one is set and non-empty.
pub fn build_extractor_url(request: &ExtractorRequest) -> Result<String, ExtractorError> {
    let base = request
        .base_url
        .as_deref()
        .unwrap_or(DEFAULT_BASE_URL)
        .trim_end_matches('/');

    let mut url = Url::parse(&format!("{base}{EXTRACT_PATH}/{}", request.endpoint))
        .map_err(|e| ExtractorError::InvalidUrl(e.to_string()))?;

    {
        let mut query = url.query_pairs_mut();
        query.append_pair("url", &request.url);
        if let Some(api_key) = request.api_key.as_deref().filter(|k| !k.is_empty()) {
            query.append_pair("api_key", api_key);
        }
    }

    Ok(url.into())
}

/// Transport used by the extractor orchestrator.
///
/// Implementations resolve to the decoded JSON body on a 2xx response.
/// When `cancel` fires they should stop promptly and return
/// [`ExtractorError::Aborted`].
#[async_trait]
pub trait ExtractorFetcher: Send + Sync {
    /// Performs one request.
    async fn fetch(
        &self,
        request: &ExtractorRequest,
        cancel: &CancellationToken,
    ) -> Result<Value, ExtractorError>;
}

/// Fetches from the extractor API over HTTP.
#[cfg(feature = "http")]
#[derive(Debug, Clone)]
pub struct HttpExtractorFetcher {
    client: reqwest::Client,
    config: FetchConfig,
}

#[cfg(feature = "http")]
impl HttpExtractorFetcher {
    /// Creates a fetcher with the given configuration.
    pub fn new(config: FetchConfig) -> Result<Self, ExtractorError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| ExtractorError::Transport(format!("http client build failed: {e}")))?;
        Ok(Self { client, config })
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    async fn exchange(&self, endpoint: &str) -> Result<Value, ExtractorError> {
        let mut builder = self.client.get(endpoint);
        for (key, value) in &self.config.headers {
            builder = builder.header(key.as_str(), value.as_str());
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                ExtractorError::Transport(format!(
                    "Request timed out after {:.1}s.",
                    self.config.timeout().as_secs_f64()
                ))
            } else {
                ExtractorError::Transport(e.to_string())
            }
        })?;

        let status = response.status();
        // An undecodable body is treated as absent.
        let body = response.json::<Value>().await.ok();

        if !status.is_success() {
            return Err(ExtractorError::upstream(status.as_u16(), body));
        }
        Ok(body.unwrap_or(Value::Null))
    }
}

#[cfg(feature = "http")]
#[async_trait]
impl ExtractorFetcher for HttpExtractorFetcher {
    async fn fetch(
        &self,
        request: &ExtractorRequest,
        cancel: &CancellationToken,
    ) -> Result<Value, ExtractorError> {
        if request.url.trim().is_empty() {
            return Err(ExtractorError::MissingUrl);
        }
        let endpoint = build_extractor_url(request)?;
        debug!(endpoint = %request.endpoint, key = %request.key().digest(), "Sending extractor request");

        tokio::select! {
            biased;
            () = cancel.cancelled() => Err(ExtractorError::Aborted),
            result = self.exchange(&endpoint) => result,
        }
    }
}
