//! Configuration types for the website extractor.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

/// Default remote host serving the extraction API.
pub const DEFAULT_BASE_URL: &str = "https://octane.buzz";

/// Default settle time for URL input, in milliseconds.
pub const DEFAULT_DEBOUNCE_MS: u64 = 250;

/// Default coalescing window for `refresh()` calls, in milliseconds.
pub const DEFAULT_REFRESH_DEBOUNCE_MS: u64 = 150;

/// Options controlling one extractor instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractorOptions {
    /// Target page URL; blank disables fetching.
    #[serde(default)]
    pub url: Option<String>,
    /// API key appended as `api_key`.
    #[serde(default)]
    pub api_key: Option<String>,
    /// Overrides [`DEFAULT_BASE_URL`].
    #[serde(default)]
    pub base_url: Option<String>,
    /// Settle time for URL changes.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    /// Coalescing window for refresh requests.
    #[serde(default = "default_refresh_debounce_ms")]
    pub refresh_debounce_ms: u64,
    /// Whether requests are issued at all.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Whether successful results are cached per request key.
    #[serde(default = "default_true")]
    pub cache: bool,
}

fn default_debounce_ms() -> u64 {
    DEFAULT_DEBOUNCE_MS
}

fn default_refresh_debounce_ms() -> u64 {
    DEFAULT_REFRESH_DEBOUNCE_MS
}

fn default_true() -> bool {
    true
}

impl Default for ExtractorOptions {
    fn default() -> Self {
        Self {
            url: None,
            api_key: None,
            base_url: None,
            debounce_ms: default_debounce_ms(),
            refresh_debounce_ms: default_refresh_debounce_ms(),
            enabled: true,
            cache: true,
        }
    }
}

impl ExtractorOptions {
    /// Creates options with defaults and no URL.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates options targeting `url`.
    #[must_use]
    pub fn for_url(url: impl Into<String>) -> Self {
        Self::default().with_url(url)
    }

    /// Sets the target URL.
    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
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

    /// Sets the URL settle time.
    #[must_use]
    pub fn with_debounce_ms(mut self, ms: u64) -> Self {
        self.debounce_ms = ms;
        self
    }

    /// Sets the refresh coalescing window.
    #[must_use]
    pub fn with_refresh_debounce_ms(mut self, ms: u64) -> Self {
        self.refresh_debounce_ms = ms;
        self
    }

    /// Enables or disables fetching.
    #[must_use]
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Enables or disables the result cache.
    #[must_use]
    pub fn with_cache(mut self, cache: bool) -> Self {
        self.cache = cache;
        self
    }

    /// Gets the URL settle time as a Duration.
    #[must_use]
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Gets the refresh window as a Duration.
    #[must_use]
    pub fn refresh_debounce(&self) -> Duration {
        Duration::from_millis(self.refresh_debounce_ms)
    }

    /// The trimmed target URL, empty when unset.
    #[must_use]
    pub fn normalized_url(&self) -> String {
        self.url.as_deref().map(str::trim).unwrap_or_default().to_string()
    }

    /// Whether two option sets would issue different requests for the same URL.
    pub(crate) fn request_settings_differ(&self, other: &Self) -> bool {
        self.enabled != other.enabled
            || self.cache != other.cache
            || self.api_key != other.api_key
            || self.base_url != other.base_url
    }
}

/// Configuration for the HTTP fetcher.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: f64,
    /// User agent string.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Additional headers to include.
    #[serde(default)]
    pub headers: HashMap<String, String>,
}

fn default_timeout() -> f64 {
    30.0
}

fn default_user_agent() -> String {
    "hookkit-extractor/0.1".to_string()
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_timeout(),
            user_agent: default_user_agent(),
            headers: HashMap::new(),
        }
    }
}

impl FetchConfig {
    /// Creates a new fetch configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the timeout.
    #[must_use]
    pub fn with_timeout(mut self, seconds: f64) -> Self {
        self.timeout_seconds = seconds;
        self
    }

    /// Sets the user agent.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Adds a header.
    #[must_use]
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Gets timeout as Duration; non-positive values fall back to the default.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        if self.timeout_seconds.is_finite() && self.timeout_seconds > 0.0 {
            Duration::from_secs_f64(self.timeout_seconds)
        } else {
            Duration::from_secs_f64(default_timeout())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extractor_options_defaults() {
        let options = ExtractorOptions::default();
        assert_eq!(options.debounce_ms, 250);
        assert_eq!(options.refresh_debounce_ms, 150);
        assert!(options.enabled);
        assert!(options.cache);
        assert_eq!(options.normalized_url(), "");
    }

    #[test]
    fn test_extractor_options_deserialize_partial() {
        let options: ExtractorOptions =
            serde_json::from_str(r#"{"url": "  https://example.com/ ", "cache": false}"#).unwrap();
        assert_eq!(options.normalized_url(), "https://example.com/");
        assert!(!options.cache);
        assert_eq!(options.debounce(), Duration::from_millis(250));
    }

    #[test]
    fn test_request_settings_differ() {
        let base = ExtractorOptions::for_url("https://example.com");
        assert!(!base.request_settings_differ(&base.clone().with_debounce_ms(10)));
        assert!(!base.request_settings_differ(&base.clone().with_url("https://other.test")));
        assert!(base.request_settings_differ(&base.clone().with_api_key("k")));
        assert!(base.request_settings_differ(&base.clone().with_enabled(false)));
    }

    #[test]
    fn test_fetch_config_builder() {
        let config = FetchConfig::new()
            .with_timeout(5.0)
            .with_user_agent("custom-agent")
            .with_header("X-Trace", "1");

        assert_eq!(config.timeout(), Duration::from_secs(5));
        assert_eq!(config.user_agent, "custom-agent");
        assert_eq!(config.headers.get("X-Trace"), Some(&"1".to_string()));
    }

    #[test]
    fn test_fetch_config_invalid_timeout_falls_back() {
        let config = FetchConfig::new().with_timeout(-1.0);
        assert_eq!(config.timeout(), Duration::from_secs(30));
    }
}
