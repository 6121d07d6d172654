//! Tracing subscriber setup.

use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

use crate::errors::HookkitError;

/// Configuration for the global tracing subscriber.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TracingConfig {
    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
    /// Filter used when `RUST_LOG` is unset.
    #[serde(default = "default_filter")]
    pub default_filter: String,
    /// Include the event target in output.
    #[serde(default = "default_true")]
    pub with_target: bool,
}

fn default_filter() -> String {
    "hookkit=info".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            json: false,
            default_filter: default_filter(),
            with_target: true,
        }
    }
}

impl TracingConfig {
    /// Creates the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Selects JSON output.
    #[must_use]
    pub fn with_json(mut self, json: bool) -> Self {
        self.json = json;
        self
    }

    /// Sets the fallback filter directive.
    #[must_use]
    pub fn with_default_filter(mut self, filter: impl Into<String>) -> Self {
        self.default_filter = filter.into();
        self
    }

    /// Sets whether targets are printed.
    #[must_use]
    pub fn with_target(mut self, with_target: bool) -> Self {
        self.with_target = with_target;
        self
    }

    /// Builds the filter: `RUST_LOG` when set and valid, else the default.
    pub fn env_filter(&self) -> Result<EnvFilter, HookkitError> {
        EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(&self.default_filter))
            .map_err(|e| HookkitError::Tracing(e.to_string()))
    }

    /// Installs the global subscriber.
    ///
    /// Fails if a global subscriber is already installed.
    pub fn try_init(&self) -> Result<(), HookkitError> {
        let filter = self.env_filter()?;
        let builder = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(self.with_target);

        let result = if self.json {
            builder.json().try_init()
        } else {
            builder.try_init()
        };
        result.map_err(|e| HookkitError::Tracing(e.to_string()))
    }
}

/// Installs a global subscriber honoring `RUST_LOG`.
///
/// Returns `false` when a subscriber was already installed.
pub fn init_tracing(json: bool) -> bool {
    TracingConfig::new().with_json(json).try_init().is_ok()
}
