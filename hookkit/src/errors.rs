//! Error types for hookkit.
//!
//! Extractor errors never cross the public boundary as panics or `Err`
//! returns from the orchestrator; they are published through the `error`
//! field of the extractor state.

use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;

/// The crate-level error type.
#[derive(Debug, Error)]
pub enum HookkitError {
    /// An extractor request failed.
    #[error("{0}")]
    Extractor(#[from] ExtractorError),

    /// A storage backend operation failed.
    #[error("{0}")]
    Storage(#[from] StorageError),

    /// A configured skip pattern is not a valid regular expression.
    #[error("Invalid skip pattern '{pattern}': {reason}")]
    InvalidPattern {
        /// The offending pattern.
        pattern: String,
        /// Why it failed to compile.
        reason: String,
    },

    /// The tracing subscriber could not be installed.
    #[error("Tracing setup failed: {0}")]
    Tracing(String),
}

impl HookkitError {
    /// Creates an invalid pattern error.
    #[must_use]
    pub fn invalid_pattern(pattern: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidPattern {
            pattern: pattern.into(),
            reason: reason.into(),
        }
    }
}

/// Errors produced while fetching from the website extractor API.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExtractorError {
    /// The target URL was empty.
    #[error("URL is required.")]
    MissingUrl,

    /// The request URL could not be built.
    #[error("Invalid extractor URL: {0}")]
    InvalidUrl(String),

    /// The request never produced an HTTP response.
    #[error("{0}")]
    Transport(String),

    /// The extractor answered with a non-2xx status.
    #[error("{message}")]
    Upstream {
        /// Server-supplied or synthesized message.
        message: String,
        /// HTTP status, or the status reported in the error body.
        status: u16,
        /// The decoded error body, if any.
        raw: Option<Value>,
    },

    /// The response body did not have the expected shape.
    #[error("Failed to decode extractor response: {0}")]
    Decode(String),

    /// The request was cancelled before it settled.
    #[error("Request aborted.")]
    Aborted,
}

impl ExtractorError {
    /// Creates an upstream error from a status and an optional decoded body.
    ///
    /// The body's `error` string wins over the generic message and its
    /// `status` number wins over the HTTP status.
    #[must_use]
    pub fn upstream(http_status: u16, body: Option<Value>) -> Self {
        let message = body
            .as_ref()
            .and_then(|b| b.get("error"))
            .and_then(Value::as_str)
            .map_or_else(
                || format!("Request failed with status {http_status}."),
                String::from,
            );
        let status = body
            .as_ref()
            .and_then(|b| b.get("status"))
            .and_then(Value::as_u64)
            .and_then(|s| u16::try_from(s).ok())
            .unwrap_or(http_status);

        Self::Upstream {
            message,
            status,
            raw: body,
        }
    }

    /// Returns the user-facing message.
    #[must_use]
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// Returns the HTTP status for upstream failures.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Upstream { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns the raw error body for upstream failures.
    #[must_use]
    pub fn raw(&self) -> Option<&Value> {
        match self {
            Self::Upstream { raw, .. } => raw.as_ref(),
            _ => None,
        }
    }

    /// Whether the request was cancelled rather than failed.
    #[must_use]
    pub fn is_aborted(&self) -> bool {
        matches!(self, Self::Aborted)
    }

    /// Converts to a dictionary representation.
    #[must_use]
    pub fn to_dict(&self) -> HashMap<String, Value> {
        let mut map = HashMap::new();
        let kind = match self {
            Self::MissingUrl => "MissingUrl",
            Self::InvalidUrl(_) => "InvalidUrl",
            Self::Transport(_) => "Transport",
            Self::Upstream { .. } => "Upstream",
            Self::Decode(_) => "Decode",
            Self::Aborted => "Aborted",
        };
        map.insert("type".to_string(), serde_json::json!(kind));
        map.insert("message".to_string(), serde_json::json!(self.message()));
        if let Some(status) = self.status() {
            map.insert("status".to_string(), serde_json::json!(status));
        }
        if let Some(raw) = self.raw() {
            map.insert("raw".to_string(), raw.clone());
        }
        map
    }
}

/// Errors raised by storage backends.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the backing store failed.
    #[error("Storage IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A value could not be serialized or deserialized.
    #[error("Storage serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_upstream_prefers_body_message_and_status() {
        let err = ExtractorError::upstream(502, Some(json!({"error": "Origin unreachable", "status": 504})));
        assert_eq!(err.message(), "Origin unreachable");
        assert_eq!(err.status(), Some(504));
        assert!(err.raw().is_some());
    }

    #[test]
    fn test_upstream_falls_back_to_generic_message() {
        let err = ExtractorError::upstream(500, None);
        assert_eq!(err.message(), "Request failed with status 500.");
        assert_eq!(err.status(), Some(500));
        assert!(err.raw().is_none());
    }

    #[test]
    fn test_error_to_dict() {
        let err = ExtractorError::upstream(404, Some(json!({"detail": "missing"})));
        let dict = err.to_dict();

        assert_eq!(dict.get("type").unwrap(), "Upstream");
        assert_eq!(dict.get("status").unwrap(), 404);
        assert_eq!(dict.get("message").unwrap(), "Request failed with status 404.");
    }

    #[test]
    fn test_aborted() {
        assert!(ExtractorError::Aborted.is_aborted());
        assert!(!ExtractorError::MissingUrl.is_aborted());
        assert_eq!(ExtractorError::Aborted.status(), None);
    }

    #[test]
    fn test_hookkit_error_wraps() {
        let err: HookkitError = ExtractorError::MissingUrl.into();
        assert_eq!(err.to_string(), "URL is required.");

        let err = HookkitError::invalid_pattern("(", "unclosed group");
        assert!(err.to_string().contains("unclosed group"));
    }
}
