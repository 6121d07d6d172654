//! Response envelope shared by every extractor endpoint.
//!
//! Each response is a flat JSON object: a fixed set of fetch metadata
//! fields plus endpoint-specific payload fields. [`split_envelope`]
//! separates the two.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::errors::ExtractorError;

/// Wire names of the metadata fields carried by every response.
pub const META_FIELDS: [&str; 11] = [
    "requestedUrl",
    "finalUrl",
    "url",
    "normalizedUrl",
    "status",
    "contentType",
    "fetchedAt",
    "bodyBytes",
    "bodyTruncated",
    "maxBodyBytes",
    "cache",
];

/// Server-side cache information for a response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WebsiteExtractCacheMeta {
    /// Whether the server answered from its cache.
    #[serde(deserialize_with = "null_as_default")]
    pub hit: bool,
    /// Age of the cached entry.
    #[serde(deserialize_with = "null_as_default")]
    pub age_seconds: f64,
    /// Server cache lifetime.
    #[serde(deserialize_with = "null_as_default")]
    pub ttl_seconds: f64,
    /// Window in which a stale entry may still be served.
    #[serde(deserialize_with = "null_as_default")]
    pub stale_while_revalidate_seconds: f64,
}

/// Fetch metadata carried by every extractor response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WebsiteExtractMeta {
    /// URL as requested.
    #[serde(deserialize_with = "null_as_default")]
    pub requested_url: String,
    /// URL after redirects.
    #[serde(deserialize_with = "null_as_default")]
    pub final_url: String,
    /// Canonical URL reported by the server.
    #[serde(deserialize_with = "null_as_default")]
    pub url: String,
    /// Normalized form of the requested URL.
    #[serde(deserialize_with = "null_as_default")]
    pub normalized_url: String,
    /// Upstream HTTP status of the page fetch.
    #[serde(deserialize_with = "null_as_default")]
    pub status: u16,
    /// Upstream content type.
    #[serde(deserialize_with = "null_as_default")]
    pub content_type: String,
    /// ISO-8601 fetch timestamp.
    #[serde(deserialize_with = "null_as_default")]
    pub fetched_at: String,
    /// Size of the fetched body.
    #[serde(deserialize_with = "null_as_default")]
    pub body_bytes: u64,
    /// Whether the body was cut at `max_body_bytes`.
    #[serde(deserialize_with = "null_as_default")]
    pub body_truncated: bool,
    /// Server body size limit.
    #[serde(deserialize_with = "null_as_default")]
    pub max_body_bytes: u64,
    /// Server cache information.
    #[serde(deserialize_with = "null_as_default")]
    pub cache: WebsiteExtractCacheMeta,
}

impl WebsiteExtractMeta {
    /// Parses `fetched_at` as a UTC timestamp.
    #[must_use]
    pub fn fetched_at_utc(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.fetched_at)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }
}

/// Splits a raw response into its metadata and its payload fields.
///
/// Metadata fields are removed from the payload map; missing metadata
/// fields take their defaults. A non-object response is a decode error.
pub fn split_envelope(raw: &Value) -> Result<(WebsiteExtractMeta, Map<String, Value>), ExtractorError> {
    let Value::Object(fields) = raw else {
        return Err(ExtractorError::Decode(format!(
            "expected a JSON object, got {}",
            value_kind(raw)
        )));
    };

    let meta: WebsiteExtractMeta =
        serde_json::from_value(raw.clone()).map_err(|e| ExtractorError::Decode(e.to_string()))?;

    let payload = fields
        .iter()
        .filter(|(key, _)| !META_FIELDS.contains(&key.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();

    Ok((meta, payload))
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Deserializes `null` the same as a missing field.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
