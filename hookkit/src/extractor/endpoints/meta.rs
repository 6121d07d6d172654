//! The `meta` endpoint.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use super::ExtractorEndpoint;
use crate::extractor::envelope::{null_as_default, WebsiteExtractMeta};

/// Document-level metadata of the page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MetaData {
    /// Document title.
    pub title: Option<String>,
    /// Meta description.
    pub description: Option<String>,
    /// Declared language.
    pub language: Option<String>,
    /// Canonical link.
    pub canonical_url: Option<String>,
    /// Advertised feed link.
    pub feed_url: Option<String>,
    /// Length of the visible text.
    pub text_content_length: Option<u64>,
    /// All `<meta>` name/content pairs.
    #[serde(deserialize_with = "null_as_default")]
    pub meta_tags: BTreeMap<String, String>,
}

/// Adapter for the `meta` endpoint.
#[derive(Debug, Clone, Copy, Default)]
pub struct MetaExtractor;

impl ExtractorEndpoint for MetaExtractor {
    type Payload = MetaData;
    type Data = MetaData;

    fn name(&self) -> &str {
        "meta"
    }

    fn select_data(&self, payload: MetaData, _raw: &Value, _meta: &WebsiteExtractMeta) -> MetaData {
        payload
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_meta_decode() {
        let data: MetaData = serde_json::from_value(json!({
            "title": "Example",
            "language": "en",
            "canonicalUrl": "https://example.com/",
            "textContentLength": 1204,
            "metaTags": {"viewport": "width=device-width", "robots": "index"}
        }))
        .unwrap();

        assert_eq!(data.title.as_deref(), Some("Example"));
        assert_eq!(data.description, None);
        assert_eq!(data.text_content_length, Some(1204));
        assert_eq!(data.meta_tags.get("robots").map(String::as_str), Some("index"));
    }

    #[test]
    fn test_meta_null_tags() {
        let data: MetaData = serde_json::from_value(json!({"metaTags": null})).unwrap();
        assert!(data.meta_tags.is_empty());
    }
}
