//! The `links` endpoint.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::ExtractorEndpoint;
use crate::extractor::envelope::{null_as_default, WebsiteExtractMeta};

/// A link found on the page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WebsiteLink {
    /// Absolute link target.
    pub url: String,
    /// Anchor text.
    pub text: String,
    /// Whether the target is on another domain.
    pub is_external: bool,
    /// Target domain, if resolvable.
    pub domain: Option<String>,
}

/// Links found on the page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LinksData {
    /// Number of links, counting duplicates.
    #[serde(deserialize_with = "null_as_default")]
    pub total_links: u64,
    /// Number of distinct target domains.
    #[serde(deserialize_with = "null_as_default")]
    pub unique_domains: u64,
    /// The links.
    #[serde(deserialize_with = "null_as_default")]
    pub links: Vec<WebsiteLink>,
}

/// Adapter for the `links` endpoint.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinksExtractor;

impl ExtractorEndpoint for LinksExtractor {
    type Payload = LinksData;
    type Data = LinksData;

    fn name(&self) -> &str {
        "links"
    }

    fn select_data(&self, payload: LinksData, _raw: &Value, _meta: &WebsiteExtractMeta) -> LinksData {
        payload
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_links_decode() {
        let payload: LinksData = serde_json::from_value(json!({
            "totalLinks": 2,
            "uniqueDomains": 1,
            "links": [
                {"url": "https://example.com/about", "text": "About", "isExternal": false, "domain": "example.com"},
                {"url": "https://example.com/blog", "text": "Blog", "isExternal": false}
            ]
        }))
        .unwrap();

        let data = LinksExtractor.select_data(payload, &Value::Null, &WebsiteExtractMeta::default());
        assert_eq!(data.total_links, 2);
        assert_eq!(data.links.len(), 2);
        assert_eq!(data.links[1].domain, None);
    }

    #[test]
    fn test_links_defaults_for_missing_and_null() {
        let data: LinksData = serde_json::from_value(json!({"links": null})).unwrap();
        assert_eq!(data, LinksData::default());
        assert_eq!(LinksExtractor.name(), "links");
    }
}
