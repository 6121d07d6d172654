//! The `rss` endpoint.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::ExtractorEndpoint;
use crate::extractor::envelope::{null_as_default, WebsiteExtractMeta};

/// A feed advertised by the page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RssFeed {
    /// Feed URL.
    pub url: String,
    /// Feed format, e.g. `rss` or `atom`.
    pub feed_type: String,
    /// Feed title.
    pub title: Option<String>,
}

/// Feeds discovered on the page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RssData {
    /// Primary feed URL.
    pub feed_url: Option<String>,
    /// All discovered feeds.
    #[serde(deserialize_with = "null_as_default")]
    pub feeds: Vec<RssFeed>,
}

/// Adapter for the `rss` endpoint.
#[derive(Debug, Clone, Copy, Default)]
pub struct RssExtractor;

impl ExtractorEndpoint for RssExtractor {
    type Payload = RssData;
    type Data = RssData;

    fn name(&self) -> &str {
        "rss"
    }

    fn select_data(&self, payload: RssData, _raw: &Value, _meta: &WebsiteExtractMeta) -> RssData {
        payload
    }
}
