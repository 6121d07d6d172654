//! Endpoint adapters for the extractor API.
//!
//! An adapter names the endpoint, declares the payload it expects and
//! shapes that payload into the data the orchestrator publishes.

mod links;
mod meta;
mod open_graph;
mod rss;
mod schema;

use serde::de::DeserializeOwned;
use serde_json::Value;

use super::envelope::WebsiteExtractMeta;

pub use links::{LinksData, LinksExtractor, WebsiteLink};
pub use meta::{MetaData, MetaExtractor};
pub use open_graph::{
    HtmlInferred, HybridGraph, OpenGraphExtractor, OpenGraphMedia, OpenGraphOptions,
    OpenGraphPayload, OpenGraphSummary, OpenGraphTags, DEFAULT_SKIP_PATTERNS,
};
pub use rss::{RssData, RssExtractor, RssFeed};
pub use schema::{SchemaData, SchemaEntry, SchemaExtractor};

/// Adapts one extractor endpoint to the orchestrator.
pub trait ExtractorEndpoint: Send + Sync + 'static {
    /// Payload fields of the response, without the envelope metadata.
    type Payload: DeserializeOwned + Send + 'static;
    /// Data published in the extractor state.
    type Data: Clone + Send + Sync + 'static;

    /// Endpoint name used in the request path and cache key.
    fn name(&self) -> &str;

    /// Shapes a decoded payload into published data.
    fn select_data(&self, payload: Self::Payload, raw: &Value, meta: &WebsiteExtractMeta) -> Self::Data;

    /// Whether `url` should never be requested.
    fn should_skip(&self, _url: &str) -> bool {
        false
    }
}
