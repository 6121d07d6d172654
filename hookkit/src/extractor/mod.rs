//! Website extractor client and orchestration.
//!
//! This module provides:
//! - [`WebsiteExtractor`], which keeps a published [`ExtractorState`] in
//!   sync with a changing URL
//! - Endpoint adapters for the `links`, `meta`, `rss`, `schema` and
//!   `open-graph` endpoints
//! - The [`ExtractorFetcher`] transport seam and, with the `http` feature,
//!   a reqwest implementation
//! - Request keys and the per-instance result cache

mod cache;
mod client;
mod config;
mod endpoints;
mod envelope;
mod orchestrator;

pub use cache::{CachedExtract, ExtractorCache, RequestKey};
#[cfg(feature = "http")]
pub use client::HttpExtractorFetcher;
pub use client::{build_extractor_url, ExtractorFetcher, ExtractorRequest, EXTRACT_PATH};
pub use config::{
    ExtractorOptions, FetchConfig, DEFAULT_BASE_URL, DEFAULT_DEBOUNCE_MS, DEFAULT_REFRESH_DEBOUNCE_MS,
};
pub use endpoints::{
    ExtractorEndpoint, HtmlInferred, HybridGraph, LinksData, LinksExtractor, MetaData, MetaExtractor,
    OpenGraphExtractor, OpenGraphMedia, OpenGraphOptions, OpenGraphPayload, OpenGraphSummary,
    OpenGraphTags, RssData, RssExtractor, RssFeed, SchemaData, SchemaEntry, SchemaExtractor,
    WebsiteLink, DEFAULT_SKIP_PATTERNS,
};
pub use envelope::{split_envelope, WebsiteExtractCacheMeta, WebsiteExtractMeta, META_FIELDS};
pub use orchestrator::{ExtractorState, WebsiteExtractor};
