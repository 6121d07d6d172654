//! # Hookkit
//!
//! UI-state utilities for async Rust applications.
//!
//! Hookkit provides:
//!
//! - **Timing**: trailing/leading debounce, debounced values and throttled values
//! - **Website extraction**: a cached, cancellable client for the website
//!   extractor API with per-endpoint adapters and refresh coalescing
//! - **Storage**: key/value backends and JSON-encoded stored values that
//!   follow external changes
//! - **Platform lookup**: social platform detection from URLs
//! - **State containers**: boolean, map and previous-value holders
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use hookkit::prelude::*;
//! use std::sync::Arc;
//!
//! let fetcher = Arc::new(HttpExtractorFetcher::new(FetchConfig::default())?);
//! let extractor = WebsiteExtractor::new(
//!     LinksExtractor,
//!     ExtractorOptions::for_url("https://example.com"),
//!     fetcher,
//! );
//!
//! let state = extractor.settled().await;
//! if let Some(links) = state.data {
//!     println!("{} links", links.total_links);
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod cancellation;
pub mod errors;
pub mod extractor;
pub mod observability;
pub mod platform;
pub mod state;
pub mod storage;
pub mod testing;
pub mod timing;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::cancellation::CancellationToken;
    pub use crate::errors::{ExtractorError, HookkitError, StorageError};
    #[cfg(feature = "http")]
    pub use crate::extractor::HttpExtractorFetcher;
    pub use crate::extractor::{
        ExtractorEndpoint, ExtractorFetcher, ExtractorOptions, ExtractorState, FetchConfig,
        LinksExtractor, MetaExtractor, OpenGraphExtractor, OpenGraphOptions, RssExtractor,
        SchemaExtractor, WebsiteExtractMeta, WebsiteExtractor,
    };
    pub use crate::observability::init_tracing;
    pub use crate::platform::{platform_from_url, SocialPlatform};
    pub use crate::state::{BooleanState, PreviousValue, StateMap};
    pub use crate::storage::{
        FileStorage, JsonCodec, MemoryStorage, StorageBackend, StorageCodec, StoredValue,
        StoredValueOptions,
    };
    pub use crate::timing::{
        DebounceOptions, DebouncedValue, Debouncer, Throttle, ThrottleOptions,
    };
}
