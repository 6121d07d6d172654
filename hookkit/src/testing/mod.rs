//! Testing utilities for hookkit extractors.
//!
//! This module provides:
//! - A recording mock fetcher with configurable latency
//! - Response envelope fixtures

mod fixtures;
mod mocks;

pub use fixtures::{envelope, links_payload, meta_fields, open_graph_payload, FIXTURE_FETCHED_AT};
pub use mocks::MockFetcher;
