//! The `schema` endpoint: structured data blocks found on the page.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::ExtractorEndpoint;
use crate::extractor::envelope::{null_as_default, WebsiteExtractMeta};

/// One structured data block.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchemaEntry {
    /// The block's `@type`.
    pub schema_type: String,
    /// The block's fields.
    #[serde(deserialize_with = "null_as_default")]
    pub value: Map<String, Value>,
}

/// Structured data found on the page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SchemaData {
    /// All blocks in document order.
    #[serde(deserialize_with = "null_as_default")]
    pub schema: Vec<SchemaEntry>,
    /// Distinct block types.
    #[serde(deserialize_with = "null_as_default")]
    pub schema_types: Vec<String>,
}

/// Adapter for the `schema` endpoint.
#[derive(Debug, Clone, Copy, Default)]
pub struct SchemaExtractor;

impl ExtractorEndpoint for SchemaExtractor {
    type Payload = SchemaData;
    type Data = SchemaData;

    fn name(&self) -> &str {
        "schema"
    }

    fn select_data(&self, payload: SchemaData, _raw: &Value, _meta: &WebsiteExtractMeta) -> SchemaData {
        payload
    }
}
