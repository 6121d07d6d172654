//! Value encodings for stored values.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::errors::StorageError;

/// Converts values to and from their stored string form.
pub trait StorageCodec<T>: Send + Sync {
    /// Encodes a value for storage.
    fn encode(&self, value: &T) -> Result<String, StorageError>;

    /// Decodes a stored string.
    fn decode(&self, raw: &str) -> Result<T, StorageError>;
}

/// Stores values as JSON.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl<T> StorageCodec<T> for JsonCodec
where
    T: Serialize + DeserializeOwned,
{
    fn encode(&self, value: &T) -> Result<String, StorageError> {
        Ok(serde_json::to_string(value)?)
    }

    fn decode(&self, raw: &str) -> Result<T, StorageError> {
        Ok(serde_json::from_str(raw)?)
    }
}
