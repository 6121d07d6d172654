//! Persistent values backed by a key-value store.
//!
//! This module provides:
//! - The [`StorageBackend`] trait with in-memory and JSON-file backends
//! - [`StorageEvent`] change notifications broadcast by backends
//! - [`StoredValue`], a typed value mirrored to one storage key
//! - [`StorageCodec`] for custom value encodings

mod backend;
mod codec;
mod file;
mod stored;

pub use backend::{MemoryStorage, StorageBackend, StorageEvent, EVENT_CAPACITY};
pub use codec::{JsonCodec, StorageCodec};
pub use file::FileStorage;
pub use stored::{StoredValue, StoredValueOptions};
