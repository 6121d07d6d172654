//! Storage backend trait and the in-memory backend.

use parking_lot::RwLock;
use std::collections::HashMap;
use tokio::sync::broadcast;

use crate::errors::StorageError;

/// Buffered change events per backend before slow subscribers lag.
pub const EVENT_CAPACITY: usize = 64;

/// A change to one storage key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageEvent {
    /// The changed key.
    pub key: String,
    /// The new raw value; `None` when the key was removed.
    pub new_value: Option<String>,
}

/// A string key-value store.
pub trait StorageBackend: Send + Sync {
    /// Reads the raw value for `key`.
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Writes the raw value for `key`.
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Removes `key`.
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;

    /// Subscribes to change events, if the backend publishes them.
    fn subscribe(&self) -> Option<broadcast::Receiver<StorageEvent>> {
        None
    }
}

/// Process-local storage.
#[derive(Debug)]
pub struct MemoryStorage {
    items: RwLock<HashMap<String, String>>,
    events: broadcast::Sender<StorageEvent>,
}

impl MemoryStorage {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            items: RwLock::new(HashMap::new()),
            events,
        }
    }

    /// Returns the number of stored keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.read().len()
    }

    /// Whether the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.read().is_empty()
    }

    /// Removes every key, notifying subscribers per key.
    pub fn clear(&self) {
        let keys: Vec<String> = self.items.write().drain().map(|(key, _)| key).collect();
        for key in keys {
            let _ = self.events.send(StorageEvent { key, new_value: None });
        }
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl StorageBackend for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.items.read().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.items.write().insert(key.to_string(), value.to_string());
        // No receivers is not an error.
        let _ = self.events.send(StorageEvent {
            key: key.to_string(),
            new_value: Some(value.to_string()),
        });
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        if self.items.write().remove(key).is_some() {
            let _ = self.events.send(StorageEvent {
                key: key.to_string(),
                new_value: None,
            });
        }
        Ok(())
    }

    fn subscribe(&self) -> Option<broadcast::Receiver<StorageEvent>> {
        Some(self.events.subscribe())
    }
}
