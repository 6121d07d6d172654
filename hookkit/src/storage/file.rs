//! A storage backend persisted as one JSON object on disk.

use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::sync::broadcast;
use tracing::debug;

use super::backend::{StorageBackend, StorageEvent, EVENT_CAPACITY};
use crate::errors::StorageError;

/// Stores items in a JSON object file, rewritten on every change.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    items: Mutex<BTreeMap<String, String>>,
    events: broadcast::Sender<StorageEvent>,
}

impl FileStorage {
    /// Opens the store at `path`; a missing file is an empty store.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let path = path.as_ref().to_path_buf();
        let items = match std::fs::read(&path) {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => BTreeMap::new(),
            Ok(bytes) => serde_json::from_slice(&bytes)?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(err) => return Err(err.into()),
        };
        debug!(path = %path.display(), items = items.len(), "Opened file storage");

        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Ok(Self {
            path,
            items: Mutex::new(items),
            events,
        })
    }

    /// Returns the backing file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, items: &BTreeMap<String, String>) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let bytes = serde_json::to_vec_pretty(items)?;
        std::fs::write(&self.path, bytes)?;
        Ok(())
    }
}

impl StorageBackend for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.items.lock().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        {
            let mut items = self.items.lock();
            items.insert(key.to_string(), value.to_string());
            self.persist(&items)?;
        }
        let _ = self.events.send(StorageEvent {
            key: key.to_string(),
            new_value: Some(value.to_string()),
        });
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        {
            let mut items = self.items.lock();
            if items.remove(key).is_none() {
                return Ok(());
            }
            self.persist(&items)?;
        }
        let _ = self.events.send(StorageEvent {
            key: key.to_string(),
            new_value: None,
        });
        Ok(())
    }

    fn subscribe(&self) -> Option<broadcast::Receiver<StorageEvent>> {
        Some(self.events.subscribe())
    }
}
