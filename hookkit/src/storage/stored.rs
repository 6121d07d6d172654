//! A typed value mirrored to one storage key.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Weak};
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::backend::{StorageBackend, StorageEvent};
use super::codec::{JsonCodec, StorageCodec};

/// Options for [`StoredValue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredValueOptions {
    /// Read the stored value at construction instead of starting from the initial value.
    #[serde(default = "default_true")]
    pub initialize_with_value: bool,
    /// Follow changes made to the key through the backend.
    #[serde(default = "default_true")]
    pub listen_to_changes: bool,
}

fn default_true() -> bool {
    true
}

impl Default for StoredValueOptions {
    fn default() -> Self {
        Self {
            initialize_with_value: true,
            listen_to_changes: true,
        }
    }
}

impl StoredValueOptions {
    /// Creates default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether the stored value is read at construction.
    #[must_use]
    pub fn with_initialize_with_value(mut self, enabled: bool) -> Self {
        self.initialize_with_value = enabled;
        self
    }

    /// Sets whether backend changes are followed.
    #[must_use]
    pub fn with_listen_to_changes(mut self, enabled: bool) -> Self {
        self.listen_to_changes = enabled;
        self
    }
}

struct StoredShared<T> {
    key: String,
    initial: T,
    backend: Arc<dyn StorageBackend>,
    codec: Arc<dyn StorageCodec<T>>,
    value: watch::Sender<T>,
}

impl<T> StoredShared<T>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    /// The stored value, or the initial value when absent or undecodable.
    fn read(&self) -> T {
        match self.backend.get_item(&self.key) {
            Ok(Some(raw)) if !raw.is_empty() => self.codec.decode(&raw).unwrap_or_else(|err| {
                debug!(key = %self.key, error = %err, "Stored value undecodable, using initial value");
                self.initial.clone()
            }),
            Ok(_) => self.initial.clone(),
            Err(err) => {
                warn!(key = %self.key, error = %err, "Failed to read stored value");
                self.initial.clone()
            }
        }
    }

    fn publish(&self, next: T) {
        self.value.send_if_modified(|value| {
            if *value == next {
                false
            } else {
                *value = next;
                true
            }
        });
    }

    async fn follow(weak: Weak<Self>, mut events: broadcast::Receiver<StorageEvent>) {
        loop {
            let key_changed = match events.recv().await {
                Ok(event) => match weak.upgrade() {
                    Some(shared) => event.key == shared.key,
                    None => return,
                },
                // Missed events; the key may have changed.
                Err(broadcast::error::RecvError::Lagged(_)) => true,
                Err(broadcast::error::RecvError::Closed) => return,
            };
            if !key_changed {
                continue;
            }
            let Some(shared) = weak.upgrade() else {
                return;
            };
            // Apply the backend's current value, not the event payload.
            let current = shared.read();
            shared.publish(current);
        }
    }
}

/// A value kept in sync with one key of a [`StorageBackend`].
///
/// Writes go through to the backend; a failed write is logged and the
/// in-memory value still changes. When the backend publishes events and a
/// Tokio runtime is available, changes made by other writers are followed:
/// a removed key restores the initial value and an undecodable value falls
/// back to it.
pub struct StoredValue<T>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    shared: Arc<StoredShared<T>>,
    listener: Option<JoinHandle<()>>,
}

impl<T> StoredValue<T>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    /// Creates a JSON-encoded stored value with default options.
    pub fn new(backend: Arc<dyn StorageBackend>, key: impl Into<String>, initial: T) -> Self
    where
        T: Serialize + DeserializeOwned,
    {
        Self::with_codec(backend, key, initial, StoredValueOptions::default(), Arc::new(JsonCodec))
    }

    /// Creates a stored value with explicit options and codec.
    pub fn with_codec(
        backend: Arc<dyn StorageBackend>,
        key: impl Into<String>,
        initial: T,
        options: StoredValueOptions,
        codec: Arc<dyn StorageCodec<T>>,
    ) -> Self {
        let shared = Arc::new(StoredShared {
            key: key.into(),
            value: watch::Sender::new(initial.clone()),
            initial,
            backend,
            codec,
        });

        if options.initialize_with_value {
            let current = shared.read();
            shared.publish(current);
        }

        let listener = if options.listen_to_changes {
            match (shared.backend.subscribe(), tokio::runtime::Handle::try_current()) {
                (Some(events), Ok(handle)) => {
                    let weak = Arc::downgrade(&shared);
                    Some(handle.spawn(StoredShared::follow(weak, events)))
                }
                (Some(_), Err(_)) => {
                    debug!(key = %shared.key, "No Tokio runtime, storage changes will not be followed");
                    None
                }
                (None, _) => None,
            }
        } else {
            None
        };

        Self { shared, listener }
    }

    /// Returns the current value.
    #[must_use]
    pub fn get(&self) -> T {
        self.shared.value.borrow().clone()
    }

    /// Stores a new value.
    pub fn set(&self, value: T) {
        match self.shared.codec.encode(&value) {
            Ok(raw) => {
                if let Err(err) = self.shared.backend.set_item(&self.shared.key, &raw) {
                    warn!(key = %self.shared.key, error = %err, "Failed to write stored value");
                }
            }
            Err(err) => warn!(key = %self.shared.key, error = %err, "Failed to encode stored value"),
        }
        self.shared.publish(value);
    }

    /// Stores the value computed from the current one.
    pub fn update<F>(&self, f: F)
    where
        F: FnOnce(&T) -> T,
    {
        let next = f(&self.get());
        self.set(next);
    }

    /// Subscribes to value changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.shared.value.subscribe()
    }

    /// Returns the storage key.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.shared.key
    }

    /// Returns the initial value.
    #[must_use]
    pub fn initial(&self) -> &T {
        &self.shared.initial
    }
}

impl<T> Drop for StoredValue<T>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    fn drop(&mut self) {
        if let Some(listener) = self.listener.take() {
            listener.abort();
        }
    }
}

impl<T> std::fmt::Debug for StoredValue<T>
where
    T: Clone + PartialEq + Send + Sync + std::fmt::Debug + 'static,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoredValue")
            .field("key", &self.shared.key)
            .field("value", &*self.shared.value.borrow())
            .field("listening", &self.listener.is_some())
            .finish()
    }
}
