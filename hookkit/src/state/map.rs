//! An observable key-value map.

use std::collections::HashMap;
use std::hash::Hash;
use tokio::sync::watch;

/// A map whose every mutation is published to subscribers.
pub struct StateMap<K, V> {
    entries: watch::Sender<HashMap<K, V>>,
}

impl<K, V> StateMap<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    /// Creates an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::from_entries(std::iter::empty())
    }

    /// Creates a map from initial entries.
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
    {
        Self {
            entries: watch::Sender::new(entries.into_iter().collect()),
        }
    }

    /// Inserts or replaces an entry.
    pub fn set(&self, key: K, value: V) {
        self.entries.send_modify(|map| {
            map.insert(key, value);
        });
    }

    /// Replaces all entries.
    pub fn set_all<I>(&self, entries: I)
    where
        I: IntoIterator<Item = (K, V)>,
    {
        self.entries.send_replace(entries.into_iter().collect());
    }

    /// Removes an entry, returning its value.
    pub fn remove(&self, key: &K) -> Option<V> {
        let mut removed = None;
        self.entries.send_modify(|map| {
            removed = map.remove(key);
        });
        removed
    }

    /// Removes all entries.
    pub fn clear(&self) {
        self.entries.send_replace(HashMap::new());
    }

    /// Returns the value for `key`.
    pub fn get(&self, key: &K) -> Option<V> {
        self.entries.borrow().get(key).cloned()
    }

    /// Whether `key` is present.
    pub fn has(&self, key: &K) -> bool {
        self.entries.borrow().contains_key(key)
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    /// Whether the map is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    /// Returns a copy of the current entries.
    #[must_use]
    pub fn snapshot(&self) -> HashMap<K, V> {
        self.entries.borrow().clone()
    }

    /// Subscribes to mutations.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<HashMap<K, V>> {
        self.entries.subscribe()
    }
}

impl<K, V> Default for StateMap<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> std::fmt::Debug for StateMap<K, V>
where
    K: std::fmt::Debug,
    V: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map().entries(self.entries.borrow().iter()).finish()
    }
}
