//! Per-instance result cache keyed by request identity.

use dashmap::DashMap;
use serde_json::Value;
use sha2::{Digest, Sha256};

use super::config::DEFAULT_BASE_URL;
use super::envelope::WebsiteExtractMeta;

/// Identity of an extractor request: endpoint, base URL, API key and URL.
///
/// Absent base URL and API key are normalized to the default base URL and
/// the empty string, so requests that resolve to the same upstream call
/// share a key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequestKey(String);

impl RequestKey {
    /// Derives the key for a request.
    #[must_use]
    pub fn new(endpoint: &str, base_url: Option<&str>, api_key: Option<&str>, url: &str) -> Self {
        let base_url = base_url.unwrap_or(DEFAULT_BASE_URL);
        let api_key = api_key.unwrap_or_default();
        Self(format!("{endpoint}:{base_url}:{api_key}:{url}"))
    }

    /// Returns the full key.
    ///
    /// The key embeds the API key; log [`RequestKey::digest`] instead.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// A short SHA-256 digest of the key, safe to log.
    #[must_use]
    pub fn digest(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.0.as_bytes());
        let result = hasher.finalize();
        hex::encode(&result[..8])
    }
}

/// A successful extraction kept for reuse.
#[derive(Debug, Clone, PartialEq)]
pub struct CachedExtract<D> {
    /// Endpoint-specific data.
    pub data: D,
    /// The full response.
    pub raw: Value,
    /// The response metadata.
    pub meta: WebsiteExtractMeta,
}

/// Stores successful extractions per [`RequestKey`].
///
/// Entries live as long as the owning extractor; there is no expiry.
pub struct ExtractorCache<D> {
    entries: DashMap<RequestKey, CachedExtract<D>>,
}

impl<D: Clone> ExtractorCache<D> {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    /// Gets a cached extraction.
    pub fn get(&self, key: &RequestKey) -> Option<CachedExtract<D>> {
        self.entries.get(key).map(|entry| entry.value().clone())
    }

    /// Stores an extraction, replacing any previous entry.
    pub fn insert(&self, key: RequestKey, entry: CachedExtract<D>) {
        self.entries.insert(key, entry);
    }

    /// Removes an entry.
    pub fn remove(&self, key: &RequestKey) -> Option<CachedExtract<D>> {
        self.entries.remove(key).map(|(_, entry)| entry)
    }

    /// Whether an entry exists for `key`.
    pub fn contains(&self, key: &RequestKey) -> bool {
        self.entries.contains_key(key)
    }

    /// Clears all entries.
    pub fn clear(&self) {
        self.entries.clear();
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<D: Clone> Default for ExtractorCache<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D> std::fmt::Debug for ExtractorCache<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExtractorCache")
            .field("entries", &self.entries.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn entry(data: &str) -> CachedExtract<String> {
        CachedExtract {
            data: data.to_string(),
            raw: json!({"status": 200}),
            meta: WebsiteExtractMeta::default(),
        }
    }

    #[test]
    fn test_key_defaults() {
        let key = RequestKey::new("links", None, None, "https://example.com");
        assert_eq!(key.as_str(), "links:https://octane.buzz::https://example.com");
        assert_eq!(
            key,
            RequestKey::new("links", Some("https://octane.buzz"), Some(""), "https://example.com")
        );
    }

    #[test]
    fn test_key_distinguishes_fields() {
        let base = RequestKey::new("meta", None, Some("a"), "https://example.com");
        assert_ne!(base, RequestKey::new("links", None, Some("a"), "https://example.com"));
        assert_ne!(base, RequestKey::new("meta", None, Some("b"), "https://example.com"));
        assert_ne!(base, RequestKey::new("meta", Some("http://localhost"), Some("a"), "https://example.com"));
    }

    #[test]
    fn test_digest_hides_key() {
        let key = RequestKey::new("meta", None, Some("secret-key"), "https://example.com");
        let digest = key.digest();
        assert_eq!(digest.len(), 16);
        assert!(!digest.contains("secret"));
        assert_eq!(digest, key.clone().digest());
    }

    #[test]
    fn test_cache_operations() {
        let cache = ExtractorCache::new();
        let key = RequestKey::new("rss", None, None, "https://example.com");
        assert!(cache.is_empty());

        cache.insert(key.clone(), entry("first"));
        assert!(cache.contains(&key));
        assert_eq!(cache.get(&key).unwrap().data, "first");

        cache.insert(key.clone(), entry("second"));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(&key).unwrap().data, "second");

        assert_eq!(cache.remove(&key).unwrap().data, "second");
        assert!(cache.get(&key).is_none());

        cache.insert(key, entry("third"));
        cache.clear();
        assert!(cache.is_empty());
    }
}
