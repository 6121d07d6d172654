//! Response fixtures for extractor tests.

use serde_json::{json, Map, Value};

/// Fixed fetch timestamp used by [`envelope`].
pub const FIXTURE_FETCHED_AT: &str = "2026-01-01T00:00:00Z";

/// Builds the metadata half of a 200 response for `url`.
#[must_use]
pub fn meta_fields(url: &str) -> Map<String, Value> {
    let value = json!({
        "requestedUrl": url,
        "finalUrl": url,
        "url": url,
        "normalizedUrl": url,
        "status": 200,
        "contentType": "text/html; charset=utf-8",
        "fetchedAt": FIXTURE_FETCHED_AT,
        "bodyBytes": 1200,
        "bodyTruncated": false,
        "maxBodyBytes": 6_000_000,
        "cache": {
            "hit": false,
            "ageSeconds": 0,
            "ttlSeconds": 3600,
            "staleWhileRevalidateSeconds": 86400
        }
    });
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

/// Wraps `payload` fields in a 200 response envelope for `url`.
///
/// Non-object payloads contribute no fields.
#[must_use]
pub fn envelope(url: &str, payload: Value) -> Value {
    let mut fields = meta_fields(url);
    if let Value::Object(payload) = payload {
        fields.extend(payload);
    }
    Value::Object(fields)
}

/// A `links` payload with one internal link per entry of `paths`.
#[must_use]
pub fn links_payload(base: &str, paths: &[&str]) -> Value {
    let links: Vec<Value> = paths
        .iter()
        .map(|path| {
            json!({
                "url": format!("{}{}", base.trim_end_matches('/'), path),
                "text": path.trim_start_matches('/'),
                "isExternal": false
            })
        })
        .collect();
    json!({
        "totalLinks": links.len(),
        "uniqueDomains": usize::from(!links.is_empty()),
        "links": links
    })
}

/// An `open-graph` payload with all three views populated.
#[must_use]
pub fn open_graph_payload() -> Value {
    json!({
        "openGraph": {
            "description": "Example description",
            "title": "Example Title",
            "site_name": "Example Site",
            "image": {"url": "https://example.com/og.jpg"},
            "video": null,
            "url": "https://example.com/",
            "ogType": "website"
        },
        "htmlInferred": {
            "description": "Fallback description",
            "title": "Fallback Title",
            "type": "website",
            "url": "https://example.com/",
            "favicon": "https://example.com/favicon.ico",
            "images": ["https://example.com/fallback.jpg"],
            "image": "https://example.com/fallback.jpg",
            "site_name": "example.com"
        },
        "hybridGraph": {
            "description": "Hybrid description",
            "title": "Hybrid Title",
            "type": "website",
            "image": "https://example.com/hybrid.jpg",
            "video": null,
            "videoType": "unknown",
            "favicon": "https://example.com/favicon.ico",
            "site_name": "Example Site",
            "url": "https://example.com/",
            "videoWidth": null,
            "videoHeight": null
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::split_envelope;

    #[test]
    fn test_envelope_splits_back() {
        let raw = envelope("https://example.com/", links_payload("https://example.com", &["/a", "/b"]));
        let (meta, payload) = split_envelope(&raw).unwrap();

        assert_eq!(meta.status, 200);
        assert_eq!(meta.fetched_at, FIXTURE_FETCHED_AT);
        assert_eq!(payload["totalLinks"], 2);
        assert_eq!(payload["links"][0]["url"], "https://example.com/a");
    }

    #[test]
    fn test_envelope_ignores_non_object_payload() {
        let raw = envelope("https://example.com/", Value::Null);
        assert_eq!(raw.as_object().map(Map::len), Some(meta_fields("x").len()));
    }
}
