//! The `open-graph` endpoint.
//!
//! The server reports three views of the page's share metadata: the
//! declared Open Graph tags, values inferred from plain HTML, and a hybrid
//! of both. [`OpenGraphExtractor`] merges them into one
//! [`OpenGraphSummary`], preferring declared tags, and skips URLs whose
//! pages are known not to carry useful tags.

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::OnceLock;
use url::Url;

use super::ExtractorEndpoint;
use crate::errors::HookkitError;
use crate::extractor::envelope::WebsiteExtractMeta;

/// URL patterns skipped unless overridden.
pub const DEFAULT_SKIP_PATTERNS: [&str; 4] = [
    r"search\.google\.com/local/reviews",
    r"google\.com/maps/place",
    r"maps\.google\.com",
    r"opentable\.com",
];

/// An `og:image` or `og:video` entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenGraphMedia {
    /// Media URL.
    pub url: Option<String>,
    /// Declared height.
    pub height: Option<String>,
    /// Declared width.
    pub width: Option<String>,
}

/// Declared Open Graph tags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenGraphTags {
    /// `og:description`.
    pub description: Option<String>,
    /// `og:title`.
    pub title: Option<String>,
    /// `og:site_name`.
    pub site_name: Option<String>,
    /// `og:image`.
    pub image: Option<OpenGraphMedia>,
    /// `og:video`.
    pub video: Option<OpenGraphMedia>,
    /// `og:url`.
    pub url: Option<String>,
    /// `og:type`.
    #[serde(rename = "ogType")]
    pub og_type: Option<String>,
}

/// Values inferred from the HTML document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HtmlInferred {
    /// Inferred description.
    pub description: Option<String>,
    /// Inferred title.
    pub title: Option<String>,
    /// Inferred page type.
    #[serde(rename = "type")]
    pub page_type: Option<String>,
    /// Inferred video type.
    #[serde(rename = "videoType")]
    pub video_type: Option<String>,
    /// Inferred URL.
    pub url: Option<String>,
    /// Favicon URL.
    pub favicon: Option<String>,
    /// Candidate images in document order.
    pub images: Option<Vec<String>>,
    /// Preferred image.
    pub image: Option<String>,
    /// Inferred site name.
    pub site_name: Option<String>,
}

/// Declared tags with inferred values filling the gaps.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HybridGraph {
    /// Description.
    pub description: Option<String>,
    /// Title.
    pub title: Option<String>,
    /// Page type.
    #[serde(rename = "type")]
    pub page_type: Option<String>,
    /// Image URL.
    pub image: Option<String>,
    /// Video URL.
    pub video: Option<String>,
    /// Video type.
    #[serde(rename = "videoType")]
    pub video_type: Option<String>,
    /// Favicon URL.
    pub favicon: Option<String>,
    /// Site name.
    pub site_name: Option<String>,
    /// URL.
    pub url: Option<String>,
    /// Video width in pixels.
    #[serde(rename = "videoWidth")]
    pub video_width: Option<f64>,
    /// Video height in pixels.
    #[serde(rename = "videoHeight")]
    pub video_height: Option<f64>,
}

/// Payload of the `open-graph` endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OpenGraphPayload {
    /// Declared tags.
    pub open_graph: Option<OpenGraphTags>,
    /// HTML-inferred values.
    pub html_inferred: Option<HtmlInferred>,
    /// Hybrid view.
    pub hybrid_graph: Option<HybridGraph>,
}

/// Merged share metadata for a page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenGraphSummary {
    /// Description.
    pub description: Option<String>,
    /// Favicon URL.
    pub favicon: Option<String>,
    /// Image URL.
    pub image: Option<String>,
    /// Video URL.
    pub video: Option<String>,
    /// Video type.
    pub video_type: Option<String>,
    /// Site name.
    pub site_name: Option<String>,
    /// Title.
    pub title: Option<String>,
    /// Resolved page URL; empty when nothing resolved.
    pub url: String,
    /// Hostname of `url`, when it parses.
    pub site_host: Option<String>,
}

/// Options for [`OpenGraphExtractor`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenGraphOptions {
    /// Case-insensitive regular expressions; matching URLs are never requested.
    #[serde(default = "default_skip_patterns")]
    pub skip_patterns: Vec<String>,
}

fn default_skip_patterns() -> Vec<String> {
    DEFAULT_SKIP_PATTERNS.iter().map(ToString::to_string).collect()
}

impl Default for OpenGraphOptions {
    fn default() -> Self {
        Self {
            skip_patterns: default_skip_patterns(),
        }
    }
}

impl OpenGraphOptions {
    /// Replaces the skip patterns.
    #[must_use]
    pub fn with_skip_patterns<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.skip_patterns = patterns.into_iter().map(Into::into).collect();
        self
    }
}

fn compile(pattern: &str) -> Result<Regex, HookkitError> {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .map_err(|e| HookkitError::invalid_pattern(pattern, e.to_string()))
}

fn default_skip_list() -> &'static [Regex] {
    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        DEFAULT_SKIP_PATTERNS
            .iter()
            .filter_map(|p| compile(p).ok())
            .collect()
    })
}

/// Adapter for the `open-graph` endpoint.
#[derive(Debug, Clone)]
pub struct OpenGraphExtractor {
    skip: Vec<Regex>,
}

impl Default for OpenGraphExtractor {
    fn default() -> Self {
        Self {
            skip: default_skip_list().to_vec(),
        }
    }
}

impl OpenGraphExtractor {
    /// Creates an adapter from options, compiling its skip patterns.
    pub fn new(options: &OpenGraphOptions) -> Result<Self, HookkitError> {
        let skip = options
            .skip_patterns
            .iter()
            .map(|p| compile(p))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { skip })
    }

    /// Merges the three graph views into a summary.
    #[must_use]
    pub fn summarize(payload: &OpenGraphPayload, meta: &WebsiteExtractMeta) -> OpenGraphSummary {
        let og = payload.open_graph.clone().unwrap_or_default();
        let html = payload.html_inferred.clone().unwrap_or_default();
        let hybrid = payload.hybrid_graph.clone().unwrap_or_default();

        let og_image = og.image.as_ref().and_then(|m| m.url.as_deref());
        let og_video = og.video.as_ref().and_then(|m| m.url.as_deref());
        let first_html_image = html.images.as_ref().and_then(|images| images.first()).map(String::as_str);

        let url = pick_first_string(&[
            Some(meta.url.as_str()),
            og.url.as_deref(),
            hybrid.url.as_deref(),
            html.url.as_deref(),
            Some(meta.final_url.as_str()),
            Some(meta.normalized_url.as_str()),
            Some(meta.requested_url.as_str()),
        ])
        .unwrap_or_default();

        OpenGraphSummary {
            description: pick_first_string(&[
                og.description.as_deref(),
                hybrid.description.as_deref(),
                html.description.as_deref(),
            ]),
            favicon: pick_first_string(&[hybrid.favicon.as_deref(), html.favicon.as_deref()]),
            image: pick_first_string(&[
                og_image,
                hybrid.image.as_deref(),
                html.image.as_deref(),
                first_html_image,
            ]),
            video: pick_first_string(&[og_video, hybrid.video.as_deref()]),
            video_type: pick_first_string(&[hybrid.video_type.as_deref(), html.video_type.as_deref()]),
            site_name: pick_first_string(&[
                og.site_name.as_deref(),
                hybrid.site_name.as_deref(),
                html.site_name.as_deref(),
            ]),
            title: pick_first_string(&[
                og.title.as_deref(),
                hybrid.title.as_deref(),
                html.title.as_deref(),
            ]),
            site_host: safe_host(&url),
            url,
        }
    }
}

impl ExtractorEndpoint for OpenGraphExtractor {
    type Payload = OpenGraphPayload;
    type Data = OpenGraphSummary;

    fn name(&self) -> &str {
        "open-graph"
    }

    fn select_data(&self, payload: OpenGraphPayload, _raw: &Value, meta: &WebsiteExtractMeta) -> OpenGraphSummary {
        Self::summarize(&payload, meta)
    }

    fn should_skip(&self, url: &str) -> bool {
        self.skip.iter().any(|pattern| pattern.is_match(url))
    }
}

/// First candidate that is not blank, returned untrimmed.
fn pick_first_string(candidates: &[Option<&str>]) -> Option<String> {
    candidates
        .iter()
        .flatten()
        .find(|value| !value.trim().is_empty())
        .map(|value| (*value).to_string())
}

fn safe_host(value: &str) -> Option<String> {
    if value.is_empty() {
        return None;
    }
    Url::parse(value).ok()?.host_str().map(String::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn base_meta() -> WebsiteExtractMeta {
        WebsiteExtractMeta {
            requested_url: "https://example.com/".to_string(),
            final_url: "https://example.com/".to_string(),
            url: "https://example.com/".to_string(),
            normalized_url: "https://example.com/".to_string(),
            status: 200,
            ..Default::default()
        }
    }

    #[test]
    fn test_summary_prefers_declared_tags() {
        let payload: OpenGraphPayload = serde_json::from_value(json!({
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
                "favicon": "https://example.com/favicon.ico",
                "images": ["https://example.com/fallback.jpg"],
                "image": "https://example.com/fallback.jpg",
                "site_name": "example.com"
            },
            "hybridGraph": {
                "description": "Hybrid description",
                "title": "Hybrid Title",
                "image": "https://example.com/hybrid.jpg",
                "videoType": "unknown",
                "favicon": "https://example.com/favicon.ico",
                "site_name": "Example Site",
                "videoWidth": null
            }
        }))
        .unwrap();

        let summary = OpenGraphExtractor::summarize(&payload, &base_meta());
        assert_eq!(
            summary,
            OpenGraphSummary {
                description: Some("Example description".to_string()),
                favicon: Some("https://example.com/favicon.ico".to_string()),
                image: Some("https://example.com/og.jpg".to_string()),
                video: None,
                video_type: Some("unknown".to_string()),
                site_name: Some("Example Site".to_string()),
                title: Some("Example Title".to_string()),
                url: "https://example.com/".to_string(),
                site_host: Some("example.com".to_string()),
            }
        );
    }

    #[test]
    fn test_summary_falls_back_past_blank_values() {
        let payload: OpenGraphPayload = serde_json::from_value(json!({
            "openGraph": {"title": "   ", "image": {"url": ""}},
            "hybridGraph": {"title": null, "video": "https://cdn.test/v.mp4"},
            "htmlInferred": {"title": "HTML Title", "images": ["https://cdn.test/first.png", "https://cdn.test/second.png"]}
        }))
        .unwrap();

        let summary = OpenGraphExtractor::summarize(&payload, &base_meta());
        assert_eq!(summary.title.as_deref(), Some("HTML Title"));
        assert_eq!(summary.image.as_deref(), Some("https://cdn.test/first.png"));
        assert_eq!(summary.video.as_deref(), Some("https://cdn.test/v.mp4"));
        assert_eq!(summary.description, None);
    }

    #[test]
    fn test_url_resolution_order() {
        let payload: OpenGraphPayload = serde_json::from_value(json!({
            "hybridGraph": {"url": "https://hybrid.example.org/page"}
        }))
        .unwrap();
        let meta = WebsiteExtractMeta {
            final_url: "https://final.example.net/".to_string(),
            ..Default::default()
        };

        let summary = OpenGraphExtractor::summarize(&payload, &meta);
        assert_eq!(summary.url, "https://hybrid.example.org/page");
        assert_eq!(summary.site_host.as_deref(), Some("hybrid.example.org"));

        let summary = OpenGraphExtractor::summarize(&OpenGraphPayload::default(), &meta);
        assert_eq!(summary.url, "https://final.example.net/");

        let summary = OpenGraphExtractor::summarize(&OpenGraphPayload::default(), &WebsiteExtractMeta::default());
        assert_eq!(summary.url, "");
        assert_eq!(summary.site_host, None);
    }

    #[test]
    fn test_unparseable_url_has_no_host() {
        let meta = WebsiteExtractMeta {
            url: "not a url".to_string(),
            ..Default::default()
        };
        let summary = OpenGraphExtractor::summarize(&OpenGraphPayload::default(), &meta);
        assert_eq!(summary.url, "not a url");
        assert_eq!(summary.site_host, None);
    }

    #[test]
    fn test_default_skip_patterns() {
        let extractor = OpenGraphExtractor::default();
        assert!(extractor.should_skip("https://www.google.com/maps/place/Some+Cafe"));
        assert!(extractor.should_skip("https://SEARCH.GOOGLE.COM/local/reviews?q=x"));
        assert!(extractor.should_skip("https://maps.google.com/?cid=1"));
        assert!(extractor.should_skip("https://www.opentable.com/r/some-place"));
        assert!(!extractor.should_skip("https://example.com/"));
    }

    #[test]
    fn test_custom_skip_patterns() {
        let options = OpenGraphOptions::default().with_skip_patterns(["internal\\.test"]);
        let extractor = OpenGraphExtractor::new(&options).unwrap();
        assert!(extractor.should_skip("https://INTERNAL.test/page"));
        assert!(!extractor.should_skip("https://www.opentable.com/r/some-place"));
    }

    #[test]
    fn test_invalid_skip_pattern() {
        let options = OpenGraphOptions::default().with_skip_patterns(["(unclosed"]);
        let err = OpenGraphExtractor::new(&options).unwrap_err();
        assert!(matches!(err, HookkitError::InvalidPattern { .. }));
    }
}
