//! Social platform detection from URLs.
//!
//! Hostnames are matched against a fixed table of known domains, short
//! links and regional variants, then against a few suffix rules for
//! user-owned subdomains.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::OnceLock;
use url::Url;

/// A recognized social or developer platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SocialPlatform {
    /// Instagram.
    Instagram,
    /// LinkedIn.
    LinkedIn,
    /// Google.
    Google,
    /// Facebook.
    Facebook,
    /// TikTok.
    TikTok,
    /// YouTube.
    YouTube,
    /// Yelp.
    Yelp,
    /// Spotify.
    Spotify,
    /// Apple.
    Apple,
    /// X (formerly Twitter).
    X,
    /// GitHub.
    GitHub,
    /// Discord.
    Discord,
    /// Snapchat.
    Snapchat,
    /// dev.to.
    Dev,
    /// Substack.
    Substack,
    /// Reddit.
    Reddit,
    /// Pinterest.
    Pinterest,
    /// Threads (Meta).
    Threads,
    /// Twitch.
    Twitch,
    /// WhatsApp.
    WhatsApp,
    /// Telegram.
    Telegram,
    /// Medium.
    Medium,
    /// Patreon.
    Patreon,
    /// OnlyFans.
    OnlyFans,
    /// Eventbrite.
    Eventbrite,
    /// The npm registry.
    Npmjs,
    /// crates.io.
    Crates,
    /// RubyGems.
    RubyGems,
    /// Behance.
    Behance,
    /// Dribbble.
    Dribbble,
    /// No recognized platform.
    Unknown,
}

impl SocialPlatform {
    /// Returns the lowercase platform name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Instagram => "instagram",
            Self::LinkedIn => "linkedin",
            Self::Google => "google",
            Self::Facebook => "facebook",
            Self::TikTok => "tiktok",
            Self::YouTube => "youtube",
            Self::Yelp => "yelp",
            Self::Spotify => "spotify",
            Self::Apple => "apple",
            Self::X => "x",
            Self::GitHub => "github",
            Self::Discord => "discord",
            Self::Snapchat => "snapchat",
            Self::Dev => "dev",
            Self::Substack => "substack",
            Self::Reddit => "reddit",
            Self::Pinterest => "pinterest",
            Self::Threads => "threads",
            Self::Twitch => "twitch",
            Self::WhatsApp => "whatsapp",
            Self::Telegram => "telegram",
            Self::Medium => "medium",
            Self::Patreon => "patreon",
            Self::OnlyFans => "onlyfans",
            Self::Eventbrite => "eventbrite",
            Self::Npmjs => "npmjs",
            Self::Crates => "crates",
            Self::RubyGems => "rubygems",
            Self::Behance => "behance",
            Self::Dribbble => "dribbble",
            Self::Unknown => "unknown",
        }
    }

    /// Whether the platform was recognized.
    #[must_use]
    pub fn is_known(self) -> bool {
        self != Self::Unknown
    }
}

impl fmt::Display for SocialPlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

const HOSTNAMES: &[(&str, SocialPlatform)] = &[
    ("instagram.com", SocialPlatform::Instagram),
    ("www.instagram.com", SocialPlatform::Instagram),
    ("instagr.am", SocialPlatform::Instagram),
    ("www.instagr.am", SocialPlatform::Instagram),
    ("linkedin.com", SocialPlatform::LinkedIn),
    ("www.linkedin.com", SocialPlatform::LinkedIn),
    ("ca.linkedin.com", SocialPlatform::LinkedIn),
    ("uk.linkedin.com", SocialPlatform::LinkedIn),
    ("in.linkedin.com", SocialPlatform::LinkedIn),
    ("lnkd.in", SocialPlatform::LinkedIn),
    ("google.com", SocialPlatform::Google),
    ("www.google.com", SocialPlatform::Google),
    ("maps.google.com", SocialPlatform::Google),
    ("goo.gl", SocialPlatform::Google),
    ("maps.app.goo.gl", SocialPlatform::Google),
    ("g.co", SocialPlatform::Google),
    ("facebook.com", SocialPlatform::Facebook),
    ("www.facebook.com", SocialPlatform::Facebook),
    ("m.facebook.com", SocialPlatform::Facebook),
    ("fb.com", SocialPlatform::Facebook),
    ("fb.me", SocialPlatform::Facebook),
    ("on.fb.me", SocialPlatform::Facebook),
    ("tiktok.com", SocialPlatform::TikTok),
    ("www.tiktok.com", SocialPlatform::TikTok),
    ("m.tiktok.com", SocialPlatform::TikTok),
    ("vm.tiktok.com", SocialPlatform::TikTok),
    ("vt.tiktok.com", SocialPlatform::TikTok),
    ("youtube.com", SocialPlatform::YouTube),
    ("www.youtube.com", SocialPlatform::YouTube),
    ("m.youtube.com", SocialPlatform::YouTube),
    ("youtu.be", SocialPlatform::YouTube),
    ("yelp.com", SocialPlatform::Yelp),
    ("www.yelp.com", SocialPlatform::Yelp),
    ("m.yelp.com", SocialPlatform::Yelp),
    ("spotify.com", SocialPlatform::Spotify),
    ("www.spotify.com", SocialPlatform::Spotify),
    ("open.spotify.com", SocialPlatform::Spotify),
    ("play.spotify.com", SocialPlatform::Spotify),
    ("spoti.fi", SocialPlatform::Spotify),
    ("spotify.link", SocialPlatform::Spotify),
    ("apple.com", SocialPlatform::Apple),
    ("www.apple.com", SocialPlatform::Apple),
    ("music.apple.com", SocialPlatform::Apple),
    ("podcasts.apple.com", SocialPlatform::Apple),
    ("apps.apple.com", SocialPlatform::Apple),
    ("itunes.apple.com", SocialPlatform::Apple),
    ("x.com", SocialPlatform::X),
    ("www.x.com", SocialPlatform::X),
    ("twitter.com", SocialPlatform::X),
    ("www.twitter.com", SocialPlatform::X),
    ("t.co", SocialPlatform::X),
    ("github.com", SocialPlatform::GitHub),
    ("www.github.com", SocialPlatform::GitHub),
    ("gist.github.com", SocialPlatform::GitHub),
    ("raw.githubusercontent.com", SocialPlatform::GitHub),
    ("github.io", SocialPlatform::GitHub),
    ("discord.com", SocialPlatform::Discord),
    ("www.discord.com", SocialPlatform::Discord),
    ("discord.gg", SocialPlatform::Discord),
    ("discordapp.com", SocialPlatform::Discord),
    ("discordapp.net", SocialPlatform::Discord),
    ("discord.new", SocialPlatform::Discord),
    ("discord.gift", SocialPlatform::Discord),
    ("discord.gifts", SocialPlatform::Discord),
    ("dis.gd", SocialPlatform::Discord),
    ("snapchat.com", SocialPlatform::Snapchat),
    ("www.snapchat.com", SocialPlatform::Snapchat),
    ("snap.com", SocialPlatform::Snapchat),
    ("www.snap.com", SocialPlatform::Snapchat),
    ("story.snapchat.com", SocialPlatform::Snapchat),
    ("web.snapchat.com", SocialPlatform::Snapchat),
    ("dev.to", SocialPlatform::Dev),
    ("www.dev.to", SocialPlatform::Dev),
    ("substack.com", SocialPlatform::Substack),
    ("www.substack.com", SocialPlatform::Substack),
    ("reddit.com", SocialPlatform::Reddit),
    ("www.reddit.com", SocialPlatform::Reddit),
    ("old.reddit.com", SocialPlatform::Reddit),
    ("new.reddit.com", SocialPlatform::Reddit),
    ("i.redd.it", SocialPlatform::Reddit),
    ("v.redd.it", SocialPlatform::Reddit),
    ("redd.it", SocialPlatform::Reddit),
    ("preview.redd.it", SocialPlatform::Reddit),
    ("pinterest.com", SocialPlatform::Pinterest),
    ("www.pinterest.com", SocialPlatform::Pinterest),
    ("pin.it", SocialPlatform::Pinterest),
    ("in.pinterest.com", SocialPlatform::Pinterest),
    ("br.pinterest.com", SocialPlatform::Pinterest),
    ("uk.pinterest.com", SocialPlatform::Pinterest),
    ("threads.net", SocialPlatform::Threads),
    ("www.threads.net", SocialPlatform::Threads),
    ("threads.com", SocialPlatform::Threads),
    ("www.threads.com", SocialPlatform::Threads),
    ("twitch.tv", SocialPlatform::Twitch),
    ("www.twitch.tv", SocialPlatform::Twitch),
    ("m.twitch.tv", SocialPlatform::Twitch),
    ("whatsapp.com", SocialPlatform::WhatsApp),
    ("www.whatsapp.com", SocialPlatform::WhatsApp),
    ("wa.me", SocialPlatform::WhatsApp),
    ("web.whatsapp.com", SocialPlatform::WhatsApp),
    ("telegram.org", SocialPlatform::Telegram),
    ("www.telegram.org", SocialPlatform::Telegram),
    ("t.me", SocialPlatform::Telegram),
    ("telegram.me", SocialPlatform::Telegram),
    ("telegram.dog", SocialPlatform::Telegram),
    ("medium.com", SocialPlatform::Medium),
    ("www.medium.com", SocialPlatform::Medium),
    ("patreon.com", SocialPlatform::Patreon),
    ("www.patreon.com", SocialPlatform::Patreon),
    ("onlyfans.com", SocialPlatform::OnlyFans),
    ("www.onlyfans.com", SocialPlatform::OnlyFans),
    ("eventbrite.com", SocialPlatform::Eventbrite),
    ("www.eventbrite.com", SocialPlatform::Eventbrite),
    ("eventbrite.co.uk", SocialPlatform::Eventbrite),
    ("eventbrite.com.au", SocialPlatform::Eventbrite),
    ("eventbrite.ca", SocialPlatform::Eventbrite),
    ("eventbrite.de", SocialPlatform::Eventbrite),
    ("eventbrite.fr", SocialPlatform::Eventbrite),
    ("eventbrite.es", SocialPlatform::Eventbrite),
    ("eventbrite.it", SocialPlatform::Eventbrite),
    ("eventbrite.ie", SocialPlatform::Eventbrite),
    ("eventbrite.nl", SocialPlatform::Eventbrite),
    ("eventbrite.co.nz", SocialPlatform::Eventbrite),
    ("eventbriteapi.com", SocialPlatform::Eventbrite),
    ("evbuc.com", SocialPlatform::Eventbrite),
    ("npmjs.com", SocialPlatform::Npmjs),
    ("www.npmjs.com", SocialPlatform::Npmjs),
    ("npmjs.org", SocialPlatform::Npmjs),
    ("www.npmjs.org", SocialPlatform::Npmjs),
    ("registry.npmjs.org", SocialPlatform::Npmjs),
    ("registry.npmjs.com", SocialPlatform::Npmjs),
    ("replicate.npmjs.com", SocialPlatform::Npmjs),
    ("crates.io", SocialPlatform::Crates),
    ("www.crates.io", SocialPlatform::Crates),
    ("rubygems.org", SocialPlatform::RubyGems),
    ("www.rubygems.org", SocialPlatform::RubyGems),
    ("behance.net", SocialPlatform::Behance),
    ("www.behance.net", SocialPlatform::Behance),
    ("portfolio.behance.net", SocialPlatform::Behance),
    ("mir-s3-cdn-cf.behance.net", SocialPlatform::Behance),
    ("dribbble.com", SocialPlatform::Dribbble),
    ("www.dribbble.com", SocialPlatform::Dribbble),
    ("drbl.in", SocialPlatform::Dribbble),
];

fn hostname_table() -> &'static HashMap<&'static str, SocialPlatform> {
    static TABLE: OnceLock<HashMap<&'static str, SocialPlatform>> = OnceLock::new();
    TABLE.get_or_init(|| HOSTNAMES.iter().copied().collect())
}

/// Suffix rules tried in order when the exact table misses.
fn match_fallback(hostname: &str) -> SocialPlatform {
    if hostname.ends_with(".substack.com") {
        SocialPlatform::Substack
    } else if hostname.ends_with(".github.io") {
        SocialPlatform::GitHub
    } else if hostname.contains("pinterest.com") {
        SocialPlatform::Pinterest
    } else if hostname.contains("eventbrite.") {
        SocialPlatform::Eventbrite
    } else if hostname.ends_with(".medium.com") {
        SocialPlatform::Medium
    } else if hostname.ends_with(".behance.net") {
        SocialPlatform::Behance
    } else {
        SocialPlatform::Unknown
    }
}

/// Identifies the platform a URL points at.
///
/// Blank or unparseable input, and URLs without a host, yield
/// [`SocialPlatform::Unknown`].
#[must_use]
pub fn platform_from_url(url: &str) -> SocialPlatform {
    let trimmed = url.trim();
    if trimmed.is_empty() {
        return SocialPlatform::Unknown;
    }
    let Ok(parsed) = Url::parse(trimmed) else {
        return SocialPlatform::Unknown;
    };
    let Some(host) = parsed.host_str() else {
        return SocialPlatform::Unknown;
    };
    platform_from_hostname(host)
}

/// Identifies the platform for a bare hostname.
#[must_use]
pub fn platform_from_hostname(hostname: &str) -> SocialPlatform {
    let hostname = hostname.to_ascii_lowercase();
    hostname_table()
        .get(hostname.as_str())
        .copied()
        .unwrap_or_else(|| match_fallback(&hostname))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_hosts() {
        assert_eq!(platform_from_url("https://www.youtube.com/@iamthedelo"), SocialPlatform::YouTube);
        assert_eq!(platform_from_url("https://maps.app.goo.gl/XDuog3V5fTuPcWCH7"), SocialPlatform::Google);
        assert_eq!(platform_from_url("https://twitter.com/jordanhudgens"), SocialPlatform::X);
        assert_eq!(platform_from_url("https://crates.io/crates/serde"), SocialPlatform::Crates);
        assert_eq!(platform_from_url("https://wa.me/15555550100"), SocialPlatform::WhatsApp);
        assert_eq!(platform_from_url("https://drbl.in/abc"), SocialPlatform::Dribbble);
    }

    #[test]
    fn test_case_and_whitespace_insensitive() {
        assert_eq!(platform_from_url("  HTTPS://WWW.Instagram.COM/someone  "), SocialPlatform::Instagram);
        assert_eq!(platform_from_hostname("GitHub.com"), SocialPlatform::GitHub);
    }

    #[test]
    fn test_fallback_rules() {
        assert_eq!(platform_from_url("https://writer.substack.com/p/post"), SocialPlatform::Substack);
        assert_eq!(platform_from_url("https://someone.github.io/"), SocialPlatform::GitHub);
        assert_eq!(platform_from_url("https://de.pinterest.com/pin/1"), SocialPlatform::Pinterest);
        assert_eq!(platform_from_url("https://www.eventbrite.com.mx/e/1"), SocialPlatform::Eventbrite);
        assert_eq!(platform_from_url("https://author.medium.com/story"), SocialPlatform::Medium);
        assert_eq!(platform_from_url("https://studio.behance.net/"), SocialPlatform::Behance);
    }

    #[test]
    fn test_unknown_inputs() {
        assert_eq!(platform_from_url(""), SocialPlatform::Unknown);
        assert_eq!(platform_from_url("   "), SocialPlatform::Unknown);
        assert_eq!(platform_from_url("not-a-url"), SocialPlatform::Unknown);
        assert_eq!(platform_from_url("mailto:someone@example.com"), SocialPlatform::Unknown);
        assert_eq!(platform_from_url("https://example.com/"), SocialPlatform::Unknown);
        assert!(!SocialPlatform::Unknown.is_known());
    }

    #[test]
    fn test_names_round_trip_through_serde() {
        assert_eq!(SocialPlatform::OnlyFans.to_string(), "onlyfans");
        assert_eq!(serde_json::to_string(&SocialPlatform::Npmjs).unwrap(), "\"npmjs\"");
        let parsed: SocialPlatform = serde_json::from_str("\"linkedin\"").unwrap();
        assert_eq!(parsed, SocialPlatform::LinkedIn);
    }
}
