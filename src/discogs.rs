//! Discogs URL classification.
//!
//! Recognizes the three path shapes Discogs uses for catalog pages:
//!
//! ```text
//! /release/249504                      bare
//! /release/249504-Nirvana-Nevermind    slug suffix, id is before the first '-'
//! /ja/master/12345                     two-letter locale prefix
//! ```
//!
//! Any two-character first segment counts as a locale, so `/xx/label/1` is
//! accepted even when `xx` is not a real locale.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The Discogs entity a URL points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscogsKind {
    Release,
    Master,
    Artist,
    Label,
}

impl DiscogsKind {
    fn from_segment(segment: &str) -> Option<Self> {
        match segment {
            "release" => Some(Self::Release),
            "master" => Some(Self::Master),
            "artist" => Some(Self::Artist),
            "label" => Some(Self::Label),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Release => "release",
            Self::Master => "master",
            Self::Artist => "artist",
            Self::Label => "label",
        }
    }
}

impl fmt::Display for DiscogsKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A classified Discogs URL. `id` is the numeric identifier as written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscogsRef {
    #[serde(rename = "type")]
    pub kind: DiscogsKind,
    pub id: String,
}

/// Classify a Discogs URL, or `None` if it is not one of the known forms.
pub fn classify(url: &str) -> Option<DiscogsRef> {
    let url = url.trim();
    let rest = strip_scheme(url);

    let authority_end = rest.find(['/', '?', '#']).unwrap_or(rest.len());
    let (authority, tail) = rest.split_at(authority_end);
    if !is_discogs_host(authority) {
        return None;
    }

    let path_end = tail.find(['?', '#']).unwrap_or(tail.len());
    let mut segments = tail[..path_end].split('/').filter(|s| !s.is_empty());

    let mut first = segments.next()?;
    if first.chars().count() == 2 {
        first = segments.next()?;
    }
    let kind = DiscogsKind::from_segment(first)?;

    let id_segment = segments.next()?;
    let id = id_segment.split('-').next().unwrap_or_default();
    if id.is_empty() || !id.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    Some(DiscogsRef {
        kind,
        id: id.to_string(),
    })
}

fn strip_scheme(url: &str) -> &str {
    for scheme in ["https://", "http://"] {
        if url.len() >= scheme.len() && url[..scheme.len()].eq_ignore_ascii_case(scheme) {
            return &url[scheme.len()..];
        }
    }
    url.strip_prefix("//").unwrap_or(url)
}

fn is_discogs_host(authority: &str) -> bool {
    let host = authority.rsplit('@').next().unwrap_or(authority);
    let host = host.split(':').next().unwrap_or(host).to_ascii_lowercase();
    host == "discogs.com" || host.ends_with(".discogs.com")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn r(kind: DiscogsKind, id: &str) -> Option<DiscogsRef> {
        Some(DiscogsRef {
            kind,
            id: id.to_string(),
        })
    }

    #[test]
    fn test_slug_form() {
        assert_eq!(
            classify("https://www.discogs.com/release/249504-Nirvana-Nevermind"),
            r(DiscogsKind::Release, "249504")
        );
    }

    #[test]
    fn test_locale_form() {
        assert_eq!(
            classify("https://www.discogs.com/ja/master/12345"),
            r(DiscogsKind::Master, "12345")
        );
        assert_eq!(
            classify("https://www.discogs.com/de/artist/125246-Nirvana"),
            r(DiscogsKind::Artist, "125246")
        );
    }

    #[test]
    fn test_bare_form_and_host_variants() {
        assert_eq!(classify("https://discogs.com/label/1"), r(DiscogsKind::Label, "1"));
        assert_eq!(classify("www.discogs.com/release/7"), r(DiscogsKind::Release, "7"));
        assert_eq!(
            classify("HTTP://WWW.DISCOGS.COM:443/release/7?ev=rr#tracks"),
            r(DiscogsKind::Release, "7")
        );
    }

    #[test]
    fn test_any_two_letter_prefix_is_a_locale() {
        assert_eq!(
            classify("https://www.discogs.com/xx/release/5"),
            r(DiscogsKind::Release, "5")
        );
    }

    #[test]
    fn test_rejects_other_hosts() {
        assert_eq!(classify("https://example.com/release/1"), None);
        assert_eq!(classify("https://notdiscogs.com/release/1"), None);
        assert_eq!(classify("https://discogs.com.evil.net/release/1"), None);
    }

    #[test]
    fn test_rejects_unknown_paths() {
        assert_eq!(classify("https://www.discogs.com/"), None);
        assert_eq!(classify("https://www.discogs.com/sell/release/1"), None);
        assert_eq!(classify("https://www.discogs.com/release/"), None);
        assert_eq!(classify("https://www.discogs.com/release/abc-Title"), None);
        assert_eq!(classify("https://www.discogs.com/ja/"), None);
        assert_eq!(classify(""), None);
    }

    #[test]
    fn test_serializes_with_type_key() {
        let json = serde_json::to_value(classify("https://discogs.com/master/9")).unwrap();
        assert_eq!(json, serde_json::json!({"type": "master", "id": "9"}));
    }
}
