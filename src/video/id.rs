use std::fmt;

use serde::{Deserialize, Serialize};
use url::Url;

/// Query parameter naming the watched video.
pub const VIDEO_PARAM: &str = "v";
/// Query parameter the site uses to request autoplay.
pub const AUTOPLAY_PARAM: &str = "autoplay";

const WATCH_HOST: &str = "youtube.com";
const WATCH_PATH: &str = "/watch";

/// Identifier of a watched video, taken from the page address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VideoId(String);

impl VideoId {
    /// Builds an identifier from a raw value, kept exactly as given. Blank
    /// values are rejected.
    #[must_use]
    pub fn new(value: &str) -> Option<Self> {
        if value.trim().is_empty() {
            return None;
        }
        Some(Self(value.to_owned()))
    }

    /// Extracts the identifier from a full page address, if it names one.
    #[must_use]
    pub fn from_page_url(location: &str) -> Option<Self> {
        let url = Url::parse(location).ok()?;
        url.query_pairs()
            .find(|(key, _)| key == VIDEO_PARAM)
            .and_then(|(_, value)| Self::new(&value))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }

    /// Canonical watch-page address for this video.
    #[must_use]
    pub fn watch_url(&self) -> String {
        format!("https://www.{}{}?{}={}", WATCH_HOST, WATCH_PATH, VIDEO_PARAM, self.0)
    }
}

impl fmt::Display for VideoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for VideoId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Returns true when the address is a video watch page on the hosted site.
#[must_use]
pub fn is_watch_page(location: &str) -> bool {
    let Ok(url) = Url::parse(location) else {
        return false;
    };
    let host_matches = url.host_str().is_some_and(|host| {
        host == WATCH_HOST
            || host
                .strip_suffix(WATCH_HOST)
                .is_some_and(|prefix| prefix.ends_with('.'))
    });
    host_matches && url.path() == WATCH_PATH
}

/// Rewrites an active `autoplay` query parameter to `0`.
///
/// Returns `Ok(None)` when the address carries no such parameter or it is
/// already off.
///
/// # Errors
///
/// Returns an error when the address cannot be parsed as a URL.
pub fn disable_autoplay_param(location: &str) -> Result<Option<String>, url::ParseError> {
    let mut url = Url::parse(location)?;
    let needs_rewrite = url
        .query_pairs()
        .any(|(key, value)| key == AUTOPLAY_PARAM && value != "0");
    if !needs_rewrite {
        return Ok(None);
    }

    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(key, value)| {
            if key == AUTOPLAY_PARAM {
                (key.into_owned(), "0".to_owned())
            } else {
                (key.into_owned(), value.into_owned())
            }
        })
        .collect();
    url.query_pairs_mut().clear().extend_pairs(pairs);
    Ok(Some(url.into()))
}
