//! YouTube link handling.
//!
//! A YouTube URL gets its title, thumbnail and site name from the platform's
//! oEmbed endpoint instead of from the page's own tags.
//!
//! Identifier contract: the URL's host or path must contain `youtube.com`
//! or `youtu.be`; a mention in the query string does not count. The
//! identifier is the text after the last occurrence of one of
//! `youtu.be/`, `v/`, `u/<word>/`, `embed/`, `watch?v=` or `&v=`, up to the
//! next `#`, `&` or `?`. It is accepted only if it is exactly 11 characters.

use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

use crate::error::AppResult;
use crate::fetcher::HtmlFetcher;
use crate::models::{OEmbedResponse, PreviewMetadata};

pub const SITE_NAME: &str = "YouTube";
pub const VIDEO_ID_LEN: usize = 11;

const HOST_PATTERNS: &[&str] = &["youtube.com", "youtu.be"];

static VIDEO_ID_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^.*(?:youtu\.be/|v/|u/\w/|embed/|watch\?v=|&v=)([^#&?]*)")
        .expect("video id regex is valid")
});

/// `true` if the URL's host or path names a known video platform.
pub fn is_video_url(url: &Url) -> bool {
    let host = url.host_str().unwrap_or_default();
    let path = url.path();
    HOST_PATTERNS
        .iter()
        .any(|pattern| host.contains(pattern) || path.contains(pattern))
}

/// Extract the 11-character video identifier from a YouTube URL.
pub fn video_id(url: &Url) -> Option<&str> {
    if !is_video_url(url) {
        return None;
    }
    VIDEO_ID_REGEX
        .captures(url.as_str())
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .filter(|id| id.chars().count() == VIDEO_ID_LEN)
}

pub fn thumbnail_url(id: &str) -> String {
    format!("https://img.youtube.com/vi/{id}/maxresdefault.jpg")
}

pub fn watch_url(id: &str) -> String {
    format!("https://www.youtube.com/watch?v={id}")
}

/// Build the oEmbed request URL for `id` against `endpoint`.
pub fn oembed_url(endpoint: &str, id: &str) -> String {
    format!(
        "{endpoint}?url={}&format=json",
        urlencoding::encode(&watch_url(id))
    )
}

/// Query the oEmbed endpoint for `id`.
pub async fn fetch_oembed(
    fetcher: &HtmlFetcher,
    endpoint: &str,
    id: &str,
) -> AppResult<OEmbedResponse> {
    fetcher.fetch_json(&oembed_url(endpoint, id)).await
}

/// Override `meta` with the oEmbed result for video `id`.
///
/// The description only takes the channel name when the page supplied none.
pub fn apply_oembed(meta: &mut PreviewMetadata, id: &str, oembed: &OEmbedResponse) {
    let title = oembed.title.trim();
    if !title.is_empty() {
        meta.title = title.to_string();
    }
    meta.image = thumbnail_url(id);
    meta.site_name = SITE_NAME.to_string();
    if meta.description.is_empty() {
        meta.description = oembed.author_name.trim().to_string();
    }
}
