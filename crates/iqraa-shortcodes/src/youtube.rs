//! YouTube reference parsing.

use std::sync::LazyLock;

use regex::Regex;

static BARE_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9_-]{8,}$").expect("invalid bare id regex"));

/// Recognized URL forms, tried in order.
static URL_FORMS: LazyLock<[Regex; 3]> = LazyLock::new(|| {
    [
        Regex::new(r"[?&]v=([^&]+)").expect("invalid watch regex"),
        Regex::new(r"youtu\.be/([^?&/]+)").expect("invalid short link regex"),
        Regex::new(r"youtube\.com/embed/([^?&/]+)").expect("invalid embed regex"),
    ]
});

/// Extract a video id from a bare id or a YouTube URL.
///
/// Unrecognized input is returned trimmed and otherwise verbatim.
///
/// # Examples
///
/// ```
/// use iqraa_shortcodes::youtube_id;
///
/// assert_eq!(youtube_id("https://youtu.be/abc123XYZ"), "abc123XYZ");
/// assert_eq!(youtube_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ&t=1"), "dQw4w9WgXcQ");
/// ```
pub fn youtube_id(reference: &str) -> String {
    let reference = reference.trim();
    if BARE_ID.is_match(reference) && !reference.contains("http") {
        return reference.to_owned();
    }
    URL_FORMS
        .iter()
        .find_map(|re| re.captures(reference))
        .map_or_else(|| reference.to_owned(), |caps| caps[1].to_owned())
}

/// Embed URL for a video id.
pub(crate) fn embed_url(id: &str) -> String {
    format!("https://www.youtube.com/embed/{id}")
}
