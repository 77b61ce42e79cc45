//! Text normalization and markup flattening.
//!
//! Every marker decision is made on [`normalize`]d text so that matching does
//! not depend on invisible characters or whitespace layout.

use std::sync::LazyLock;

use regex::Regex;

static LINE_BREAK_TAGS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<br\s*/?>|</p>|</div>").expect("invalid line break regex"));

static EXCESS_BLANK_LINES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{3,}").expect("invalid blank line regex"));

/// Canonicalize text before marker matching.
///
/// Removes zero-width characters (U+200B..U+200D) and byte-order marks,
/// turns non-breaking spaces into spaces, collapses runs of spaces, tabs and
/// line breaks into a single space and trims the result.
///
/// # Examples
///
/// ```
/// use iqraa_shortcodes::normalize;
///
/// assert_eq!(normalize("\u{feff} -success-\u{a0}\n\tdone \u{200b}"), "-success- done");
/// ```
pub fn normalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_space = false;

    for ch in text.chars() {
        match ch {
            '\u{200B}'..='\u{200D}' | '\u{FEFF}' => {}
            ' ' | '\t' | '\r' | '\n' | '\u{A0}' => pending_space = true,
            _ => {
                if pending_space && !out.is_empty() {
                    out.push(' ');
                }
                pending_space = false;
                out.push(ch);
            }
        }
    }

    out
}

/// Escape text for use in HTML content and double- or single-quoted attributes.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Remove every case-insensitive occurrence of `marker` from `markup`, then trim.
pub fn strip_marker(markup: &str, marker: &str) -> String {
    match marker_pattern(marker, "") {
        Some(re) => re.replace_all(markup, "").trim().to_owned(),
        None => markup.trim().to_owned(),
    }
}

/// Split plain text on `marker`, tolerating whitespace around each occurrence.
///
/// Every segment is [`normalize`]d.
pub fn split_on_marker(text: &str, marker: &str) -> Vec<String> {
    match marker_pattern(marker, r"\s*") {
        Some(re) => re.split(text).map(normalize).collect(),
        None => vec![normalize(text)],
    }
}

/// Case-insensitive pattern for a literal marker, padded with `padding` on both sides.
fn marker_pattern(marker: &str, padding: &str) -> Option<Regex> {
    let pattern = format!("(?i){padding}{}{padding}", regex::escape(marker));
    match Regex::new(&pattern) {
        Ok(re) => Some(re),
        Err(e) => {
            tracing::warn!(marker, error = %e, "Failed to compile marker pattern");
            None
        }
    }
}

/// Flatten markup to text while keeping its line structure.
///
/// Explicit breaks and the ends of paragraphs and divisions become newlines,
/// the remaining markup is reduced to its text content, and runs of three or
/// more newlines collapse to a single blank line.
pub fn markup_to_text_keep_lines(markup: &str) -> String {
    let with_breaks = LINE_BREAK_TAGS.replace_all(markup, "\n");
    let text = iqraa_dom::fragment_text(&with_breaks);
    EXCESS_BLANK_LINES
        .replace_all(&text, "\n\n")
        .trim()
        .to_owned()
}
