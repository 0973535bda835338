//! Extraction of stream information from scanner pages
//!
//! These functions are pure (text in, value out) so that a change in the
//! scanner site's markup only touches this module.

use regex::Regex;

/// Decode a page body as text
///
/// Scanner pages are sometimes served in a legacy Cyrillic encoding. A lossy
/// UTF-8 decode keeps the ASCII stream URL intact; only localized labels may
/// come out garbled.
pub fn decode_page(body: &[u8]) -> String {
    String::from_utf8_lossy(body).into_owned()
}

/// Extract the first `file:"<url>"` literal of a page
///
/// ```
/// use atcstream::scrape::extract_stream_url;
///
/// let html = r#"<script>player({file:"https://example.test/abc"})</script>"#;
/// assert_eq!(extract_stream_url(html), Some("https://example.test/abc".to_string()));
/// ```
pub fn extract_stream_url(html: &str) -> Option<String> {
    let re = Regex::new(r#"file:"([^"]+)""#).ok()?;
    re.captures(html)
        .and_then(|cap| cap.get(1))
        .map(|m| m.as_str().to_string())
}

/// Read the listener count displayed on a page, 0 when absent
pub fn extract_listener_count(html: &str) -> u32 {
    [r"(?i)слушателей:\s*(\d+)", r"(?i)listeners:\s*(\d+)"]
        .iter()
        .filter_map(|pattern| Regex::new(pattern).ok())
        .find_map(|re| {
            re.captures(html)
                .and_then(|cap| cap.get(1))
                .and_then(|m| m.as_str().parse().ok())
        })
        .unwrap_or(0)
}
