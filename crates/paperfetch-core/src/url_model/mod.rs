//! Local file names for fetched URLs.
//!
//! The stored name is the URL's last path segment, sanitized so it is safe
//! on common filesystems.

mod sanitize;

use percent_encoding::percent_decode_str;

pub use sanitize::sanitize_filename;

/// Used when the URL has no usable last path segment.
const DEFAULT_FILENAME: &str = "download.pdf";

/// Last non-empty path segment of `url`, percent-decoded, if it parses and has one.
pub fn last_path_segment(url: &str) -> Option<String> {
    let parsed = url::Url::parse(url).ok()?;
    let segment = parsed.path_segments()?.filter(|s| !s.is_empty()).last()?;
    Some(percent_decode_str(segment).decode_utf8_lossy().into_owned())
}

/// Derives the file name a fetched URL is stored under.
///
/// - `derive_filename("https://host/a/9701_s23_qp_21.pdf")` → `"9701_s23_qp_21.pdf"`
/// - `derive_filename("https://host/")` → `"download.pdf"`
pub fn derive_filename(url: &str) -> String {
    let sanitized = last_path_segment(url)
        .map(|s| sanitize_filename(&s))
        .unwrap_or_default();
    if sanitized.is_empty() || sanitized == "." || sanitized == ".." {
        DEFAULT_FILENAME.to_string()
    } else {
        sanitized
    }
}
