//! `Content-Disposition` filename extraction for downloaded blobs.

use once_cell::sync::Lazy;
use regex::Regex;

/// Filename used when the server does not name the attachment.
pub const DEFAULT_FILENAME: &str = "download.docx";

// First `filename...=` parameter: a quoted value, or everything up to `;`.
static FILENAME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"filename[^;=\n]*=("[^"]*"|'[^']*'|[^;\n]*)"#).expect("valid filename regex")
});

/// Derive the download filename from an optional `Content-Disposition` value.
///
/// Only `attachment` dispositions are inspected. Quotes are stripped from the
/// extracted value; anything missing or empty falls back to
/// [`DEFAULT_FILENAME`].
pub fn filename_from_disposition(header: Option<&str>) -> String {
    header
        .filter(|value| value.contains("attachment"))
        .and_then(|value| FILENAME_RE.captures(value))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().replace(['"', '\''], ""))
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| DEFAULT_FILENAME.to_string())
}
