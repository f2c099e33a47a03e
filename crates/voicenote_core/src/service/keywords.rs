//! Raw keyword input normalization.

use once_cell::sync::Lazy;
use regex::Regex;

// ASCII comma and full-width comma (U+FF0C).
static KEYWORD_SEPARATOR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[,\x{FF0C}]").expect("valid keyword separator regex"));

/// Splits comma-separated keyword input into trimmed, non-empty keywords.
///
/// Order is preserved and duplicates are kept.
pub fn normalize_keywords(raw: &str) -> Vec<String> {
    KEYWORD_SEPARATOR_RE
        .split(raw)
        .map(str::trim)
        .filter(|fragment| !fragment.is_empty())
        .map(str::to_string)
        .collect()
}
