//! Canonical comparison keys for phone numbers, postal addresses, and
//! website URLs.
//!
//! These functions are total over their inputs: nothing here fails, and
//! empty input always yields an empty string. Callers decide whether a
//! normalized value is usable as a dedup key (see [`crate::dedupe`] for
//! the length and exclusion gates).

use std::sync::LazyLock;

use regex::Regex;

/// Street-type abbreviations expanded during address normalization.
/// Word-boundary anchored so `"state"` is never rewritten.
static STREET_ABBREVIATIONS: LazyLock<[(Regex, &'static str); 5]> = LazyLock::new(|| {
    let rule = |pattern: &str| Regex::new(pattern).expect("valid abbreviation regex");
    [
        (rule(r"\bst\b"), "street"),
        (rule(r"\brd\b"), "road"),
        (rule(r"\bave\b"), "avenue"),
        (rule(r"\bblvd\b"), "boulevard"),
        (rule(r"\bdr\b"), "drive"),
    ]
});

static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));

/// Reduce a free-form phone string to its digits, dropping a leading US
/// country code from 11-digit numbers.
///
/// The result may be any length; callers must check for exactly 10
/// digits before treating it as a dedup key.
#[must_use]
pub fn normalize_phone(phone: &str) -> String {
    let digits: String = phone.chars().filter(char::is_ascii_digit).collect();
    if digits.len() == 11 && digits.starts_with('1') {
        digits[1..].to_owned()
    } else {
        digits
    }
}

/// Normalize a postal address for comparison: lowercase, trim, expand
/// street-type abbreviations, collapse runs of whitespace.
#[must_use]
pub fn normalize_address(address: &str) -> String {
    if address.is_empty() {
        return String::new();
    }

    let mut addr = address.to_lowercase().trim().to_owned();
    for (abbreviation, expansion) in STREET_ABBREVIATIONS.iter() {
        addr = abbreviation.replace_all(&addr, *expansion).into_owned();
    }
    WHITESPACE.replace_all(&addr, " ").into_owned()
}

/// Extract the bare domain from a website URL: scheme and `www.` prefix
/// stripped, lowercased, truncated at the first path segment.
#[must_use]
pub fn extract_domain(url: &str) -> String {
    if url.is_empty() {
        return String::new();
    }

    let lower = url.to_lowercase();
    let rest = lower
        .strip_prefix("https://")
        .or_else(|| lower.strip_prefix("http://"))
        .unwrap_or(&lower);
    let rest = rest.strip_prefix("www.").unwrap_or(rest);
    rest.split('/').next().unwrap_or("").to_owned()
}
