//! Host extraction and ads.txt URL construction.
//!
//! This module contains the input normalizer that pulls a host out of an
//! arbitrary input string, and the pure URL builder that turns a normalized
//! host into the fully qualified ads.txt location.

use crate::error::AdsTxtError;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Host grammar: optional scheme, one or more dot-separated labels of
    /// ASCII/Cyrillic letters and digits, ending in a 2-6 letter top-level
    /// label. Anchored at the start so the match is a prefix of the input;
    /// anything after it (path, query, junk) is dropped. The trailing `\b`
    /// keeps the top-level label whole, so `host.verylongtld` is rejected
    /// rather than truncated mid-label.
    static ref HOST_RE: Regex =
        Regex::new(r"^(?:https?://)?(?:[0-9A-Za-zА-Яа-яЁё]+\.)+[A-Za-zА-Яа-яЁё]{2,6}\b")
            .expect("host grammar regex is valid");
}

/// Extract a host (optionally scheme-prefixed) from an arbitrary input string.
///
/// Leading/trailing whitespace is ignored. Trailing path segments are
/// tolerated and trimmed: `http://example.com/foo/bar` normalizes to
/// `http://example.com`.
///
/// # Errors
///
/// Returns `AdsTxtError::InvalidInput` when nothing at the start of the
/// input matches the host grammar.
pub fn normalize_host(input: &str) -> Result<String, AdsTxtError> {
    let trimmed = input.trim();

    if trimmed.is_empty() {
        return Err(AdsTxtError::invalid_input(input, "input is empty"));
    }

    match HOST_RE.find(trimmed) {
        Some(m) => Ok(m.as_str().to_string()),
        None => Err(AdsTxtError::invalid_input(
            input,
            "no host name found at the start of the input",
        )),
    }
}

/// Build the fully qualified ads.txt URL for a normalized host.
///
/// An existing `http://` or `https://` scheme is preserved; a bare host
/// defaults to plain HTTP. Pure function, no I/O.
pub fn build_ads_txt_url(host: &str) -> String {
    if host.starts_with("http://") || host.starts_with("https://") {
        format!("{}/ads.txt", host)
    } else {
        format!("http://{}/ads.txt", host)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_bare_host() {
        assert_eq!(normalize_host("example.com").unwrap(), "example.com");
        assert_eq!(normalize_host("sub.example.com").unwrap(), "sub.example.com");
        assert_eq!(normalize_host("  example.com  ").unwrap(), "example.com");
    }

    #[test]
    fn test_normalize_preserves_scheme() {
        assert_eq!(
            normalize_host("http://example.com").unwrap(),
            "http://example.com"
        );
        assert_eq!(
            normalize_host("https://example.com").unwrap(),
            "https://example.com"
        );
    }

    #[test]
    fn test_normalize_trims_path() {
        assert_eq!(
            normalize_host("http://example.com/foo/bar").unwrap(),
            "http://example.com"
        );
        assert_eq!(
            normalize_host("example.com/ads.txt?x=1").unwrap(),
            "example.com"
        );
    }

    #[test]
    fn test_normalize_cyrillic_labels() {
        assert_eq!(normalize_host("пример.рф").unwrap(), "пример.рф");
    }

    #[test]
    fn test_normalize_rejects_garbage() {
        assert!(normalize_host("not a domain!!").is_err());
        assert!(normalize_host("").is_err());
        assert!(normalize_host("   ").is_err());
        assert!(normalize_host("just_words").is_err());
        // single-letter TLD fails the 2-6 letter rule
        assert!(normalize_host("example.c").is_err());
    }

    #[test]
    fn test_normalize_rejects_overlong_tld() {
        // a 7+ letter final label cannot terminate the host grammar
        assert!(normalize_host("host.verylongtld").is_err());
    }

    #[test]
    fn test_build_url_default_scheme() {
        assert_eq!(build_ads_txt_url("example.com"), "http://example.com/ads.txt");
    }

    #[test]
    fn test_build_url_preserves_scheme() {
        assert_eq!(
            build_ads_txt_url("http://example.com"),
            "http://example.com/ads.txt"
        );
        assert_eq!(
            build_ads_txt_url("https://example.com"),
            "https://example.com/ads.txt"
        );
    }

    #[test]
    fn test_normalize_then_build_idempotence() {
        let a = build_ads_txt_url(&normalize_host("https://x.com/a/b").unwrap());
        assert_eq!(a, "https://x.com/ads.txt");

        let b = build_ads_txt_url(&normalize_host("example.com/path").unwrap());
        let c = build_ads_txt_url(&normalize_host("example.com").unwrap());
        assert_eq!(b, c);
        assert_eq!(b, "http://example.com/ads.txt");
    }
}
