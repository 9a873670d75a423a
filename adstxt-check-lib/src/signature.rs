//! Signature parsing and ads.txt body matching.
//!
//! A signature is operator input of the form `<publisher-id>|<relationship>`
//! (e.g. `google.com|DIRECT`). The matcher scans a response body for every
//! region where the publisher ID is later followed by the relationship
//! keyword, case-insensitively.

use crate::error::AdsTxtError;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// A parsed advertising-system signature.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Signature {
    /// Advertising system / publisher identifier (e.g. `google.com`)
    pub publisher_id: String,

    /// Relationship keyword, matched case-insensitively
    /// (e.g. `DIRECT` or `RESELLER`)
    pub relationship: String,
}

impl Signature {
    /// Parse a raw `<publisher-id>|<relationship>` string.
    ///
    /// # Errors
    ///
    /// Returns `AdsTxtError::InvalidSignature` when the separator is
    /// missing or either side of it is empty.
    pub fn parse(raw: &str) -> Result<Self, AdsTxtError> {
        let (publisher_id, relationship) = raw.split_once('|').ok_or_else(|| {
            AdsTxtError::invalid_signature(raw, "expected '<publisher-id>|<relationship>'")
        })?;

        let publisher_id = publisher_id.trim();
        let relationship = relationship.trim();

        if publisher_id.is_empty() {
            return Err(AdsTxtError::invalid_signature(raw, "publisher id is empty"));
        }
        if relationship.is_empty() {
            return Err(AdsTxtError::invalid_signature(raw, "relationship is empty"));
        }

        Ok(Self {
            publisher_id: publisher_id.to_string(),
            relationship: relationship.to_string(),
        })
    }
}

impl std::fmt::Display for Signature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}|{}", self.publisher_id, self.relationship)
    }
}

/// Compiled search pattern for one signature.
///
/// The pattern is `<publisher-id>.+<relationship>`, case-insensitive. `.`
/// does not cross newlines, which confines each match to a single logical
/// line of the ads.txt body. The signature is trusted operator input, so
/// its parts go into the pattern unescaped.
#[derive(Debug, Clone)]
pub struct SignatureMatcher {
    pattern: Regex,
}

impl SignatureMatcher {
    /// Compile the search pattern for a parsed signature.
    ///
    /// # Errors
    ///
    /// Returns `AdsTxtError::InvalidSignature` when the signature parts do
    /// not form a buildable pattern.
    pub fn new(signature: &Signature) -> Result<Self, AdsTxtError> {
        let raw = format!(
            "(?i){}.+{}",
            signature.publisher_id, signature.relationship
        );
        let pattern = Regex::new(&raw).map_err(|e| {
            AdsTxtError::invalid_signature(signature.to_string(), e.to_string())
        })?;
        Ok(Self { pattern })
    }

    /// Return all non-overlapping matches of the signature in `body`.
    ///
    /// An empty vector means "not found" and is a valid, non-error outcome.
    pub fn find_all(&self, body: &str) -> Vec<String> {
        self.pattern
            .find_iter(body)
            .map(|m| m.as_str().to_string())
            .collect()
    }
}
