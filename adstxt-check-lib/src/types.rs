//! Core data types for ads.txt signature scanning.
//!
//! This module defines all the main data structures used throughout the library,
//! including scan results, the status taxonomy, and configuration options.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Terminal status of a single domain scan.
///
/// Every scan ends in exactly one of these states. The set is closed so
/// downstream consumers can match exhaustively and the compiler flags any
/// unhandled kind.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ScanStatus {
    /// The signature was found in the domain's ads.txt (one or more matches)
    #[serde(rename = "success")]
    Success,

    /// The ads.txt could not be retrieved: transport failure (timeout, DNS,
    /// connection, TLS) or a non-200 HTTP status. The two sub-causes are
    /// deliberately merged; the human-readable detail lives in
    /// [`ScanResult::error`].
    #[serde(rename = "failed_response")]
    FailedResponse,

    /// A defect escaped the domain task (e.g. a panic) and was captured at
    /// the dispatcher join point
    #[serde(rename = "internal_error")]
    InternalError,

    /// The input string does not contain anything that parses as a host
    #[serde(rename = "incorrect_input")]
    IncorrectInput,

    /// A well-formed 200 response that simply does not contain the
    /// signature. This is a valid outcome, not an error.
    #[serde(rename = "signature_not_found")]
    SignatureNotFound,
}

/// Result of scanning one domain's ads.txt for a signature.
///
/// Exactly one `ScanResult` is produced per input domain, regardless of
/// which path the scan took. Results are never mutated after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanResult {
    /// The original input string the scan was started with
    pub domain: String,

    /// Terminal status of the scan
    pub status: ScanStatus,

    /// Matched signature-line excerpts.
    /// - `Some(non-empty)`: signature found, one entry per occurrence
    /// - `Some(empty)`: 200 response, signature absent
    /// - `None`: the scan never reached the matching stage
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Vec<String>>,

    /// Error detail for the failure statuses
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ScanResult {
    /// Signature found: one excerpt per occurrence.
    pub fn success<D: Into<String>>(domain: D, matches: Vec<String>) -> Self {
        Self {
            domain: domain.into(),
            status: ScanStatus::Success,
            data: Some(matches),
            error: None,
        }
    }

    /// 200 response, signature absent.
    pub fn not_found<D: Into<String>>(domain: D) -> Self {
        Self {
            domain: domain.into(),
            status: ScanStatus::SignatureNotFound,
            data: Some(Vec::new()),
            error: None,
        }
    }

    /// Transport failure or non-200 HTTP status.
    pub fn failed_response<D: Into<String>, E: Into<String>>(domain: D, error: E) -> Self {
        Self {
            domain: domain.into(),
            status: ScanStatus::FailedResponse,
            data: None,
            error: Some(error.into()),
        }
    }

    /// Input did not parse as a host.
    pub fn incorrect_input<D: Into<String>, E: Into<String>>(domain: D, error: E) -> Self {
        Self {
            domain: domain.into(),
            status: ScanStatus::IncorrectInput,
            data: None,
            error: Some(error.into()),
        }
    }

    /// Defect captured at the dispatcher join point.
    pub fn internal_error<D: Into<String>, E: Into<String>>(domain: D, error: E) -> Self {
        Self {
            domain: domain.into(),
            status: ScanStatus::InternalError,
            data: None,
            error: Some(error.into()),
        }
    }

    /// Number of signature occurrences found (0 when the matching stage
    /// was never reached).
    pub fn match_count(&self) -> usize {
        self.data.as_ref().map(|d| d.len()).unwrap_or(0)
    }
}

/// Configuration options for scan operations.
///
/// This struct allows fine-tuning of the scanning behavior. The defaults
/// mirror the conservative crawl settings the tool shipped with: five
/// in-flight requests, three seconds per request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Maximum number of concurrent ads.txt fetches
    /// Default: 5, Range: 1-100
    pub concurrency: usize,

    /// Timeout for each individual HTTP request
    /// Default: 3 seconds
    #[serde(skip)] // Don't serialize Duration directly
    pub timeout: Duration,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            concurrency: 5,
            timeout: Duration::from_secs(3),
        }
    }
}

impl ScanConfig {
    /// Set the concurrency limit.
    ///
    /// Automatically caps concurrency at 100 to prevent resource exhaustion.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.clamp(1, 100);
        self
    }

    /// Set the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl std::fmt::Display for ScanStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScanStatus::Success => write!(f, "SUCCESS"),
            ScanStatus::FailedResponse => write!(f, "FAILED_RESPONSE"),
            ScanStatus::InternalError => write!(f, "INTERNAL_ERROR"),
            ScanStatus::IncorrectInput => write!(f, "INCORRECT_INPUT"),
            ScanStatus::SignatureNotFound => write!(f, "SIGNATURE_NOT_FOUND"),
        }
    }
}
