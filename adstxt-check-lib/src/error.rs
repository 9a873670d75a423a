//! Error handling for ads.txt scanning operations.
//!
//! This module defines a comprehensive error type that covers all the different
//! ways a scan can fail, from network issues to invalid input.

use std::fmt;

/// Main error type for ads.txt scanning operations.
///
/// This enum covers all possible failure modes in the scanning process,
/// providing detailed context for debugging and user-friendly error messages.
#[derive(Debug, Clone)]
pub enum AdsTxtError {
    /// The input string does not contain anything matching the host grammar
    InvalidInput { input: String, reason: String },

    /// The signature string is malformed (missing `|` separator, empty
    /// parts, or an unbuildable search pattern)
    InvalidSignature { signature: String, reason: String },

    /// Network-related errors (connection, DNS, TLS, etc.)
    NetworkError {
        message: String,
        source: Option<String>,
    },

    /// The server completed the exchange with a non-200 status
    HttpStatus { domain: String, status: u16 },

    /// Timeout errors when operations take too long
    Timeout {
        operation: String,
        duration: std::time::Duration,
    },

    /// Configuration errors (invalid settings, etc.)
    ConfigError { message: String },

    /// File I/O errors when reading domain lists or config files
    FileError { path: String, message: String },

    /// Generic internal errors that don't fit other categories
    Internal { message: String },
}

impl AdsTxtError {
    /// Create a new invalid input error.
    pub fn invalid_input<I: Into<String>, R: Into<String>>(input: I, reason: R) -> Self {
        Self::InvalidInput {
            input: input.into(),
            reason: reason.into(),
        }
    }

    /// Create a new invalid signature error.
    pub fn invalid_signature<S: Into<String>, R: Into<String>>(signature: S, reason: R) -> Self {
        Self::InvalidSignature {
            signature: signature.into(),
            reason: reason.into(),
        }
    }

    /// Create a new network error.
    pub fn network<M: Into<String>>(message: M) -> Self {
        Self::NetworkError {
            message: message.into(),
            source: None,
        }
    }

    /// Create a new network error with source information.
    pub fn network_with_source<M: Into<String>, S: Into<String>>(message: M, source: S) -> Self {
        Self::NetworkError {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Create a new non-200 status error.
    pub fn http_status<D: Into<String>>(domain: D, status: u16) -> Self {
        Self::HttpStatus {
            domain: domain.into(),
            status,
        }
    }

    /// Create a new timeout error.
    pub fn timeout<O: Into<String>>(operation: O, duration: std::time::Duration) -> Self {
        Self::Timeout {
            operation: operation.into(),
            duration,
        }
    }

    /// Create a new configuration error.
    pub fn config<M: Into<String>>(message: M) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    /// Create a new file error.
    pub fn file_error<P: Into<String>, M: Into<String>>(path: P, message: M) -> Self {
        Self::FileError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a new internal error.
    pub fn internal<M: Into<String>>(message: M) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Whether this error belongs to the fetch layer: transport failures
    /// and non-200 statuses, which both terminate a scan as
    /// `FAILED_RESPONSE`.
    pub fn is_fetch_failure(&self) -> bool {
        matches!(
            self,
            Self::NetworkError { .. } | Self::HttpStatus { .. } | Self::Timeout { .. }
        )
    }
}

impl fmt::Display for AdsTxtError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidInput { input, reason } => {
                write!(f, "Invalid input '{}': {}", input, reason)
            }
            Self::InvalidSignature { signature, reason } => {
                write!(f, "Invalid signature '{}': {}", signature, reason)
            }
            Self::NetworkError { message, source } => {
                if let Some(source) = source {
                    write!(f, "Network error: {} (source: {})", message, source)
                } else {
                    write!(f, "Network error: {}", message)
                }
            }
            Self::HttpStatus { domain, status } => {
                write!(f, "HTTP {} for '{}'", status, domain)
            }
            Self::Timeout {
                operation,
                duration,
            } => {
                write!(f, "Timeout after {:?} during: {}", duration, operation)
            }
            Self::ConfigError { message } => {
                write!(f, "Configuration error: {}", message)
            }
            Self::FileError { path, message } => {
                write!(f, "File error at '{}': {}", path, message)
            }
            Self::Internal { message } => {
                write!(f, "Internal error: {}", message)
            }
        }
    }
}

impl std::error::Error for AdsTxtError {}

// Implement From conversions for common error types
impl From<reqwest::Error> for AdsTxtError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::timeout("HTTP request", std::time::Duration::from_secs(3))
        } else if err.is_connect() {
            Self::network_with_source("Connection failed", err.to_string())
        } else {
            Self::network_with_source("HTTP request failed", err.to_string())
        }
    }
}

impl From<std::io::Error> for AdsTxtError {
    fn from(err: std::io::Error) -> Self {
        Self::Internal {
            message: format!("I/O error: {}", err),
        }
    }
}

impl From<regex::Error> for AdsTxtError {
    fn from(err: regex::Error) -> Self {
        Self::Internal {
            message: format!("Regex error: {}", err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_formats() {
        let e = AdsTxtError::invalid_input("not a domain!!", "no host found");
        assert_eq!(e.to_string(), "Invalid input 'not a domain!!': no host found");

        let e = AdsTxtError::http_status("example.com", 404);
        assert_eq!(e.to_string(), "HTTP 404 for 'example.com'");

        let e = AdsTxtError::network("DNS failure");
        assert_eq!(e.to_string(), "Network error: DNS failure");
    }

    #[test]
    fn test_is_fetch_failure() {
        assert!(AdsTxtError::network("x").is_fetch_failure());
        assert!(AdsTxtError::http_status("example.com", 500).is_fetch_failure());
        assert!(
            AdsTxtError::timeout("GET", std::time::Duration::from_secs(3)).is_fetch_failure()
        );
        assert!(!AdsTxtError::invalid_input("x", "y").is_fetch_failure());
        assert!(!AdsTxtError::internal("x").is_fetch_failure());
    }
}
