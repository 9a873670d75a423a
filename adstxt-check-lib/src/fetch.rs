//! HTTP retrieval of ads.txt files.
//!
//! One bounded-timeout GET per domain, redirects followed at the HTTP
//! client's default policy. A completed exchange is returned whatever its
//! status code; only transport failures (timeout, DNS, connection, TLS)
//! are errors at this layer.

use crate::error::AdsTxtError;
use reqwest::StatusCode;
use std::time::Duration;
use tracing::debug;

/// A completed HTTP exchange: final status plus body text.
#[derive(Debug, Clone)]
pub struct FetchedResponse {
    /// Final status code after redirects
    pub status: StatusCode,
    /// Response body decoded as text
    pub body: String,
}

impl FetchedResponse {
    /// Whether the exchange ended in HTTP 200.
    pub fn is_ok(&self) -> bool {
        self.status == StatusCode::OK
    }
}

/// HTTP fetcher for ads.txt requests.
///
/// Wraps a shared `reqwest::Client` configured once per scanner; cloning is
/// cheap and connection pools are reused across domains.
#[derive(Clone)]
pub struct Fetcher {
    /// HTTP client for making requests
    http_client: reqwest::Client,
    /// Timeout for each request
    timeout: Duration,
}

impl Fetcher {
    /// Create a fetcher with the default 3 second timeout.
    pub fn new() -> Result<Self, AdsTxtError> {
        Self::with_timeout(Duration::from_secs(3))
    }

    /// Create a fetcher with a custom per-request timeout.
    pub fn with_timeout(timeout: Duration) -> Result<Self, AdsTxtError> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout + Duration::from_secs(2)) // Add buffer for HTTP timeout
            .build()
            .map_err(|e| {
                AdsTxtError::network_with_source("Failed to create HTTP client", e.to_string())
            })?;

        Ok(Self {
            http_client,
            timeout,
        })
    }

    /// Create a fetcher around a caller-configured `reqwest::Client`.
    ///
    /// Use this to share a connection pool, route through a proxy, or
    /// override DNS resolution. Redirect and TLS behavior follow that
    /// client; the `timeout` here still bounds each fetch as a whole.
    pub fn from_client(http_client: reqwest::Client, timeout: Duration) -> Self {
        Self {
            http_client,
            timeout,
        }
    }

    /// Issue a single GET and return the completed exchange.
    ///
    /// # Errors
    ///
    /// Returns `AdsTxtError::Timeout` when the request exceeds the
    /// configured deadline and `AdsTxtError::NetworkError` on DNS,
    /// connection, or TLS failures. Non-200 statuses are NOT errors here.
    pub async fn fetch(&self, url: &str) -> Result<FetchedResponse, AdsTxtError> {
        debug!(url, timeout = ?self.timeout, "fetching ads.txt");

        let result = tokio::time::timeout(self.timeout, self.fetch_inner(url)).await;

        match result {
            Ok(Ok(response)) => {
                debug!(url, status = %response.status, "exchange completed");
                Ok(response)
            }
            Ok(Err(e)) => {
                debug!(url, error = %e, "transport failure");
                Err(e)
            }
            Err(_) => {
                debug!(url, "request timed out");
                Err(AdsTxtError::timeout(
                    format!("GET {}", url),
                    self.timeout,
                ))
            }
        }
    }

    async fn fetch_inner(&self, url: &str) -> Result<FetchedResponse, AdsTxtError> {
        let response = self.http_client.get(url).send().await?;
        let status = response.status();
        // body text is read even for non-200 exchanges; the caller decides
        // what a non-200 status means
        let body = response.text().await?;

        Ok(FetchedResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetcher_creation() {
        assert!(Fetcher::new().is_ok());
        assert!(Fetcher::with_timeout(Duration::from_millis(500)).is_ok());
    }

    #[tokio::test]
    async fn test_connection_refused_is_transport_error() {
        // nothing listens on this port
        let fetcher = Fetcher::with_timeout(Duration::from_secs(1)).unwrap();
        let err = fetcher
            .fetch("http://127.0.0.1:9/ads.txt")
            .await
            .unwrap_err();
        assert!(err.is_fetch_failure(), "got: {}", err);
    }
}
