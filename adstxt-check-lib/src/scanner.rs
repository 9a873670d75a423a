//! Main ads.txt scanner implementation.
//!
//! This module provides the primary `AdsTxtScanner` struct that runs the
//! per-domain pipeline (normalize, build URL, fetch, match) and the
//! bounded-concurrency dispatcher that fans it out over a domain list.

use crate::error::AdsTxtError;
use crate::fetch::Fetcher;
use crate::host::{build_ads_txt_url, normalize_host};
use crate::signature::{Signature, SignatureMatcher};
use crate::types::{ScanConfig, ScanResult};
use futures::stream::{Stream, StreamExt};
use std::pin::Pin;
use tracing::debug;

/// Scanner that checks domains' ads.txt files for a signature.
///
/// The `AdsTxtScanner` handles all aspects of a scan run:
/// - Per-domain pipeline from raw input string to a typed result
/// - Bounded-concurrency dispatch with per-task failure isolation
/// - Result collection in completion order
///
/// # Example
///
/// ```rust,no_run
/// use adstxt_check_lib::AdsTxtScanner;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let scanner = AdsTxtScanner::new();
///     let domains = vec!["example.com".to_string()];
///     let results = scanner.scan_domains(&domains, "google.com|DIRECT").await?;
///     for r in results {
///         println!("{}: {}", r.domain, r.status);
///     }
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct AdsTxtScanner {
    /// Configuration settings for this scanner instance
    config: ScanConfig,
    /// HTTP fetcher shared by all tasks of a run
    fetcher: Fetcher,
}

impl AdsTxtScanner {
    /// Create a new scanner with default configuration.
    ///
    /// Default settings:
    /// - Concurrency: 5
    /// - Per-request timeout: 3 seconds
    pub fn new() -> Self {
        Self::with_config(ScanConfig::default())
    }

    /// Create a new scanner with custom configuration.
    ///
    /// # Example
    ///
    /// ```rust
    /// use adstxt_check_lib::{AdsTxtScanner, ScanConfig};
    /// use std::time::Duration;
    ///
    /// let config = ScanConfig::default()
    ///     .with_concurrency(10)
    ///     .with_timeout(Duration::from_secs(5));
    ///
    /// let scanner = AdsTxtScanner::with_config(config);
    /// ```
    pub fn with_config(config: ScanConfig) -> Self {
        let fetcher = Fetcher::with_timeout(config.timeout).expect("Failed to create HTTP fetcher");

        Self { config, fetcher }
    }

    /// Create a scanner around a caller-configured [`Fetcher`].
    ///
    /// Use this to route fetches through a proxy or a shared connection
    /// pool; see [`Fetcher::from_client`].
    pub fn with_fetcher(config: ScanConfig, fetcher: Fetcher) -> Self {
        Self { config, fetcher }
    }

    /// Scan a single domain for a signature.
    ///
    /// Runs the full pipeline for one domain and always produces a result;
    /// every expected failure is folded into the result's status.
    ///
    /// # Errors
    ///
    /// Only a signature whose parts do not form a buildable search pattern
    /// is an error here. Everything that can go wrong with the domain
    /// itself is reported through the returned [`ScanResult`].
    pub async fn scan_domain(
        &self,
        domain: &str,
        signature: &Signature,
    ) -> Result<ScanResult, AdsTxtError> {
        let matcher = SignatureMatcher::new(signature)?;
        Ok(self.run_task(domain, &matcher).await)
    }

    /// Scan all domains concurrently and collect the results.
    ///
    /// One task per input domain runs under the configured concurrency
    /// limit. Exactly one result is produced per domain, in completion
    /// order — callers must not assume input order is preserved. A failure
    /// in one task never aborts or delays the others.
    ///
    /// # Errors
    ///
    /// Returns an error only when the signature string itself is malformed.
    /// An empty domain list yields an empty result set.
    pub async fn scan_domains(
        &self,
        domains: &[String],
        signature: &str,
    ) -> Result<Vec<ScanResult>, AdsTxtError> {
        let signature = Signature::parse(signature)?;
        let mut stream = self.scan_domains_stream(domains, &signature)?;

        let mut results = Vec::with_capacity(domains.len());
        while let Some(result) = stream.next().await {
            results.push(result);
        }

        Ok(results)
    }

    /// Scan domains and yield results as they complete.
    ///
    /// This is the streaming form of [`scan_domains`](Self::scan_domains),
    /// useful for real-time display. Each domain task runs in its own
    /// spawned task; a task that panics is converted into an
    /// `INTERNAL_ERROR` result at the join point instead of cancelling its
    /// siblings or poisoning the stream.
    ///
    /// # Errors
    ///
    /// Returns an error when the signature parts do not form a buildable
    /// search pattern.
    pub fn scan_domains_stream(
        &self,
        domains: &[String],
        signature: &Signature,
    ) -> Result<Pin<Box<dyn Stream<Item = ScanResult> + Send + 'static>>, AdsTxtError> {
        let matcher = SignatureMatcher::new(signature)?;
        let concurrency = self.config.concurrency.max(1);

        debug!(
            domains = domains.len(),
            concurrency,
            signature = %signature,
            "dispatching scan"
        );

        let scanner = self.clone();
        let tasks = domains.to_vec().into_iter().map(move |domain| {
            let scanner = scanner.clone();
            let matcher = matcher.clone();
            async move {
                let task_domain = domain.clone();
                let handle =
                    tokio::spawn(async move { scanner.run_task(&task_domain, &matcher).await });
                join_task(domain, handle).await
            }
        });

        // buffer_unordered keeps at most `concurrency` tasks in flight and
        // yields results in completion order
        Ok(Box::pin(futures::stream::iter(tasks).buffer_unordered(concurrency)))
    }

    /// Per-domain pipeline: normalize, build URL, fetch, match.
    ///
    /// Linear state machine with no retries; the first applicable terminal
    /// state wins.
    async fn run_task(&self, domain: &str, matcher: &SignatureMatcher) -> ScanResult {
        let host = match normalize_host(domain) {
            Ok(host) => host,
            Err(e) => return ScanResult::incorrect_input(domain, e.to_string()),
        };

        let url = build_ads_txt_url(&host);

        let response = match self.fetcher.fetch(&url).await {
            Ok(response) => response,
            // transport failure and non-200 status share one terminal
            // status; only the error text tells them apart
            Err(e) => return ScanResult::failed_response(domain, e.to_string()),
        };

        if !response.is_ok() {
            return ScanResult::failed_response(
                domain,
                AdsTxtError::http_status(domain, response.status.as_u16()).to_string(),
            );
        }

        let matches = matcher.find_all(&response.body);
        if matches.is_empty() {
            ScanResult::not_found(domain)
        } else {
            ScanResult::success(domain, matches)
        }
    }

    /// Get the current configuration for this scanner.
    pub fn config(&self) -> &ScanConfig {
        &self.config
    }
}

impl Default for AdsTxtScanner {
    fn default() -> Self {
        Self::new()
    }
}

/// Await a spawned domain task, converting any escaping defect into an
/// `INTERNAL_ERROR` result for that domain only.
///
/// This join point is the isolation boundary: a panicking task surfaces
/// here as a `JoinError` and never cancels its siblings or aborts the
/// batch.
async fn join_task(domain: String, handle: tokio::task::JoinHandle<ScanResult>) -> ScanResult {
    match handle.await {
        Ok(result) => result,
        Err(e) => ScanResult::internal_error(domain, format!("domain task failed: {}", e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ScanStatus;

    #[tokio::test]
    async fn test_empty_domain_list_yields_empty_results() {
        let scanner = AdsTxtScanner::new();
        let results = scanner.scan_domains(&[], "google.com|DIRECT").await.unwrap();
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_malformed_signature_is_an_error() {
        let scanner = AdsTxtScanner::new();
        let err = scanner
            .scan_domains(&["example.com".to_string()], "no-separator")
            .await
            .unwrap_err();
        assert!(matches!(err, AdsTxtError::InvalidSignature { .. }));
    }

    #[tokio::test]
    async fn test_invalid_inputs_never_touch_the_network() {
        // all of these fail normalization, so the scan is fully offline
        let scanner = AdsTxtScanner::new();
        let domains = vec![
            "not a domain!!".to_string(),
            "".to_string(),
            "???".to_string(),
        ];

        let results = scanner
            .scan_domains(&domains, "google.com|DIRECT")
            .await
            .unwrap();

        assert_eq!(results.len(), domains.len());
        for result in &results {
            assert_eq!(result.status, ScanStatus::IncorrectInput);
            assert!(result.error.is_some());
            assert!(result.data.is_none());
        }
    }

    #[tokio::test]
    async fn test_join_point_converts_panic_to_internal_error() {
        let handle = tokio::spawn(async { panic!("defect in task") });
        let result = join_task("example.com".to_string(), handle).await;
        assert_eq!(result.status, ScanStatus::InternalError);
        assert!(result.error.unwrap().contains("panic"));
        assert_eq!(result.domain, "example.com");
    }

    #[tokio::test]
    async fn test_results_cover_every_input_once() {
        let scanner = AdsTxtScanner::new();
        let domains = vec!["bad input".to_string(), "also bad!".to_string()];

        let results = scanner
            .scan_domains(&domains, "google.com|DIRECT")
            .await
            .unwrap();

        assert_eq!(results.len(), domains.len());
        let mut seen: Vec<&str> = results.iter().map(|r| r.domain.as_str()).collect();
        seen.sort_unstable();
        assert_eq!(seen, vec!["also bad!", "bad input"]);
    }
}
