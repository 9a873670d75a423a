//! # AdsTxt Check Library
//!
//! A fast, robust library for checking whether an advertising-system
//! signature (publisher ID plus relationship type, e.g. `google.com|DIRECT`)
//! appears in the `ads.txt` files of a set of domains.
//!
//! This library provides both single-domain and batch APIs, with bounded
//! concurrent processing, a closed result taxonomy, and per-task failure
//! isolation: one slow or broken domain never stalls or aborts the rest of
//! a run.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use adstxt_check_lib::AdsTxtScanner;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let scanner = AdsTxtScanner::new();
//!     let domains = vec!["example.com".to_string(), "wikipedia.org".to_string()];
//!     let results = scanner.scan_domains(&domains, "google.com|DIRECT").await?;
//!
//!     for result in results {
//!         println!("{}: {} ({} matches)", result.domain, result.status, result.match_count());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Bounded concurrency**: a fixed cap on in-flight HTTP fetches
//! - **Failure isolation**: per-domain results, never batch-fatal errors
//! - **Closed status taxonomy**: exhaustively matchable result kinds
//! - **Streaming**: results yielded in completion order
//! - **Configurable**: concurrency and timeout via builder, files, or env

// Re-export main public API types and functions
// This makes them available as adstxt_check_lib::TypeName
pub use config::{
    load_env_config, parse_timeout_string, ConfigManager, DefaultsConfig, EnvConfig, FileConfig,
    OutputConfig,
};
pub use error::AdsTxtError;
pub use fetch::{FetchedResponse, Fetcher};
pub use host::{build_ads_txt_url, normalize_host};
pub use scanner::AdsTxtScanner;
pub use signature::{Signature, SignatureMatcher};
pub use types::{ScanConfig, ScanResult, ScanStatus};

// Internal modules - these are not part of the public API surface beyond
// the re-exports above
mod config;
mod error;
mod fetch;
mod host;
mod scanner;
mod signature;
mod types;

// Type alias for convenience
pub type Result<T> = std::result::Result<T, AdsTxtError>;

// Library version and metadata
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
