//! AdsTxt Check CLI Application
//!
//! A command-line interface for checking whether an advertising signature
//! appears in the ads.txt files of a set of domains. This CLI application
//! provides a user-friendly interface to the adstxt-check-lib library.

mod ui;

use adstxt_check_lib::{
    load_env_config, parse_timeout_string, AdsTxtScanner, ConfigManager, ScanConfig, ScanResult,
    ScanStatus, Signature,
};
use clap::builder::styling::{AnsiColor, Effects, Styles};
use clap::Parser;
use std::process;
use std::time::Duration;

const STYLES: Styles = Styles::styled()
    .header(AnsiColor::Yellow.on_default().effects(Effects::BOLD))
    .usage(AnsiColor::Yellow.on_default().effects(Effects::BOLD))
    .literal(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .placeholder(AnsiColor::Cyan.on_default());

/// CLI arguments for adstxt-check
#[derive(Parser, Debug)]
#[command(name = "adstxt-check")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Check whether an advertising signature appears in domains' ads.txt files")]
#[command(
    long_about = "Check whether an advertising signature (publisher ID plus relationship type,\ne.g. 'google.com|DIRECT') appears in the ads.txt file of each given domain.\n\nSupports concurrent fetches, streaming output, and multiple output formats."
)]
#[command(styles = STYLES)]
pub struct Args {
    /// Domains whose ads.txt should be scanned
    #[arg(value_name = "DOMAINS", help_heading = "Domain Selection")]
    pub domains: Vec<String>,

    /// Input file with domains (one per line)
    #[arg(
        short = 'f',
        long = "file",
        value_name = "FILE",
        help_heading = "Domain Selection"
    )]
    pub file: Option<String>,

    /// Signature to scan for, as '<publisher-id>|<relationship>'
    #[arg(
        short = 's',
        long = "signature",
        value_name = "SIGNATURE",
        help_heading = "Scan"
    )]
    pub signature: Option<String>,

    /// Output results in JSON format
    #[arg(short = 'j', long = "json", help_heading = "Output Format")]
    pub json: bool,

    /// Output results in CSV format
    #[arg(long = "csv", help_heading = "Output Format")]
    pub csv: bool,

    /// Enable grouped, structured output with section headers
    #[arg(short = 'p', long = "pretty", help_heading = "Output Format")]
    pub pretty: bool,

    /// Collect all results before displaying
    #[arg(long = "batch", help_heading = "Output Format")]
    pub batch: bool,

    /// Show results as they complete
    #[arg(long = "streaming", help_heading = "Output Format")]
    pub streaming: bool,

    /// Max concurrent fetches (default: 5, max: 100)
    #[arg(
        short = 'c',
        long = "concurrency",
        default_value = "5",
        help_heading = "Performance"
    )]
    pub concurrency: usize,

    /// Per-request timeout, e.g. '3s', '30s', '2m'
    #[arg(long = "timeout", value_name = "DURATION", help_heading = "Performance")]
    pub timeout: Option<String>,

    /// Use specific config file instead of automatic discovery
    #[arg(long = "config", value_name = "FILE", help_heading = "Configuration")]
    pub config: Option<String>,

    /// Show detailed debug information and error messages
    #[arg(short = 'd', long = "debug", help_heading = "Configuration")]
    pub debug: bool,

    /// Verbose logging
    #[arg(short = 'v', long = "verbose", help_heading = "Configuration")]
    pub verbose: bool,
}

/// Error statistics for aggregated reporting
#[derive(Debug, Default)]
pub(crate) struct ErrorStats {
    pub(crate) failed_responses: Vec<String>,
    pub(crate) incorrect_inputs: Vec<String>,
    pub(crate) internal_errors: Vec<String>,
}

impl ErrorStats {
    fn add_result(&mut self, result: &ScanResult) {
        match result.status {
            ScanStatus::FailedResponse => self.failed_responses.push(result.domain.clone()),
            ScanStatus::IncorrectInput => self.incorrect_inputs.push(result.domain.clone()),
            ScanStatus::InternalError => self.internal_errors.push(result.domain.clone()),
            ScanStatus::Success | ScanStatus::SignatureNotFound => {}
        }
    }

    pub(crate) fn has_errors(&self) -> bool {
        !self.failed_responses.is_empty()
            || !self.incorrect_inputs.is_empty()
            || !self.internal_errors.is_empty()
    }
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    init_logging(&args);

    // Validate arguments
    if let Err(e) = validate_args(&args) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }

    // Run the scan
    if let Err(e) = run_scan(args).await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

/// Initialize the tracing subscriber.
///
/// `RUST_LOG` wins when set; otherwise `--debug` and `--verbose` select the
/// level. Without any of those, logging stays off entirely.
fn init_logging(args: &Args) {
    use tracing_subscriber::EnvFilter;

    let default_filter = if args.debug {
        Some("adstxt_check=debug,adstxt_check_lib=debug")
    } else if args.verbose {
        Some("adstxt_check=info,adstxt_check_lib=info")
    } else {
        None
    };

    let filter = match (std::env::var("RUST_LOG").ok(), default_filter) {
        (Some(env), _) => EnvFilter::new(env),
        (None, Some(level)) => EnvFilter::new(level),
        (None, None) => return,
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Validate command line arguments
fn validate_args(args: &Args) -> Result<(), String> {
    // Must have either domains, a file, or the ADSTXT_FILE env var
    if args.domains.is_empty() && args.file.is_none() && std::env::var("ADSTXT_FILE").is_err() {
        return Err("You must specify domain names or a file with --file".to_string());
    }

    // Can't have conflicting output modes
    if args.batch && args.streaming {
        return Err("Cannot specify both --batch and --streaming modes".to_string());
    }

    // Can't have multiple output formats
    let output_formats = [args.json, args.csv].iter().filter(|&&x| x).count();
    if output_formats > 1 {
        return Err("Cannot specify multiple output formats (--json, --csv)".to_string());
    }

    // Streaming mode doesn't support structured output formats
    if args.streaming && (args.json || args.csv) {
        return Err(
            "Cannot use --streaming with --json or --csv. Use --batch for structured output"
                .to_string(),
        );
    }

    // Validate concurrency
    if args.concurrency == 0 || args.concurrency > 100 {
        return Err("Concurrency must be between 1 and 100".to_string());
    }

    // Validate timeout format early, before it reaches the config merge
    if let Some(timeout) = &args.timeout {
        if parse_timeout_string(timeout).is_none() {
            return Err(format!(
                "Invalid timeout '{}'. Use format like '3s', '30s', '2m'",
                timeout
            ));
        }
    }

    // Validate signature syntax
    if let Some(signature) = &args.signature {
        if !signature.contains('|') {
            return Err(format!(
                "Invalid signature '{}'. Use format '<publisher-id>|<relationship>', e.g. 'google.com|DIRECT'",
                signature
            ));
        }
    }

    Ok(())
}

/// Fully resolved run settings after config file, env, and CLI merging.
struct RunSettings {
    config: ScanConfig,
    signature: String,
    pretty: bool,
    json: bool,
    csv: bool,
}

/// Build run settings from CLI arguments with config file integration.
///
/// Precedence order (highest to lowest):
/// 1. CLI arguments (explicit user input)
/// 2. Environment variables (ADSTXT_*)
/// 3. Local config file (./.adstxt-check.toml)
/// 4. Home config file (~/.adstxt-check.toml)
/// 5. Built-in defaults
fn build_settings(args: &Args) -> Result<RunSettings, Box<dyn std::error::Error>> {
    let mut config = ScanConfig::default();
    let mut signature: Option<String> = None;
    let mut pretty = args.pretty;

    let config_manager = ConfigManager::new(args.verbose);

    // Step 1: Determine config file path and load config files
    let file_config = if let Some(explicit_config_path) = &args.config {
        if args.verbose {
            println!(
                "Using explicit config file (CLI --config): {}",
                explicit_config_path
            );
        }
        config_manager.load_file(explicit_config_path).map_err(|e| {
            format!(
                "Failed to load config file '{}': {}",
                explicit_config_path, e
            )
        })?
    } else if let Ok(env_config_path) = std::env::var("ADSTXT_CONFIG") {
        if args.verbose {
            println!(
                "Using explicit config file (ADSTXT_CONFIG env var): {}",
                env_config_path
            );
        }
        config_manager
            .load_file(&env_config_path)
            .map_err(|e| format!("Failed to load config file '{}': {}", env_config_path, e))?
    } else {
        // No explicit config: silently continue with defaults when no
        // config files are found
        config_manager.discover_and_load().unwrap_or_default()
    };

    if let Some(defaults) = file_config.defaults {
        if let Some(sig) = defaults.signature {
            signature = Some(sig);
        }
        if let Some(concurrency) = defaults.concurrency {
            config.concurrency = concurrency;
        }
        if let Some(timeout_str) = defaults.timeout {
            if let Some(secs) = parse_timeout_string(&timeout_str) {
                config.timeout = Duration::from_secs(secs);
            }
        }
        if defaults.pretty == Some(true) {
            pretty = true;
        }
    }

    // Step 2: Apply environment variables (ADSTXT_*)
    let env_config = load_env_config(args.verbose);
    if let Some(ref sig) = env_config.signature {
        signature = Some(sig.clone());
    }
    if let Some(concurrency) = env_config.concurrency {
        config.concurrency = concurrency;
    }
    if let Some(timeout_str) = &env_config.timeout {
        if let Some(secs) = parse_timeout_string(timeout_str) {
            config.timeout = Duration::from_secs(secs);
        }
    }
    if env_config.pretty == Some(true) {
        pretty = true;
    }

    // Output format: explicit CLI flags win; env applies only when the
    // CLI chose neither a format nor streaming display
    let mut json = args.json;
    let mut csv = args.csv;
    if !json && !csv && !args.streaming {
        if env_config.has_output_format_conflict() {
            if args.verbose {
                eprintln!("Both ADSTXT_JSON and ADSTXT_CSV are set, ignoring both");
            }
        } else if env_config.json == Some(true) {
            json = true;
        } else if env_config.csv == Some(true) {
            csv = true;
        }
    }

    // Step 3: Apply CLI arguments (highest precedence)
    if let Some(sig) = &args.signature {
        signature = Some(sig.clone());
    }
    // Only override concurrency if explicitly provided by user.
    // We can't easily detect if the clap default was used, so we check
    // against the default value (explicit same-as-default still counts
    // as default, which is acceptable).
    if args.concurrency != 5 {
        // 5 is the clap default
        config.concurrency = args.concurrency;
    }
    if let Some(timeout_str) = &args.timeout {
        if let Some(secs) = parse_timeout_string(timeout_str) {
            config.timeout = Duration::from_secs(secs);
        }
    }

    config.concurrency = config.concurrency.clamp(1, 100);

    let signature = signature.ok_or(
        "You must specify a signature with -s/--signature (e.g. 'google.com|DIRECT'), \
         the ADSTXT_SIGNATURE env var, or a config file default",
    )?;

    // Fail on a malformed signature before any fetch is issued
    Signature::parse(&signature).map_err(|e| e.to_string())?;

    Ok(RunSettings {
        config,
        signature,
        pretty,
        json,
        csv,
    })
}

/// Main scan logic
async fn run_scan(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let settings = build_settings(&args)?;

    // Determine domains to scan
    let domains = get_domains_to_scan(&args)?;

    // Create the scanner
    let scanner = AdsTxtScanner::with_config(settings.config.clone());

    // Decide on processing mode based on domain count and user preferences
    if should_use_streaming(&args, &settings, domains.len()) {
        // Streaming mode - show results in real time as they complete
        run_streaming_scan(&scanner, &domains, &settings, &args).await?;
    } else {
        // Batch mode for single domains or structured output
        run_batch_scan(&scanner, &domains, &settings, &args).await?;
    }

    Ok(())
}

/// Determine whether to use streaming or batch mode
fn should_use_streaming(args: &Args, settings: &RunSettings, domain_count: usize) -> bool {
    // Force batch mode if explicitly requested
    if args.batch {
        return false;
    }

    // Force streaming mode if explicitly requested
    if args.streaming {
        return true;
    }

    // Use streaming for multiple domains unless in JSON/CSV mode
    if domain_count > 1 && !settings.json && !settings.csv {
        return true;
    }

    // Default to batch mode for single domains or structured output
    false
}

/// Run the scan in streaming mode with real-time progress
async fn run_streaming_scan(
    scanner: &AdsTxtScanner,
    domains: &[String],
    settings: &RunSettings,
    args: &Args,
) -> Result<(), Box<dyn std::error::Error>> {
    use futures::StreamExt;

    // Show initial progress message
    if settings.pretty {
        ui::print_header(
            domains.len(),
            scanner.config().concurrency,
            &settings.signature,
        );
    } else if args.verbose {
        println!(
            "Scanning {} domains for '{}' with concurrency: {}",
            domains.len(),
            settings.signature,
            scanner.config().concurrency
        );

        if args.debug {
            println!("Domains: {}", domains.join(", "));
        }

        println!(); // Empty line for readability
    }

    let signature = Signature::parse(&settings.signature)?;

    // Track statistics for summary
    let mut found_count = 0;
    let mut not_found_count = 0;
    let mut failed_count = 0;
    let mut error_stats = ErrorStats::default();
    let mut completed = 0usize;
    let total = domains.len();

    let start_time = std::time::Instant::now();

    let mut stream = scanner.scan_domains_stream(domains, &signature)?;

    // Process results as they complete
    while let Some(result) = stream.next().await {
        match result.status {
            ScanStatus::Success => found_count += 1,
            ScanStatus::SignatureNotFound => not_found_count += 1,
            _ => {
                failed_count += 1;
                error_stats.add_result(&result);
            }
        }

        completed += 1;

        // Show result immediately
        let counter = if total > 1 {
            Some((completed, total))
        } else {
            None
        };
        ui::print_result(&result, args.debug, counter);
    }

    let duration = start_time.elapsed();

    // Show final summary for multiple domains
    if total > 1 {
        println!();
        ui::print_summary(total, found_count, not_found_count, failed_count, duration);
        if error_stats.has_errors() {
            println!();
            ui::print_error_summary(&error_stats);
        }
    }

    Ok(())
}

/// Run the scan in batch mode (collect all results first)
async fn run_batch_scan(
    scanner: &AdsTxtScanner,
    domains: &[String],
    settings: &RunSettings,
    args: &Args,
) -> Result<(), Box<dyn std::error::Error>> {
    let is_structured = settings.json || settings.csv;

    // Show header (pretty only — default mode lets the spinner + summary speak)
    if settings.pretty && !is_structured && domains.len() > 1 {
        ui::print_header(
            domains.len(),
            scanner.config().concurrency,
            &settings.signature,
        );
    }

    // Start spinner for batch mode with multiple domains (all text modes).
    // Spinner::start returns None if stderr isn't a TTY.
    let spinner = if !is_structured && domains.len() > 1 {
        ui::Spinner::start(format!("Scanning {} domains...", domains.len()))
    } else {
        None
    };

    let start_time = std::time::Instant::now();

    // Scan all domains (concurrent under the hood)
    let results = scanner.scan_domains(domains, &settings.signature).await?;

    let duration = start_time.elapsed();

    // Stop spinner before printing results
    if let Some(s) = spinner {
        s.stop().await;
    }

    // Display results based on format
    display_results(&results, settings, args, duration)?;

    Ok(())
}

/// Get the list of domains to scan from CLI args, environment, or file
fn get_domains_to_scan(args: &Args) -> Result<Vec<String>, Box<dyn std::error::Error>> {
    let mut domains = args.domains.clone();

    if let Some(cli_file) = &args.file {
        if args.verbose {
            println!("Reading domains from file (CLI --file): {}", cli_file);
        }
        domains.extend(read_domains_from_file(cli_file)?);
    } else if let Ok(env_file_path) = std::env::var("ADSTXT_FILE") {
        if args.verbose {
            println!(
                "Reading domains from file (ADSTXT_FILE env var): {}",
                env_file_path
            );
        }
        domains.extend(read_domains_from_file(&env_file_path)?);
    }

    if domains.is_empty() {
        return Err("No domains found to scan".into());
    }

    Ok(domains)
}

/// Read domains from a file, one per line. Empty lines and lines starting
/// with '#' are ignored; inline comments are stripped.
fn read_domains_from_file(file_path: &str) -> Result<Vec<String>, Box<dyn std::error::Error>> {
    use std::fs::File;
    use std::io::{BufRead, BufReader};
    use std::path::Path;

    let path = Path::new(file_path);
    if !path.exists() {
        return Err(format!("File not found: {}", file_path).into());
    }

    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let mut domains = Vec::new();

    for line in reader.lines() {
        let line = line?;
        let trimmed = line.trim();

        // Skip empty lines and comments
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        // Handle inline comments
        let domain_part = trimmed.split('#').next().unwrap_or("").trim();
        if domain_part.is_empty() {
            continue;
        }

        // Keep even odd-looking lines: the scanner reports them as
        // INCORRECT_INPUT, which is more informative than dropping them here
        domains.push(domain_part.to_string());
    }

    if domains.is_empty() {
        return Err("No domains found in the file.".into());
    }

    Ok(domains)
}

fn display_results(
    results: &[ScanResult],
    settings: &RunSettings,
    args: &Args,
    duration: std::time::Duration,
) -> Result<(), Box<dyn std::error::Error>> {
    if settings.json {
        display_json_results(results)?;
    } else if settings.csv {
        display_csv_results(results);
    } else {
        display_text_results(results, settings, args, duration);
    }

    Ok(())
}

/// Display results in JSON format
fn display_json_results(results: &[ScanResult]) -> Result<(), Box<dyn std::error::Error>> {
    let json = serde_json::to_string_pretty(results)?;
    println!("{}", json);
    Ok(())
}

/// Display results in CSV format
fn display_csv_results(results: &[ScanResult]) {
    println!("domain,status,matches,error");

    for result in results {
        // commas inside the error detail would break the row
        let error = result
            .error
            .as_deref()
            .unwrap_or("-")
            .replace(',', ";");

        println!(
            "{},{},{},{}",
            result.domain,
            result.status,
            result.match_count(),
            error
        );
    }
}

/// Display results in human-readable text format
fn display_text_results(
    results: &[ScanResult],
    settings: &RunSettings,
    args: &Args,
    duration: std::time::Duration,
) {
    if settings.pretty {
        // Pretty mode: grouped layout with section headers
        ui::print_grouped_results(results, args.debug);
    } else {
        // Default mode: colored flat list
        for result in results {
            ui::print_result(result, args.debug, None);
        }
    }

    // Shared summary for both modes
    if results.len() > 1 {
        let found = results
            .iter()
            .filter(|r| r.status == ScanStatus::Success)
            .count();
        let not_found = results
            .iter()
            .filter(|r| r.status == ScanStatus::SignatureNotFound)
            .count();
        let failed = results.len() - found - not_found;
        println!();
        ui::print_summary(results.len(), found, not_found, failed, duration);
    }
}

// adstxt-check/src/main.rs tests module

#[cfg(test)]
mod tests {
    use super::*;

    // Helper function with all required fields
    fn create_test_args() -> Args {
        Args {
            domains: vec!["example.com".to_string()],
            file: None,
            signature: Some("google.com|DIRECT".to_string()),
            json: false,
            csv: false,
            pretty: false,
            batch: false,
            streaming: false,
            concurrency: 5,
            timeout: None,
            config: None,
            debug: false,
            verbose: false,
        }
    }

    #[test]
    fn test_validate_args_ok() {
        let args = create_test_args();
        assert!(validate_args(&args).is_ok());
    }

    #[test]
    fn test_validate_args_conflicting_modes() {
        let mut args = create_test_args();
        args.batch = true;
        args.streaming = true;

        let result = validate_args(&args);
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("--batch and --streaming"));
    }

    #[test]
    fn test_validate_args_conflicting_formats() {
        let mut args = create_test_args();
        args.json = true;
        args.csv = true;

        let result = validate_args(&args);
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .contains("multiple output formats"));
    }

    #[test]
    fn test_validate_args_streaming_with_json_rejected() {
        let mut args = create_test_args();
        args.streaming = true;
        args.json = true;

        let result = validate_args(&args);
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("--streaming"));
    }

    #[test]
    fn test_validate_args_batch_with_json_allowed() {
        let mut args = create_test_args();
        args.batch = true;
        args.json = true;

        assert!(validate_args(&args).is_ok());
    }

    #[test]
    fn test_validate_args_concurrency_bounds() {
        let mut args = create_test_args();
        args.concurrency = 0;
        assert!(validate_args(&args).is_err());

        args.concurrency = 101;
        assert!(validate_args(&args).is_err());

        args.concurrency = 100;
        assert!(validate_args(&args).is_ok());
    }

    #[test]
    fn test_validate_args_bad_timeout() {
        let mut args = create_test_args();
        args.timeout = Some("abc".to_string());
        assert!(validate_args(&args).is_err());

        args.timeout = Some("5s".to_string());
        assert!(validate_args(&args).is_ok());
    }

    #[test]
    fn test_validate_args_bad_signature() {
        let mut args = create_test_args();
        args.signature = Some("no-separator".to_string());

        let result = validate_args(&args);
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("Invalid signature"));
    }

    fn create_test_settings(args: &Args) -> RunSettings {
        RunSettings {
            config: ScanConfig::default(),
            signature: "google.com|DIRECT".to_string(),
            pretty: args.pretty,
            json: args.json,
            csv: args.csv,
        }
    }

    #[test]
    fn test_should_use_streaming_logic() {
        let mut args = create_test_args();

        // multiple domains in text mode -> streaming
        assert!(should_use_streaming(&args, &create_test_settings(&args), 5));

        // single domain -> batch
        assert!(!should_use_streaming(&args, &create_test_settings(&args), 1));

        // --batch wins
        args.batch = true;
        assert!(!should_use_streaming(&args, &create_test_settings(&args), 5));
        args.batch = false;

        // --streaming wins even for one domain
        args.streaming = true;
        assert!(should_use_streaming(&args, &create_test_settings(&args), 1));
        args.streaming = false;

        // structured output forces batch
        args.json = true;
        assert!(!should_use_streaming(&args, &create_test_settings(&args), 5));
    }

    #[test]
    fn test_error_stats_aggregation() {
        let mut stats = ErrorStats::default();

        stats.add_result(&ScanResult::failed_response("a.test", "HTTP 404"));
        stats.add_result(&ScanResult::incorrect_input("!!", "no host"));
        stats.add_result(&ScanResult::failed_response("b.test", "timeout"));
        stats.add_result(&ScanResult::success("c.test", vec!["x".into()]));
        stats.add_result(&ScanResult::not_found("d.test"));

        assert_eq!(stats.failed_responses.len(), 2);
        assert_eq!(stats.incorrect_inputs.len(), 1);
        assert!(stats.internal_errors.is_empty());
        assert!(stats.has_errors());

        assert!(stats.failed_responses.contains(&"a.test".to_string()));
        assert!(stats.failed_responses.contains(&"b.test".to_string()));
    }

    #[test]
    fn test_error_stats_empty() {
        let stats = ErrorStats::default();
        assert!(!stats.has_errors());
    }

    #[test]
    fn test_read_domains_from_file() {
        use std::io::Write;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "# comment line\nexample.com\n\nwikipedia.org # inline comment\n   \n"
        )
        .unwrap();

        let domains = read_domains_from_file(file.path().to_str().unwrap()).unwrap();
        assert_eq!(domains, vec!["example.com", "wikipedia.org"]);
    }

    #[test]
    fn test_read_domains_from_missing_file() {
        assert!(read_domains_from_file("/nonexistent/domains.txt").is_err());
    }
}
