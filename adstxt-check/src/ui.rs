//! Pretty-mode display logic for the adstxt-check CLI.
//!
//! This module handles all `--pretty` output: colored result lines,
//! grouped batch output, spinner animation, progress counters,
//! headers, and summaries. Uses only the `console` crate (already a dependency).

use adstxt_check_lib::{ScanResult, ScanStatus};
use console::{pad_str, style, Alignment, Term};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::ErrorStats;

// ── Spinner ──────────────────────────────────────────────────────────────────

const SPINNER_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// An async braille-dot spinner that writes to stderr so stdout stays clean.
pub struct Spinner {
    running: Arc<AtomicBool>,
    handle: Option<tokio::task::JoinHandle<()>>,
}

impl Spinner {
    /// Start a new spinner with the given message (e.g. "Scanning 8 domains...").
    /// Returns None if stderr isn't a terminal.
    pub fn start(message: String) -> Option<Self> {
        if !Term::stderr().is_term() {
            return None;
        }

        let running = Arc::new(AtomicBool::new(true));
        let running_clone = running.clone();

        let handle = tokio::spawn(async move {
            let term = Term::stderr();
            let mut idx = 0usize;
            while running_clone.load(Ordering::Relaxed) {
                let frame = SPINNER_FRAMES[idx % SPINNER_FRAMES.len()];
                let _ = term.clear_line();
                let _ = term.write_str(&format!("{} {}", style(frame).cyan(), message));
                idx += 1;
                tokio::time::sleep(Duration::from_millis(80)).await;
            }
            let _ = term.clear_line();
        });

        Some(Self {
            running,
            handle: Some(handle),
        })
    }

    /// Stop the spinner and clear the line.
    pub async fn stop(mut self) {
        self.running.store(false, Ordering::Relaxed);
        if let Some(h) = self.handle.take() {
            let _ = h.await;
        }
    }
}

// ── Header ───────────────────────────────────────────────────────────────────

/// Print a styled header at the start of a pretty run.
pub fn print_header(domain_count: usize, concurrency: usize, signature: &str) {
    println!(
        "{} {} {}",
        style("adstxt-check").bold(),
        style(format!("v{}", env!("CARGO_PKG_VERSION"))).dim(),
        style(format!(
            "— Scanning {} domain{}",
            domain_count,
            if domain_count == 1 { "" } else { "s" }
        ))
        .dim(),
    );

    println!(
        "{}",
        style(format!(
            "Signature: {} | Concurrency: {}",
            signature, concurrency
        ))
        .dim()
    );
    println!();
}

// ── Single result line ───────────────────────────────────────────────────────

/// Format and print a single scan result with colors and alignment.
///
/// If `counter` is Some((current, total)), a progress prefix like `[3/8]` is shown.
pub fn print_result(result: &ScanResult, debug: bool, counter: Option<(usize, usize)>) {
    let domain_width = 30;
    let padded_domain = pad_str(&result.domain, domain_width, Alignment::Left, Some(".."));

    let prefix = match counter {
        Some((cur, total)) => {
            format!("{} ", style(format!("[{}/{}]", cur, total)).dim())
        }
        None => String::new(),
    };

    match result.status {
        ScanStatus::Success => {
            println!(
                "  {}{}  {}  {}",
                prefix,
                style(&padded_domain).white(),
                style("FOUND").green().bold(),
                style(format!(
                    "{} match{}",
                    result.match_count(),
                    if result.match_count() == 1 { "" } else { "es" }
                ))
                .dim(),
            );
        }
        ScanStatus::SignatureNotFound => {
            println!(
                "  {}{}  {}",
                prefix,
                style(&padded_domain).white(),
                style("NOT FOUND").yellow().bold(),
            );
        }
        ScanStatus::FailedResponse => {
            println!(
                "  {}{}  {}  {}",
                prefix,
                style(&padded_domain).white(),
                style("NO RESPONSE").red().bold(),
                style(brief_error(result)).dim(),
            );
        }
        ScanStatus::IncorrectInput => {
            println!(
                "  {}{}  {}",
                prefix,
                style(&padded_domain).white(),
                style("BAD INPUT").red(),
            );
        }
        ScanStatus::InternalError => {
            println!(
                "  {}{}  {}  {}",
                prefix,
                style(&padded_domain).white(),
                style("ERROR").red().bold(),
                style(brief_error(result)).dim(),
            );
        }
    }

    if debug {
        if let Some(error) = &result.error {
            println!("    {} {}", style("└─").dim(), style(error).dim());
        }
        if result.status == ScanStatus::Success {
            for excerpt in result.data.as_deref().unwrap_or_default() {
                println!("    {} {}", style("└─").dim(), style(excerpt).dim());
            }
        }
    }
}

// ── Grouped batch output ─────────────────────────────────────────────────────

/// Print results grouped by status: Found, Not found, Failed.
/// Empty sections are omitted entirely.
pub fn print_grouped_results(results: &[ScanResult], debug: bool) {
    let mut found: Vec<&ScanResult> = Vec::new();
    let mut not_found: Vec<&ScanResult> = Vec::new();
    let mut failed: Vec<&ScanResult> = Vec::new();

    for r in results {
        match r.status {
            ScanStatus::Success => found.push(r),
            ScanStatus::SignatureNotFound => not_found.push(r),
            _ => failed.push(r),
        }
    }

    if !found.is_empty() {
        println!(
            "  {} {}",
            style(format!("── Found ({}) ", found.len())).green().bold(),
            style("─".repeat(44)).green().dim(),
        );
        for r in &found {
            print_grouped_line(r, debug);
        }
        println!();
    }

    if !not_found.is_empty() {
        println!(
            "  {} {}",
            style(format!("── Not found ({}) ", not_found.len()))
                .yellow()
                .bold(),
            style("─".repeat(40)).yellow().dim(),
        );
        for r in &not_found {
            print_grouped_line(r, debug);
        }
        println!();
    }

    if !failed.is_empty() {
        println!(
            "  {} {}",
            style(format!("── Failed ({}) ", failed.len())).red().bold(),
            style("─".repeat(42)).red().dim(),
        );
        for r in &failed {
            print_grouped_line(r, debug);
        }
        println!();
    }
}

/// Print a single line inside a grouped section.
fn print_grouped_line(result: &ScanResult, debug: bool) {
    let domain_width = 30;
    let padded = pad_str(&result.domain, domain_width, Alignment::Left, Some(".."));

    match result.status {
        ScanStatus::Success => {
            println!(
                "    {}  {}",
                style(&padded).white(),
                style(format!(
                    "{} match{}",
                    result.match_count(),
                    if result.match_count() == 1 { "" } else { "es" }
                ))
                .dim(),
            );
        }
        ScanStatus::SignatureNotFound => {
            println!("    {}", style(&padded).white());
        }
        _ => {
            println!(
                "    {}  {}",
                style(&padded).white(),
                style(brief_error(result)).dim()
            );
        }
    }

    if debug {
        if let Some(error) = &result.error {
            println!("      {} {}", style("└─").dim(), style(error).dim());
        }
    }
}

// ── Summary ──────────────────────────────────────────────────────────────────

/// Print the final summary bar with colored counts.
pub fn print_summary(
    total: usize,
    found: usize,
    not_found: usize,
    failed: usize,
    duration: Duration,
) {
    println!(
        "  {}",
        style("────────────────────────────────────────────────────").dim()
    );
    println!(
        "  {} domain{} in {:.1}s  {}  {}  {}  {}  {}  {}",
        style(total).bold(),
        if total == 1 { "" } else { "s" },
        duration.as_secs_f64(),
        style("|").dim(),
        style(format!("{} found", found)).green(),
        style("|").dim(),
        style(format!("{} without signature", not_found)).yellow(),
        style("|").dim(),
        style(format!("{} failed", failed)).red(),
    );
}

// ── Error summary ────────────────────────────────────────────────────────────

/// Print a categorized error summary using colors.
pub fn print_error_summary(error_stats: &ErrorStats) {
    if !error_stats.has_errors() {
        return;
    }

    println!("  {}", style("Some domains could not be scanned:").yellow());

    let format_list = |domains: &[String], max_show: usize| -> String {
        if domains.len() <= max_show {
            domains.join(", ")
        } else {
            let shown = &domains[..max_show];
            let remaining = domains.len() - max_show;
            format!("{}, ... and {} more", shown.join(", "), remaining)
        }
    };

    if !error_stats.failed_responses.is_empty() {
        println!(
            "  {} {} failed response{}: {}",
            style("•").dim(),
            error_stats.failed_responses.len(),
            if error_stats.failed_responses.len() == 1 {
                ""
            } else {
                "s"
            },
            format_list(&error_stats.failed_responses, 5),
        );
    }
    if !error_stats.incorrect_inputs.is_empty() {
        println!(
            "  {} {} invalid input{}: {}",
            style("•").dim(),
            error_stats.incorrect_inputs.len(),
            if error_stats.incorrect_inputs.len() == 1 {
                ""
            } else {
                "s"
            },
            format_list(&error_stats.incorrect_inputs, 5),
        );
    }
    if !error_stats.internal_errors.is_empty() {
        println!(
            "  {} {} internal error{}: {}",
            style("•").dim(),
            error_stats.internal_errors.len(),
            if error_stats.internal_errors.len() == 1 {
                ""
            } else {
                "s"
            },
            format_list(&error_stats.internal_errors, 5),
        );
    }
}

// ── Helpers ──────────────────────────────────────────────────────────────────

/// Extract a brief error reason from a failed scan result.
fn brief_error(result: &ScanResult) -> &'static str {
    match &result.error {
        Some(msg) => {
            let m = msg.to_lowercase();
            if m.contains("timeout") || m.contains("timed out") {
                "(timeout)"
            } else if m.contains("network") || m.contains("dns") || m.contains("connect") {
                "(network error)"
            } else if m.contains("http") {
                "(http error)"
            } else if m.contains("invalid input") {
                "(invalid input)"
            } else {
                "(error)"
            }
        }
        None => "(unknown)",
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_brief_error_timeout() {
        let r = ScanResult::failed_response("a.com", "Timeout after 3s during: GET");
        assert_eq!(brief_error(&r), "(timeout)");
    }

    #[test]
    fn test_brief_error_network() {
        let r = ScanResult::failed_response("a.com", "Network error: dns lookup failed");
        assert_eq!(brief_error(&r), "(network error)");
    }

    #[test]
    fn test_brief_error_http_status() {
        let r = ScanResult::failed_response("a.com", "HTTP 404 for 'a.com'");
        assert_eq!(brief_error(&r), "(http error)");
    }

    #[test]
    fn test_brief_error_without_detail() {
        let r = ScanResult::not_found("a.com");
        assert_eq!(brief_error(&r), "(unknown)");
    }
}
