//! Console reporting for the operator-facing output
//!
//! All helpers are pure formatting functions (message in, styled line out);
//! the `print_*` wrappers are the only place the batch writes to stdout.
//! Structured logging goes through `tracing` separately and is off by
//! default, so this module alone defines what an operator sees.

use crate::error::FetchError;
use crate::runner::RunSummary;
use std::path::Path;

const GREEN: &str = "\x1b[92m";
const RED: &str = "\x1b[91m";
const YELLOW: &str = "\x1b[93m";
const BLUE: &str = "\x1b[94m";
const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

const SEPARATOR_WIDTH: usize = 60;

/// Style a success message with a green check mark
pub fn success_line(msg: &str) -> String {
    format!("{GREEN}\u{2713}{RESET} {msg}")
}

/// Style a failure message with a red cross
pub fn failure_line(msg: &str) -> String {
    format!("{RED}\u{2717}{RESET} {msg}")
}

/// Style an informational message
pub fn info_line(msg: &str) -> String {
    format!("{BLUE}\u{2139}{RESET} {msg}")
}

/// Style a warning message
pub fn warn_line(msg: &str) -> String {
    format!("{YELLOW}\u{26a0}{RESET} {msg}")
}

/// Render a byte count the way the per-entry result lines show it
pub fn format_size(bytes: u64) -> String {
    format!("{:.1} KiB", bytes as f64 / 1024.0)
}

/// Render the separator-bounded summary block for a finished run
pub fn summary_block(summary: &RunSummary) -> String {
    let separator = "=".repeat(SEPARATOR_WIDTH);
    let mut out = String::new();

    out.push_str(&separator);
    out.push('\n');
    out.push_str(&format!("{BOLD}FETCH SUMMARY{RESET}\n"));
    out.push_str(&separator);
    out.push('\n');
    out.push_str(&format!(
        "{GREEN}\u{2713} Successful: {}{RESET}\n",
        summary.successes.len()
    ));
    out.push_str(&format!(
        "{RED}\u{2717} Failed: {}{RESET}\n",
        summary.failures.len()
    ));

    if !summary.failures.is_empty() {
        out.push_str("\nFailed downloads:\n");
        for (name, reason) in &summary.failures {
            out.push_str(&format!("  - {name}: {reason}\n"));
        }
    }

    out.push_str(&separator);
    out
}

pub(crate) fn print_header(assets_root: &Path, total: usize) {
    println!(
        "{}",
        info_line(&format!("Assets directory: {}", assets_root.display()))
    );
    println!("{}", info_line(&format!("Total assets to fetch: {total}")));
    println!();
}

pub(crate) fn print_progress(name: &str) {
    println!("{}", info_line(&format!("Fetching {name}...")));
}

pub(crate) fn print_success(name: &str, byte_size: u64) {
    println!(
        "{}",
        success_line(&format!("{name} ({})", format_size(byte_size)))
    );
}

pub(crate) fn print_failure(name: &str, reason: &FetchError) {
    println!("{}", failure_line(&format!("{name} - {reason}")));
}

pub(crate) fn print_interrupted() {
    println!();
    println!("{}", warn_line("Fetch interrupted; remaining assets skipped"));
}

pub(crate) fn print_summary(summary: &RunSummary) {
    println!();
    println!("{}", summary_block(summary));
    println!();
    println!(
        "{}",
        info_line(&format!("Completed at: {}", chrono::Local::now().to_rfc3339()))
    );
}

/// Report an error that aborted the run outside the per-entry loop
pub fn print_fatal(message: &str) {
    eprintln!("{}", failure_line(&format!("Fatal error: {message}")));
}
