//! # asset-dl
//!
//! Batch asset fetcher: downloads a fixed manifest of remote assets into a
//! local directory tree, reports per-item outcomes, and prints a run
//! summary.
//!
//! ## Design Philosophy
//!
//! asset-dl is designed to be:
//! - **Library-first** - The binary is a thin composition root; every
//!   behavior is reachable (and testable) through the crate API
//! - **Data-driven** - The asset manifest is plain JSON, injectable from a
//!   file or built programmatically; the project's own manifest is embedded
//!   as the zero-argument default
//! - **Fail-soft** - A failed transfer is classified and recorded, never
//!   aborts the batch, and never leaves a torn file under a final name
//!
//! ## Quick Start
//!
//! ```no_run
//! use asset_dl::{BatchRunner, Config, HttpFetcher, Manifest};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::default();
//!     let manifest = Manifest::embedded()?;
//!     let fetcher = HttpFetcher::new(&config)?;
//!
//!     let runner = BatchRunner::new(config, fetcher);
//!     let summary = runner.run(&manifest).await;
//!
//!     std::process::exit(if summary.all_succeeded() { 0 } else { 1 });
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// Configuration types
pub mod config;
/// Error types
pub mod error;
/// Single-transfer execution
pub mod fetcher;
/// Asset manifest loading and validation
pub mod manifest;
/// Console reporting helpers
pub mod report;
/// Batch execution and run summaries
pub mod runner;

// Re-export commonly used types
pub use config::Config;
pub use error::{Error, FetchError, Result};
pub use fetcher::{Fetcher, HttpFetcher, TransferOutcome};
pub use manifest::{AssetEntry, Manifest};
pub use runner::{BatchRunner, RunSummary};

use tokio_util::sync::CancellationToken;

/// Cancel the given token once a termination signal arrives.
///
/// The batch runner stops attempting further entries when its token is
/// cancelled, so spawning this next to [`BatchRunner::run`] turns an
/// operator interrupt into a clean "interrupted" exit.
///
/// - **Unix:** listens for SIGTERM and SIGINT, with fallbacks if signal
///   registration fails.
/// - **Windows/other:** listens for Ctrl+C via `tokio::signal::ctrl_c()`.
pub async fn cancel_on_signal(token: CancellationToken) {
    wait_for_signal().await;
    token.cancel();
}

#[cfg(unix)]
async fn wait_for_signal() {
    use tokio::signal::unix::{SignalKind, signal};

    // Signal registration may fail in restricted environments (containers, tests)
    let sigterm_result = signal(SignalKind::terminate());
    let sigint_result = signal(SignalKind::interrupt());

    match (sigterm_result, sigint_result) {
        (Ok(mut sigterm), Ok(mut sigint)) => {
            tokio::select! {
                _ = sigterm.recv() => {
                    tracing::info!("Received SIGTERM signal");
                }
                _ = sigint.recv() => {
                    tracing::info!("Received SIGINT signal (Ctrl+C)");
                }
            }
        }
        (Err(e), _) => {
            tracing::warn!(error = %e, "Could not register SIGTERM handler, waiting for SIGINT only");
            if let Ok(mut sigint) = signal(SignalKind::interrupt()) {
                sigint.recv().await;
                tracing::info!("Received SIGINT signal (Ctrl+C)");
            } else {
                tracing::error!("Could not register any signal handlers, using ctrl_c fallback");
                tokio::signal::ctrl_c().await.ok();
            }
        }
        (_, Err(e)) => {
            tracing::warn!(error = %e, "Could not register SIGINT handler, waiting for SIGTERM only");
            if let Ok(mut sigterm) = signal(SignalKind::terminate()) {
                sigterm.recv().await;
                tracing::info!("Received SIGTERM signal");
            } else {
                tracing::error!("Could not register any signal handlers, using ctrl_c fallback");
                tokio::signal::ctrl_c().await.ok();
            }
        }
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => {
            tracing::info!("Received Ctrl+C signal");
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C signal");
        }
    }
}
