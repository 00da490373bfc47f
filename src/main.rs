//! CLI entry point - the composition root.
//!
//! Wires configuration, the manifest, the HTTP fetcher, and signal handling
//! together; all actual behavior lives in the library.

use asset_dl::{BatchRunner, Config, Error, HttpFetcher, Manifest, RunSummary, report};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Fetch the project's remote assets into the local assets directory.
#[derive(Debug, Parser)]
#[command(name = "asset-dl", version, about)]
struct Cli {
    /// JSON manifest overriding the embedded asset list
    #[arg(long, value_name = "FILE")]
    manifest: Option<PathBuf>,

    /// Directory assets are written under
    #[arg(long, value_name = "DIR")]
    assets_root: Option<PathBuf>,

    /// Per-transfer timeout in seconds
    #[arg(long, value_name = "SECS")]
    timeout_secs: Option<u64>,

    /// Maximum concurrent transfers (1 = sequential)
    #[arg(long, value_name = "N")]
    concurrency: Option<usize>,
}

#[tokio::main]
async fn main() -> ExitCode {
    // Keep the console contract clean by default; RUST_LOG opts into more
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(Cli::parse()).await {
        Ok(summary) if summary.all_succeeded() => ExitCode::SUCCESS,
        Ok(_) => ExitCode::FAILURE,
        // The interrupted notice is already printed by the runner
        Err(Error::Interrupted) => ExitCode::FAILURE,
        Err(e) => {
            report::print_fatal(&e.to_string());
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> asset_dl::Result<RunSummary> {
    let mut config = Config::default();
    if let Some(root) = cli.assets_root {
        config.assets_root = root;
    }
    if let Some(secs) = cli.timeout_secs {
        config.timeout_secs = secs;
    }
    if let Some(n) = cli.concurrency {
        config.max_concurrent = n;
    }

    let manifest = match cli.manifest {
        Some(path) => Manifest::from_path(&path)?,
        None => Manifest::embedded()?,
    };

    let fetcher = HttpFetcher::new(&config)?;
    let runner = BatchRunner::new(config, fetcher);
    tokio::spawn(asset_dl::cancel_on_signal(runner.cancellation_token()));

    let summary = runner.run(&manifest).await;
    if summary.interrupted {
        return Err(Error::Interrupted);
    }
    Ok(summary)
}
