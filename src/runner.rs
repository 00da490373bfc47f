//! Batch execution: drive every manifest entry through a fetcher and
//! aggregate the outcomes into a run summary
//!
//! Entries flow through an order-preserving bounded buffer
//! (`futures::stream::buffered`), so outcomes are always collected in
//! manifest declaration order. The default buffer width of 1 is the strictly
//! sequential baseline, which additionally keeps the progress and result
//! lines in declaration order.

use crate::config::Config;
use crate::error::FetchError;
use crate::fetcher::{Fetcher, TransferOutcome};
use crate::manifest::Manifest;
use crate::report;
use futures::StreamExt;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Aggregate result of one batch invocation
///
/// Built once per run; both lists preserve manifest declaration order.
#[derive(Clone, Debug, Default)]
pub struct RunSummary {
    /// (relative path, bytes written) for each successful entry
    pub successes: Vec<(String, u64)>,
    /// (relative path, failure reason) for each failed entry
    pub failures: Vec<(String, FetchError)>,
    /// True when the batch was cancelled before attempting every entry
    pub interrupted: bool,
}

impl RunSummary {
    /// True iff every entry was attempted and none failed
    pub fn all_succeeded(&self) -> bool {
        self.failures.is_empty() && !self.interrupted
    }

    /// Number of entries that produced an outcome
    pub fn attempted(&self) -> usize {
        self.successes.len() + self.failures.len()
    }
}

/// Drives a full batch: iterates the manifest, invokes the fetcher per
/// entry, reports progress, and accumulates the summary
pub struct BatchRunner<F> {
    config: Config,
    fetcher: Arc<F>,
    cancel: CancellationToken,
}

impl<F: Fetcher + 'static> BatchRunner<F> {
    /// Create a runner over the given configuration and fetcher
    pub fn new(config: Config, fetcher: F) -> Self {
        Self {
            config,
            fetcher: Arc::new(fetcher),
            cancel: CancellationToken::new(),
        }
    }

    /// Token that stops the batch between entries when cancelled
    ///
    /// The binary wires termination signals to this; cancelling mid-transfer
    /// drops the in-flight request.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Run the whole batch and print the per-entry lines and summary block
    ///
    /// Transfer failures never abort the batch; every entry is attempted
    /// exactly once unless the run is cancelled first.
    pub async fn run(&self, manifest: &Manifest) -> RunSummary {
        tracing::info!(
            total = manifest.len(),
            assets_root = %self.config.assets_root.display(),
            "starting asset batch"
        );
        report::print_header(&self.config.assets_root, manifest.len());

        let width = self.config.max_concurrent.max(1);
        let mut outcomes = futures::stream::iter(manifest.iter().cloned())
            .map(|entry| {
                let fetcher = Arc::clone(&self.fetcher);
                let destination = self.config.assets_root.join(&entry.path);
                async move {
                    report::print_progress(&entry.path);
                    let outcome = fetcher.fetch(&destination, &entry.url).await;
                    (entry, outcome)
                }
            })
            .buffered(width);

        let mut summary = RunSummary::default();
        loop {
            let next = tokio::select! {
                biased;
                () = self.cancel.cancelled() => {
                    summary.interrupted = true;
                    break;
                }
                item = outcomes.next() => item,
            };
            let Some((entry, outcome)) = next else { break };

            match outcome {
                TransferOutcome::Success { byte_size, .. } => {
                    report::print_success(&entry.path, byte_size);
                    summary.successes.push((entry.path, byte_size));
                }
                TransferOutcome::Failure { reason, .. } => {
                    tracing::warn!(path = %entry.path, error = %reason, "transfer failed");
                    report::print_failure(&entry.path, &reason);
                    summary.failures.push((entry.path, reason));
                }
            }
        }
        drop(outcomes);

        if summary.interrupted {
            tracing::warn!(
                attempted = summary.attempted(),
                total = manifest.len(),
                "batch interrupted"
            );
            report::print_interrupted();
        }
        report::print_summary(&summary);

        summary
    }
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::AssetEntry;
    use async_trait::async_trait;
    use std::path::{Path, PathBuf};
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Fetcher scripted by URL: anything containing "fail" fails with a 404,
    /// anything containing "slow" sleeps first; everything else succeeds.
    #[derive(Default)]
    struct ScriptedFetcher {
        calls: AtomicUsize,
        destinations: Mutex<Vec<PathBuf>>,
    }

    #[async_trait]
    impl Fetcher for ScriptedFetcher {
        async fn fetch(&self, destination: &Path, url: &str) -> TransferOutcome {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.destinations
                .lock()
                .unwrap()
                .push(destination.to_path_buf());

            if url.contains("slow") {
                tokio::time::sleep(Duration::from_millis(100)).await;
            }
            if url.contains("fail") {
                TransferOutcome::Failure {
                    path: destination.to_path_buf(),
                    reason: FetchError::HttpStatus { status: 404 },
                }
            } else {
                TransferOutcome::Success {
                    path: destination.to_path_buf(),
                    byte_size: 1024,
                }
            }
        }
    }

    fn manifest(urls: &[(&str, &str)]) -> Manifest {
        Manifest::from_entries(
            urls.iter()
                .map(|(path, url)| AssetEntry::new(*path, *url))
                .collect(),
        )
        .unwrap()
    }

    fn runner(config: Config) -> BatchRunner<ScriptedFetcher> {
        BatchRunner::new(config, ScriptedFetcher::default())
    }

    #[tokio::test]
    async fn every_entry_produces_exactly_one_outcome() {
        let manifest = manifest(&[
            ("a/one.png", "https://example.com/one"),
            ("b/two.png", "https://example.com/fail"),
            ("c/three.png", "https://example.com/three"),
        ]);
        let runner = runner(Config::default());

        let summary = runner.run(&manifest).await;

        assert_eq!(summary.attempted(), manifest.len());
        let mut outcome_paths: Vec<&str> = summary
            .successes
            .iter()
            .map(|(p, _)| p.as_str())
            .chain(summary.failures.iter().map(|(p, _)| p.as_str()))
            .collect();
        outcome_paths.sort_unstable();
        assert_eq!(outcome_paths, vec!["a/one.png", "b/two.png", "c/three.png"]);
    }

    #[tokio::test]
    async fn mixed_outcomes_are_counted_and_ordered() {
        let manifest = manifest(&[
            ("one.png", "https://example.com/ok"),
            ("two.png", "https://example.com/fail"),
            ("three.png", "https://example.com/ok2"),
        ]);
        let runner = runner(Config::default());

        let summary = runner.run(&manifest).await;

        assert_eq!(summary.successes.len(), 2);
        assert_eq!(summary.failures.len(), 1);
        assert!(!summary.all_succeeded());
        assert_eq!(summary.successes[0].0, "one.png");
        assert_eq!(summary.successes[1].0, "three.png");
        assert_eq!(summary.failures[0].0, "two.png");
        assert_eq!(
            summary.failures[0].1,
            FetchError::HttpStatus { status: 404 }
        );
    }

    #[tokio::test]
    async fn all_successes_means_all_succeeded() {
        let manifest = manifest(&[("one.png", "https://example.com/a")]);
        let summary = runner(Config::default()).run(&manifest).await;

        assert!(summary.all_succeeded());
        assert_eq!(summary.successes[0], ("one.png".to_string(), 1024));
    }

    #[tokio::test]
    async fn empty_manifest_is_a_successful_noop() {
        let summary = runner(Config::default()).run(&Manifest::default()).await;

        assert_eq!(summary.attempted(), 0);
        assert!(summary.all_succeeded());
        assert!(!summary.interrupted);
    }

    #[tokio::test]
    async fn destinations_are_joined_under_the_assets_root() {
        let config = Config {
            assets_root: PathBuf::from("custom/root"),
            ..Config::default()
        };
        let manifest = manifest(&[("payments/visa.svg", "https://example.com/v")]);
        let runner = runner(config);

        runner.run(&manifest).await;

        let destinations = runner.fetcher.destinations.lock().unwrap();
        assert_eq!(
            destinations.as_slice(),
            &[PathBuf::from("custom/root/payments/visa.svg")]
        );
    }

    #[tokio::test]
    async fn pre_cancelled_token_attempts_nothing() {
        let manifest = manifest(&[
            ("one.png", "https://example.com/a"),
            ("two.png", "https://example.com/b"),
        ]);
        let runner = runner(Config::default());
        runner.cancellation_token().cancel();

        let summary = runner.run(&manifest).await;

        assert!(summary.interrupted);
        assert!(!summary.all_succeeded());
        assert_eq!(summary.attempted(), 0);
        assert_eq!(runner.fetcher.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn buffered_concurrency_preserves_declaration_order() {
        // First entry is the slowest; with a buffer width of 3 the later
        // entries finish first, but the summary must stay in manifest order.
        let config = Config {
            max_concurrent: 3,
            ..Config::default()
        };
        let manifest = manifest(&[
            ("one.png", "https://example.com/slow"),
            ("two.png", "https://example.com/b"),
            ("three.png", "https://example.com/c"),
        ]);

        let summary = runner(config).run(&manifest).await;

        let paths: Vec<&str> = summary.successes.iter().map(|(p, _)| p.as_str()).collect();
        assert_eq!(paths, vec!["one.png", "two.png", "three.png"]);
    }
}
