//! Single-transfer execution: one HTTP GET streamed onto disk
//!
//! The fetcher downloads into a `.part` sibling of the destination and only
//! renames it into place once the whole body has been written and flushed.
//! A failed transfer therefore never leaves a torn file under the final
//! name, and a re-run can never truncate a previously good download.

use crate::config::Config;
use crate::error::{Error, FetchError, Result};
use async_trait::async_trait;
use futures::StreamExt;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// The result of one transfer attempt
///
/// Exactly one outcome is produced per attempted manifest entry; outcomes
/// are never mutated after creation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TransferOutcome {
    /// The resource was fully written to `path`
    Success {
        /// Final destination of the asset
        path: PathBuf,
        /// Size of the file on disk, not the Content-Length header
        byte_size: u64,
    },
    /// The transfer failed; nothing is left under the final name
    Failure {
        /// Destination the asset would have been written to
        path: PathBuf,
        /// Why the transfer failed
        reason: FetchError,
    },
}

impl TransferOutcome {
    /// Destination path this outcome refers to
    pub fn path(&self) -> &Path {
        match self {
            TransferOutcome::Success { path, .. } | TransferOutcome::Failure { path, .. } => path,
        }
    }

    /// True for [`TransferOutcome::Success`]
    pub fn is_success(&self) -> bool {
        matches!(self, TransferOutcome::Success { .. })
    }
}

/// A single-resource transfer
///
/// The seam between the batch runner and the network: production code uses
/// [`HttpFetcher`], tests drive the runner with a scripted implementation.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetch `url` and persist it at `destination`, classifying the result
    ///
    /// Exactly one attempt; retries are the caller's policy decision (and
    /// the batch runner deliberately makes none).
    async fn fetch(&self, destination: &Path, url: &str) -> TransferOutcome;
}

/// Production fetcher backed by a shared `reqwest` client
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Build a fetcher from the batch configuration
    ///
    /// The client applies the whole-request timeout (connect + read) and the
    /// configured user agent; redirects are followed (client default).
    pub fn new(config: &Config) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| Error::Config {
                message: format!("failed to build HTTP client: {e}"),
            })?;
        Ok(Self { client })
    }

    async fn fetch_inner(
        &self,
        destination: &Path,
        url: &str,
    ) -> std::result::Result<u64, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::classify(&e))?;

        let status = response.status();
        if status.is_client_error() || status.is_server_error() {
            return Err(FetchError::HttpStatus {
                status: status.as_u16(),
            });
        }

        if let Some(parent) = destination.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| FetchError::io("failed to create destination directory", &e))?;
        }

        let part = part_path(destination);
        if let Err(e) = self.stream_to_file(response, &part).await {
            // Best-effort temp cleanup; the final destination is untouched
            let _ = fs::remove_file(&part).await;
            return Err(e);
        }

        if let Err(e) = fs::rename(&part, destination).await {
            let _ = fs::remove_file(&part).await;
            return Err(FetchError::io("failed to move download into place", &e));
        }

        // Ground truth: measure what actually landed on disk
        let metadata = fs::metadata(destination)
            .await
            .map_err(|e| FetchError::io("failed to stat downloaded file", &e))?;
        Ok(metadata.len())
    }

    /// Write the response body to `path` chunk by chunk, never buffering it whole
    async fn stream_to_file(
        &self,
        response: reqwest::Response,
        path: &Path,
    ) -> std::result::Result<(), FetchError> {
        let mut file = fs::File::create(path)
            .await
            .map_err(|e| FetchError::io("failed to create temp file", &e))?;

        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| FetchError::classify(&e))?;
            file.write_all(&chunk)
                .await
                .map_err(|e| FetchError::io("failed to write chunk", &e))?;
        }

        file.flush()
            .await
            .map_err(|e| FetchError::io("failed to flush file", &e))?;
        Ok(())
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, destination: &Path, url: &str) -> TransferOutcome {
        tracing::debug!(destination = %destination.display(), url, "starting transfer");
        match self.fetch_inner(destination, url).await {
            Ok(byte_size) => TransferOutcome::Success {
                path: destination.to_path_buf(),
                byte_size,
            },
            Err(reason) => {
                tracing::debug!(destination = %destination.display(), error = %reason, "transfer failed");
                TransferOutcome::Failure {
                    path: destination.to_path_buf(),
                    reason,
                }
            }
        }
    }
}

/// Sibling temp path downloads are streamed into before the final rename
fn part_path(destination: &Path) -> PathBuf {
    let mut name = destination.as_os_str().to_os_string();
    name.push(".part");
    PathBuf::from(name)
}
