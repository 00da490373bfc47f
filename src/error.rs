//! Error types for asset-dl
//!
//! Two layers of errors exist:
//! - [`FetchError`] — the closed per-transfer failure taxonomy. These are
//!   recovered locally by the batch runner, recorded in the run summary, and
//!   never abort the batch.
//! - [`Error`] — process-level failures (bad manifest, interrupted run, ...)
//!   that abort the remaining batch and map to a non-zero exit status.

use thiserror::Error;

/// Result type alias for asset-dl operations
pub type Result<T> = std::result::Result<T, Error>;

/// Process-level error type for asset-dl
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error with a human-readable description
    #[error("configuration error: {message}")]
    Config {
        /// What was wrong with the configuration
        message: String,
    },

    /// Manifest could not be parsed or failed validation
    #[error("invalid manifest: {0}")]
    Manifest(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The batch was interrupted before every entry was attempted
    #[error("interrupted before all assets were fetched")]
    Interrupted,
}

/// Failure taxonomy for a single transfer attempt
///
/// The categories are mutually exclusive; classification picks the first
/// matching cause in declaration order. HTTP error statuses are taken from
/// the response itself and never reach [`FetchError::classify`].
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum FetchError {
    /// No complete response within the configured request timeout
    #[error("timed out")]
    Timeout,

    /// Transport-level failure before any HTTP response (DNS, refused, reset)
    #[error("connection failed")]
    ConnectionFailed,

    /// A response arrived with an error status code (>= 400)
    #[error("HTTP {status}")]
    HttpStatus {
        /// The status code of the error response
        status: u16,
    },

    /// Anything else (local write error, malformed URL, ...)
    #[error("{message}")]
    Other {
        /// Free-text description of the failure
        message: String,
    },
}

impl FetchError {
    /// Map whatever the HTTP client reports onto the closed taxonomy.
    ///
    /// Timeout wins over a connect failure so that a connect that timed out
    /// is reported as [`FetchError::Timeout`].
    pub fn classify(err: &reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Timeout
        } else if err.is_connect() {
            FetchError::ConnectionFailed
        } else if let Some(status) = err.status() {
            FetchError::HttpStatus {
                status: status.as_u16(),
            }
        } else {
            FetchError::Other {
                message: err.to_string(),
            }
        }
    }

    /// Wrap a local I/O failure (temp file creation, write, rename)
    pub(crate) fn io(context: &str, err: &std::io::Error) -> Self {
        FetchError::Other {
            message: format!("{context}: {err}"),
        }
    }
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn fetch_error_display_mentions_http_status() {
        let err = FetchError::HttpStatus { status: 404 };
        assert!(
            err.to_string().contains("404"),
            "reason string must mention the status code"
        );
    }

    #[test]
    fn fetch_error_display_for_each_category() {
        assert_eq!(FetchError::Timeout.to_string(), "timed out");
        assert_eq!(FetchError::ConnectionFailed.to_string(), "connection failed");
        assert_eq!(
            FetchError::Other {
                message: "disk full".into()
            }
            .to_string(),
            "disk full"
        );
    }

    #[test]
    fn io_wrapper_keeps_context_and_source_message() {
        let io = std::io::Error::other("disk fail");
        let err = FetchError::io("failed to write chunk", &io);
        assert_eq!(
            err,
            FetchError::Other {
                message: "failed to write chunk: disk fail".into()
            }
        );
    }

    #[test]
    fn process_error_display() {
        let err = Error::Config {
            message: "timeout must be positive".into(),
        };
        assert_eq!(
            err.to_string(),
            "configuration error: timeout must be positive"
        );
        assert_eq!(
            Error::Manifest("duplicate path".into()).to_string(),
            "invalid manifest: duplicate path"
        );
    }

    #[tokio::test]
    async fn classify_maps_client_timeout_to_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/slow"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
            .mount(&server)
            .await;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(50))
            .build()
            .unwrap();
        let err = client
            .get(format!("{}/slow", server.uri()))
            .send()
            .await
            .unwrap_err();

        assert_eq!(FetchError::classify(&err), FetchError::Timeout);
    }

    #[tokio::test]
    async fn classify_maps_refused_connection_to_connection_failed() {
        // Bind a server to grab a free port, then drop it so the port refuses
        let server = MockServer::start().await;
        let uri = server.uri();
        drop(server);

        let client = reqwest::Client::new();
        let err = client.get(uri).send().await.unwrap_err();

        assert_eq!(FetchError::classify(&err), FetchError::ConnectionFailed);
    }
}
