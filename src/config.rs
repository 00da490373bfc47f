//! Configuration types for asset-dl

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Batch fetch configuration
///
/// Every field has a sensible default so `Config::default()` reproduces the
/// zero-argument behavior of the tool: write under `public/assets`, 30 second
/// per-transfer timeout, strictly sequential transfers.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    /// Root directory assets are written under (default: "public/assets")
    #[serde(default = "default_assets_root")]
    pub assets_root: PathBuf,

    /// Whole-request timeout per transfer, connect + read, in seconds (default: 30)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Maximum concurrent transfers (default: 1)
    ///
    /// The default keeps transfers strictly sequential, which also keeps the
    /// per-entry progress and result lines in manifest order. Values above 1
    /// run transfers through a bounded buffer; outcomes are still collected
    /// in manifest order.
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent: usize,

    /// User-Agent header sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            assets_root: default_assets_root(),
            timeout_secs: default_timeout_secs(),
            max_concurrent: default_max_concurrent(),
            user_agent: default_user_agent(),
        }
    }
}

impl Config {
    /// The per-transfer timeout as a [`Duration`]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn default_assets_root() -> PathBuf {
    PathBuf::from("public/assets")
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_concurrent() -> usize {
    1
}

fn default_user_agent() -> String {
    concat!("asset-dl/", env!("CARGO_PKG_VERSION")).to_string()
}
