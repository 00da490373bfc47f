//! Asset manifest: the ordered mapping of destination paths to source URLs
//!
//! The manifest is plain data, not code: a JSON array of `{path, url}`
//! records. The project's own manifest is embedded into the binary as the
//! zero-argument default, and any other manifest can be injected from a file
//! or built programmatically, so the batch runner is testable against
//! arbitrary entry sets.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Component, Path};

/// The manifest compiled into the binary (see `data/assets.json`)
const EMBEDDED_MANIFEST: &str = include_str!("../data/assets.json");

/// One (destination path, source URL) pair
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetEntry {
    /// Slash-separated destination path, relative to the assets root
    pub path: String,
    /// Absolute HTTP(S) URL the asset is fetched from
    pub url: String,
}

impl AssetEntry {
    /// Create an entry from a (path, url) pair
    pub fn new(path: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            url: url.into(),
        }
    }
}

/// Ordered, validated collection of asset entries
///
/// Iteration order is the declaration order of the source JSON; the batch
/// runner relies on it for deterministic progress and report ordering.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Manifest {
    entries: Vec<AssetEntry>,
}

impl Manifest {
    /// The manifest embedded at compile time
    pub fn embedded() -> Result<Self> {
        Self::from_json(EMBEDDED_MANIFEST)
    }

    /// Parse and validate a manifest from a JSON array of `{path, url}` records
    pub fn from_json(json: &str) -> Result<Self> {
        let entries: Vec<AssetEntry> = serde_json::from_str(json)
            .map_err(|e| Error::Manifest(format!("not a valid JSON entry array: {e}")))?;
        Self::from_entries(entries)
    }

    /// Load and validate a manifest from a JSON file
    pub fn from_path(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Validate a programmatically built entry list
    pub fn from_entries(entries: Vec<AssetEntry>) -> Result<Self> {
        let mut seen = HashSet::new();
        for entry in &entries {
            validate_entry(entry)?;
            if !seen.insert(entry.path.as_str()) {
                return Err(Error::Manifest(format!(
                    "duplicate destination path: {}",
                    entry.path
                )));
            }
        }
        Ok(Self { entries })
    }

    /// Iterate entries in declaration order
    pub fn iter(&self) -> std::slice::Iter<'_, AssetEntry> {
        self.entries.iter()
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the manifest has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> IntoIterator for &'a Manifest {
    type Item = &'a AssetEntry;
    type IntoIter = std::slice::Iter<'a, AssetEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Reject entries that would escape the assets root or cannot be fetched
fn validate_entry(entry: &AssetEntry) -> Result<()> {
    if entry.path.is_empty() {
        return Err(Error::Manifest("entry with empty destination path".into()));
    }

    for component in Path::new(&entry.path).components() {
        match component {
            Component::Normal(_) | Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                return Err(Error::Manifest(format!(
                    "destination path must be relative and must not traverse upward: {}",
                    entry.path
                )));
            }
        }
    }

    let url = url::Url::parse(&entry.url)
        .map_err(|e| Error::Manifest(format!("invalid URL for {}: {e}", entry.path)))?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(Error::Manifest(format!(
            "unsupported URL scheme '{}' for {}",
            url.scheme(),
            entry.path
        )));
    }

    Ok(())
}
