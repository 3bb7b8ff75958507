//! Local tool inventory
//!
//! The tool directory holds one binary per supported version, named after the
//! version, plus a `latest` entry. The directory is read once at startup to
//! seed the version trie; after that the inventory is immutable.

use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::{RelayError, RelayResult};
use crate::trie::VersionTrie;

/// Name of the designated fallback binary
pub const LATEST: &str = "latest";

/// The set of locally installed tool versions and the trie used to resolve a
/// cluster's reported version against it
#[derive(Debug)]
pub struct ToolInventory {
    tool_dir: PathBuf,
    versions: Vec<String>,
    trie: VersionTrie,
}

impl ToolInventory {
    /// Discover installed versions by listing the tool directory, skipping
    /// the `latest` entry
    pub fn discover(tool_dir: impl AsRef<Path>) -> RelayResult<Self> {
        let tool_dir = tool_dir.as_ref().to_path_buf();
        let entries = std::fs::read_dir(&tool_dir).map_err(|e| {
            RelayError::Inventory(format!("cannot read {}: {}", tool_dir.display(), e))
        })?;

        let mut versions = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| RelayError::Inventory(e.to_string()))?;
            let name = entry.file_name().to_string_lossy().into_owned();
            if name != LATEST {
                versions.push(name);
            }
        }
        versions.sort();

        info!(
            tool_dir = %tool_dir.display(),
            "supported tool versions: {{{}}}",
            versions.join(", ")
        );
        Ok(Self::from_versions(tool_dir, versions))
    }

    /// Build an inventory from an explicit version list (bypasses the
    /// filesystem; used by tests and fixtures)
    pub fn from_versions(tool_dir: impl Into<PathBuf>, versions: Vec<String>) -> Self {
        let trie = VersionTrie::from_versions(&versions);
        Self {
            tool_dir: tool_dir.into(),
            versions,
            trie,
        }
    }

    /// Resolve the cluster's reported version to an installed tool version.
    /// An unresolved or ambiguous match never fails: it degrades to the
    /// designated `latest` binary.
    pub fn resolve(&self, reported_version: &str) -> String {
        let (matched, resolved) = self.trie.best_match(reported_version);
        if resolved && !matched.is_empty() {
            matched
        } else {
            LATEST.to_string()
        }
    }

    pub fn versions(&self) -> &[String] {
        &self.versions
    }

    pub fn tool_dir(&self) -> &Path {
        &self.tool_dir
    }
}
