//! Persistence configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Slices that are never written to or read from storage by default.
pub const DEFAULT_BLACKLIST: &[&str] = &["networkInfo", "alert", "imports"];

/// On-disk encoding of the state blob.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum BlobFormat {
    /// Each top-level slice is itself a JSON-encoded string.
    #[default]
    ReduxPersist,
    /// Plain nested JSON.
    Plain,
}

/// Settings for the persistence adapter.
///
/// Every field has a default, so an empty TOML file is a valid configuration.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct PersistConfig {
    /// Storage key; the blob lives at `persist:<key>`.
    pub key: String,
    /// Directory holding the blob. `None` resolves to the platform data dir.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_dir: Option<PathBuf>,
    pub blacklist: Vec<String>,
    pub blob_format: BlobFormat,
    /// JSON export of the accounts available in secure storage.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accounts_file: Option<PathBuf>,
}

impl Default for PersistConfig {
    fn default() -> Self {
        Self {
            key: "root".to_string(),
            storage_dir: None,
            blacklist: DEFAULT_BLACKLIST.iter().map(|s| s.to_string()).collect(),
            blob_format: BlobFormat::default(),
            accounts_file: None,
        }
    }
}

impl PersistConfig {
    /// Name of the storage entry, e.g. `persist:root`.
    pub fn storage_key(&self) -> String {
        format!("persist:{}", self.key)
    }

    pub fn is_blacklisted(&self, slice: &str) -> bool {
        self.blacklist.iter().any(|name| name == slice)
    }
}
