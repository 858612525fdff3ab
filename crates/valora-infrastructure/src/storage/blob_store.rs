use super::atomic_json::AtomicJsonFile;
use super::blob;
use serde_json::Value;
use std::path::{Path, PathBuf};
use valora_core::config::BlobFormat;
use valora_core::error::Result;
use valora_core::state::PersistedState;

/// One persisted blob per storage key, kept in a directory.
pub struct BlobStore {
    file: AtomicJsonFile<Value>,
    format: BlobFormat,
}

impl BlobStore {
    /// `storage_key` is the full key, e.g. `persist:root`.
    pub fn new(dir: &Path, storage_key: &str, format: BlobFormat) -> Self {
        Self {
            file: AtomicJsonFile::new(dir.join(file_name_for_key(storage_key))),
            format,
        }
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    pub fn format(&self) -> BlobFormat {
        self.format
    }

    /// Raw blob text, `None` when nothing has been stored yet.
    pub fn read(&self) -> Result<Option<String>> {
        self.file.read_raw()
    }

    pub fn write(&self, state: &PersistedState) -> Result<()> {
        let encoded = blob::encode(state, self.format)?;
        self.file.write_raw(&encoded)?;
        tracing::debug!(
            "[Storage] Wrote {} bytes to {}",
            encoded.len(),
            self.file.path().display()
        );
        Ok(())
    }

    pub fn remove(&self) -> Result<bool> {
        self.file.remove()
    }
}

/// `persist:root` -> `persist-root.json`
pub fn file_name_for_key(storage_key: &str) -> PathBuf {
    let safe: String = storage_key
        .chars()
        .map(|c| match c {
            'a'..='z' | 'A'..='Z' | '0'..='9' | '-' | '_' | '.' => c,
            _ => '-',
        })
        .collect();
    PathBuf::from(format!("{}.json", safe))
}
