pub mod hydrate;
pub mod migrate;
pub mod schema;
pub mod validate;
pub mod versions;

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use valora_core::config::{BlobFormat, PersistConfig};
use valora_core::state::PersistedState;
use valora_infrastructure::ConfigService;
use valora_infrastructure::storage::blob;

/// Reads and decodes a state blob from disk.
pub fn read_state(path: &Path) -> Result<(PersistedState, BlobFormat)> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    blob::decode(&raw).with_context(|| format!("{} is not a state blob", path.display()))
}

/// Loads the config at `path`, or at the user config location.
pub fn load_config(path: Option<&Path>) -> Result<PersistConfig> {
    let service = match path {
        Some(path) => ConfigService::new(path.to_path_buf()),
        None => ConfigService::default_location()?,
    };
    let config = service
        .load()
        .with_context(|| format!("Failed to load config from {}", service.path().display()))?;
    tracing::debug!("Loaded config from {}", service.path().display());
    Ok(config)
}
