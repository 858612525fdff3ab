//! Loads [`PersistConfig`] from a TOML file.

use crate::paths::ValoraPaths;
use std::fs;
use std::path::{Path, PathBuf};
use valora_core::config::PersistConfig;
use valora_core::error::Result;

/// Configuration service bound to one config file.
///
/// Read-only: the file is edited by hand. A missing file yields the
/// defaults; a present but malformed file is an error rather than a silent
/// fallback.
#[derive(Debug, Clone)]
pub struct ConfigService {
    path: PathBuf,
}

impl ConfigService {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Service for `~/.config/valora/config.toml`.
    pub fn default_location() -> Result<Self> {
        Ok(Self::new(ValoraPaths::config_file()?))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<PersistConfig> {
        if !self.path.exists() {
            tracing::debug!(
                "Config file {} not found, using defaults",
                self.path.display()
            );
            return Ok(PersistConfig::default());
        }

        let content = fs::read_to_string(&self.path)?;
        let config: PersistConfig = toml::from_str(&content)?;
        Ok(config)
    }
}
