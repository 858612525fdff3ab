//! Unified path management for persisted-state files.
//!
//! ```text
//! ~/.config/valora/            # Config directory
//! └── config.toml              # PersistConfig
//!
//! ~/.local/share/valora/       # Data directory
//! ├── storage/                 # One blob per persist key
//! │   └── persist-root.json
//! └── accounts.json            # Secure storage account export
//! ```

use std::path::PathBuf;
use valora_core::config::PersistConfig;
use valora_core::error::{Result, StateError};

const APP_DIR: &str = "valora";

pub struct ValoraPaths;

impl ValoraPaths {
    pub fn config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or_else(|| StateError::config("Cannot find config directory"))
    }

    pub fn data_dir() -> Result<PathBuf> {
        dirs::data_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or_else(|| StateError::config("Cannot find data directory"))
    }

    pub fn config_file() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    pub fn default_storage_dir() -> Result<PathBuf> {
        Ok(Self::data_dir()?.join("storage"))
    }

    pub fn default_accounts_file() -> Result<PathBuf> {
        Ok(Self::data_dir()?.join("accounts.json"))
    }

    /// Storage directory from the config, falling back to the default.
    pub fn storage_dir(config: &PersistConfig) -> Result<PathBuf> {
        match &config.storage_dir {
            Some(dir) => Ok(dir.clone()),
            None => Self::default_storage_dir(),
        }
    }

    pub fn accounts_file(config: &PersistConfig) -> Result<PathBuf> {
        match &config.accounts_file {
            Some(path) => Ok(path.clone()),
            None => Self::default_accounts_file(),
        }
    }
}
