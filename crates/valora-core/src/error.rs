//! Error types for the persisted-state pipeline.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A shared error type for every crate in the workspace.
///
/// Variants are structured so callers can decide between "reset the store"
/// and "surface to the user" without string matching.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StateError {
    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String, // "TOML", "JSON", etc.
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// The stored tree is not an object or is missing mandatory structure.
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// A single migration step failed.
    #[error("Migration to version {version} failed: {message}")]
    Migration { version: i32, message: String },

    /// The registry does not form a contiguous chain.
    #[error("Migration chain broken: {0}")]
    BrokenChain(String),

    /// Stored data was written by a newer schema than this build knows.
    #[error("Data version ({stored}) is newer than the latest supported version ({latest})")]
    Downgrade { stored: i32, latest: i32 },

    /// Stored data is older than anything the registry can migrate from.
    #[error("No migration path from version {stored} (oldest supported: {oldest})")]
    UnsupportedVersion { stored: i32, oldest: i32 },

    /// File locking error
    #[error("Lock error: {0}")]
    Lock(String),

    /// Account lookup in secure storage failed.
    #[error("Account lookup error: {0}")]
    AccountLookup(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl StateError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates an IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an InvalidState error
    pub fn invalid_state(message: impl Into<String>) -> Self {
        Self::InvalidState(message.into())
    }

    /// Creates a Migration error for the step producing `version`.
    pub fn migration(version: i32, message: impl Into<String>) -> Self {
        Self::Migration {
            version,
            message: message.into(),
        }
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if this is an IO error
    pub fn is_io(&self) -> bool {
        matches!(self, Self::Io { .. })
    }

    /// Check if this is a serialization error
    pub fn is_serialization(&self) -> bool {
        matches!(self, Self::Serialization { .. })
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for StateError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for StateError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for StateError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// A type alias for `Result<T, StateError>`.
pub type Result<T> = std::result::Result<T, StateError>;
