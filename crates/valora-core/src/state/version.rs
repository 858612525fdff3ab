//! Integer schema versions for the persisted tree.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Version tag stored under `_persist.version`.
///
/// Versions are plain integers that only ever increase. A tree that carries
/// no version is treated as [`SchemaVersion::DEFAULT`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SchemaVersion(i32);

impl SchemaVersion {
    /// Version assumed for trees written before versioning existed.
    pub const DEFAULT: SchemaVersion = SchemaVersion(-1);

    pub const fn new(version: i32) -> Self {
        Self(version)
    }

    pub const fn get(self) -> i32 {
        self.0
    }

    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }

    pub const fn previous(self) -> Self {
        Self(self.0 - 1)
    }

    /// Number of single steps needed to reach `target` (zero if not ahead).
    pub fn steps_to(self, target: SchemaVersion) -> usize {
        usize::try_from(target.0 - self.0).unwrap_or(0)
    }
}

impl Default for SchemaVersion {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl From<i32> for SchemaVersion {
    fn from(version: i32) -> Self {
        Self(version)
    }
}

impl fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}
