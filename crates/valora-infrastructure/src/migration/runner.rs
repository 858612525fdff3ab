//! Brings a stored tree up to the current schema version.

use super::registry::MigrationRegistry;
use super::traits::MigrationChain;
use valora_core::error::Result;
use valora_core::state::{PersistMeta, PersistedState, SchemaVersion};

/// Result of a successful run.
#[derive(Debug, Clone, PartialEq)]
pub struct MigrationRun {
    pub state: PersistedState,
    pub from_version: SchemaVersion,
    pub to_version: SchemaVersion,
}

impl MigrationRun {
    /// Number of transforms that were applied.
    pub fn steps(&self) -> usize {
        self.from_version.steps_to(self.to_version)
    }
}

/// Walks the registry from the stored version and stamps the result.
///
/// The runner does no I/O, logging of the outcome and any reset decision
/// are left to the caller.
#[derive(Debug)]
pub struct MigrationRunner {
    registry: MigrationRegistry<PersistedState>,
}

impl MigrationRunner {
    pub fn new(registry: MigrationRegistry<PersistedState>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &MigrationRegistry<PersistedState> {
        &self.registry
    }

    pub fn latest_version(&self) -> SchemaVersion {
        self.registry.latest_version()
    }

    /// Migrates `state` to the latest version.
    ///
    /// A tree already at the latest version comes back untouched (its
    /// `_persist` entry included).
    pub fn migrate(&self, state: PersistedState) -> Result<MigrationRun> {
        let from_version = state.stored_version()?;
        let latest = self.registry.latest_version();

        if from_version == latest {
            return Ok(MigrationRun {
                state,
                from_version,
                to_version: latest,
            });
        }

        let mut state = self.registry.migrate_to_latest(state, from_version)?;
        let rehydrated = state.meta().map(|meta| meta.rehydrated).unwrap_or(false);
        state.set_meta(PersistMeta {
            version: latest,
            rehydrated,
        });

        Ok(MigrationRun {
            state,
            from_version,
            to_version: latest,
        })
    }
}
