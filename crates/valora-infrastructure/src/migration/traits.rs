//! Traits shared by every migration step and chain.

use valora_core::error::Result;
use valora_core::state::SchemaVersion;

/// Base trait for all migrations.
///
/// Provides version information and metadata about a migration step.
/// Steps are keyed by the version they produce; each one advances the
/// version by exactly one.
pub trait Migration: Send + Sync {
    /// Returns the target version this migration produces.
    fn to_version(&self) -> SchemaVersion;

    /// Returns the source version this migration starts from.
    fn from_version(&self) -> SchemaVersion {
        self.to_version().previous()
    }

    /// Checks if this migration can be applied to the given version.
    fn can_migrate(&self, version: SchemaVersion) -> bool {
        version == self.from_version()
    }

    /// Returns a human-readable description of this migration.
    ///
    /// Used for logging and debugging purposes.
    fn description(&self) -> &str;
}

/// Typed migration that transforms data from one version to another.
///
/// This trait extends `Migration` with actual data transformation logic.
/// Implementations do no I/O and take the clock from [`super::MigrationContext`].
pub trait TypedMigration<From, To>: Migration + std::fmt::Debug {
    /// Executes the migration, transforming data from the source to target format.
    ///
    /// # Errors
    ///
    /// Returns an error if the input has a shape the step cannot interpret.
    fn migrate(&self, from: From) -> Result<To>;
}

/// A chain of migrations that can automatically upgrade data to the latest version.
///
/// Implementations traverse all intermediate migration steps in order,
/// ensuring no migration is skipped and none runs twice.
pub trait MigrationChain<T> {
    /// Migrates data from a specific version to the latest version.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The data is newer than the latest version (downgrade)
    /// - No migration path exists from the current version to the latest
    /// - Any migration in the chain fails
    fn migrate_to_latest(&self, data: T, current_version: SchemaVersion) -> Result<T>;

    /// Returns all available migration paths from a given version.
    ///
    /// For linear migration chains, this returns at most a single path.
    fn available_paths(&self, from: SchemaVersion) -> Vec<Vec<SchemaVersion>>;
}
