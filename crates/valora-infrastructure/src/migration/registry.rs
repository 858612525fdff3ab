//! Migration registry for managing linear migration chains.
//!
//! This module implements a simple, linear migration chain where each version
//! must migrate through all intermediate versions. This approach prioritizes
//! safety and debuggability over performance.

use super::traits::{MigrationChain, TypedMigration};
use std::sync::Arc;
use valora_core::error::{Result, StateError};
use valora_core::state::SchemaVersion;

/// Registry for managing a linear chain of migrations.
///
/// Migrations are stored in order and must form a continuous chain:
/// v-1 → v0 → v1 → ... → latest
///
/// When adding migrations via `register()`, the registry checks that each
/// new migration's `from_version()` matches the previous migration's
/// `to_version()` (or the oldest supported version for the first step).
///
/// # Example
///
/// ```ignore
/// let mut registry = MigrationRegistry::new(SchemaVersion::DEFAULT, SchemaVersion::new(1));
/// registry.register(Arc::new(ToV0))?;  // -1 → 0
/// registry.register(Arc::new(ToV1))?;  //  0 → 1
///
/// let migrated = registry.migrate_to_latest(old_data, SchemaVersion::DEFAULT)?;
/// ```
#[derive(Debug)]
pub struct MigrationRegistry<T> {
    /// Migrations in order, forming a linear chain.
    migrations: Vec<Arc<dyn TypedMigration<T, T>>>,
    /// The oldest version this registry can migrate from.
    oldest_version: SchemaVersion,
    /// The latest version this registry can migrate to.
    latest_version: SchemaVersion,
}

impl<T> MigrationRegistry<T> {
    /// Creates an empty registry spanning `oldest_version..=latest_version`.
    pub fn new(oldest_version: SchemaVersion, latest_version: SchemaVersion) -> Self {
        Self {
            migrations: Vec::new(),
            oldest_version,
            latest_version,
        }
    }

    /// Registers a single migration, validating chain continuity.
    ///
    /// # Errors
    ///
    /// Returns `BrokenChain` if the migration does not start where the chain
    /// currently ends, or if it overshoots the latest version.
    pub fn register(&mut self, migration: Arc<dyn TypedMigration<T, T>>) -> Result<()> {
        let expected_from = self
            .migrations
            .last()
            .map(|last| last.to_version())
            .unwrap_or(self.oldest_version);

        if migration.from_version() != expected_from {
            return Err(StateError::BrokenChain(format!(
                "expected migration from {}, but got migration from {} ('{}')",
                expected_from,
                migration.from_version(),
                migration.description()
            )));
        }

        if migration.to_version() > self.latest_version {
            return Err(StateError::BrokenChain(format!(
                "migration target version {} exceeds registry's latest version {}",
                migration.to_version(),
                self.latest_version
            )));
        }

        self.migrations.push(migration);
        Ok(())
    }

    /// Registers multiple migrations at once.
    ///
    /// The migrations must be provided in order and form a continuous chain.
    pub fn register_all(&mut self, migrations: Vec<Arc<dyn TypedMigration<T, T>>>) -> Result<()> {
        for migration in migrations {
            self.register(migration)?;
        }
        Ok(())
    }

    /// Checks that the chain covers every step from oldest to latest.
    pub fn validate(&self) -> Result<()> {
        let expected = self.oldest_version.steps_to(self.latest_version);
        if self.migrations.len() != expected {
            return Err(StateError::BrokenChain(format!(
                "registry spans {} to {} and needs {} migrations, but {} are registered",
                self.oldest_version,
                self.latest_version,
                expected,
                self.migrations.len()
            )));
        }
        Ok(())
    }

    /// Returns the starting version of the first migration, if any.
    pub fn start_version(&self) -> Option<SchemaVersion> {
        self.migrations.first().map(|m| m.from_version())
    }

    pub fn oldest_version(&self) -> SchemaVersion {
        self.oldest_version
    }

    pub fn latest_version(&self) -> SchemaVersion {
        self.latest_version
    }

    /// Returns true if no migrations are registered.
    pub fn is_empty(&self) -> bool {
        self.migrations.is_empty()
    }

    /// Returns the number of registered migrations.
    pub fn len(&self) -> usize {
        self.migrations.len()
    }

    /// `(to_version, description)` for every registered step, in order.
    pub fn describe(&self) -> Vec<(SchemaVersion, String)> {
        self.migrations
            .iter()
            .map(|m| (m.to_version(), m.description().to_string()))
            .collect()
    }

    /// Finds the index of the first migration that starts from the given version.
    fn find_start_index(&self, from_version: SchemaVersion) -> Option<usize> {
        self.migrations
            .iter()
            .position(|m| m.can_migrate(from_version))
    }
}

impl<T> MigrationChain<T> for MigrationRegistry<T> {
    fn migrate_to_latest(&self, mut data: T, current_version: SchemaVersion) -> Result<T> {
        // Already at the latest version
        if current_version == self.latest_version {
            tracing::debug!(
                "[Migration] Data is already at the latest version ({}), no migration needed",
                current_version
            );
            return Ok(data);
        }

        if current_version > self.latest_version {
            return Err(StateError::Downgrade {
                stored: current_version.get(),
                latest: self.latest_version.get(),
            });
        }

        let start_idx = self.find_start_index(current_version).ok_or(
            StateError::UnsupportedVersion {
                stored: current_version.get(),
                oldest: self.oldest_version.get(),
            },
        )?;

        let total = self.migrations.len() - start_idx;
        tracing::info!(
            "[Migration] Starting migration from {} to {} ({} steps)",
            current_version,
            self.latest_version,
            total
        );

        for (i, migration) in self.migrations[start_idx..].iter().enumerate() {
            tracing::debug!(
                "[Migration] Step {}/{}: {} -> {} ({})",
                i + 1,
                total,
                migration.from_version(),
                migration.to_version(),
                migration.description()
            );

            data = migration.migrate(data).map_err(|e| match e {
                StateError::Migration { .. } => e,
                other => StateError::migration(migration.to_version().get(), other.to_string()),
            })?;
        }

        tracing::info!(
            "[Migration] Migration completed successfully: {} -> {}",
            current_version,
            self.latest_version
        );

        Ok(data)
    }

    fn available_paths(&self, from: SchemaVersion) -> Vec<Vec<SchemaVersion>> {
        // Linear chain: only one path exists
        if let Some(start_idx) = self.find_start_index(from) {
            let mut path = vec![from];
            for migration in &self.migrations[start_idx..] {
                path.push(migration.to_version());
            }
            vec![path]
        } else {
            vec![]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::migration::traits::Migration;
    use std::sync::atomic::{AtomicUsize, Ordering};

    // Mock migration for testing
    #[derive(Debug)]
    struct MockMigration {
        to: i32,
        calls: Arc<AtomicUsize>,
        fail: bool,
    }

    impl MockMigration {
        fn to(to: i32) -> Self {
            Self {
                to,
                calls: Arc::new(AtomicUsize::new(0)),
                fail: false,
            }
        }
    }

    impl Migration for MockMigration {
        fn to_version(&self) -> SchemaVersion {
            SchemaVersion::new(self.to)
        }

        fn description(&self) -> &str {
            "mock step"
        }
    }

    impl TypedMigration<Vec<i32>, Vec<i32>> for MockMigration {
        fn migrate(&self, mut from: Vec<i32>) -> Result<Vec<i32>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(StateError::internal("mock failure"));
            }
            from.push(self.to);
            Ok(from)
        }
    }

    fn chain(oldest: i32, latest: i32) -> MigrationRegistry<Vec<i32>> {
        let mut registry =
            MigrationRegistry::new(SchemaVersion::new(oldest), SchemaVersion::new(latest));
        for to in (oldest + 1)..=latest {
            registry.register(Arc::new(MockMigration::to(to))).unwrap();
        }
        registry
    }

    #[test]
    fn test_empty_registry() {
        let registry: MigrationRegistry<Vec<i32>> =
            MigrationRegistry::new(SchemaVersion::DEFAULT, SchemaVersion::DEFAULT);
        assert!(registry.is_empty());
        assert_eq!(registry.len(), 0);
        assert!(registry.validate().is_ok());
    }

    #[test]
    fn test_register_broken_chain() {
        let mut registry: MigrationRegistry<Vec<i32>> =
            MigrationRegistry::new(SchemaVersion::DEFAULT, SchemaVersion::new(3));
        registry.register(Arc::new(MockMigration::to(0))).unwrap();

        // Skips version 1
        let err = registry.register(Arc::new(MockMigration::to(2))).unwrap_err();
        assert!(matches!(err, StateError::BrokenChain(_)));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_register_rejects_overshoot() {
        let mut registry: MigrationRegistry<Vec<i32>> =
            MigrationRegistry::new(SchemaVersion::new(0), SchemaVersion::new(0));
        assert!(registry.register(Arc::new(MockMigration::to(1))).is_err());
    }

    #[test]
    fn test_validate_detects_incomplete_chain() {
        let mut registry: MigrationRegistry<Vec<i32>> =
            MigrationRegistry::new(SchemaVersion::DEFAULT, SchemaVersion::new(2));
        registry.register(Arc::new(MockMigration::to(0))).unwrap();
        assert!(registry.validate().is_err());
    }

    #[test]
    fn test_migrate_through_all_steps() {
        let registry = chain(-1, 3);
        assert!(registry.validate().is_ok());

        let result = registry
            .migrate_to_latest(vec![], SchemaVersion::DEFAULT)
            .unwrap();
        assert_eq!(result, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_migrate_from_middle_runs_only_remaining_steps() {
        let registry = chain(-1, 3);
        let result = registry
            .migrate_to_latest(vec![], SchemaVersion::new(1))
            .unwrap();
        assert_eq!(result, vec![2, 3]);
    }

    #[test]
    fn test_each_step_runs_once() {
        let counters: Vec<Arc<AtomicUsize>> = (0..3).map(|_| Arc::new(AtomicUsize::new(0))).collect();
        let mut registry = MigrationRegistry::new(SchemaVersion::DEFAULT, SchemaVersion::new(2));
        for (i, calls) in counters.iter().enumerate() {
            registry
                .register(Arc::new(MockMigration {
                    to: i as i32,
                    calls: calls.clone(),
                    fail: false,
                }))
                .unwrap();
        }

        registry
            .migrate_to_latest(vec![], SchemaVersion::DEFAULT)
            .unwrap();
        for calls in &counters {
            assert_eq!(calls.load(Ordering::SeqCst), 1);
        }
    }

    #[test]
    fn test_already_at_latest_version() {
        let registry = chain(-1, 3);
        let result = registry
            .migrate_to_latest(vec![42], SchemaVersion::new(3))
            .unwrap();
        assert_eq!(result, vec![42]);
    }

    #[test]
    fn test_newer_data_is_a_downgrade_error() {
        let registry = chain(-1, 3);
        let err = registry
            .migrate_to_latest(vec![], SchemaVersion::new(4))
            .unwrap_err();
        assert_eq!(err, StateError::Downgrade { stored: 4, latest: 3 });
    }

    #[test]
    fn test_older_than_oldest_is_unsupported() {
        let registry = chain(-1, 3);
        let err = registry
            .migrate_to_latest(vec![], SchemaVersion::new(-2))
            .unwrap_err();
        assert!(matches!(err, StateError::UnsupportedVersion { stored: -2, .. }));
    }

    #[test]
    fn test_failing_step_names_its_version_and_stops() {
        let later_calls = Arc::new(AtomicUsize::new(0));
        let mut registry = MigrationRegistry::new(SchemaVersion::DEFAULT, SchemaVersion::new(1));
        registry
            .register(Arc::new(MockMigration {
                to: 0,
                calls: Arc::new(AtomicUsize::new(0)),
                fail: true,
            }))
            .unwrap();
        registry
            .register(Arc::new(MockMigration {
                to: 1,
                calls: later_calls.clone(),
                fail: false,
            }))
            .unwrap();

        let err = registry
            .migrate_to_latest(vec![], SchemaVersion::DEFAULT)
            .unwrap_err();
        assert!(matches!(err, StateError::Migration { version: 0, .. }));
        assert_eq!(later_calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_available_paths() {
        let registry = chain(-1, 1);
        let paths = registry.available_paths(SchemaVersion::DEFAULT);

        assert_eq!(paths.len(), 1);
        assert_eq!(
            paths[0],
            vec![
                SchemaVersion::new(-1),
                SchemaVersion::new(0),
                SchemaVersion::new(1),
            ]
        );
        assert!(registry.available_paths(SchemaVersion::new(9)).is_empty());
    }
}
