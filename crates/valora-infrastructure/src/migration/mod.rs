//! Schema migration framework for the persisted root state.
//!
//! This module provides a linear migration chain for evolving the persisted
//! tree over time. The framework ensures that:
//!
//! - All migrations are executed in order (no skipping)
//! - A migration is keyed by the version it produces
//! - Gaps in the chain are rejected when the registry is built
//! - Migration paths are transparent and debuggable
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                     MigrationRunner                      │
//! │  (reads _persist.version, stamps the migrated tree)      │
//! └──────────────────────────────────────────────────────────┘
//!                              │
//!                              V
//!                   MigrationRegistry<PersistedState>
//!                   (v-1 → v0 → v1 → ... → v51)
//!                              │
//!                              V
//!                   RootStateMigration (one per step)
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use valora_infrastructure::migration::{self, MigrationContext};
//!
//! let runner = migration::build_root_state_runner(MigrationContext::current())?;
//! let run = runner.migrate(stored_state)?;
//! println!("migrated {} -> {}", run.from_version, run.to_version);
//! ```
//!
//! # Adding a Step
//!
//! 1. Write the transform in the `root_state` file covering its version range
//! 2. Append a `Step` entry to that file's `STEPS` table
//! 3. Bump `ROOT_STATE_LATEST_VERSION`
//! 4. Update the latest-version schema and the initial state to match
//!
//! Registry validation fails at startup if a step is missing.

mod context;
mod registry;
mod root_state;
mod runner;
mod traits;

pub use context::MigrationContext;
pub use registry::MigrationRegistry;
pub use root_state::{
    ROOT_STATE_LATEST_VERSION, ROOT_STATE_OLDEST_VERSION, RootStateMigration, apply_step,
    build_root_state_registry, build_root_state_runner, root_state_migrations,
};
pub use runner::{MigrationRun, MigrationRunner};
pub use traits::{Migration, MigrationChain, TypedMigration};
