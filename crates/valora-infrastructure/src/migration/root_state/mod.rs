//! Root-state migrations.
//!
//! Each step upgrades the whole persisted tree by one version. Steps are keyed
//! by the version they produce: step `0` takes a `v-1` tree to `v0`.
//!
//! Steps operate on the untyped tree with object-spread semantics (see
//! [`PersistedState`]): a slice or field that is missing is defaulted rather
//! than treated as an error. A step only fails when a field that is present
//! has a shape it cannot interpret.

mod v0_to_v19;
mod v20_to_v39;
mod v40_to_v51;

use super::context::MigrationContext;
use super::registry::MigrationRegistry;
use super::runner::MigrationRunner;
use super::traits::{Migration, TypedMigration};
use serde_json::Value;
use std::sync::Arc;
use valora_core::error::Result;
use valora_core::state::{PersistedState, SchemaVersion};

/// Version of a tree written before versioning existed.
pub const ROOT_STATE_OLDEST_VERSION: SchemaVersion = SchemaVersion::DEFAULT;

/// Version produced by the last registered step.
pub const ROOT_STATE_LATEST_VERSION: SchemaVersion = SchemaVersion::new(51);

pub(crate) type StepFn = fn(&mut PersistedState, &MigrationContext) -> Result<()>;

/// One entry of the static step table.
pub(crate) struct Step {
    pub to: i32,
    pub description: &'static str,
    pub apply: StepFn,
}

/// A single root-state step bound to its migration context.
pub struct RootStateMigration {
    to: SchemaVersion,
    description: &'static str,
    apply: StepFn,
    context: MigrationContext,
}

impl std::fmt::Debug for RootStateMigration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RootStateMigration")
            .field("to", &self.to)
            .field("description", &self.description)
            .finish()
    }
}

impl Migration for RootStateMigration {
    fn to_version(&self) -> SchemaVersion {
        self.to
    }

    fn description(&self) -> &str {
        self.description
    }
}

impl TypedMigration<PersistedState, PersistedState> for RootStateMigration {
    fn migrate(&self, mut state: PersistedState) -> Result<PersistedState> {
        (self.apply)(&mut state, &self.context)?;
        Ok(state)
    }
}

fn steps() -> impl Iterator<Item = &'static Step> {
    v0_to_v19::STEPS
        .iter()
        .chain(v20_to_v39::STEPS.iter())
        .chain(v40_to_v51::STEPS.iter())
}

/// All root-state steps as migrations, in order.
pub fn root_state_migrations(
    context: MigrationContext,
) -> Vec<Arc<dyn TypedMigration<PersistedState, PersistedState>>> {
    steps()
        .map(|step| {
            Arc::new(RootStateMigration {
                to: SchemaVersion::new(step.to),
                description: step.description,
                apply: step.apply,
                context,
            }) as Arc<dyn TypedMigration<PersistedState, PersistedState>>
        })
        .collect()
}

/// Builds the full root-state registry and checks that it has no gaps.
pub fn build_root_state_registry(
    context: MigrationContext,
) -> Result<MigrationRegistry<PersistedState>> {
    let mut registry =
        MigrationRegistry::new(ROOT_STATE_OLDEST_VERSION, ROOT_STATE_LATEST_VERSION);
    registry.register_all(root_state_migrations(context))?;
    registry.validate()?;

    tracing::debug!(
        "[Migration] Root state registry: {} migrations registered ({} -> {})",
        registry.len(),
        ROOT_STATE_OLDEST_VERSION,
        ROOT_STATE_LATEST_VERSION
    );
    Ok(registry)
}

/// Runner over the root-state registry.
pub fn build_root_state_runner(context: MigrationContext) -> Result<MigrationRunner> {
    Ok(MigrationRunner::new(build_root_state_registry(context)?))
}

/// Applies the single step producing `to` (test and tooling helper).
pub fn apply_step(
    to: i32,
    mut state: PersistedState,
    context: &MigrationContext,
) -> Result<PersistedState> {
    let step = steps().find(|step| step.to == to).ok_or_else(|| {
        valora_core::StateError::UnsupportedVersion {
            stored: to - 1,
            oldest: ROOT_STATE_OLDEST_VERSION.get(),
        }
    })?;
    (step.apply)(&mut state, context)?;
    Ok(state)
}

/// Steps that only touched reducer code, not the persisted shape.
pub(crate) fn unchanged(_state: &mut PersistedState, _context: &MigrationContext) -> Result<()> {
    Ok(())
}

/// Truthiness as the persisted data's original producer understood it.
pub(crate) fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
    }
}

/// `value || []`
pub(crate) fn or_empty_array(value: Option<Value>) -> Value {
    match value {
        Some(v) if is_truthy(Some(&v)) => v,
        _ => Value::Array(Vec::new()),
    }
}

/// Sets `key` to `value`, or removes it when there is no value to carry over.
pub(crate) fn set_or_remove(state: &mut PersistedState, slice: &str, key: &str, value: Option<Value>) {
    match value {
        Some(v) => state.set_field(slice, key, v),
        None => {
            state.remove_field(slice, key);
        }
    }
}
