//! Loading the persisted tree at startup, and writing it back.
//!
//! Hydration is read-only: whatever happens, nothing is written to storage
//! until the caller persists the resulting state.

use super::reconcile::{reconcile, strip_blacklisted};
use crate::account_guard::{AccountGuard, GuardVerdict};
use crate::initial_state::initial_root_state;
use crate::migration::{MigrationContext, MigrationRunner, build_root_state_runner};
use crate::paths::ValoraPaths;
use crate::schema::{SchemaValidator, ValidationReport, root_state_schema};
use crate::storage::{BlobStore, blob};
use std::fmt;
use std::path::Path;
use valora_core::config::{BlobFormat, PersistConfig};
use valora_core::error::{Result, StateError};
use valora_core::state::{PersistMeta, PersistedState, SchemaVersion};

/// Why a stored tree was discarded.
#[derive(Debug, Clone, PartialEq)]
pub enum ResetReason {
    /// The blob could not be decoded.
    Corrupt { message: String },
    /// A step failed, or the stored version has no migration path.
    MigrationFailed { error: StateError },
    /// `web3.account` is not in secure storage.
    InvalidAccount { account: String },
    /// The migrated tree does not match the latest schema.
    SchemaViolation { report: ValidationReport },
}

impl ResetReason {
    pub fn kind(&self) -> &'static str {
        match self {
            ResetReason::Corrupt { .. } => "corrupt",
            ResetReason::MigrationFailed { .. } => "migration-failed",
            ResetReason::InvalidAccount { .. } => "invalid-account",
            ResetReason::SchemaViolation { .. } => "schema-violation",
        }
    }
}

impl fmt::Display for ResetReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResetReason::Corrupt { message } => write!(f, "stored state is corrupt: {}", message),
            ResetReason::MigrationFailed { error } => write!(f, "{}", error),
            ResetReason::InvalidAccount { account } => {
                write!(f, "account {} is not in secure storage", account)
            }
            ResetReason::SchemaViolation { report } => write!(
                f,
                "{} schema violation(s): {}",
                report.len(),
                report.summary(3)
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum HydrationStatus {
    /// Nothing was stored.
    Fresh { recovering_account: Option<String> },
    /// The stored tree was migrated (possibly zero steps) and accepted.
    Restored {
        from: SchemaVersion,
        steps: usize,
        format: BlobFormat,
    },
    /// The stored tree was discarded in favour of the initial state.
    Reset {
        reason: ResetReason,
        recovering_account: Option<String>,
    },
}

/// A stored tree that made it through migration and validation.
///
/// Not yet stamped as rehydrated.
#[derive(Debug, Clone, PartialEq)]
pub struct RestoredState {
    pub state: PersistedState,
    pub from: SchemaVersion,
    pub steps: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HydrationOutcome {
    pub state: PersistedState,
    pub status: HydrationStatus,
}

impl HydrationOutcome {
    pub fn is_reset(&self) -> bool {
        matches!(self.status, HydrationStatus::Reset { .. })
    }

    pub fn reset_reason(&self) -> Option<&ResetReason> {
        match &self.status {
            HydrationStatus::Reset { reason, .. } => Some(reason),
            _ => None,
        }
    }
}

/// Bridges the blob store and the in-memory tree.
///
/// Responsibilities:
/// - Hydrate: decode, then [`PersistenceAdapter::restore`] or reset
/// - Persist and purge the blob, honouring the blacklist
///
/// Does NOT:
/// - Own the live state (see [`crate::store::StateStore`])
pub struct PersistenceAdapter {
    config: PersistConfig,
    store: BlobStore,
    runner: MigrationRunner,
    validator: SchemaValidator,
    initial: PersistedState,
}

impl PersistenceAdapter {
    pub fn new(config: PersistConfig, storage_dir: &Path, context: MigrationContext) -> Result<Self> {
        let store = BlobStore::new(storage_dir, &config.storage_key(), config.blob_format);
        Ok(Self {
            store,
            runner: build_root_state_runner(context)?,
            validator: SchemaValidator::new(root_state_schema())?,
            initial: initial_root_state(),
            config,
        })
    }

    /// Adapter over the storage directory named by `config` (or the default).
    pub fn from_config(config: PersistConfig) -> Result<Self> {
        let storage_dir = ValoraPaths::storage_dir(&config)?;
        Self::new(config, &storage_dir, MigrationContext::current())
    }

    pub fn config(&self) -> &PersistConfig {
        &self.config
    }

    pub fn store(&self) -> &BlobStore {
        &self.store
    }

    pub fn runner(&self) -> &MigrationRunner {
        &self.runner
    }

    pub fn validator(&self) -> &SchemaValidator {
        &self.validator
    }

    pub fn initial_state(&self) -> &PersistedState {
        &self.initial
    }

    /// Loads the stored tree and brings it to the latest version.
    ///
    /// Only a failure to read storage is an error; every problem with the
    /// stored content itself ends in a reset outcome.
    pub async fn hydrate(&self, guard: &AccountGuard) -> Result<HydrationOutcome> {
        match self.store.read()? {
            Some(raw) => Ok(self.hydrate_blob(&raw, guard).await),
            None => {
                tracing::info!(
                    "[Hydrate] No stored state at {}, starting fresh",
                    self.store.path().display()
                );
                let mut state = self.initial.clone();
                let recovering_account = prime_recovery(guard, &mut state).await;
                mark_rehydrated(&mut state, self.runner.latest_version());
                Ok(HydrationOutcome {
                    state,
                    status: HydrationStatus::Fresh { recovering_account },
                })
            }
        }
    }

    /// Hydrates from blob text that has already been read.
    pub async fn hydrate_blob(&self, raw: &str, guard: &AccountGuard) -> HydrationOutcome {
        let (stored, format) = match blob::decode(raw) {
            Ok(decoded) => decoded,
            Err(e) => {
                let reason = ResetReason::Corrupt {
                    message: e.to_string(),
                };
                return self.reset(reason, guard).await;
            }
        };

        match self.restore(stored, Some(guard)).await {
            Ok(RestoredState {
                mut state,
                from,
                steps,
            }) => {
                mark_rehydrated(&mut state, self.runner.latest_version());
                tracing::info!(
                    "[Hydrate] Restored state from {} ({} migration step(s), {:?} blob)",
                    from,
                    steps,
                    format
                );
                HydrationOutcome {
                    state,
                    status: HydrationStatus::Restored { from, steps, format },
                }
            }
            Err(reason) => self.reset(reason, guard).await,
        }
    }

    /// Migrates a decoded tree, checks its account when a guard is given,
    /// then drops blacklisted slices, fills it from the initial state and
    /// validates the result.
    pub async fn restore(
        &self,
        stored: PersistedState,
        guard: Option<&AccountGuard>,
    ) -> std::result::Result<RestoredState, ResetReason> {
        let run = self
            .runner
            .migrate(stored)
            .map_err(|error| ResetReason::MigrationFailed { error })?;

        if let Some(guard) = guard {
            match guard.check(&run.state).await {
                Ok(GuardVerdict::Keep) => {}
                Ok(GuardVerdict::Reset { dangling_account }) => {
                    return Err(ResetReason::InvalidAccount {
                        account: dangling_account,
                    });
                }
                Err(e) => {
                    // Key material may still be there; do not wipe on a lookup error
                    tracing::warn!("[AccountGuard] Account lookup failed, keeping state: {}", e);
                }
            }
        }

        let (from, steps) = (run.from_version, run.steps());
        let mut inbound = run.state;
        strip_blacklisted(&mut inbound, &self.config.blacklist);
        let state = reconcile(&inbound, &self.initial);

        let report = self.validator.validate_state(&state);
        if !report.is_valid() {
            return Err(ResetReason::SchemaViolation { report });
        }
        Ok(RestoredState { state, from, steps })
    }

    async fn reset(&self, reason: ResetReason, guard: &AccountGuard) -> HydrationOutcome {
        tracing::warn!(
            "[Hydrate] Resetting to initial state ({}): {}",
            reason.kind(),
            reason
        );
        let mut state = self.initial.clone();
        let recovering_account = prime_recovery(guard, &mut state).await;
        mark_rehydrated(&mut state, self.runner.latest_version());
        HydrationOutcome {
            state,
            status: HydrationStatus::Reset {
                reason,
                recovering_account,
            },
        }
    }

    /// Tree as it would be written: blacklisted slices removed.
    pub fn prepare_for_storage(&self, state: &PersistedState) -> PersistedState {
        let mut outbound = state.clone();
        strip_blacklisted(&mut outbound, &self.config.blacklist);
        outbound
    }

    pub fn persist(&self, state: &PersistedState) -> Result<()> {
        self.store.write(&self.prepare_for_storage(state))
    }

    /// Deletes the stored blob. Returns whether one existed.
    pub fn purge(&self) -> Result<bool> {
        let removed = self.store.remove()?;
        if removed {
            tracing::info!("[Storage] Purged {}", self.store.path().display());
        }
        Ok(removed)
    }
}

async fn prime_recovery(guard: &AccountGuard, state: &mut PersistedState) -> Option<String> {
    match guard.prime_recovery(state).await {
        Ok(account) => account,
        Err(e) => {
            tracing::warn!("[AccountGuard] Could not check for a recoverable account: {}", e);
            None
        }
    }
}

fn mark_rehydrated(state: &mut PersistedState, version: SchemaVersion) {
    state.set_meta(PersistMeta {
        version,
        rehydrated: true,
    });
}
