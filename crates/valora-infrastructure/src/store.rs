//! Explicit owner of the live state tree.

use crate::account_guard::AccountGuard;
use crate::persist::{HydrationStatus, PersistenceAdapter};
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::Mutex;
use valora_core::error::{Result, StateError};
use valora_core::state::{PersistMeta, PersistedState};

/// Holds the hydrated tree and writes it back through the adapter.
///
/// Created once by [`StateStore::hydrate`]; everything that needs state gets
/// a handle to the store instead of reaching for a global.
pub struct StateStore {
    state: Mutex<PersistedState>,
    /// Held from snapshot until the write lands, so flushes reach storage
    /// in the order their snapshots were taken.
    flush_lock: Mutex<()>,
    adapter: Arc<PersistenceAdapter>,
}

impl StateStore {
    pub fn new(adapter: Arc<PersistenceAdapter>, state: PersistedState) -> Self {
        Self {
            state: Mutex::new(state),
            flush_lock: Mutex::new(()),
            adapter,
        }
    }

    /// Hydrates through `adapter` and wraps the result.
    pub async fn hydrate(
        adapter: Arc<PersistenceAdapter>,
        guard: &AccountGuard,
    ) -> Result<(Self, HydrationStatus)> {
        let outcome = adapter.hydrate(guard).await?;
        Ok((Self::new(adapter, outcome.state), outcome.status))
    }

    pub fn adapter(&self) -> &PersistenceAdapter {
        &self.adapter
    }

    pub async fn snapshot(&self) -> PersistedState {
        self.state.lock().await.clone()
    }

    pub async fn slice(&self, name: &str) -> Option<Value> {
        self.state.lock().await.slice_value(name).cloned()
    }

    /// Runs `f` with exclusive access to the tree.
    pub async fn update<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut PersistedState) -> R,
    {
        let mut state = self.state.lock().await;
        f(&mut state)
    }

    /// Writes the current tree to storage.
    pub async fn flush(&self) -> Result<()> {
        let _flushing = self.flush_lock.lock().await;
        let snapshot = self.snapshot().await;
        let adapter = Arc::clone(&self.adapter);
        tokio::task::spawn_blocking(move || adapter.persist(&snapshot))
            .await
            .map_err(|e| StateError::internal(format!("flush task failed: {}", e)))?
    }

    /// Replaces the tree with the initial state. Storage is untouched until
    /// the next flush.
    pub async fn reset(&self) {
        let mut initial = self.adapter.initial_state().clone();
        if let Some(meta) = initial.meta() {
            initial.set_meta(PersistMeta {
                rehydrated: true,
                ..meta
            });
        }
        *self.state.lock().await = initial;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory_account_repository::InMemoryAccountRepository;
    use crate::migration::MigrationContext;
    use serde_json::json;
    use tempfile::TempDir;
    use valora_core::config::PersistConfig;

    async fn store(dir: &std::path::Path) -> StateStore {
        let adapter = Arc::new(
            PersistenceAdapter::new(PersistConfig::default(), dir, MigrationContext::current())
                .unwrap(),
        );
        let guard = AccountGuard::new(Arc::new(InMemoryAccountRepository::default()));
        StateStore::hydrate(adapter, &guard).await.unwrap().0
    }

    #[tokio::test]
    async fn test_update_then_flush_survives_rehydration() {
        let temp_dir = TempDir::new().unwrap();
        let first = store(temp_dir.path()).await;

        first
            .update(|state| state.set_field("app", "locked", true))
            .await;
        first.flush().await.unwrap();

        let second = store(temp_dir.path()).await;
        assert_eq!(
            second.slice("app").await.and_then(|app| app.get("locked").cloned()),
            Some(json!(true))
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_flushes_leave_latest_tree_in_storage() {
        let temp_dir = TempDir::new().unwrap();
        let shared = Arc::new(store(temp_dir.path()).await);

        let tasks: Vec<_> = (0..16)
            .map(|_| {
                let store = Arc::clone(&shared);
                tokio::spawn(async move {
                    store
                        .update(|state| {
                            let count = state
                                .field("app", "flushCount")
                                .and_then(|v| v.as_u64())
                                .unwrap_or(0);
                            state.set_field("app", "flushCount", count + 1);
                        })
                        .await;
                    store.flush().await.unwrap();
                })
            })
            .collect();
        for task in tasks {
            task.await.unwrap();
        }

        let reloaded = store(temp_dir.path()).await;
        assert_eq!(
            reloaded.slice("app").await.and_then(|app| app.get("flushCount").cloned()),
            Some(json!(16))
        );
    }

    #[tokio::test]
    async fn test_reset_restores_initial_state() {
        let temp_dir = TempDir::new().unwrap();
        let store = store(temp_dir.path()).await;

        store.update(|state| state.remove_slice("app")).await;
        assert!(store.slice("app").await.is_none());

        store.reset().await;
        assert!(store.slice("app").await.is_some());
        assert_eq!(store.snapshot().await.meta().map(|m| m.rehydrated), Some(true));
    }
}
