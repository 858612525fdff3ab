//! Detects persisted trees that reference an account secure storage no
//! longer holds.
//!
//! App storage and secure storage can be wiped independently (for example a
//! restored device backup). A tree whose `web3.account` has no matching key
//! cannot be used and is reset; if secure storage still holds some other
//! account, the reset tree is primed so onboarding resumes as a restore of
//! that account.

use serde_json::Value;
use std::sync::Arc;
use valora_core::account::AccountRepository;
use valora_core::error::Result;
use valora_core::state::PersistedState;

/// Outcome of [`AccountGuard::check`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardVerdict {
    Keep,
    /// `web3.account` is set but secure storage has no such account.
    Reset { dangling_account: String },
}

pub struct AccountGuard {
    repository: Arc<dyn AccountRepository>,
}

impl AccountGuard {
    pub fn new(repository: Arc<dyn AccountRepository>) -> Self {
        Self { repository }
    }

    /// Checks `web3.account` against secure storage.
    ///
    /// Lookup failures are propagated; the caller decides what to do.
    pub async fn check(&self, state: &PersistedState) -> Result<GuardVerdict> {
        let Some(account) = referenced_account(state) else {
            return Ok(GuardVerdict::Keep);
        };

        match self.repository.find_account(account).await? {
            Some(_) => Ok(GuardVerdict::Keep),
            None => {
                tracing::warn!(
                    "[AccountGuard] Persisted account {} is not in secure storage",
                    account
                );
                Ok(GuardVerdict::Reset {
                    dangling_account: account.to_string(),
                })
            }
        }
    }

    /// Marks a freshly reset tree as recovering from a store wipe when secure
    /// storage still holds an account. Returns the account to recover.
    pub async fn prime_recovery(&self, state: &mut PersistedState) -> Result<Option<String>> {
        let accounts = self.repository.list_stored_accounts().await?;
        let Some(stored) = accounts.into_iter().next() else {
            return Ok(None);
        };

        let account = state.slice_mut("account");
        account.insert("choseToRestoreAccount".into(), Value::Bool(true));
        account.insert("recoveringFromStoreWipe".into(), Value::Bool(true));
        account.insert(
            "accountToRecoverFromStoreWipe".into(),
            Value::String(stored.address.clone()),
        );
        account.insert("pincodeType".into(), Value::String("CustomPin".into()));
        account.insert("acceptedTerms".into(), Value::Bool(true));

        tracing::info!(
            "[AccountGuard] Starting store wipe recovery for {}",
            stored.address
        );
        Ok(Some(stored.address))
    }
}

/// Non-empty `web3.account`, if any.
pub fn referenced_account(state: &PersistedState) -> Option<&str> {
    state
        .field("web3", "account")
        .and_then(Value::as_str)
        .filter(|account| !account.is_empty())
}
