//! Account repository trait.

use async_trait::async_trait;

use super::model::StoredAccount;
use crate::error::Result;

/// Lookup of the accounts currently available in secure storage.
///
/// Secure storage can be wiped independently of app storage, so the
/// persisted tree may reference an account this repository no longer knows.
#[async_trait]
pub trait AccountRepository: Send + Sync {
    async fn list_stored_accounts(&self) -> Result<Vec<StoredAccount>>;

    async fn find_account(&self, address: &str) -> Result<Option<StoredAccount>> {
        Ok(self
            .list_stored_accounts()
            .await?
            .into_iter()
            .find(|account| account.matches(address)))
    }
}
