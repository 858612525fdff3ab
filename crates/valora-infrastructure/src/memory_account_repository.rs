use async_trait::async_trait;
use tokio::sync::RwLock;
use valora_core::account::{AccountRepository, StoredAccount};
use valora_core::error::Result;

/// AccountRepository kept in memory.
#[derive(Debug, Default)]
pub struct InMemoryAccountRepository {
    accounts: RwLock<Vec<StoredAccount>>,
}

impl InMemoryAccountRepository {
    pub fn new(accounts: Vec<StoredAccount>) -> Self {
        Self {
            accounts: RwLock::new(accounts),
        }
    }

    pub async fn insert(&self, account: StoredAccount) {
        self.accounts.write().await.push(account);
    }

    /// Simulates secure storage being wiped.
    pub async fn clear(&self) {
        self.accounts.write().await.clear();
    }
}

#[async_trait]
impl AccountRepository for InMemoryAccountRepository {
    async fn list_stored_accounts(&self) -> Result<Vec<StoredAccount>> {
        Ok(self.accounts.read().await.clone())
    }
}
