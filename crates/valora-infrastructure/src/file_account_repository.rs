//! JSON-file-backed AccountRepository implementation

use crate::storage::AtomicJsonFile;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use valora_core::account::{AccountRepository, StoredAccount};
use valora_core::error::{Result, StateError};

/// Reads the accounts available in secure storage from a JSON export.
///
/// The file holds an array of `{ "address": "0x..", "createdAt": ".." }`
/// records. A missing file means secure storage is empty.
///
/// Responsibilities:
/// - Load the exported account list
/// - Record new accounts (used by tooling and tests)
///
/// Does NOT:
/// - Hold any key material
pub struct FileAccountRepository {
    file: AtomicJsonFile<Vec<StoredAccount>>,
}

impl FileAccountRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            file: AtomicJsonFile::new(path),
        }
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Adds an account unless one with the same address is already listed.
    pub fn add_account(&self, account: StoredAccount) -> Result<()> {
        self.file.update(Vec::new(), |accounts| {
            if !accounts.iter().any(|a| a.matches(&account.address)) {
                accounts.push(account);
            }
            Ok(())
        })
    }

    fn load_blocking(path: PathBuf) -> Result<Vec<StoredAccount>> {
        let file = AtomicJsonFile::<Vec<StoredAccount>>::new(path);
        Ok(file.load()?.unwrap_or_default())
    }
}

#[async_trait]
impl AccountRepository for FileAccountRepository {
    async fn list_stored_accounts(&self) -> Result<Vec<StoredAccount>> {
        let path = self.file.path().to_path_buf();
        tokio::task::spawn_blocking(move || Self::load_blocking(path))
            .await
            .map_err(|e| StateError::AccountLookup(format!("account lookup task failed: {}", e)))?
            .map_err(|e| StateError::AccountLookup(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_missing_file_means_no_accounts() {
        let temp_dir = TempDir::new().unwrap();
        let repo = FileAccountRepository::new(temp_dir.path().join("accounts.json"));
        assert!(repo.list_stored_accounts().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_add_and_find() {
        let temp_dir = TempDir::new().unwrap();
        let repo = FileAccountRepository::new(temp_dir.path().join("accounts.json"));

        repo.add_account(StoredAccount::new("0xABC")).unwrap();
        repo.add_account(StoredAccount::new("0xabc")).unwrap();

        assert_eq!(repo.list_stored_accounts().await.unwrap().len(), 1);
        assert!(repo.find_account("0xAbC").await.unwrap().is_some());
        assert!(repo.find_account("0xdef").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_reads_camel_case_export() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("accounts.json");
        std::fs::write(
            &path,
            r#"[{ "address": "0x1234", "createdAt": "2022-01-01T00:00:00Z" }]"#,
        )
        .unwrap();

        let accounts = FileAccountRepository::new(path)
            .list_stored_accounts()
            .await
            .unwrap();
        assert_eq!(accounts[0].address, "0x1234");
        assert!(accounts[0].created_at.is_some());
    }

    #[tokio::test]
    async fn test_corrupt_export_is_a_lookup_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("accounts.json");
        std::fs::write(&path, "not json").unwrap();

        let err = FileAccountRepository::new(path)
            .list_stored_accounts()
            .await
            .unwrap_err();
        assert!(matches!(err, StateError::AccountLookup(_)));
    }
}
