use serde_json::json;
use std::sync::Arc;
use tempfile::TempDir;
use valora_core::account::StoredAccount;
use valora_core::config::{BlobFormat, PersistConfig};
use valora_core::state::{PersistMeta, PersistedState, SchemaVersion};
use valora_infrastructure::migration::{MigrationContext, apply_step};
use valora_infrastructure::storage::blob;
use valora_infrastructure::{
    AccountGuard, HydrationStatus, InMemoryAccountRepository, PersistenceAdapter, ResetReason,
};

const VNEG1_STATE: &str = include_str!("fixtures/vneg1_state.json");
const TEST_ACCOUNT: &str = "0x0000000000000000000000000000000000007E57";
const OTHER_ACCOUNT: &str = "0x0000000000000000000000000000000000000001";

fn adapter(dir: &TempDir) -> PersistenceAdapter {
    PersistenceAdapter::new(
        PersistConfig::default(),
        dir.path(),
        MigrationContext::current(),
    )
    .unwrap()
}

fn guard_with(accounts: &[&str]) -> AccountGuard {
    let accounts = accounts.iter().map(|a| StoredAccount::new(*a)).collect();
    AccountGuard::new(Arc::new(InMemoryAccountRepository::new(accounts)))
}

fn vneg1_state() -> PersistedState {
    serde_json::from_str(VNEG1_STATE).unwrap()
}

#[tokio::test]
async fn test_full_chain_from_unversioned_state() {
    let temp_dir = TempDir::new().unwrap();
    let adapter = adapter(&temp_dir);

    let outcome = adapter
        .hydrate_blob(VNEG1_STATE, &guard_with(&[TEST_ACCOUNT]))
        .await;

    assert_eq!(
        outcome.status,
        HydrationStatus::Restored {
            from: SchemaVersion::DEFAULT,
            steps: 52,
            format: BlobFormat::Plain,
        }
    );

    let state = outcome.state;
    assert_eq!(
        state.meta(),
        Some(PersistMeta {
            version: SchemaVersion::new(51),
            rehydrated: true,
        })
    );
    assert!(adapter.validator().validate_state(&state).is_valid());

    // Removed slices
    assert!(!state.contains_slice("medianator"));
    assert!(!state.contains_slice("invite"));

    // Carried over
    assert_eq!(state.field("i18n", "language"), Some(&json!("es-419")));
    assert_eq!(state.field("account", "name"), Some(&json!("John Doe")));
    assert_eq!(
        state.pointer("/localCurrency/exchangeRates"),
        Some(&json!({ "cUSD": "1.33", "cEUR": null, "cGLD": null }))
    );
    assert_eq!(
        state.field("web3", "dataEncryptionKey"),
        Some(&json!("0x0000000000000000000000000000000000008F68"))
    );
    assert_eq!(state.field("web3", "fornoMode"), Some(&json!(true)));
    assert_eq!(state.field("web3", "hadFornoDisabled"), Some(&json!(true)));
    assert_eq!(state.field("account", "dailyLimitCusd"), Some(&json!(1000)));
    assert_eq!(state.field("home", "notifications"), Some(&json!({})));

    // Dropped along the way
    assert_eq!(state.field("app", "language"), None);
    assert_eq!(state.field("web3", "commentKey"), None);
    assert_eq!(state.field("account", "incomingPaymentRequests"), None);
    assert_eq!(state.pointer("/exchange/history/isLoading"), None);
    assert_eq!(state.pointer("/walletConnect/v2"), None);

    // Filled in from the initial state
    assert_eq!(state.field("web3", "isDekRegistered"), Some(&json!(false)));
    assert_eq!(
        state.field("recipients", "phoneRecipientCache"),
        Some(&json!({}))
    );
}

#[tokio::test]
async fn test_restore_accepts_unversioned_state_without_guard() {
    let temp_dir = TempDir::new().unwrap();
    let adapter = adapter(&temp_dir);

    let restored = adapter.restore(vneg1_state(), None).await.unwrap();
    assert_eq!(restored.from, SchemaVersion::DEFAULT);
    assert_eq!(restored.steps, 52);

    // The raw chain output alone is missing reducer defaults
    let raw = adapter.runner().migrate(vneg1_state()).unwrap().state;
    assert!(!adapter.validator().validate_state(&raw).is_valid());

    let report = adapter.validator().validate_state(&restored.state);
    assert!(report.is_valid(), "{}", report.summary(10));
    assert_eq!(
        restored.state.field("account", "choseToRestoreAccount"),
        Some(&json!(false))
    );
}

#[tokio::test]
async fn test_chain_matches_single_steps_in_order() {
    let context = MigrationContext::current();
    let temp_dir = TempDir::new().unwrap();
    let adapter = adapter(&temp_dir);

    let run = adapter.runner().migrate(vneg1_state()).unwrap();

    let mut stepped = vneg1_state();
    for to in 0..=51 {
        stepped = apply_step(to, stepped, &context).unwrap();
    }
    stepped.set_meta(PersistMeta {
        version: SchemaVersion::new(51),
        rehydrated: false,
    });

    assert_eq!(run.state, stepped);
}

#[tokio::test]
async fn test_dangling_account_resets_and_primes_recovery() {
    let temp_dir = TempDir::new().unwrap();
    let adapter = adapter(&temp_dir);

    let outcome = adapter
        .hydrate_blob(VNEG1_STATE, &guard_with(&[OTHER_ACCOUNT]))
        .await;

    assert_eq!(
        outcome.reset_reason(),
        Some(&ResetReason::InvalidAccount {
            account: TEST_ACCOUNT.to_string(),
        })
    );
    match &outcome.status {
        HydrationStatus::Reset {
            recovering_account, ..
        } => assert_eq!(recovering_account.as_deref(), Some(OTHER_ACCOUNT)),
        other => panic!("expected reset, got {:?}", other),
    }

    let state = outcome.state;
    assert_eq!(state.field("web3", "account"), Some(&json!(null)));
    assert_eq!(
        state.field("account", "recoveringFromStoreWipe"),
        Some(&json!(true))
    );
    assert_eq!(
        state.field("account", "accountToRecoverFromStoreWipe"),
        Some(&json!(OTHER_ACCOUNT))
    );
    assert_eq!(state.field("account", "pincodeType"), Some(&json!("CustomPin")));
}

#[tokio::test]
async fn test_account_check_ignores_address_casing() {
    let temp_dir = TempDir::new().unwrap();
    let adapter = adapter(&temp_dir);

    let outcome = adapter
        .hydrate_blob(VNEG1_STATE, &guard_with(&[&TEST_ACCOUNT.to_lowercase()]))
        .await;
    assert!(!outcome.is_reset());
}

#[tokio::test]
async fn test_state_at_latest_version_runs_no_steps() {
    let temp_dir = TempDir::new().unwrap();
    let adapter = adapter(&temp_dir);
    let guard = guard_with(&[TEST_ACCOUNT]);

    let migrated = adapter.hydrate_blob(VNEG1_STATE, &guard).await.state;
    let raw = blob::encode(&migrated, BlobFormat::Plain).unwrap();

    let outcome = adapter.hydrate_blob(&raw, &guard).await;
    assert_eq!(
        outcome.status,
        HydrationStatus::Restored {
            from: SchemaVersion::new(51),
            steps: 0,
            format: BlobFormat::Plain,
        }
    );
    assert_eq!(outcome.state, migrated);
}

#[tokio::test]
async fn test_mid_chain_state_runs_remaining_steps() {
    let context = MigrationContext::current();
    let temp_dir = TempDir::new().unwrap();
    let adapter = adapter(&temp_dir);

    let mut state = vneg1_state();
    for to in 0..=39 {
        state = apply_step(to, state, &context).unwrap();
    }
    state.set_meta(PersistMeta {
        version: SchemaVersion::new(39),
        rehydrated: false,
    });
    let raw = blob::encode(&state, BlobFormat::ReduxPersist).unwrap();

    let outcome = adapter
        .hydrate_blob(&raw, &guard_with(&[TEST_ACCOUNT]))
        .await;
    assert_eq!(
        outcome.status,
        HydrationStatus::Restored {
            from: SchemaVersion::new(39),
            steps: 12,
            format: BlobFormat::ReduxPersist,
        }
    );
    assert_eq!(
        outcome.state.field("app", "celoWithdrawalEnabledInExchange"),
        Some(&json!(true))
    );
}

#[tokio::test]
async fn test_corrupt_blob_resets() {
    let temp_dir = TempDir::new().unwrap();
    let adapter = adapter(&temp_dir);

    let outcome = adapter
        .hydrate_blob("{\"app\": ", &guard_with(&[]))
        .await;

    assert!(matches!(
        outcome.reset_reason(),
        Some(ResetReason::Corrupt { .. })
    ));
    assert_eq!(
        outcome.status,
        HydrationStatus::Reset {
            reason: outcome.reset_reason().cloned().unwrap(),
            recovering_account: None,
        }
    );
    assert_eq!(outcome.state.meta().map(|m| m.rehydrated), Some(true));
}

#[tokio::test]
async fn test_newer_stored_version_resets() {
    let temp_dir = TempDir::new().unwrap();
    let adapter = adapter(&temp_dir);

    let raw = json!({
        "_persist": { "version": 60, "rehydrated": true },
        "app": { "locked": true }
    })
    .to_string();
    let outcome = adapter.hydrate_blob(&raw, &guard_with(&[])).await;

    match outcome.reset_reason() {
        Some(ResetReason::MigrationFailed { error }) => {
            assert!(error.to_string().contains("60"), "{}", error);
        }
        other => panic!("expected migration failure, got {:?}", other),
    }
    assert_eq!(outcome.state.field("app", "locked"), Some(&json!(false)));
}

#[tokio::test]
async fn test_persisted_state_rehydrates_through_storage() {
    let temp_dir = TempDir::new().unwrap();
    let adapter = adapter(&temp_dir);
    let guard = guard_with(&[TEST_ACCOUNT]);

    let first = adapter.hydrate_blob(VNEG1_STATE, &guard).await;
    assert!(!first.is_reset());
    adapter.persist(&first.state).unwrap();

    // Default format is redux-persist: every slice is a JSON string
    let raw = adapter.store().read().unwrap().unwrap();
    let outer: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert!(outer["app"].is_string());
    assert!(outer.get("networkInfo").is_none());

    let second = adapter.hydrate(&guard).await.unwrap();
    assert_eq!(
        second.status,
        HydrationStatus::Restored {
            from: SchemaVersion::new(51),
            steps: 0,
            format: BlobFormat::ReduxPersist,
        }
    );
    assert_eq!(second.state, first.state);
}

#[tokio::test]
async fn test_hydrate_does_not_write_after_reset() {
    let temp_dir = TempDir::new().unwrap();
    let adapter = adapter(&temp_dir);
    let path = adapter.store().path().to_path_buf();
    std::fs::write(&path, "not json").unwrap();

    let outcome = adapter.hydrate(&guard_with(&[TEST_ACCOUNT])).await.unwrap();
    assert!(outcome.is_reset());
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "not json");
}
