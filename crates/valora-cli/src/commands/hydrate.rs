use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;
use valora_infrastructure::{
    AccountGuard, FileAccountRepository, HydrationStatus, PersistenceAdapter, StateStore,
    ValoraPaths,
};

use super::load_config;

pub async fn run(config_path: Option<&Path>, print: bool, persist: bool) -> Result<()> {
    let config = load_config(config_path)?;

    let accounts_file = ValoraPaths::accounts_file(&config)?;
    let guard = AccountGuard::new(Arc::new(FileAccountRepository::new(accounts_file)));
    let adapter = Arc::new(PersistenceAdapter::from_config(config)?);

    let (store, status) = StateStore::hydrate(Arc::clone(&adapter), &guard)
        .await
        .context("Failed to read stored state")?;
    report(&status);

    if print {
        println!("{}", serde_json::to_string_pretty(&store.snapshot().await)?);
    }

    if persist {
        store.flush().await.context("Failed to write state")?;
        eprintln!("Wrote {}", adapter.store().path().display());
    }

    Ok(())
}

fn report(status: &HydrationStatus) {
    match status {
        HydrationStatus::Fresh { recovering_account } => {
            eprintln!("No stored state, using the initial state");
            if let Some(account) = recovering_account {
                eprintln!("Store wipe recovery primed for {}", account);
            }
        }
        HydrationStatus::Restored {
            from,
            steps,
            format,
        } => {
            eprintln!(
                "Restored from version {} ({} step(s), {:?} blob)",
                from, steps, format
            );
        }
        HydrationStatus::Reset {
            reason,
            recovering_account,
        } => {
            eprintln!("Reset to the initial state ({}): {}", reason.kind(), reason);
            if let Some(account) = recovering_account {
                eprintln!("Store wipe recovery primed for {}", account);
            }
        }
    }
}
