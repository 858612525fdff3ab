use anyhow::{Context, Result};
use serde_json::Value;
use std::path::Path;
use valora_core::config::BlobFormat;
use valora_infrastructure::migration::{MigrationContext, build_root_state_runner};
use valora_infrastructure::storage::{AtomicJsonFile, blob};

use super::read_state;

pub fn run(input: &Path, output: Option<&Path>, format: BlobFormat) -> Result<()> {
    let (state, detected) = read_state(input)?;
    let runner = build_root_state_runner(MigrationContext::current())?;

    let run = runner
        .migrate(state)
        .with_context(|| format!("Failed to migrate {}", input.display()))?;
    eprintln!(
        "Migrated {} -> {} ({} step(s), read as {:?})",
        run.from_version,
        run.to_version,
        run.steps(),
        detected
    );

    let encoded = match format {
        BlobFormat::Plain => serde_json::to_string_pretty(&run.state)?,
        BlobFormat::ReduxPersist => blob::encode(&run.state, format)?,
    };

    match output {
        Some(path) => {
            AtomicJsonFile::<Value>::new(path.to_path_buf())
                .write_raw(&encoded)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!("Wrote {}", path.display());
        }
        None => println!("{}", encoded),
    }

    Ok(())
}
