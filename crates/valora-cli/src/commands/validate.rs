use anyhow::Result;
use std::path::Path;
use valora_infrastructure::schema::ValidationReport;
use valora_infrastructure::{PersistenceAdapter, ResetReason};

use super::{load_config, read_state};

/// With `migrate`, the tree goes through the same restore path as hydration
/// (without the account check) before it is validated.
pub async fn run(
    input: &Path,
    config_path: Option<&Path>,
    migrate: bool,
    limit: usize,
) -> Result<()> {
    let (state, _) = read_state(input)?;
    let adapter = PersistenceAdapter::from_config(load_config(config_path)?)?;

    let report = if migrate {
        match adapter.restore(state, None).await {
            Ok(restored) => {
                eprintln!(
                    "Migrated from version {} ({} step(s))",
                    restored.from, restored.steps
                );
                ValidationReport::default()
            }
            Err(ResetReason::SchemaViolation { report }) => report,
            Err(reason) => anyhow::bail!("{}: {}", input.display(), reason),
        }
    } else {
        adapter.validator().validate_state(&state)
    };

    if report.is_valid() {
        println!("{}: valid", input.display());
        return Ok(());
    }

    for violation in report.iter().take(limit) {
        println!("{}", violation);
    }
    if report.len() > limit {
        println!("... and {} more", report.len() - limit);
    }
    anyhow::bail!(
        "{}: {} schema violation(s)",
        input.display(),
        report.len()
    );
}
