use anyhow::Result;
use valora_infrastructure::migration::{MigrationContext, build_root_state_registry};

pub fn list() -> Result<()> {
    let registry = build_root_state_registry(MigrationContext::current())?;

    println!(
        "Root state: {} step(s), {} -> {}",
        registry.len(),
        registry.oldest_version(),
        registry.latest_version()
    );
    for (version, description) in registry.describe() {
        println!("{:>4}  {}", version.get(), description);
    }

    Ok(())
}
