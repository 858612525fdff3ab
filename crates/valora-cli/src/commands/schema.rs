use anyhow::Result;
use valora_infrastructure::schema::root_state_schema;

pub fn print() -> Result<()> {
    println!("{}", serde_json::to_string_pretty(&root_state_schema())?);
    Ok(())
}
