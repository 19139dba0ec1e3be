//! `agentry tools`: list the enabled tools.

use std::path::Path;

use super::{CommandResult, load_config, tool_catalog};

pub async fn run(config_path: &Path) -> CommandResult {
    let config = load_config(config_path)?;
    let catalog = tool_catalog(&config)?;

    if catalog.is_empty() {
        println!("No tools enabled. Enable them under [tools.*] in the config.");
        return Ok(());
    }

    println!("Enabled tools ({}):", catalog.len());
    println!();
    for (name, description) in catalog.list_all() {
        println!("  {name:<14} {description}");
    }
    Ok(())
}
