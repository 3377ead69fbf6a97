use anyhow::Result;
use std::path::Path;

use crate::utils::load_config;

pub fn list_command(config_path: Option<&Path>, json: bool) -> Result<()> {
    let config = load_config(config_path)?;
    let summaries = config.summaries();

    if json {
        println!("{}", serde_json::to_string_pretty(&summaries)?);
        return Ok(());
    }

    if summaries.is_empty() {
        println!("No environments defined in the configuration");
        return Ok(());
    }

    println!("📦 Environments:");
    for summary in &summaries {
        let marker = if summary.is_default { " (default)" } else { "" };
        match &summary.description {
            Some(desc) => println!("  • {}{} - {}", summary.name, marker, desc),
            None => println!("  • {}{}", summary.name, marker),
        }
    }
    Ok(())
}
