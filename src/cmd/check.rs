//! Configuration check command (`gitwh check`).

use std::path::Path;

use anyhow::Result;

pub fn cmd_check(config_path: &Path, listen: Option<&str>) -> Result<()> {
    let config = super::load_config(config_path, listen)?;

    println!("Config file: {}", config_path.display());
    println!("{}", config.summary());

    let warnings = config.validate();
    if warnings.is_empty() {
        println!("No warnings.");
    } else {
        println!();
        println!("Warnings:");
        for warning in &warnings {
            println!("  - {}", warning);
        }
    }

    Ok(())
}
