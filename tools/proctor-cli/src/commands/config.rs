//! Show or persist the effective configuration.

use proctor_common::config::{config_file_path, AppConfig};

pub fn run(config: &AppConfig, save: bool) -> anyhow::Result<()> {
    println!("Config file: {}", config_file_path().display());
    println!("{}", serde_json::to_string_pretty(config)?);

    if save {
        let path = config
            .save()
            .map_err(|e| anyhow::anyhow!("Failed to save config: {e}"))?;
        println!();
        println!("Saved to: {}", path.display());
    }

    Ok(())
}
