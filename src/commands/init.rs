use crate::config::{UseTestingConfig, CONFIG_FILE_NAME};
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Write a `.usetesting.toml` holding the default settings into `dir`.
pub fn init_config(dir: &Path, force: bool) -> Result<()> {
    let config_path = dir.join(CONFIG_FILE_NAME);

    if config_path.exists() && !force {
        anyhow::bail!("Configuration file already exists. Use --force to overwrite.");
    }

    fs::write(&config_path, default_config_toml()?)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;
    println!("Created {CONFIG_FILE_NAME} configuration file");

    Ok(())
}

fn default_config_toml() -> Result<String> {
    let body = toml::to_string_pretty(&UseTestingConfig::default()).context("Failed to serialize default config")?;
    Ok(format!(
        "# usetesting configuration\n# Rules marked (Go 1.24+) only fire in modules declaring go >= 1.24.\n\n{body}"
    ))
}
