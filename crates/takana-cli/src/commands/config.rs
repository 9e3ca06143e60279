use anyhow::{bail, Result};
use takana_core::AppConfig;

/// Print the effective configuration, or write the defaults with `init`
pub fn run(config: &AppConfig, init: bool, force: bool) -> Result<()> {
    let path = AppConfig::config_path();

    if init {
        if path.exists() && !force {
            bail!(
                "Config file already exists at {}\nUse --force to overwrite it with defaults.",
                path.display()
            );
        }
        AppConfig::default().save()?;
        println!("Wrote default configuration to {}", path.display());
        return Ok(());
    }

    println!("# {}", path.display());
    println!("{}", config.to_toml()?);
    Ok(())
}
