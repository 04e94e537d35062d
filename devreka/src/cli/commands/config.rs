use crate::cli::app::ConfigArgs;
use anyhow::{Context, Result, bail};
use devreka_core::Config;
use std::path::PathBuf;
use tracing::info;

/// Print the effective configuration, or write the default one with `--init`
pub fn execute(args: ConfigArgs, config_path: Option<PathBuf>) -> Result<()> {
    if args.init {
        let path = match config_path {
            Some(path) => path,
            None => Config::default_path().context("Could not determine the config directory")?,
        };
        if path.exists() && !args.force {
            bail!("{} already exists, use --force to overwrite it", path.display());
        }

        Config::default().save(&path)?;
        info!("Wrote default configuration to {}", path.display());
        println!("✅ Configuration written to {}", path.display());
        return Ok(());
    }

    let config = Config::load(config_path.as_deref())?;
    let rendered = toml::to_string_pretty(&config).context("Failed to serialize config")?;
    println!("{}", rendered);
    Ok(())
}
