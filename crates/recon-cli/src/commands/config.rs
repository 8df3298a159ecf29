//! Config command implementation

use std::path::Path;

use anyhow::Result;
use recon_core::Config;

use super::load_config;
use crate::args::OutputFormat;

/// Print the effective configuration.
pub fn show(config_path: Option<&Path>, format: OutputFormat) -> Result<()> {
    let config = load_config(config_path)?;
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&config)?),
        OutputFormat::Text => print!("{}", toml::to_string_pretty(&config)?),
    }
    Ok(())
}

/// Print which config file applies, and whether it exists.
pub fn print_path(config_path: Option<&Path>) -> Result<()> {
    let path = Config::resolve_path(config_path)?;
    println!("{}", path.display());
    if !path.exists() {
        tracing::info!("config file does not exist yet, defaults are in effect");
    }
    Ok(())
}
