//! Config command handlers

use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use bookish_core::Config;

use crate::output::{Output, OutputFormat};

/// Show current configuration
pub fn show(output: &Output) -> Result<()> {
    let config = Config::load().context("Failed to load configuration")?;

    match output.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "config_file": Config::config_file_path(),
                    "data_dir": config.data_dir,
                    "catalog_url": config.catalog_url
                })
            );
        }
        OutputFormat::Quiet => {
            println!("{}", config.data_dir.display());
        }
        OutputFormat::Human => {
            println!("Config file:  {}", Config::config_file_path().display());
            println!("data_dir:     {}", config.data_dir.display());
            println!("catalog_url:  {}", config.catalog_url);
        }
    }

    Ok(())
}

/// Set a configuration value
pub fn set(key: String, value: String, output: &Output) -> Result<()> {
    let mut config = Config::load().context("Failed to load configuration")?;

    match key.as_str() {
        "data_dir" => config.data_dir = PathBuf::from(&value),
        "catalog_url" => config.catalog_url = value.clone(),
        _ => bail!("Unknown configuration key: {} (data_dir, catalog_url)", key),
    }

    config.save().context("Failed to save configuration")?;
    output.success(&format!("Set {} = {}", key, value));
    Ok(())
}
