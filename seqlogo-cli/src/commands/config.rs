//! Config command implementation - print or save configuration files

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::config::Config;

pub fn execute(config: &Config, example: bool, output: Option<PathBuf>) -> Result<()> {
    let config = if example {
        Config::default()
    } else {
        config.clone()
    };

    match output {
        Some(path) => {
            config.save_to_file(&path)?;
            log::info!("Configuration written to: {}", path.display());
        }
        None if example => print!("{}", Config::example_toml()?),
        None => {
            let content =
                toml::to_string_pretty(&config).context("Failed to serialize configuration")?;
            print!("{}", content);
        }
    }
    Ok(())
}
