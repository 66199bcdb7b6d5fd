//! Configuration handling for the seqlogo CLI
//!
//! Supports loading configuration from seqlogo.toml files with CLI argument overrides.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use seqlogo_core::LogoOptions;
use seqlogo_render::ExportConfig;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub logo: LogoOptions,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Output format used when it cannot be taken from the file name
    #[serde(default = "default_format")]
    pub format: String,

    /// Raster resolution in pixels per inch
    #[serde(default = "default_resolution")]
    pub resolution: f64,

    /// Font family named in SVG text elements
    #[serde(default = "default_font_family")]
    pub font_family: String,

    /// Record the input file name in formats that allow comments
    #[serde(default = "default_true")]
    pub provenance: bool,

    /// Count unexpected symbols instead of failing
    #[serde(default)]
    pub tolerant: bool,
}

fn default_format() -> String {
    "svg".to_string()
}
fn default_resolution() -> f64 {
    96.0
}
fn default_font_family() -> String {
    ExportConfig::default().font_family
}
fn default_true() -> bool {
    true
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: default_format(),
            resolution: default_resolution(),
            font_family: default_font_family(),
            provenance: true,
            tolerant: false,
        }
    }
}

impl OutputConfig {
    /// Backend settings for one rendered input.
    pub fn export_config(&self, source: &str) -> ExportConfig {
        ExportConfig {
            resolution: self.resolution,
            font_family: self.font_family.clone(),
            provenance_comment: self
                .provenance
                .then(|| format!("seqlogo {} from {}", seqlogo_core::VERSION, source)),
        }
    }
}

impl Config {
    /// Load configuration from file or use defaults
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let config = match config_path {
            Some(path) => {
                log::info!("Loading configuration from: {}", path.display());
                Self::load_from_file(path)?
            }
            None => {
                let default_path = PathBuf::from("seqlogo.toml");
                if default_path.exists() {
                    log::info!("Loading configuration from: seqlogo.toml");
                    Self::load_from_file(&default_path)?
                } else {
                    log::debug!("Using default configuration");
                    Self::default()
                }
            }
        };

        Ok(config)
    }

    /// Load configuration from a specific TOML file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse configuration file: {}", path.display()))?;

        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize configuration")?;

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write configuration file: {}", path.display()))?;

        Ok(())
    }

    /// Generate example configuration file content
    pub fn example_toml() -> Result<String> {
        toml::to_string_pretty(&Self::default()).context("Failed to serialize default configuration")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use seqlogo_core::{Size, Units};
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.output.format, "svg");
        assert_eq!(config.output.resolution, 96.0);
        assert_eq!(config.logo.units, Units::Bits);
    }

    #[test]
    fn test_config_roundtrip() -> Result<()> {
        let mut config = Config::default();
        config.logo.title = "Splice sites".into();
        config.logo.size = Size::Large;
        config.logo.logo_range = Some((2, 5));
        config.output.tolerant = true;
        let temp_file = NamedTempFile::new()?;

        config.save_to_file(temp_file.path())?;
        let loaded_config = Config::load_from_file(temp_file.path())?;
        assert_eq!(config, loaded_config);

        Ok(())
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: Config = toml::from_str(
            "[logo]\nunits = \"nats\"\nstacks_per_line = 20\n\n[output]\nformat = \"png\"\n",
        )
        .unwrap();
        assert_eq!(config.logo.units, Units::Nats);
        assert_eq!(config.logo.stacks_per_line, Some(20));
        assert_eq!(config.logo.first_index, 1);
        assert_eq!(config.output.format, "png");
        assert_eq!(config.output.resolution, 96.0);
    }

    #[test]
    fn test_example_toml_generation() {
        let example = Config::example_toml().unwrap();
        assert!(example.contains("[logo]"));
        assert!(example.contains("[output]"));
    }

    #[test]
    fn test_provenance_comment() {
        let mut output = OutputConfig::default();
        assert!(output
            .export_config("a.fa")
            .provenance_comment
            .unwrap()
            .ends_with("from a.fa"));
        output.provenance = false;
        assert_eq!(output.export_config("a.fa").provenance_comment, None);
    }
}
