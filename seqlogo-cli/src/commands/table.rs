//! Table command implementation - print per-column counts, entropy and information

use std::path::PathBuf;

use anyhow::{Context, Result};
use seqlogo_core::{InformationModel, Units};

use super::{load_alignment, LogoArgs};
use crate::config::Config;
use crate::error::CliError;
use crate::input::InputFormat;

/// Arguments of the table command
#[derive(clap::Args, Debug, Clone)]
pub struct TableArgs {
    /// Aligned sequence file; '-' reads stdin
    pub input: PathBuf,

    /// Write the table here instead of standard output
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    #[arg(long, value_enum, default_value = "auto")]
    pub input_format: InputFormat,

    /// Count unexpected symbols instead of failing
    #[arg(long)]
    pub tolerant: bool,

    #[command(flatten)]
    pub logo: LogoArgs,
}

pub fn execute(config: &Config, args: TableArgs) -> Result<()> {
    let mut options = config.logo.clone();
    args.logo.apply(&mut options);
    let tolerant = config.output.tolerant || args.tolerant;

    let (source, alignment) = load_alignment(&args.input, args.input_format, &options, tolerant)?;
    let counts = alignment
        .counts()
        .map_err(|e| CliError::logo(source.as_str(), e.into()))?;
    let model = InformationModel::with_composition(
        &counts,
        Units::Bits,
        options.correction,
        &options.composition,
    )
    .map_err(|e| CliError::logo(source.as_str(), e.into()))?;
    let table = model.table(options.first_index).to_string();

    match &args.output {
        Some(path) => {
            std::fs::write(path, &table)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            log::info!("wrote {} columns to {}", model.len(), path.display());
        }
        None => print!("{}", table),
    }
    Ok(())
}
