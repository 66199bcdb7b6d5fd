use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

mod commands;
mod config;
mod error;
mod input;

use commands::render::RenderArgs;
use commands::table::TableArgs;
use config::Config;
use error::{print_error_and_exit, CliError};

#[derive(Parser)]
#[command(name = "seqlogo")]
#[command(about = "seqlogo - sequence logos from multiple sequence alignments")]
#[command(version)]
#[command(long_about = "
seqlogo draws sequence logos: one stack of letters per alignment column, the
stack height showing the information content of the column and each letter
sized by its frequency.

Examples:
  seqlogo render sites.fa -o sites.svg --title 'Splice donor'
  seqlogo render a.fa b.fa c.fa -o logos/ --format png --resolution 300
  seqlogo render proteins.fa -A protein -C hydrophobicity -U nats
  seqlogo table sites.fa
  seqlogo config --example > seqlogo.toml
")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path (defaults to ./seqlogo.toml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Number of threads used for batch rendering
    #[arg(short = 'j', long, global = true)]
    pub threads: Option<usize>,

    /// Verbose output
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Draw logos and export them to SVG, EPS, PNG or JSON
    Render(RenderArgs),

    /// Print per-column counts, entropy and information
    Table(TableArgs),

    /// Show the effective configuration or an example file
    Config {
        /// Print the default configuration instead of the effective one
        #[arg(long)]
        example: bool,

        /// Write the configuration to this file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn setup_logging(verbose: u8, quiet: bool) {
    let level = if quiet {
        "error"
    } else {
        match verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::load(cli.config.as_deref())
        .map_err(|e| CliError::config(format!("{:#}", e)))?;

    if let Some(threads) = cli.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("Failed to set thread count")?;
    }

    match cli.command {
        Commands::Render(args) => commands::render::execute(&config, args),
        Commands::Table(args) => commands::table::execute(&config, args),
        Commands::Config { example, output } => commands::config::execute(&config, example, output),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose, cli.quiet);

    if let Err(err) = run(cli) {
        if let Some(cli_err) = err.downcast_ref::<CliError>() {
            print_error_and_exit(cli_err);
        }
        return Err(err);
    }
    Ok(())
}
