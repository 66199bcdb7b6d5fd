//! Render command implementation - draw logos and export them to SVG/EPS/PNG/JSON

use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use rayon::prelude::*;
use seqlogo_core::LogoOptions;
use seqlogo_render::Format;

use super::{load_alignment, LogoArgs};
use crate::config::Config;
use crate::error::CliError;
use crate::input::InputFormat;

/// Arguments of the render command
#[derive(clap::Args, Debug, Clone)]
pub struct RenderArgs {
    /// Aligned sequence files (FASTA or one sequence per line); '-' reads stdin
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Output file, or a directory when several inputs are given
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Output format (auto-detected from the output extension)
    #[arg(short = 'F', long)]
    pub format: Option<Format>,

    /// How to read the inputs
    #[arg(long, value_enum, default_value = "auto")]
    pub input_format: InputFormat,

    /// DPI for raster outputs
    #[arg(long)]
    pub resolution: Option<f64>,

    /// Count unexpected symbols instead of failing
    #[arg(long)]
    pub tolerant: bool,

    #[command(flatten)]
    pub logo: LogoArgs,
}

pub fn execute(config: &Config, args: RenderArgs) -> Result<()> {
    let mut config = config.clone();
    args.logo.apply(&mut config.logo);
    if let Some(resolution) = args.resolution {
        config.output.resolution = resolution;
    }
    config.output.tolerant |= args.tolerant;

    let format = resolve_format(&config, &args)?;
    let targets = plan_outputs(&args.inputs, args.output.as_deref(), format)?;
    log::info!(
        "Rendering {} logo(s) as {} with {} threads",
        targets.len(),
        format,
        rayon::current_num_threads()
    );

    let results: Vec<(PathBuf, Result<()>)> = targets
        .into_par_iter()
        .map(|(input, output)| {
            let result = render_one(&config, &input, &output, format, args.input_format);
            (input, result)
        })
        .collect();

    let total = results.len();
    let mut failures: Vec<(PathBuf, anyhow::Error)> = results
        .into_iter()
        .filter_map(|(input, result)| result.err().map(|e| (input, e)))
        .collect();

    match failures.len() {
        0 => Ok(()),
        1 if total == 1 => Err(failures.remove(0).1),
        n => {
            for (input, err) in &failures {
                log::error!("{}: {:#}", input.display(), err);
            }
            bail!("{} of {} inputs failed to render", n, total)
        }
    }
}

fn resolve_format(config: &Config, args: &RenderArgs) -> Result<Format> {
    if let Some(format) = args.format {
        return Ok(format);
    }
    if args.inputs.len() == 1 {
        if let Some(format) = args.output.as_deref().and_then(Format::from_extension) {
            return Ok(format);
        }
    }
    config
        .output
        .format
        .parse()
        .map_err(|e: anyhow::Error| anyhow!(CliError::config(e.to_string())))
}

/// Pair every input with the file it renders to.
pub fn plan_outputs(
    inputs: &[PathBuf],
    output: Option<&Path>,
    format: Format,
) -> Result<Vec<(PathBuf, PathBuf)>> {
    let named = |input: &Path, dir: &Path| {
        let stem = input
            .file_stem()
            .filter(|_| input != Path::new("-"))
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "logo".to_string());
        dir.join(format!("{}.{}", stem, format.extension()))
    };

    match (inputs, output) {
        ([input], Some(out)) if !out.is_dir() => Ok(vec![(input.clone(), out.to_path_buf())]),
        (_, Some(dir)) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create output directory: {}", dir.display()))?;
            let targets: Vec<_> = inputs.iter().map(|i| (i.clone(), named(i, dir))).collect();
            check_unique(&targets)?;
            Ok(targets)
        }
        (_, None) => {
            let targets: Vec<_> = inputs
                .iter()
                .map(|i| {
                    let dir = i.parent().unwrap_or_else(|| Path::new(""));
                    (i.clone(), named(i, dir))
                })
                .collect();
            check_unique(&targets)?;
            Ok(targets)
        }
    }
}

fn check_unique(targets: &[(PathBuf, PathBuf)]) -> Result<()> {
    let mut seen = std::collections::HashSet::new();
    for (input, output) in targets {
        if !seen.insert(output) {
            return Err(CliError::config(format!(
                "{} would overwrite {}; render it separately",
                input.display(),
                output.display()
            ))
            .into());
        }
        if input == output {
            return Err(CliError::config(format!(
                "output would overwrite the input {}",
                input.display()
            ))
            .into());
        }
    }
    Ok(())
}

fn render_one(
    config: &Config,
    input: &Path,
    output: &Path,
    format: Format,
    input_format: InputFormat,
) -> Result<()> {
    let options: &LogoOptions = &config.logo;
    let (source, alignment) = load_alignment(input, input_format, options, config.output.tolerant)?;
    log::info!(
        "{}: {} sequences x {} columns",
        source,
        alignment.rows(),
        alignment.columns()
    );

    let drawing =
        seqlogo_core::draw(&alignment, options).map_err(|e| CliError::logo(source.as_str(), e))?;
    seqlogo_render::export(
        &drawing,
        format,
        &config.output.export_config(&source),
        output,
    )
    .with_context(|| format!("Failed to export logo for {}", source))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_output_file() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("logo.png");
        let plan = plan_outputs(&[PathBuf::from("a.fa")], Some(&out), Format::Png).unwrap();
        assert_eq!(plan, vec![(PathBuf::from("a.fa"), out)]);
    }

    #[test]
    fn test_batch_into_directory() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("logos");
        let inputs = [PathBuf::from("x/a.fa"), PathBuf::from("y/b.txt")];
        let plan = plan_outputs(&inputs, Some(&out), Format::Svg).unwrap();
        assert!(out.is_dir());
        assert_eq!(plan[0].1, out.join("a.svg"));
        assert_eq!(plan[1].1, out.join("b.svg"));
    }

    #[test]
    fn test_default_names_next_to_inputs() {
        let plan = plan_outputs(&[PathBuf::from("data/site.fa")], None, Format::Eps).unwrap();
        assert_eq!(plan[0].1, PathBuf::from("data/site.eps"));
        let plan = plan_outputs(&[PathBuf::from("-")], None, Format::Svg).unwrap();
        assert_eq!(plan[0].1, PathBuf::from("logo.svg"));
    }

    #[test]
    fn test_colliding_outputs_rejected() {
        let inputs = [PathBuf::from("x/a.fa"), PathBuf::from("x/a.txt")];
        assert!(plan_outputs(&inputs, None, Format::Svg).is_err());
        assert!(plan_outputs(&[PathBuf::from("a.svg")], None, Format::Svg).is_err());
    }
}
