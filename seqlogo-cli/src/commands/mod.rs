//! Command implementations and the logo options shared between them

use std::path::Path;

use anyhow::Result;
use clap::{Args, ValueEnum};
use seqlogo_core::{
    Alignment, AlphabetSelection, ColorRule, ColorScheme, ColorSelection, Composition, Correction,
    LogoOptions, Size, StackOrder, SymbolPolicy, Units,
};

use crate::error::CliError;
use crate::input::{self, InputFormat};

pub mod config;
pub mod render;
pub mod table;

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum SequenceType {
    Auto,
    Dna,
    Rna,
    Protein,
}

/// Logo options that override the configuration file.
#[derive(Args, Debug, Clone, Default)]
pub struct LogoArgs {
    /// Title above the logo
    #[arg(short, long)]
    pub title: Option<String>,

    /// Label below the x axis
    #[arg(long)]
    pub xlabel: Option<String>,

    /// Label of the y axis (defaults to the unit name)
    #[arg(long)]
    pub ylabel: Option<String>,

    /// Small print in the lower right corner
    #[arg(long)]
    pub fineprint: Option<String>,

    /// Units of the y axis: bits, nats, digits, kT, kJ/mol, kcal/mol, probability
    #[arg(short = 'U', long)]
    pub units: Option<Units>,

    /// Size preset: small, medium or large
    #[arg(short, long)]
    pub size: Option<Size>,

    /// Stacks per line
    #[arg(short = 'n', long)]
    pub stacks_per_line: Option<usize>,

    /// Index of the first column
    #[arg(long, allow_negative_numbers = true)]
    pub first_index: Option<i64>,

    /// Subrange of columns to draw, as START,END in index units
    #[arg(long, value_parser = parse_int_pair, allow_hyphen_values = true)]
    pub logo_range: Option<(i64, i64)>,

    /// Explicit y-axis range, as MIN,MAX
    #[arg(long, value_parser = parse_float_pair, allow_hyphen_values = true)]
    pub yaxis: Option<(f64, f64)>,

    /// Distance between y-axis ticks
    #[arg(long)]
    pub ticmarks: Option<f64>,

    /// Label every n-th stack
    #[arg(long)]
    pub number_interval: Option<usize>,

    /// Stack height over stack width
    #[arg(long)]
    pub aspect_ratio: Option<f64>,

    /// Alphabet of the sequences
    #[arg(short = 'A', long, value_enum)]
    pub sequence_type: Option<SequenceType>,

    /// Custom alphabet letters, e.g. ACGTM
    #[arg(long, conflicts_with = "sequence_type")]
    pub alphabet: Option<String>,

    /// Named color scheme, or auto
    #[arg(short = 'C', long)]
    pub color_scheme: Option<String>,

    /// Custom color rule COLOR:SYMBOLS; repeat to build a scheme
    #[arg(long = "color", value_name = "COLOR:SYMBOLS", conflicts_with = "color_scheme")]
    pub colors: Vec<ColorRule>,

    /// Do not subtract the small-sample correction
    #[arg(long)]
    pub no_correction: bool,

    /// Expected composition: equiprobable, auto, a GC percentage such as 45%,
    /// a species such as 'E. coli', or {A:10, C:40, G:40, T:10}
    #[arg(long)]
    pub composition: Option<Composition>,

    /// Draw the most frequent letter at the bottom of each stack
    #[arg(long)]
    pub reverse_stacks: bool,

    #[arg(long)]
    pub no_xaxis: bool,

    #[arg(long)]
    pub no_yaxis: bool,

    #[arg(long)]
    pub no_fineprint: bool,

    /// Label the ends of each line (5' and 3', or N and C)
    #[arg(long)]
    pub show_ends: bool,

    /// Outline every glyph
    #[arg(long)]
    pub show_boxes: bool,

    /// Set the x-axis numbers upright instead of vertically
    #[arg(long)]
    pub upright_numbers: bool,

    /// Keep every glyph at full width regardless of gaps
    #[arg(long)]
    pub no_scale_width: bool,
}

impl LogoArgs {
    /// Apply the overrides that were given on the command line.
    pub fn apply(&self, options: &mut LogoOptions) {
        if let Some(title) = &self.title {
            options.title = title.clone();
        }
        if let Some(xlabel) = &self.xlabel {
            options.xlabel = xlabel.clone();
        }
        if let Some(ylabel) = &self.ylabel {
            options.ylabel = Some(ylabel.clone());
        }
        if let Some(fineprint) = &self.fineprint {
            options.fineprint = fineprint.clone();
        }
        if let Some(units) = self.units {
            options.units = units;
        }
        if let Some(size) = self.size {
            options.size = size;
        }
        if let Some(n) = self.stacks_per_line {
            options.stacks_per_line = Some(n);
        }
        if let Some(first) = self.first_index {
            options.first_index = first;
        }
        if let Some(range) = self.logo_range {
            options.logo_range = Some(range);
        }
        if let Some(range) = self.yaxis {
            options.yaxis_range = Some(range);
        }
        if let Some(step) = self.ticmarks {
            options.yaxis_tic_interval = Some(step);
        }
        if let Some(n) = self.number_interval {
            options.number_interval = n;
        }
        if let Some(ratio) = self.aspect_ratio {
            options.stack_aspect_ratio = ratio;
        }
        if let Some(kind) = self.sequence_type {
            options.alphabet = match kind {
                SequenceType::Auto => AlphabetSelection::Auto,
                SequenceType::Dna => AlphabetSelection::Dna,
                SequenceType::Rna => AlphabetSelection::Rna,
                SequenceType::Protein => AlphabetSelection::Protein,
            };
        }
        if let Some(letters) = &self.alphabet {
            options.alphabet = AlphabetSelection::Custom(letters.clone());
        }
        if let Some(name) = &self.color_scheme {
            options.color_scheme = ColorSelection::Named(name.clone());
        }
        if !self.colors.is_empty() {
            options.color_scheme = ColorSelection::Custom(ColorScheme::new(
                "custom",
                "Colors given on the command line",
                self.colors.clone(),
            ));
        }
        if self.no_correction {
            options.correction = Correction::None;
        }
        if let Some(composition) = &self.composition {
            options.composition = composition.clone();
        }
        if self.reverse_stacks {
            options.stack_order = StackOrder::LargestOnBottom;
        }
        if self.no_xaxis {
            options.show_xaxis = false;
        }
        if self.no_yaxis {
            options.show_yaxis = false;
        }
        if self.no_fineprint {
            options.show_fineprint = false;
        }
        if self.show_ends {
            options.show_ends = true;
        }
        if self.show_boxes {
            options.show_boxes = true;
        }
        if self.upright_numbers {
            options.rotate_numbers = false;
        }
        if self.no_scale_width {
            options.scale_width = false;
        }
    }
}

fn parse_pair<T: std::str::FromStr>(s: &str) -> Result<(T, T), String> {
    let (a, b) = s
        .split_once(',')
        .ok_or_else(|| format!("expected two comma-separated values, got {:?}", s))?;
    let parse = |v: &str| {
        v.trim()
            .parse::<T>()
            .map_err(|_| format!("{:?} is not a number", v.trim()))
    };
    Ok((parse(a)?, parse(b)?))
}

fn parse_int_pair(s: &str) -> Result<(i64, i64), String> {
    parse_pair(s)
}

fn parse_float_pair(s: &str) -> Result<(f64, f64), String> {
    parse_pair(s)
}

/// Read one input and build its alignment over the configured alphabet.
pub fn load_alignment(
    path: &Path,
    format: InputFormat,
    options: &LogoOptions,
    tolerant: bool,
) -> Result<(String, Alignment)> {
    let sequences = input::read_input(path, format)?;
    let source = sequences.source;
    if let (Some(first), Some(last)) = (sequences.ids.first(), sequences.ids.last()) {
        log::trace!("{}: sequences {} .. {}", source, first, last);
    }

    let alphabet = options
        .alphabet
        .resolve(&sequences.rows)
        .map_err(|e| CliError::logo(source.as_str(), e.into()))?;
    log::debug!("{}: using the {} alphabet", source, alphabet.name());

    let mut alignment = Alignment::new(&sequences.rows, alphabet)
        .map_err(|e| CliError::logo(source.as_str(), e.into()))?;
    if tolerant {
        alignment = alignment.with_policy(SymbolPolicy::Tolerant);
    }
    Ok((source, alignment))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_pairs() {
        assert_eq!(parse_int_pair("-5,10"), Ok((-5, 10)));
        assert_eq!(parse_float_pair("0, 2.5"), Ok((0.0, 2.5)));
        assert!(parse_int_pair("5").is_err());
        assert!(parse_float_pair("a,1").is_err());
    }

    #[test]
    fn test_overrides() {
        let args = LogoArgs {
            title: Some("CAP".into()),
            units: Some(Units::Nats),
            stacks_per_line: Some(12),
            colors: vec!["red:AG".parse().unwrap()],
            no_correction: true,
            composition: Some(Composition::GcPercent(40.0)),
            no_yaxis: true,
            show_ends: true,
            upright_numbers: true,
            ..Default::default()
        };
        let mut options = LogoOptions::default();
        args.apply(&mut options);
        assert_eq!(options.title, "CAP");
        assert_eq!(options.units, Units::Nats);
        assert_eq!(options.stacks_per_line, Some(12));
        assert_eq!(options.correction, Correction::None);
        assert_eq!(options.composition, Composition::GcPercent(40.0));
        assert!(!options.show_yaxis);
        assert!(options.show_xaxis);
        assert!(options.show_ends);
        assert!(!options.show_boxes);
        assert!(!options.rotate_numbers);
        assert!(matches!(options.color_scheme, ColorSelection::Custom(_)));
    }

    #[test]
    fn test_no_overrides_keep_config() {
        let mut options = LogoOptions {
            title: "from config".into(),
            first_index: -3,
            ..Default::default()
        };
        let before = options.clone();
        LogoArgs::default().apply(&mut options);
        assert_eq!(options, before);
    }
}
