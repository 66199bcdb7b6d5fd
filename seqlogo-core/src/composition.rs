//! Background composition: the letter distribution every column is measured
//! against.
//!
//! Accepted forms, case-insensitive:
//!
//! ```text
//! equiprobable | none        every letter equally likely
//! auto                       typical amino acid frequencies for proteins,
//!                            equiprobable for everything else
//! 45%  |  0.45               GC content of a nucleotide background
//! E. coli                    GC content of a known genome
//! {A:10, C:40, G:40, T:10}   explicit relative weights, one per letter
//! ```

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::alphabet::{Alphabet, AlphabetKind};
use crate::error::ConfigError;

/// Typical amino acid frequencies in globular proteins.
const AMINO_ACID_COMPOSITION: &[(char, f64)] = &[
    ('A', 0.082),
    ('R', 0.057),
    ('N', 0.044),
    ('D', 0.053),
    ('C', 0.017),
    ('Q', 0.040),
    ('E', 0.062),
    ('G', 0.072),
    ('H', 0.022),
    ('I', 0.052),
    ('L', 0.090),
    ('K', 0.057),
    ('M', 0.024),
    ('F', 0.039),
    ('P', 0.051),
    ('S', 0.069),
    ('T', 0.058),
    ('W', 0.013),
    ('Y', 0.032),
    ('V', 0.066),
];

/// Genomic GC percentages.
const SPECIES_GC: &[(&str, f64)] = &[
    ("H. sapiens", 40.0),
    ("E. coli", 50.5),
    ("S. cerevisiae", 38.0),
    ("C. elegans", 36.0),
    ("D. melanogaster", 43.0),
    ("M. musculus", 42.0),
    ("T. thermophilus", 69.4),
];

/// Expected letter distribution of the sequences.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Composition {
    #[default]
    Equiprobable,
    Auto,
    /// Nucleotides with this GC percentage, strictly between 0 and 100.
    GcPercent(f64),
    /// Relative weights, one per alphabet letter.
    Explicit(Vec<(char, f64)>),
}

fn invalid(input: &str, message: impl Display) -> ConfigError {
    ConfigError::option("composition", format!("{:?}: {}", input, message))
}

fn gc_percent(input: &str, percent: f64) -> Result<Composition, ConfigError> {
    if percent.is_finite() && percent > 0.0 && percent < 100.0 {
        Ok(Composition::GcPercent(percent))
    } else {
        Err(invalid(input, "GC content must lie strictly between 0% and 100%"))
    }
}

fn parse_explicit(input: &str, inner: &str) -> Result<Composition, ConfigError> {
    let cleaned: String = inner
        .chars()
        .map(|c| if matches!(c, ',' | ':' | '\'' | '"') { ' ' } else { c })
        .collect();
    let tokens: Vec<&str> = cleaned.split_whitespace().collect();
    if tokens.is_empty() || tokens.len() % 2 != 0 {
        return Err(invalid(input, "expected LETTER:WEIGHT pairs"));
    }

    let mut weights: Vec<(char, f64)> = Vec::with_capacity(tokens.len() / 2);
    for pair in tokens.chunks_exact(2) {
        let mut chars = pair[0].chars();
        let letter = match (chars.next(), chars.next()) {
            (Some(c), None) => c.to_ascii_uppercase(),
            _ => return Err(invalid(input, format!("{:?} is not a single letter", pair[0]))),
        };
        let weight: f64 = pair[1]
            .parse()
            .map_err(|_| invalid(input, format!("{:?} is not a number", pair[1])))?;
        if !(weight.is_finite() && weight > 0.0) {
            return Err(invalid(input, format!("the weight of {} must be positive", letter)));
        }
        if weights.iter().any(|&(l, _)| l == letter) {
            return Err(invalid(input, format!("{} is given twice", letter)));
        }
        weights.push((letter, weight));
    }
    Ok(Composition::Explicit(weights))
}

impl FromStr for Composition {
    type Err = ConfigError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let t = s.trim();
        match t.to_ascii_lowercase().as_str() {
            "equiprobable" | "none" => return Ok(Self::Equiprobable),
            "auto" | "automatic" => return Ok(Self::Auto),
            _ => {}
        }
        if let Some(&(_, gc)) = SPECIES_GC.iter().find(|(name, _)| name.eq_ignore_ascii_case(t)) {
            return Ok(Self::GcPercent(gc));
        }
        if let Some(percent) = t.strip_suffix('%') {
            let percent: f64 = percent
                .trim()
                .parse()
                .map_err(|_| invalid(s, "not a percentage"))?;
            return gc_percent(s, percent);
        }
        if let Some(inner) = t.strip_prefix('{').and_then(|r| r.strip_suffix('}')) {
            return parse_explicit(s, inner);
        }
        match t.parse::<f64>() {
            Ok(fraction) => gc_percent(s, fraction * 100.0),
            Err(_) => Err(invalid(
                s,
                "expected equiprobable, auto, a GC percentage, a species or {A:10, C:40, ...}",
            )),
        }
    }
}

impl Display for Composition {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Equiprobable => f.write_str("equiprobable"),
            Self::Auto => f.write_str("auto"),
            Self::GcPercent(percent) => write!(f, "{}%", percent),
            Self::Explicit(weights) => {
                f.write_str("{")?;
                for (i, (letter, weight)) in weights.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}:{}", letter, weight)?;
                }
                f.write_str("}")
            }
        }
    }
}

impl TryFrom<String> for Composition {
    type Error = ConfigError;
    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Composition> for String {
    fn from(c: Composition) -> String {
        c.to_string()
    }
}

/// One weight per alphabet letter, in alphabet order.
fn weights_for(alphabet: &Alphabet, pairs: &[(char, f64)]) -> Result<Vec<f64>, ConfigError> {
    if let Some(&(stray, _)) = pairs.iter().find(|(l, _)| alphabet.index_of(*l).is_none()) {
        return Err(ConfigError::option(
            "composition",
            format!("{:?} is not a letter of the {} alphabet", stray, alphabet.name()),
        ));
    }
    alphabet
        .letters()
        .map(|letter| {
            pairs
                .iter()
                .find(|(l, _)| *l == letter)
                .map(|&(_, w)| w)
                .ok_or_else(|| {
                    ConfigError::option("composition", format!("no weight for {:?}", letter))
                })
        })
        .collect()
}

impl Composition {
    /// The normalised background over `alphabet`, or `None` when every
    /// letter is equally likely.
    pub fn background(&self, alphabet: &Alphabet) -> Result<Option<Vec<f64>>, ConfigError> {
        let weights = match self {
            Self::Equiprobable => return Ok(None),
            Self::Auto if alphabet.kind() == AlphabetKind::Protein => {
                weights_for(alphabet, AMINO_ACID_COMPOSITION)?
            }
            Self::Auto => return Ok(None),
            Self::GcPercent(percent) => {
                if !matches!(alphabet.kind(), AlphabetKind::Dna | AlphabetKind::Rna) {
                    return Err(ConfigError::option(
                        "composition",
                        format!("a GC content needs a nucleotide alphabet, not {}", alphabet.name()),
                    ));
                }
                let gc = percent / 100.0;
                alphabet
                    .letters()
                    .map(|l| match l {
                        'G' | 'C' => gc / 2.0,
                        _ => (1.0 - gc) / 2.0,
                    })
                    .collect()
            }
            Self::Explicit(pairs) => weights_for(alphabet, pairs)?,
        };
        let total: f64 = weights.iter().sum();
        Ok(Some(weights.iter().map(|w| w / total).collect()))
    }
}
