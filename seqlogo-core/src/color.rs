//! Colors, coloring rules and the built-in color schemes.
//!
//! A [`ColorScheme`] is an ordered list of [`ColorRule`]s; the first rule
//! matching a letter at a column decides its color, and letters no rule
//! matches get the scheme's default color.

use std::collections::BTreeMap;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::alphabet::AlphabetKind;
use crate::error::ConfigError;

/// An opaque RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

const NAMED_COLORS: &[(&str, Color)] = &[
    ("black", Color::rgb(0x00, 0x00, 0x00)),
    ("white", Color::rgb(0xff, 0xff, 0xff)),
    ("red", Color::rgb(0xff, 0x00, 0x00)),
    ("green", Color::rgb(0x00, 0x80, 0x00)),
    ("blue", Color::rgb(0x00, 0x00, 0xff)),
    ("orange", Color::rgb(0xff, 0xa5, 0x00)),
    ("darkorange", Color::rgb(0xff, 0x8c, 0x00)),
    ("purple", Color::rgb(0x80, 0x00, 0x80)),
    ("yellow", Color::rgb(0xff, 0xff, 0x00)),
    ("cyan", Color::rgb(0x00, 0xff, 0xff)),
    ("magenta", Color::rgb(0xff, 0x00, 0xff)),
    ("gray", Color::rgb(0x80, 0x80, 0x80)),
    ("grey", Color::rgb(0x80, 0x80, 0x80)),
    ("darkgreen", Color::rgb(0x00, 0x64, 0x00)),
    ("darkblue", Color::rgb(0x00, 0x00, 0x8b)),
    ("darkred", Color::rgb(0x8b, 0x00, 0x00)),
    ("lightgray", Color::rgb(0xd3, 0xd3, 0xd3)),
];

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(0xff, 0xff, 0xff);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Look up a CSS color name.
    pub fn named(name: &str) -> Option<Self> {
        NAMED_COLORS
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|&(_, c)| c)
    }

    /// `#rrggbb` form.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Components scaled to `0.0..=1.0`.
    pub fn to_unit(self) -> (f64, f64, f64) {
        (
            self.r as f64 / 255.0,
            self.g as f64 / 255.0,
            self.b as f64 / 255.0,
        )
    }
}

fn parse_hex(hex: &str) -> Option<Color> {
    let digits: Vec<u8> = match hex.len() {
        3 => hex
            .chars()
            .map(|c| c.to_digit(16).map(|d| (d * 17) as u8))
            .collect::<Option<_>>()?,
        6 => (0..3)
            .map(|i| hex.get(2 * i..2 * i + 2).and_then(|s| u8::from_str_radix(s, 16).ok()))
            .collect::<Option<_>>()?,
        _ => return None,
    };
    Some(Color::rgb(digits[0], digits[1], digits[2]))
}

fn parse_rgb_function(s: &str) -> Option<Color> {
    let inner = s.strip_prefix("rgb(")?.strip_suffix(')')?;
    let parts: Vec<u8> = inner
        .split(',')
        .map(|p| p.trim().parse::<u8>().ok())
        .collect::<Option<_>>()?;
    match parts[..] {
        [r, g, b] => Some(Color::rgb(r, g, b)),
        _ => None,
    }
}

impl FromStr for Color {
    type Err = ConfigError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let t = s.trim();
        let parsed = if let Some(hex) = t.strip_prefix('#') {
            parse_hex(hex)
        } else if t.starts_with("rgb(") {
            parse_rgb_function(&t.to_ascii_lowercase())
        } else {
            Color::named(t)
        };
        parsed.ok_or_else(|| ConfigError::Color(s.to_string()))
    }
}

impl TryFrom<String> for Color {
    type Error = ConfigError;
    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Color> for String {
    fn from(c: Color) -> String {
        c.to_hex()
    }
}

impl Display for Color {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// One coloring rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "lowercase")]
pub enum ColorRule {
    /// Any of `symbols`, at every column.
    Symbols { symbols: String, color: Color },
    /// Every letter at the listed alignment columns (zero based).
    Columns { columns: Vec<usize>, color: Color },
    /// Letters that agree with a reference sequence at their column.
    Reference { reference: String, color: Color },
}

impl ColorRule {
    pub fn symbols(symbols: &str, color: Color) -> Self {
        Self::Symbols {
            symbols: symbols.to_ascii_uppercase(),
            color,
        }
    }

    /// The color this rule assigns to `letter` at `column`, if it applies.
    pub fn apply(&self, letter: char, column: usize) -> Option<Color> {
        let letter = letter.to_ascii_uppercase();
        let hit = match self {
            Self::Symbols { symbols, .. } => {
                symbols.chars().any(|s| s.to_ascii_uppercase() == letter)
            }
            Self::Columns { columns, .. } => columns.contains(&column),
            Self::Reference { reference, .. } => reference
                .as_bytes()
                .get(column)
                .map(|&r| (r as char).to_ascii_uppercase() == letter)
                .unwrap_or(false),
        };
        hit.then(|| self.color())
    }

    pub fn color(&self) -> Color {
        match self {
            Self::Symbols { color, .. }
            | Self::Columns { color, .. }
            | Self::Reference { color, .. } => *color,
        }
    }
}

/// `COLOR:SYMBOLS`, e.g. `red:AG` or `#00ff00:C`.
impl FromStr for ColorRule {
    type Err = ConfigError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (color, symbols) = s
            .rsplit_once(':')
            .ok_or_else(|| ConfigError::option("color", format!("expected COLOR:SYMBOLS, got {:?}", s)))?;
        if symbols.is_empty() {
            return Err(ConfigError::option("color", format!("no symbols in {:?}", s)));
        }
        Ok(ColorRule::symbols(symbols, color.parse()?))
    }
}

fn default_color() -> Color {
    Color::BLACK
}

/// An ordered list of rules plus a fallback color.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorScheme {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub rules: Vec<ColorRule>,
    #[serde(default = "default_color")]
    pub default: Color,
}

impl ColorScheme {
    pub fn new(name: &str, description: &str, rules: Vec<ColorRule>) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            rules,
            default: Color::BLACK,
        }
    }

    /// The color of `letter` at `column`. Never fails: unmatched letters get
    /// the default color.
    pub fn color_of(&self, letter: char, column: usize) -> Color {
        self.rules
            .iter()
            .find_map(|rule| rule.apply(letter, column))
            .unwrap_or(self.default)
    }
}

// --- Registry ----------------------------------------------------------------

fn symbols(rules: &[(&str, &str)]) -> Vec<ColorRule> {
    rules
        .iter()
        .map(|&(letters, color)| {
            let color = color
                .parse()
                .unwrap_or_else(|_| unreachable!("built-in color {} is valid", color));
            ColorRule::symbols(letters, color)
        })
        .collect()
}

fn builtin_schemes() -> Vec<ColorScheme> {
    vec![
        ColorScheme::new("monochrome", "All black", Vec::new()),
        ColorScheme::new(
            "classic",
            "Classic nucleotide colors",
            symbols(&[("G", "orange"), ("TU", "red"), ("C", "blue"), ("A", "green")]),
        ),
        ColorScheme::new(
            "base pairing",
            "Watson-Crick pairs",
            symbols(&[("TAU", "darkorange"), ("GC", "blue")]),
        ),
        ColorScheme::new(
            "hydrophobicity",
            "Hydrophilic blue, neutral green, hydrophobic black",
            symbols(&[("RKDENQ", "blue"), ("SGHTAP", "green"), ("YVMCLFIW", "black")]),
        ),
        ColorScheme::new(
            "chemistry",
            "Amino acid chemistry",
            symbols(&[
                ("GSTYC", "green"),
                ("NQ", "purple"),
                ("KRH", "blue"),
                ("DE", "red"),
                ("PAWFLIMV", "black"),
            ]),
        ),
        ColorScheme::new(
            "charge",
            "Positive blue, negative red",
            symbols(&[("KRH", "blue"), ("DE", "red")]),
        ),
        ColorScheme::new(
            "taylor",
            "W. R. Taylor, Protein Engineering 10, 743-746 (1997)",
            symbols(&[
                ("A", "#CCFF00"),
                ("C", "#FFFF00"),
                ("D", "#FF0000"),
                ("E", "#FF0066"),
                ("F", "#00FF66"),
                ("G", "#FF9900"),
                ("H", "#0066FF"),
                ("I", "#66FF00"),
                ("K", "#6600FF"),
                ("L", "#33FF00"),
                ("M", "#00FF00"),
                ("N", "#CC00FF"),
                ("P", "#FFCC00"),
                ("Q", "#FF00CC"),
                ("R", "#0000FF"),
                ("S", "#FF3300"),
                ("T", "#FF6600"),
                ("V", "#99FF00"),
                ("W", "#00CCFF"),
                ("Y", "#00FFCC"),
            ]),
        ),
    ]
}

fn normalize(name: &str) -> String {
    name.trim()
        .to_ascii_lowercase()
        .replace(['_', '-'], " ")
}

/// Immutable registry of named color schemes.
#[derive(Debug, Clone)]
pub struct ColorSchemes {
    schemes: BTreeMap<String, ColorScheme>,
}

impl ColorSchemes {
    /// A registry holding the built-in schemes.
    pub fn builtin() -> Self {
        let schemes = builtin_schemes()
            .into_iter()
            .map(|s| (s.name.clone(), s))
            .collect();
        Self { schemes }
    }

    /// The process-wide built-in registry.
    pub fn global() -> &'static ColorSchemes {
        static GLOBAL: OnceLock<ColorSchemes> = OnceLock::new();
        GLOBAL.get_or_init(ColorSchemes::builtin)
    }

    /// Look up a scheme. `base_pairing`, `Base-Pairing` and `base pairing`
    /// name the same scheme.
    pub fn get(&self, name: &str) -> Result<&ColorScheme, ConfigError> {
        self.schemes
            .get(&normalize(name))
            .ok_or_else(|| ConfigError::UnknownScheme(name.to_string()))
    }

    /// The default scheme for an alphabet kind.
    pub fn auto(&self, kind: AlphabetKind) -> &ColorScheme {
        let name = match kind {
            AlphabetKind::Dna | AlphabetKind::Rna => "base pairing",
            AlphabetKind::Protein => "hydrophobicity",
            AlphabetKind::Custom => "monochrome",
        };
        &self.schemes[name]
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.schemes.keys().map(String::as_str)
    }
}

/// How the options pick a color scheme.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColorSelection {
    /// A registry name, or `auto`.
    Named(String),
    Custom(ColorScheme),
}

impl Default for ColorSelection {
    fn default() -> Self {
        Self::Named("auto".to_string())
    }
}

impl ColorSelection {
    pub fn resolve(
        &self,
        registry: &ColorSchemes,
        kind: AlphabetKind,
    ) -> Result<ColorScheme, ConfigError> {
        match self {
            Self::Named(name) if normalize(name) == "auto" => Ok(registry.auto(kind).clone()),
            Self::Named(name) => registry.get(name).cloned(),
            Self::Custom(scheme) => Ok(scheme.clone()),
        }
    }
}
