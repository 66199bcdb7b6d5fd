//! Error types for the logo pipeline
//!
//! Input-shape problems surface as [`AlignmentError`], option problems as
//! [`ConfigError`]. Numeric edge cases inside the information model are
//! never errors.

use thiserror::Error;

/// A symbol that the selected alphabet does not know about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("invalid symbol {0:?}")]
pub struct InvalidSymbol(pub char);

/// Errors raised while building an alphabet.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AlphabetError {
    #[error("alphabet must contain at least one letter")]
    Empty,

    #[error("alphabet letter {0:?} is not an ASCII letter or digit")]
    InvalidLetter(char),

    #[error("alphabet letter {0:?} appears more than once")]
    Duplicate(char),

    #[error("unknown alphabet name: {0}")]
    UnknownName(String),
}

/// Errors raised by the alignment model.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AlignmentError {
    #[error("alignment is empty: {rows} rows, {columns} columns")]
    Empty { rows: usize, columns: usize },

    #[error("sequence {row} has length {found}, expected {expected}")]
    Shape {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("symbol {symbol:?} in sequence {row}, column {column} is not in the alphabet")]
    Symbol {
        row: usize,
        column: usize,
        symbol: char,
    },

    #[error("invalid sequence weights: {message}")]
    Weights { message: String },

    #[error("count table row {row} has {found} entries, expected {expected}")]
    CountWidth {
        row: usize,
        expected: usize,
        found: usize,
    },
}

/// Errors raised while resolving display options.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("invalid y-axis range ({min}, {max}): column {column} needs {required:.4}")]
    InvalidRange {
        min: f64,
        max: f64,
        required: f64,
        column: i64,
    },

    #[error("{stacks_per_line} stacks per line do not fit the selected size (at most {capacity})")]
    SizeConflict {
        stacks_per_line: usize,
        capacity: usize,
    },

    #[error("invalid option `{option}`: {message}")]
    Option {
        option: &'static str,
        message: String,
    },

    #[error("invalid color: {0}")]
    Color(String),

    #[error("unknown color scheme: {0}")]
    UnknownScheme(String),

    #[error("unknown unit: {0}")]
    UnknownUnits(String),
}

impl ConfigError {
    pub fn option<S: Into<String>>(option: &'static str, message: S) -> Self {
        Self::Option {
            option,
            message: message.into(),
        }
    }
}

/// Umbrella error for a full render.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LogoError {
    #[error(transparent)]
    Alphabet(#[from] AlphabetError),

    #[error(transparent)]
    Alignment(#[from] AlignmentError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl LogoError {
    /// Whether the error comes from the input data rather than the options.
    pub fn is_input_error(&self) -> bool {
        matches!(self, Self::Alphabet(_) | Self::Alignment(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_offender() {
        let err = AlignmentError::Shape {
            row: 3,
            expected: 10,
            found: 9,
        };
        assert_eq!(err.to_string(), "sequence 3 has length 9, expected 10");

        let err = ConfigError::InvalidRange {
            min: 0.0,
            max: 1.0,
            required: 1.5,
            column: 7,
        };
        assert!(err.to_string().contains("column 7"));
    }

    #[test]
    fn test_umbrella_conversion() {
        let err: LogoError = ConfigError::option("stacks_per_line", "must be positive").into();
        assert!(!err.is_input_error());
        assert_eq!(
            err.to_string(),
            "invalid option `stacks_per_line`: must be positive"
        );

        let err: LogoError = AlignmentError::Empty { rows: 0, columns: 0 }.into();
        assert!(err.is_input_error());
    }
}
