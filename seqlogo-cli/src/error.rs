//! Error handling for the seqlogo CLI

use std::path::PathBuf;

use seqlogo_core::LogoError;
use thiserror::Error;

/// Main error type for seqlogo CLI operations
#[derive(Error, Debug)]
pub enum CliError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Input/Output error: {message}")]
    Io { message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("Parsing error in {file}: {message}")]
    Parse { file: String, message: String },

    #[error("Invalid input in {file}: {source}")]
    Input {
        file: String,
        #[source]
        source: LogoError,
    },

    #[error("Invalid option: {source}")]
    Options {
        #[source]
        source: LogoError,
    },
}

impl CliError {
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn io<S: Into<String>>(message: S) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    pub fn file_not_found(path: PathBuf) -> Self {
        Self::FileNotFound { path }
    }

    pub fn parse<F: Into<String>, M: Into<String>>(file: F, message: M) -> Self {
        Self::Parse {
            file: file.into(),
            message: message.into(),
        }
    }

    /// Sort a core error into bad input data or bad options.
    pub fn logo<S: Into<String>>(file: S, source: LogoError) -> Self {
        if source.is_input_error() {
            Self::Input {
                file: file.into(),
                source,
            }
        } else {
            Self::Options { source }
        }
    }

    /// Process exit code: 2 for unusable input data, 1 otherwise.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::FileNotFound { .. } | Self::Parse { .. } | Self::Input { .. } => 2,
            _ => 1,
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        Self::io(err.to_string())
    }
}

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;

/// Provide helpful error messages and suggestions
pub fn format_error_with_suggestions(error: &CliError) -> String {
    let mut message = error.to_string();

    match error {
        CliError::FileNotFound { path } => {
            message.push_str(&format!(
                "\n\nSuggestions:\n\
                 • Check that the file path is correct: {}\n\
                 • Use '-' to read the alignment from standard input",
                path.display()
            ));
        }

        CliError::Parse { .. } => {
            message.push_str(
                "\n\nSuggestions:\n\
                 • Input must be aligned FASTA or one sequence per line\n\
                 • Use --input-format to choose the reader explicitly",
            );
        }

        CliError::Input { .. } => {
            message.push_str(
                "\n\nSuggestions:\n\
                 • All sequences must have the same length\n\
                 • Use --sequence-type to pick the alphabet explicitly\n\
                 • Use --tolerant to count unexpected symbols instead of failing",
            );
        }

        CliError::Config { .. } | CliError::Options { .. } => {
            message.push_str(
                "\n\nSuggestions:\n\
                 • Check your seqlogo.toml configuration file\n\
                 • Use 'seqlogo config --example' to generate a sample configuration",
            );
        }

        _ => {}
    }

    message
}

/// Print error with helpful suggestions and exit
pub fn print_error_and_exit(error: &CliError) -> ! {
    eprintln!("Error: {}", format_error_with_suggestions(error));
    std::process::exit(error.exit_code());
}
