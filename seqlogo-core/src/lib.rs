//! seqlogo core library
//!
//! Alphabets, alignment counts, background compositions, the information
//! model, color schemes, the layout engine and the backend-neutral drawing
//! primitive stream.
//!
//! ```
//! use seqlogo_core::{draw, Alignment, Alphabet, LogoOptions};
//!
//! let alignment = Alignment::new(["TATAAT", "TATAAT", "TACAAT", "GATACT"], Alphabet::dna())?;
//! let drawing = draw(&alignment, &LogoOptions::default())?;
//! assert!(drawing.glyphs().count() > 0);
//! # Ok::<(), seqlogo_core::LogoError>(())
//! ```

pub mod alphabet;
pub mod alignment;
pub mod composition;
pub mod information;
pub mod color;
pub mod glyph;
pub mod layout;
pub mod emit;
pub mod error;

// Re-export commonly used types and functions
pub use alphabet::{Alphabet, AlphabetKind, AlphabetSelection, Resolution};
pub use alignment::{Alignment, ColumnCounts, CountMatrix, SymbolPolicy};
pub use composition::Composition;
pub use information::{
    Correction, InformationModel, InformationRecord, InformationTable, StackOrder, Units,
    CORRECTION_CROSSOVER,
};
pub use color::{Color, ColorRule, ColorScheme, ColorSchemes, ColorSelection};
pub use layout::{layout, Canvas, LogoGeometry, LogoOptions, Size};
pub use emit::{emit, Anchor, Drawing, Primitive};
pub use error::{AlignmentError, AlphabetError, ConfigError, LogoError};

/// Version information for the seqlogo core library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Count, model, lay out and emit one logo with the built-in color schemes.
pub fn draw(alignment: &Alignment, options: &LogoOptions) -> Result<Drawing, LogoError> {
    let counts = alignment.counts()?;
    draw_counts(&counts, options)
}

/// [`draw`] for a count matrix built elsewhere.
pub fn draw_counts(counts: &CountMatrix, options: &LogoOptions) -> Result<Drawing, LogoError> {
    let model = InformationModel::with_composition(
        counts,
        options.units,
        options.correction,
        &options.composition,
    )?;
    let geometry = layout(&model, options, ColorSchemes::global())?;
    Ok(emit(&geometry))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_shared_types_are_send_sync() {
        assert_send_sync::<Alphabet>();
        assert_send_sync::<Alignment>();
        assert_send_sync::<CountMatrix>();
        assert_send_sync::<InformationModel>();
        assert_send_sync::<ColorSchemes>();
        assert_send_sync::<LogoOptions>();
        assert_send_sync::<LogoGeometry>();
        assert_send_sync::<Drawing>();
    }

    #[test]
    fn test_errors_abort_before_drawing() {
        let alignment = Alignment::new(["AC", "AC"], Alphabet::dna()).unwrap();
        let options = LogoOptions {
            yaxis_range: Some((0.0, 0.1)),
            ..Default::default()
        };
        let err = draw(&alignment, &options).unwrap_err();
        assert!(matches!(err, LogoError::Config(ConfigError::InvalidRange { .. })));
        assert!(!err.is_input_error());
    }
}
