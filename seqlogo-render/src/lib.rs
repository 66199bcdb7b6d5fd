/*!
# seqlogo Format Backends

Turns a [`Drawing`] into output bytes. Every backend consumes the same
primitive stream and is deterministic: the same drawing always yields the
same bytes.

| format | backend           | notes                                  |
|--------|-------------------|----------------------------------------|
| SVG    | [`SvgBackend`]    | glyphs as filled paths, native text    |
| EPS    | [`EpsBackend`]    | y axis flipped, Helvetica text         |
| PNG    | [`PngBackend`]    | CPU rasterisation via `image`          |
| JSON   | [`JsonBackend`]   | the primitive stream itself            |
*/

use std::fmt::{self, Display, Formatter};
use std::path::Path;
use std::str::FromStr;

use anyhow::{bail, Context, Result};
use seqlogo_core::Drawing;

pub mod eps;
pub mod json;
#[cfg(feature = "png")]
pub mod png;
pub mod svg;

pub use eps::EpsBackend;
pub use json::JsonBackend;
#[cfg(feature = "png")]
pub use png::PngBackend;
pub use svg::SvgBackend;

/// Something that can encode a drawing.
pub trait Backend: Send + Sync {
    fn render(&self, drawing: &Drawing) -> Result<Vec<u8>>;
}

/// Export configuration shared by the backends
#[derive(Debug, Clone, PartialEq)]
pub struct ExportConfig {
    /// Raster resolution in pixels per inch
    pub resolution: f64,
    pub font_family: String,
    /// Free-form comment embedded in formats that allow one
    pub provenance_comment: Option<String>,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            resolution: 96.0,
            font_family: "Arial, Helvetica, sans-serif".to_string(),
            provenance_comment: None,
        }
    }
}

/// Output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    Svg,
    Eps,
    Png,
    Json,
}

impl Format {
    pub const ALL: [Format; 4] = [Format::Svg, Format::Eps, Format::Png, Format::Json];

    /// Guess the format from a file extension.
    pub fn from_extension<P: AsRef<Path>>(path: P) -> Option<Format> {
        let ext = path.as_ref().extension()?.to_str()?;
        ext.parse().ok()
    }

    pub fn extension(self) -> &'static str {
        match self {
            Format::Svg => "svg",
            Format::Eps => "eps",
            Format::Png => "png",
            Format::Json => "json",
        }
    }

    /// The backend for this format.
    pub fn backend(self, config: &ExportConfig) -> Result<Box<dyn Backend>> {
        Ok(match self {
            Format::Svg => Box::new(SvgBackend::new(config)),
            Format::Eps => Box::new(EpsBackend::new(config)),
            #[cfg(feature = "png")]
            Format::Png => Box::new(PngBackend::new(config.resolution)?),
            #[cfg(not(feature = "png"))]
            Format::Png => bail!("PNG output needs the `png` feature"),
            Format::Json => Box::new(JsonBackend),
        })
    }
}

impl FromStr for Format {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> Result<Self> {
        Ok(match s.to_ascii_lowercase().as_str() {
            "svg" => Format::Svg,
            "eps" | "ps" => Format::Eps,
            "png" => Format::Png,
            "json" => Format::Json,
            other => bail!("unknown output format: {}", other),
        })
    }
}

impl Display for Format {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Render `drawing` as `format` into `path`.
pub fn export<P: AsRef<Path>>(
    drawing: &Drawing,
    format: Format,
    config: &ExportConfig,
    path: P,
) -> Result<()> {
    let path = path.as_ref();
    let bytes = format
        .backend(config)?
        .render(drawing)
        .with_context(|| format!("failed to render {} output", format))?;
    std::fs::write(path, &bytes).with_context(|| format!("failed to write {}", path.display()))?;
    log::info!("wrote {} ({} bytes)", path.display(), bytes.len());
    Ok(())
}
