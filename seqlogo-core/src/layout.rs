/*!
# Logo Layout Engine

Resolves [`LogoOptions`] against an [`InformationModel`] into a
[`LogoGeometry`]: every stack, glyph box, axis tick and label in points,
origin top left, y down.

All option errors are raised here, before any geometry is returned.

```text
+------------------------------------------------+
| margin        title                            |
|      +--------------------------------------+  |
| tick |  stacks of line 0                    |  |
|      +--------------------------------------+  |
|        numbers                                 |
|      +--------------------------------------+  |
| tick |  stacks of line 1                    |  |
|      +--------------------------------------+  |
|               x label              fineprint   |
+------------------------------------------------+
```
*/

use std::borrow::Cow;
use std::fmt::{self, Display, Formatter};
use std::ops::Range;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::alphabet::{AlphabetKind, AlphabetSelection};
use crate::color::{ColorScheme, ColorSchemes, ColorSelection};
use crate::composition::Composition;
use crate::error::ConfigError;
use crate::glyph::text_width;
use crate::information::{Correction, InformationModel, StackOrder, Units};

/// Space around the whole logo.
pub const LOGO_MARGIN: f64 = 2.0;
/// Horizontal space on each side of a glyph within its stack.
pub const STACK_MARGIN: f64 = 0.5;
/// Plot margin used where no axis claims the space.
pub const PLAIN_MARGIN: f64 = 4.0;

// --- Size presets ------------------------------------------------------------

/// Concrete dimensions behind a size preset, in points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dimensions {
    pub stack_width: f64,
    pub canvas_width: f64,
    pub font_size: f64,
}

/// Size preset of a logo.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Size {
    Small,
    #[default]
    Medium,
    Large,
    Explicit {
        stack_width: f64,
        canvas_width: f64,
        font_size: f64,
    },
}

impl Size {
    pub fn dimensions(&self) -> Result<Dimensions, ConfigError> {
        let dims = match *self {
            Size::Small => Dimensions {
                stack_width: 5.4,
                canvas_width: 464.0,
                font_size: 8.0,
            },
            Size::Medium => Dimensions {
                stack_width: 10.8,
                canvas_width: 470.0,
                font_size: 10.0,
            },
            Size::Large => Dimensions {
                stack_width: 16.2,
                canvas_width: 692.0,
                font_size: 12.0,
            },
            Size::Explicit {
                stack_width,
                canvas_width,
                font_size,
            } => {
                for (name, v) in [
                    ("stack_width", stack_width),
                    ("canvas_width", canvas_width),
                    ("font_size", font_size),
                ] {
                    if !(v.is_finite() && v > 0.0) {
                        return Err(ConfigError::option(
                            "size",
                            format!("{} must be a positive number, got {}", name, v),
                        ));
                    }
                }
                Dimensions {
                    stack_width,
                    canvas_width,
                    font_size,
                }
            }
        };
        Ok(dims)
    }
}

impl FromStr for Size {
    type Err = ConfigError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "small" => Ok(Size::Small),
            "medium" => Ok(Size::Medium),
            "large" => Ok(Size::Large),
            _ => Err(ConfigError::option(
                "size",
                format!("expected small, medium or large, got {:?}", s),
            )),
        }
    }
}

// --- Options -----------------------------------------------------------------

/// User-tunable display options. Immutable once handed to [`layout`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogoOptions {
    /// Title above the logo; empty for none
    #[serde(default)]
    pub title: String,

    /// Small print in the lower right corner
    #[serde(default = "default_fineprint")]
    pub fineprint: String,

    #[serde(default = "default_true")]
    pub show_fineprint: bool,

    /// Index of the first column; may be negative
    #[serde(default = "default_first_index")]
    pub first_index: i64,

    /// Inclusive `(start, end)` subrange to draw, in index units
    #[serde(default)]
    pub logo_range: Option<(i64, i64)>,

    /// Stacks per line; defaults to what the size preset fits
    #[serde(default)]
    pub stacks_per_line: Option<usize>,

    #[serde(default = "default_true")]
    pub show_xaxis: bool,

    #[serde(default = "default_true")]
    pub show_yaxis: bool,

    #[serde(default)]
    pub xlabel: String,

    /// Defaults to the unit name
    #[serde(default)]
    pub ylabel: Option<String>,

    #[serde(default)]
    pub units: Units,

    #[serde(default)]
    pub correction: Correction,

    /// Background the information is measured against
    #[serde(default)]
    pub composition: Composition,

    /// Explicit `(min, max)` of the y axis
    #[serde(default)]
    pub yaxis_range: Option<(f64, f64)>,

    /// Distance between y-axis ticks, in units
    #[serde(default)]
    pub yaxis_tic_interval: Option<f64>,

    /// Label every n-th stack
    #[serde(default = "default_number_interval")]
    pub number_interval: usize,

    #[serde(default)]
    pub size: Size,

    /// Stack height over stack width
    #[serde(default = "default_aspect_ratio")]
    pub stack_aspect_ratio: f64,

    /// Narrow the glyphs of columns with many gaps
    #[serde(default = "default_true")]
    pub scale_width: bool,

    #[serde(default)]
    pub stack_order: StackOrder,

    /// Label the ends of each line, 5' and 3' or N and C
    #[serde(default)]
    pub show_ends: bool,

    /// Outline every glyph box
    #[serde(default)]
    pub show_boxes: bool,

    /// Set x-axis numbers vertically
    #[serde(default = "default_true")]
    pub rotate_numbers: bool,

    #[serde(default)]
    pub color_scheme: ColorSelection,

    #[serde(default)]
    pub alphabet: AlphabetSelection,
}

fn default_fineprint() -> String {
    format!("seqlogo {}", crate::VERSION)
}
fn default_true() -> bool {
    true
}
fn default_first_index() -> i64 {
    1
}
fn default_number_interval() -> usize {
    1
}
fn default_aspect_ratio() -> f64 {
    5.0
}

impl Default for LogoOptions {
    fn default() -> Self {
        Self {
            title: String::new(),
            fineprint: default_fineprint(),
            show_fineprint: true,
            first_index: default_first_index(),
            logo_range: None,
            stacks_per_line: None,
            show_xaxis: true,
            show_yaxis: true,
            xlabel: String::new(),
            ylabel: None,
            units: Units::default(),
            correction: Correction::default(),
            composition: Composition::default(),
            yaxis_range: None,
            yaxis_tic_interval: None,
            number_interval: default_number_interval(),
            size: Size::default(),
            stack_aspect_ratio: default_aspect_ratio(),
            scale_width: true,
            stack_order: StackOrder::default(),
            show_ends: false,
            show_boxes: false,
            rotate_numbers: true,
            color_scheme: ColorSelection::default(),
            alphabet: AlphabetSelection::default(),
        }
    }
}

impl LogoOptions {
    /// Columns drawn for a model of `columns` columns.
    pub fn column_range(&self, columns: usize) -> Result<Range<usize>, ConfigError> {
        let last = i64::try_from(columns)
            .ok()
            .and_then(|n| self.first_index.checked_add(n - 1))
            .ok_or_else(|| {
                ConfigError::option(
                    "first_index",
                    format!("{} columns from {} overflow the index range", columns, self.first_index),
                )
            })?;
        let Some((start, end)) = self.logo_range else {
            return Ok(0..columns);
        };
        if start > end || start < self.first_index || end > last {
            return Err(ConfigError::option(
                "logo_range",
                format!(
                    "({}, {}) is not within the columns {}..={}",
                    start, end, self.first_index, last
                ),
            ));
        }
        let lo = (start - self.first_index) as usize;
        let hi = (end - self.first_index) as usize + 1;
        Ok(lo..hi)
    }

    /// Stacks that fit on one line, given the axis and end-label settings.
    pub fn capacity(&self) -> Result<usize, ConfigError> {
        let dims = self.size.dimensions()?;
        Ok(capacity(&dims, &self.margins()))
    }

    fn margins(&self) -> Margins {
        Margins {
            show_yaxis: self.show_yaxis,
            ends: self.show_ends && self.show_xaxis,
        }
    }
}

/// Labels at the start and end of a line for an alphabet kind.
pub fn end_labels(kind: AlphabetKind) -> Option<(&'static str, &'static str)> {
    match kind {
        AlphabetKind::Dna | AlphabetKind::Rna => Some(("5'", "3'")),
        AlphabetKind::Protein => Some(("N", "C")),
        AlphabetKind::Custom => None,
    }
}

#[derive(Debug, Clone, Copy)]
struct Margins {
    show_yaxis: bool,
    /// Room reserved for end labels.
    ends: bool,
}

fn left_margin(dims: &Dimensions, margins: &Margins) -> f64 {
    if margins.show_yaxis {
        3.0 * dims.font_size
    } else if margins.ends {
        1.5 * dims.font_size
    } else {
        PLAIN_MARGIN
    }
}

fn right_margin(dims: &Dimensions, margins: &Margins) -> f64 {
    if margins.ends {
        1.5 * dims.font_size
    } else {
        PLAIN_MARGIN
    }
}

fn capacity(dims: &Dimensions, margins: &Margins) -> usize {
    let room = dims.canvas_width
        - 2.0 * LOGO_MARGIN
        - left_margin(dims, margins)
        - right_margin(dims, margins);
    if room <= 0.0 {
        return 0;
    }
    (room / dims.stack_width + 1e-9).floor() as usize
}

// --- Axis helpers --------------------------------------------------------------

/// Smallest 1, 2 or 5 x 10^k that is at least `x`.
fn nice_step(x: f64) -> f64 {
    if !(x > 0.0) || !x.is_finite() {
        return 1.0;
    }
    let base = 10f64.powf(x.log10().floor());
    let mant = x / base;
    let nice = if mant <= 1.0 + 1e-9 {
        1.0
    } else if mant <= 2.0 + 1e-9 {
        2.0
    } else if mant <= 5.0 + 1e-9 {
        5.0
    } else {
        10.0
    };
    nice * base
}

/// `x` rounded up to a multiple of a nice step.
fn nice_ceiling(x: f64) -> f64 {
    let step = nice_step(x / 5.0);
    (x / step - 1e-9).ceil() * step
}

/// Fewest decimals that print `step` exactly.
fn decimals(step: f64) -> usize {
    (0..=6)
        .find(|&d| {
            let s = step * 10f64.powi(d as i32);
            (s - s.round()).abs() < 1e-6 * s.abs().max(1.0)
        })
        .unwrap_or(6)
}

/// Tick values at multiples of `step` within `[min, max]`.
fn tick_values(min: f64, max: f64, step: f64) -> Vec<f64> {
    let first = (min / step - 1e-9).ceil() as i64;
    let last = (max / step + 1e-9).floor() as i64;
    (first..=last).map(|k| k as f64 * step).collect()
}

// --- Geometry ------------------------------------------------------------------

/// Canvas size, in points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Canvas {
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn center_x(&self) -> f64 {
        self.x + self.width / 2.0
    }
}

/// A placed piece of text; `y` is the baseline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextLabel {
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub size: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TickMark {
    pub value: f64,
    pub y: f64,
    pub label: String,
}

/// One glyph box.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SegmentGeometry {
    pub letter: char,
    pub column: usize,
    pub bounds: Rect,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StackGeometry {
    /// Column in the alignment.
    pub column: usize,
    /// Displayed index, `first_index + column`.
    pub index: i64,
    /// The full slot of the stack, plot height.
    pub slot: Rect,
    /// The x-axis number under this stack, if any.
    pub label: Option<String>,
    /// Glyph boxes, bottom to top.
    pub segments: Vec<SegmentGeometry>,
}

/// One wrapped line with its own axes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineGeometry {
    pub plot: Rect,
    /// y coordinate of the value zero.
    pub baseline: f64,
    pub ticks: Vec<TickMark>,
    pub stacks: Vec<StackGeometry>,
    /// Start and end labels; the start label ends at its `x`, the end
    /// label begins at its `x`.
    pub ends: Option<(TextLabel, TextLabel)>,
}

/// Fully resolved logo layout, in points.
#[derive(Debug, Clone, PartialEq)]
pub struct LogoGeometry {
    pub canvas: Canvas,
    pub units: Units,
    pub stack_width: f64,
    pub stack_height: f64,
    pub stacks_per_line: usize,
    pub font_size: f64,
    pub number_font_size: f64,
    pub y_range: (f64, f64),
    pub show_xaxis: bool,
    pub show_yaxis: bool,
    pub show_boxes: bool,
    pub rotate_numbers: bool,
    pub lines: Vec<LineGeometry>,
    pub title: Option<TextLabel>,
    pub xlabel: Option<TextLabel>,
    pub fineprint: Option<TextLabel>,
    /// Rotated label left of each line's y axis; `y` is unused.
    pub ylabel: Option<TextLabel>,
    pub color_scheme: ColorScheme,
}

impl LogoGeometry {
    /// Number of stacks on each line.
    pub fn line_lengths(&self) -> Vec<usize> {
        self.lines.iter().map(|l| l.stacks.len()).collect()
    }
}

fn non_empty(s: &str) -> Option<&str> {
    let t = s.trim();
    (!t.is_empty()).then_some(t)
}

/// Resolve `options` against `model`.
pub fn layout(
    model: &InformationModel,
    options: &LogoOptions,
    schemes: &ColorSchemes,
) -> Result<LogoGeometry, ConfigError> {
    let model = if model.units() == options.units {
        Cow::Borrowed(model)
    } else {
        Cow::Owned(model.with_units(options.units))
    };

    let dims = options.size.dimensions()?;
    if !(options.stack_aspect_ratio.is_finite() && options.stack_aspect_ratio > 0.0) {
        return Err(ConfigError::option(
            "stack_aspect_ratio",
            format!("must be a positive number, got {}", options.stack_aspect_ratio),
        ));
    }
    if options.number_interval == 0 {
        return Err(ConfigError::option("number_interval", "must be at least 1"));
    }
    let range = options.column_range(model.len())?;

    let margins = options.margins();
    let capacity = capacity(&dims, &margins);
    if capacity == 0 {
        return Err(ConfigError::option(
            "size",
            "the canvas is too narrow for a single stack",
        ));
    }
    let stacks_per_line = match options.stacks_per_line {
        None => capacity,
        Some(0) => return Err(ConfigError::option("stacks_per_line", "must be at least 1")),
        Some(n) if n > capacity => {
            return Err(ConfigError::SizeConflict {
                stacks_per_line: n,
                capacity,
            })
        }
        Some(n) => n,
    };

    // --- y axis
    let (tallest_column, tallest) = model.tallest(range.clone()).unwrap_or((range.start, 0.0));
    let unit_max = model.max_height();
    let (ymin, ymax) = match options.yaxis_range {
        Some((min, max)) => {
            let valid = min.is_finite() && max.is_finite() && min < max && min <= 0.0;
            if !valid || max < tallest {
                return Err(ConfigError::InvalidRange {
                    min,
                    max,
                    required: tallest,
                    column: options.first_index + tallest_column as i64,
                });
            }
            (min, max)
        }
        None if tallest <= 0.0 => (0.0, unit_max),
        None => (0.0, nice_ceiling(tallest * 1.05).min(unit_max).max(tallest)),
    };
    let span = ymax - ymin;
    let tick_step = match options.yaxis_tic_interval {
        Some(step) if !(step.is_finite() && step > 0.0) => {
            return Err(ConfigError::option(
                "yaxis_tic_interval",
                format!("must be a positive number, got {}", step),
            ))
        }
        Some(step) if span / step > 1000.0 => {
            return Err(ConfigError::option(
                "yaxis_tic_interval",
                format!("{} is too fine for a range of {}", step, span),
            ))
        }
        Some(step) => step,
        None => nice_step(span / 3.0),
    };
    let tick_decimals = decimals(tick_step).max(decimals(ymin));
    let tick_values = tick_values(ymin, ymax, tick_step);

    let color_scheme = options
        .color_scheme
        .resolve(schemes, model.alphabet().kind())?;

    // --- fonts and margins
    let font_size = dims.font_size;
    let title_font_size = font_size + 2.0;
    let number_font_size = font_size * 0.8;
    let fineprint_font_size = font_size * 0.6;

    let stack_width = dims.stack_width;
    let stack_height = stack_width * options.stack_aspect_ratio;
    let left = left_margin(&dims, &margins);

    let label_of = |column: usize| -> Option<String> {
        let index = options.first_index + column as i64;
        (options.show_xaxis && index.rem_euclid(options.number_interval as i64) == 0)
            .then(|| index.to_string())
    };
    let ends = end_labels(model.alphabet().kind()).filter(|_| margins.ends);
    let bottom = if !options.show_xaxis {
        PLAIN_MARGIN
    } else if options.rotate_numbers {
        let longest = range
            .clone()
            .filter_map(label_of)
            .map(|l| text_width(&l, number_font_size))
            .fold(0.0, f64::max);
        longest + number_font_size * 0.5 + 2.0
    } else {
        number_font_size * 1.5 + 2.0
    };
    let bottom = if ends.is_some() {
        bottom.max(font_size + PLAIN_MARGIN)
    } else {
        bottom
    };
    let line_height = PLAIN_MARGIN + stack_height + bottom;

    let title = non_empty(&options.title);
    let xlabel = non_empty(&options.xlabel);
    let fineprint = non_empty(&options.fineprint).filter(|_| options.show_fineprint);
    let title_h = title.map_or(0.0, |_| title_font_size * 1.5);
    let xlabel_h = xlabel.map_or(0.0, |_| font_size * 1.5);
    let fineprint_h = fineprint.map_or(0.0, |_| fineprint_font_size * 1.5);

    let columns: Vec<usize> = range.clone().collect();
    let n_lines = columns.len().div_ceil(stacks_per_line);
    let lines_top = LOGO_MARGIN + title_h;
    let lines_bottom = lines_top + n_lines as f64 * line_height;
    let canvas = Canvas {
        width: dims.canvas_width,
        height: lines_bottom + xlabel_h + fineprint_h + LOGO_MARGIN,
    };

    // --- lines
    let scale = stack_height / span;
    let char_width = if stack_width > 2.0 * STACK_MARGIN {
        stack_width - 2.0 * STACK_MARGIN
    } else {
        stack_width
    };
    let mut lines = Vec::with_capacity(n_lines);
    for (i, chunk) in columns.chunks(stacks_per_line).enumerate() {
        let plot = Rect {
            x: LOGO_MARGIN + left,
            y: lines_top + i as f64 * line_height + PLAIN_MARGIN,
            width: chunk.len() as f64 * stack_width,
            height: stack_height,
        };
        let baseline = plot.y + ymax * scale;
        let ticks = tick_values
            .iter()
            .map(|&value| TickMark {
                value,
                y: baseline - value * scale,
                label: format!("{:.*}", tick_decimals, value),
            })
            .collect();

        let stacks = chunk
            .iter()
            .enumerate()
            .map(|(k, &column)| {
                let record = model.record(column);
                let slot = Rect {
                    x: plot.x + k as f64 * stack_width,
                    y: plot.y,
                    width: stack_width,
                    height: stack_height,
                };
                let width = if options.scale_width {
                    char_width * record.weight.max(0.25)
                } else {
                    char_width
                };
                let x = slot.center_x() - width / 2.0;
                let mut y = baseline;
                let segments = record
                    .stack(options.stack_order)
                    .into_iter()
                    .map(|segment| {
                        let height = segment.height * scale;
                        y -= height;
                        SegmentGeometry {
                            letter: model.alphabet().letter(segment.letter),
                            column,
                            bounds: Rect {
                                x,
                                y,
                                width,
                                height,
                            },
                        }
                    })
                    .collect();
                StackGeometry {
                    column,
                    index: options.first_index + column as i64,
                    slot,
                    label: label_of(column),
                    segments,
                }
            })
            .collect();

        let line_ends = ends.map(|(start, end)| {
            let y = plot.bottom() + font_size;
            (
                TextLabel {
                    text: start.to_string(),
                    x: plot.x - 2.0,
                    y,
                    size: font_size,
                },
                TextLabel {
                    text: end.to_string(),
                    x: plot.right() + 2.0,
                    y,
                    size: font_size,
                },
            )
        });

        lines.push(LineGeometry {
            plot,
            baseline,
            ticks,
            stacks,
            ends: line_ends,
        });
    }

    let full_width = stacks_per_line.min(columns.len()) as f64 * stack_width;
    let geometry = LogoGeometry {
        canvas,
        units: options.units,
        stack_width,
        stack_height,
        stacks_per_line,
        font_size,
        number_font_size,
        y_range: (ymin, ymax),
        show_xaxis: options.show_xaxis,
        show_yaxis: options.show_yaxis,
        show_boxes: options.show_boxes,
        rotate_numbers: options.rotate_numbers,
        title: title.map(|t| TextLabel {
            text: t.to_string(),
            x: canvas.width / 2.0,
            y: LOGO_MARGIN + title_font_size,
            size: title_font_size,
        }),
        xlabel: xlabel.map(|t| TextLabel {
            text: t.to_string(),
            x: LOGO_MARGIN + left + full_width / 2.0,
            y: lines_bottom + font_size,
            size: font_size,
        }),
        fineprint: fineprint.map(|t| TextLabel {
            text: t.to_string(),
            x: canvas.width - LOGO_MARGIN - PLAIN_MARGIN,
            y: canvas.height - LOGO_MARGIN - fineprint_font_size * 0.3,
            size: fineprint_font_size,
        }),
        ylabel: options
            .show_yaxis
            .then(|| {
                options
                    .ylabel
                    .clone()
                    .unwrap_or_else(|| options.units.label().to_string())
            })
            .filter(|t| !t.trim().is_empty())
            .map(|text| TextLabel {
                text,
                x: LOGO_MARGIN + font_size * 0.8,
                y: 0.0,
                size: font_size,
            }),
        lines,
        color_scheme,
    };

    log::debug!(
        "layout: {} columns on {} lines of {}, y range {:?}, canvas {}",
        columns.len(),
        geometry.lines.len(),
        stacks_per_line,
        geometry.y_range,
        geometry.canvas
    );
    Ok(geometry)
}

impl Display for Canvas {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}x{:.1}pt", self.width, self.height)
    }
}
