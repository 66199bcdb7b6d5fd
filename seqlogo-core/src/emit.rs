//! Drawing primitive stream.
//!
//! [`emit`] walks a [`LogoGeometry`] and produces a [`Drawing`]: the canvas
//! size, the unit label and an ordered list of [`Primitive`]s that every
//! backend renders the same way. Coordinates are points, origin top left,
//! y down.
//!
//! Primitive order is fixed: the background, then each line's axes, ticks,
//! axis labels and end labels, then every stack left to right with its
//! glyphs bottom to top (each followed by its box outline when boxes are
//! shown), then the title, x label and fineprint.

use serde::Serialize;

use crate::color::Color;
use crate::glyph::{self, Outline, Point, ADVANCE, CAP_HEIGHT};
use crate::layout::{Canvas, LogoGeometry, TextLabel};

/// Width of axis lines and tick marks.
pub const AXIS_WIDTH: f64 = 0.5;

/// Horizontal alignment of text relative to its anchor point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Anchor {
    Start,
    Middle,
    End,
}

/// One drawing instruction.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Primitive {
    Rect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        fill: Color,
    },
    Line {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        width: f64,
        color: Color,
    },
    /// A letter outline stretched to fill its box.
    Glyph {
        symbol: char,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        color: Color,
    },
    /// Text with its baseline at `y`, rotated by `rotation` degrees
    /// (clockwise) around `(x, y)`.
    Text {
        text: String,
        x: f64,
        y: f64,
        size: f64,
        anchor: Anchor,
        rotation: f64,
        color: Color,
    },
}

impl Primitive {
    /// The filled outline of a glyph or text primitive, in canvas coordinates.
    pub fn outline(&self) -> Option<Outline> {
        match self {
            Primitive::Glyph {
                symbol,
                x,
                y,
                width,
                height,
                ..
            } => Some(glyph::outline(*symbol).map(|[u, v]| [x + u * width, y + (1.0 - v) * height])),
            Primitive::Text {
                text,
                x,
                y,
                size,
                anchor,
                rotation,
                ..
            } => {
                let total = glyph::text_width(text, *size);
                let start = match anchor {
                    Anchor::Start => 0.0,
                    Anchor::Middle => -total / 2.0,
                    Anchor::End => -total,
                };
                let (sin, cos) = rotation.to_radians().sin_cos();
                let place = |[lx, ly]: Point| [x + lx * cos - ly * sin, y + lx * sin + ly * cos];
                let polygons = text
                    .chars()
                    .enumerate()
                    .flat_map(|(i, c)| {
                        let offset = start + i as f64 * ADVANCE * size;
                        glyph::text_outline(c)
                            .map(|[u, v]| place([offset + u * size, -v * size]))
                            .polygons
                    })
                    .collect();
                Some(Outline { polygons })
            }
            _ => None,
        }
    }
}

/// A complete, backend-neutral logo drawing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Drawing {
    pub canvas: Canvas,
    /// Label of the y-axis units.
    pub units: String,
    pub primitives: Vec<Primitive>,
}

impl Drawing {
    pub fn glyphs(&self) -> impl Iterator<Item = &Primitive> {
        self.primitives
            .iter()
            .filter(|p| matches!(p, Primitive::Glyph { .. }))
    }
}

fn text(label: &TextLabel, anchor: Anchor) -> Primitive {
    Primitive::Text {
        text: label.text.clone(),
        x: label.x,
        y: label.y,
        size: label.size,
        anchor,
        rotation: 0.0,
        color: Color::BLACK,
    }
}

fn line(x1: f64, y1: f64, x2: f64, y2: f64) -> Primitive {
    Primitive::Line {
        x1,
        y1,
        x2,
        y2,
        width: AXIS_WIDTH,
        color: Color::BLACK,
    }
}

/// Walk `geometry` into a drawing.
pub fn emit(geometry: &LogoGeometry) -> Drawing {
    let mut primitives = vec![Primitive::Rect {
        x: 0.0,
        y: 0.0,
        width: geometry.canvas.width,
        height: geometry.canvas.height,
        fill: Color::WHITE,
    }];

    let tick_length = geometry.font_size * 0.3;
    let nf = geometry.number_font_size;

    for l in &geometry.lines {
        let plot = &l.plot;
        if geometry.show_yaxis {
            primitives.push(line(plot.x, plot.y, plot.x, plot.bottom()));
        }
        if geometry.show_xaxis {
            primitives.push(line(plot.x, l.baseline, plot.right(), l.baseline));
        }
        if geometry.show_yaxis {
            for tick in &l.ticks {
                primitives.push(line(plot.x - tick_length, tick.y, plot.x, tick.y));
            }
            for tick in &l.ticks {
                primitives.push(Primitive::Text {
                    text: tick.label.clone(),
                    x: plot.x - tick_length - 1.0,
                    y: tick.y + nf * 0.35,
                    size: nf,
                    anchor: Anchor::End,
                    rotation: 0.0,
                    color: Color::BLACK,
                });
            }
        }
        if geometry.show_xaxis {
            for stack in &l.stacks {
                let Some(label) = &stack.label else {
                    continue;
                };
                let (x, y, anchor, rotation) = if geometry.rotate_numbers {
                    (stack.slot.center_x() + nf * 0.35, plot.bottom() + 2.0, Anchor::End, -90.0)
                } else {
                    let y = plot.bottom() + 2.0 + nf * CAP_HEIGHT;
                    (stack.slot.center_x(), y, Anchor::Middle, 0.0)
                };
                primitives.push(Primitive::Text {
                    text: label.clone(),
                    x,
                    y,
                    size: nf,
                    anchor,
                    rotation,
                    color: Color::BLACK,
                });
            }
        }
        if let Some((start, end)) = &l.ends {
            primitives.push(text(start, Anchor::End));
            primitives.push(text(end, Anchor::Start));
        }
        if let Some(ylabel) = &geometry.ylabel {
            primitives.push(Primitive::Text {
                text: ylabel.text.clone(),
                x: ylabel.x,
                y: plot.y + plot.height / 2.0,
                size: ylabel.size,
                anchor: Anchor::Middle,
                rotation: -90.0,
                color: Color::BLACK,
            });
        }
    }

    for l in &geometry.lines {
        for stack in &l.stacks {
            for segment in &stack.segments {
                let b = &segment.bounds;
                primitives.push(Primitive::Glyph {
                    symbol: segment.letter,
                    x: b.x,
                    y: b.y,
                    width: b.width,
                    height: b.height,
                    color: geometry.color_scheme.color_of(segment.letter, segment.column),
                });
                if geometry.show_boxes {
                    primitives.push(line(b.x, b.y, b.right(), b.y));
                    primitives.push(line(b.right(), b.y, b.right(), b.bottom()));
                    primitives.push(line(b.right(), b.bottom(), b.x, b.bottom()));
                    primitives.push(line(b.x, b.bottom(), b.x, b.y));
                }
            }
        }
    }

    if let Some(title) = &geometry.title {
        primitives.push(text(title, Anchor::Middle));
    }
    if let Some(xlabel) = &geometry.xlabel {
        primitives.push(text(xlabel, Anchor::Middle));
    }
    if let Some(fineprint) = &geometry.fineprint {
        primitives.push(text(fineprint, Anchor::End));
    }

    log::debug!(
        "emitted {} primitives on a {} canvas",
        primitives.len(),
        geometry.canvas
    );
    Drawing {
        canvas: geometry.canvas,
        units: geometry.units.label().to_string(),
        primitives,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alignment::Alignment;
    use crate::alphabet::Alphabet;
    use crate::color::ColorSchemes;
    use crate::information::{Correction, InformationModel, Units};
    use crate::layout::{layout, LogoOptions};

    fn drawing(rows: &[&str], options: &LogoOptions) -> Drawing {
        let counts = Alignment::new(rows.iter(), Alphabet::dna())
            .unwrap()
            .counts()
            .unwrap();
        let model = InformationModel::new(&counts, Units::Bits, Correction::SmallSample);
        emit(&layout(&model, options, ColorSchemes::global()).unwrap())
    }

    fn kind(p: &Primitive) -> &'static str {
        match p {
            Primitive::Rect { .. } => "rect",
            Primitive::Line { .. } => "line",
            Primitive::Glyph { .. } => "glyph",
            Primitive::Text { .. } => "text",
        }
    }

    #[test]
    fn test_fixed_order() {
        let options = LogoOptions {
            title: "Title".into(),
            xlabel: "position".into(),
            ..Default::default()
        };
        let d = drawing(&["AAC", "AAG", "AAT", "ACA"], &options);
        let kinds: Vec<&str> = d.primitives.iter().map(kind).collect();
        assert_eq!(kinds[0], "rect");
        let first_glyph = kinds.iter().position(|&k| k == "glyph").unwrap();
        let last_glyph = kinds.iter().rposition(|&k| k == "glyph").unwrap();
        assert!(kinds[1..first_glyph].iter().all(|&k| k == "line" || k == "text"));
        assert!(kinds[first_glyph..=last_glyph].iter().all(|&k| k == "glyph"));
        assert_eq!(kinds.len() - last_glyph - 1, 3);
        assert_eq!(d.units, "bits");
    }

    #[test]
    fn test_glyphs_left_to_right_bottom_to_top() {
        let d = drawing(&["AC", "AC", "AC", "GC"], &LogoOptions::default());
        let boxes: Vec<(char, f64, f64)> = d
            .glyphs()
            .map(|p| match p {
                Primitive::Glyph { symbol, x, y, .. } => (*symbol, *x, *y),
                _ => unreachable!(),
            })
            .collect();
        assert_eq!(boxes.len(), 3);
        assert_eq!((boxes[0].0, boxes[1].0, boxes[2].0), ('G', 'A', 'C'));
        assert!(boxes[1].2 < boxes[0].2);
        assert!(boxes[2].1 > boxes[0].1);
    }

    #[test]
    fn test_zero_columns_draw_nothing() {
        let d = drawing(&["A-", "C-", "G-", "TN"], &LogoOptions::default());
        assert_eq!(d.glyphs().count(), 0);
    }

    #[test]
    fn test_glyph_colors_follow_scheme() {
        let options = LogoOptions {
            color_scheme: crate::color::ColorSelection::Named("classic".into()),
            ..Default::default()
        };
        let d = drawing(&["G", "G", "G", "G"], &options);
        let colors: Vec<Color> = d
            .glyphs()
            .map(|p| match p {
                Primitive::Glyph { color, .. } => *color,
                _ => unreachable!(),
            })
            .collect();
        assert_eq!(colors, vec![Color::named("orange").unwrap()]);
    }

    fn texts(d: &Drawing) -> Vec<(&str, Anchor, f64)> {
        d.primitives
            .iter()
            .filter_map(|p| match p {
                Primitive::Text {
                    text,
                    anchor,
                    rotation,
                    ..
                } => Some((text.as_str(), *anchor, *rotation)),
                _ => None,
            })
            .collect()
    }

    fn protein_drawing(options: &LogoOptions) -> Drawing {
        let counts = Alignment::new(["MKV", "MKL", "MRV"], Alphabet::protein())
            .unwrap()
            .counts()
            .unwrap();
        let model = InformationModel::new(&counts, Units::Bits, Correction::None);
        emit(&layout(&model, options, ColorSchemes::global()).unwrap())
    }

    #[test]
    fn test_end_labels_on_every_line() {
        let rows = ["AACGTTAC", "AACGTTAG", "AACCTTAC"];
        let options = LogoOptions {
            show_ends: true,
            stacks_per_line: Some(3),
            ..Default::default()
        };
        let d = drawing(&rows, &options);
        let t = texts(&d);
        let starts = t.iter().filter(|&&(s, a, _)| s == "5'" && a == Anchor::End).count();
        let ends = t.iter().filter(|&&(s, a, _)| s == "3'" && a == Anchor::Start).count();
        assert_eq!((starts, ends), (3, 3));

        let plain = drawing(&rows, &LogoOptions { stacks_per_line: Some(3), ..Default::default() });
        assert_eq!(texts(&plain).len() + 6, t.len());

        let hidden = LogoOptions {
            show_xaxis: false,
            ..options.clone()
        };
        assert!(!texts(&drawing(&rows, &hidden)).iter().any(|&(s, _, _)| s == "5'"));

        let protein = protein_drawing(&LogoOptions {
            show_ends: true,
            ..Default::default()
        });
        let t = texts(&protein);
        assert!(t.contains(&("N", Anchor::End, 0.0)));
        assert!(t.contains(&("C", Anchor::Start, 0.0)));
    }

    #[test]
    fn test_end_labels_flank_the_line() {
        let options = LogoOptions {
            show_ends: true,
            ..Default::default()
        };
        let counts = Alignment::new(["ACG", "ACG"], Alphabet::dna())
            .unwrap()
            .counts()
            .unwrap();
        let model = InformationModel::new(&counts, Units::Bits, Correction::None);
        let g = layout(&model, &options, ColorSchemes::global()).unwrap();
        let line = &g.lines[0];
        let (start, end) = line.ends.as_ref().unwrap();
        assert!(start.x < line.plot.x && end.x > line.plot.right());
        assert!(start.y > line.plot.bottom() && end.y <= g.canvas.height);
    }

    #[test]
    fn test_boxes_outline_each_glyph() {
        let rows = ["AC", "AC", "AC", "GC"];
        let lines = |d: &Drawing| {
            d.primitives
                .iter()
                .filter(|p| matches!(p, Primitive::Line { .. }))
                .count()
        };
        let plain = drawing(&rows, &LogoOptions::default());
        let boxed = drawing(
            &rows,
            &LogoOptions {
                show_boxes: true,
                ..Default::default()
            },
        );
        assert_eq!(lines(&boxed), lines(&plain) + 4 * plain.glyphs().count());
        let after_first_glyph = boxed
            .primitives
            .iter()
            .skip_while(|p| !matches!(p, Primitive::Glyph { .. }))
            .nth(1)
            .unwrap();
        assert_eq!(kind(after_first_glyph), "line");
    }

    #[test]
    fn test_upright_numbers() {
        let options = LogoOptions {
            rotate_numbers: false,
            ..Default::default()
        };
        let d = drawing(&["AC", "AG"], &options);
        let numbers: Vec<_> = texts(&d)
            .into_iter()
            .filter(|&(s, _, _)| s == "1" || s == "2")
            .collect();
        assert_eq!(numbers, vec![("1", Anchor::Middle, 0.0), ("2", Anchor::Middle, 0.0)]);
        let rotated = drawing(&["AC", "AG"], &LogoOptions::default());
        assert!(texts(&rotated).contains(&("1", Anchor::End, -90.0)));
    }

    #[test]
    fn test_outline_in_box() {
        let p = Primitive::Glyph {
            symbol: 'T',
            x: 10.0,
            y: 20.0,
            width: 5.0,
            height: 8.0,
            color: Color::BLACK,
        };
        let (lo, hi) = p.outline().unwrap().bounds().unwrap();
        assert!((lo[0] - 10.0).abs() < 1e-9 && (lo[1] - 20.0).abs() < 1e-9);
        assert!((hi[0] - 15.0).abs() < 1e-9 && (hi[1] - 28.0).abs() < 1e-9);

        let t = Primitive::Text {
            text: "10".into(),
            x: 50.0,
            y: 50.0,
            size: 10.0,
            anchor: Anchor::End,
            rotation: -90.0,
            color: Color::BLACK,
        };
        let (lo, hi) = t.outline().unwrap().bounds().unwrap();
        // rotated text hangs below its anchor, left of the baseline
        assert!(lo[1] >= 50.0 - 1e-9 && hi[1] <= 62.0 + 1e-9);
        assert!(hi[0] <= 50.0 + 1e-9);
    }
}
