//! Encapsulated PostScript backend.
//!
//! PostScript's y axis points up, so every y coordinate is flipped against
//! the canvas height. Text uses the standard Helvetica font and is aligned
//! with `stringwidth`, so no font metrics are needed here.

use std::fmt::Write as _;

use anyhow::Result;
use seqlogo_core::{Anchor, Color, Drawing, Primitive};

use crate::{Backend, ExportConfig};

#[derive(Debug, Clone)]
pub struct EpsBackend {
    config: ExportConfig,
}

impl EpsBackend {
    pub fn new(config: &ExportConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' | '(' | ')' => {
                out.push('\\');
                out.push(c);
            }
            c if c.is_ascii() && !c.is_ascii_control() => out.push(c),
            _ => out.push('?'),
        }
    }
    out
}

fn set_color(out: &mut String, color: Color) {
    let (r, g, b) = color.to_unit();
    let _ = writeln!(out, "{:.3} {:.3} {:.3} setrgbcolor", r, g, b);
}

const PROLOG: &str = "\
/M { moveto } bind def
/L { lineto } bind def
/Z { closepath } bind def
/logoshow { % string anchor -> aligned show; anchor 0 start, 1 middle, 2 end
  1 index stringwidth pop mul 2 div neg 0 rmoveto show
} bind def
";

impl Backend for EpsBackend {
    fn render(&self, drawing: &Drawing) -> Result<Vec<u8>> {
        let (w, h) = (drawing.canvas.width, drawing.canvas.height);
        let mut out = String::new();
        let _ = writeln!(out, "%!PS-Adobe-3.0 EPSF-3.0");
        let _ = writeln!(out, "%%BoundingBox: 0 0 {} {}", w.ceil() as i64, h.ceil() as i64);
        let _ = writeln!(out, "%%HiResBoundingBox: 0 0 {:.2} {:.2}", w, h);
        let _ = writeln!(out, "%%Title: sequence logo ({})", escape(&drawing.units));
        let _ = writeln!(out, "%%Creator: seqlogo {}", seqlogo_core::VERSION);
        if let Some(comment) = &self.config.provenance_comment {
            for line in comment.lines() {
                let _ = writeln!(out, "% {}", line);
            }
        }
        let _ = writeln!(out, "%%EndComments");
        let _ = writeln!(out, "%%BeginProlog");
        out.push_str(PROLOG);
        let _ = writeln!(out, "%%EndProlog");
        let _ = writeln!(out, "gsave");

        for primitive in &drawing.primitives {
            match primitive {
                Primitive::Rect {
                    x,
                    y,
                    width,
                    height,
                    fill,
                } => {
                    set_color(&mut out, *fill);
                    let _ = writeln!(
                        out,
                        "{:.2} {:.2} {:.2} {:.2} rectfill",
                        x,
                        h - y - height,
                        width,
                        height
                    );
                }
                Primitive::Line {
                    x1,
                    y1,
                    x2,
                    y2,
                    width,
                    color,
                } => {
                    set_color(&mut out, *color);
                    let _ = writeln!(
                        out,
                        "{} setlinewidth newpath {:.2} {:.2} M {:.2} {:.2} L stroke",
                        width,
                        x1,
                        h - y1,
                        x2,
                        h - y2
                    );
                }
                Primitive::Glyph { symbol, color, .. } => {
                    set_color(&mut out, *color);
                    let _ = writeln!(out, "% {}", escape(&symbol.to_string()));
                    let _ = write!(out, "newpath");
                    for polygon in primitive.outline().unwrap_or_default().polygons {
                        for (i, [px, py]) in polygon.iter().enumerate() {
                            let cmd = if i == 0 { "M" } else { "L" };
                            let _ = write!(out, " {:.2} {:.2} {}", px, h - py, cmd);
                        }
                        out.push_str(" Z");
                    }
                    out.push_str(" fill\n");
                }
                Primitive::Text {
                    text,
                    x,
                    y,
                    size,
                    anchor,
                    rotation,
                    color,
                } => {
                    set_color(&mut out, *color);
                    let anchor = match anchor {
                        Anchor::Start => 0,
                        Anchor::Middle => 1,
                        Anchor::End => 2,
                    };
                    let _ = writeln!(
                        out,
                        "gsave {:.2} {:.2} translate {} rotate /Helvetica findfont {} scalefont setfont 0 0 moveto ({}) {} logoshow grestore",
                        x,
                        h - y,
                        0.0 - rotation,
                        size,
                        escape(text),
                        anchor
                    );
                }
            }
        }

        let _ = writeln!(out, "grestore");
        let _ = writeln!(out, "showpage");
        let _ = writeln!(out, "%%EOF");
        Ok(out.into_bytes())
    }
}
