//! SVG 1.1 backend.

use std::fmt::Write as _;

use anyhow::Result;
use seqlogo_core::{Anchor, Drawing, Primitive};

use crate::{Backend, ExportConfig};

/// Writes a standalone SVG document; glyphs become filled paths.
#[derive(Debug, Clone)]
pub struct SvgBackend {
    config: ExportConfig,
}

impl SvgBackend {
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
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

/// SVG builder collecting elements before the document is assembled
struct SvgBuilder<'a> {
    config: &'a ExportConfig,
    elements: Vec<String>,
    width: f64,
    height: f64,
}

impl<'a> SvgBuilder<'a> {
    fn new(config: &'a ExportConfig, drawing: &Drawing) -> Self {
        Self {
            config,
            elements: Vec::with_capacity(drawing.primitives.len()),
            width: drawing.canvas.width,
            height: drawing.canvas.height,
        }
    }

    fn add(&mut self, primitive: &Primitive) {
        let element = match primitive {
            Primitive::Rect {
                x,
                y,
                width,
                height,
                fill,
            } => format!(
                r#"<rect x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" fill="{}"/>"#,
                x, y, width, height, fill
            ),
            Primitive::Line {
                x1,
                y1,
                x2,
                y2,
                width,
                color,
            } => format!(
                r#"<line x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}" stroke="{}" stroke-width="{}"/>"#,
                x1, y1, x2, y2, color, width
            ),
            Primitive::Glyph { symbol, color, .. } => {
                let mut d = String::new();
                for polygon in primitive.outline().unwrap_or_default().polygons {
                    for (i, [px, py]) in polygon.iter().enumerate() {
                        let cmd = if i == 0 { 'M' } else { 'L' };
                        let _ = write!(d, "{}{:.2} {:.2} ", cmd, px, py);
                    }
                    d.push_str("Z ");
                }
                format!(
                    r#"<path d="{}" fill="{}"><title>{}</title></path>"#,
                    d.trim_end(),
                    color,
                    escape(&symbol.to_string())
                )
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
                let anchor = match anchor {
                    Anchor::Start => "start",
                    Anchor::Middle => "middle",
                    Anchor::End => "end",
                };
                let transform = if *rotation != 0.0 {
                    format!(r#" transform="rotate({} {:.2} {:.2})""#, rotation, x, y)
                } else {
                    String::new()
                };
                format!(
                    r#"<text x="{:.2}" y="{:.2}" font-family="{}" font-size="{}" text-anchor="{}" fill="{}"{}>{}</text>"#,
                    x,
                    y,
                    escape(&self.config.font_family),
                    size,
                    anchor,
                    color,
                    transform,
                    escape(text)
                )
            }
        };
        self.elements.push(element);
    }

    fn finish(self, units: &str) -> String {
        let mut out = String::new();
        let _ = writeln!(out, r#"<?xml version="1.0" encoding="UTF-8"?>"#);
        let _ = writeln!(
            out,
            r#"<svg width="{w:.2}pt" height="{h:.2}pt" viewBox="0 0 {w:.2} {h:.2}" version="1.1" xmlns="http://www.w3.org/2000/svg">"#,
            w = self.width,
            h = self.height
        );
        let _ = writeln!(out, "  <!-- units: {} -->", escape(units));
        if let Some(comment) = &self.config.provenance_comment {
            for line in comment.lines() {
                let _ = writeln!(out, "  <!-- {} -->", line.replace("--", "- -"));
            }
        }
        for element in &self.elements {
            let _ = writeln!(out, "  {}", element);
        }
        let _ = writeln!(out, "</svg>");
        out
    }
}

impl Backend for SvgBackend {
    fn render(&self, drawing: &Drawing) -> Result<Vec<u8>> {
        let mut svg = SvgBuilder::new(&self.config, drawing);
        for primitive in &drawing.primitives {
            svg.add(primitive);
        }
        Ok(svg.finish(&drawing.units).into_bytes())
    }
}
