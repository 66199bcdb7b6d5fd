//! CPU raster backend.
//!
//! Rasterises the primitive stream directly: rectangles are filled, lines
//! become thin quads, and glyphs and text are scan-converted from the shared
//! outline font. Pixels are sampled at their centres without anti-aliasing,
//! which keeps the output byte-for-byte reproducible.

use std::io::Cursor;

use anyhow::{bail, Context, Result};
use image::{DynamicImage, ImageOutputFormat, Rgba, RgbaImage};
use seqlogo_core::glyph::Point;
use seqlogo_core::{Color, Drawing, Primitive};

use crate::Backend;

/// Largest image edge, in pixels.
const MAX_EDGE: f64 = 32_768.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PngBackend {
    /// Pixels per inch; one point is 1/72 inch.
    pub resolution: f64,
}

impl PngBackend {
    pub fn new(resolution: f64) -> Result<Self> {
        if !(resolution.is_finite() && resolution > 0.0) {
            bail!("resolution must be a positive number, got {}", resolution);
        }
        Ok(Self { resolution })
    }

    fn scale(&self) -> f64 {
        self.resolution / 72.0
    }
}

fn rgba(color: Color) -> Rgba<u8> {
    Rgba([color.r, color.g, color.b, 255])
}

/// Fill a polygon with the even-odd rule, sampling pixel centres.
fn fill_polygon(img: &mut RgbaImage, polygon: &[Point], color: Rgba<u8>) {
    if polygon.len() < 3 {
        return;
    }
    let (lo, hi) = polygon.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
        (lo.min(p[1]), hi.max(p[1]))
    });
    let height = img.height() as f64;
    let width = img.width() as f64;
    let y_start = (lo - 0.5).ceil().max(0.0) as u32;
    let y_end = (hi - 0.5).floor().min(height - 1.0);
    if y_end < 0.0 {
        return;
    }
    let mut crossings: Vec<f64> = Vec::with_capacity(polygon.len());
    for py in y_start..=y_end as u32 {
        let sy = py as f64 + 0.5;
        crossings.clear();
        for i in 0..polygon.len() {
            let a = polygon[i];
            let b = polygon[(i + 1) % polygon.len()];
            if (a[1] <= sy && b[1] > sy) || (b[1] <= sy && a[1] > sy) {
                let t = (sy - a[1]) / (b[1] - a[1]);
                crossings.push(a[0] + t * (b[0] - a[0]));
            }
        }
        crossings.sort_by(|a, b| a.total_cmp(b));
        for pair in crossings.chunks_exact(2) {
            let x_start = (pair[0] - 0.5).ceil().max(0.0);
            let x_end = (pair[1] - 0.5).floor().min(width - 1.0);
            if x_end < x_start {
                continue;
            }
            for px in x_start as u32..=x_end as u32 {
                img.put_pixel(px, py, color);
            }
        }
    }
}

fn rect_polygon(x: f64, y: f64, w: f64, h: f64) -> Vec<Point> {
    vec![[x, y], [x + w, y], [x + w, y + h], [x, y + h]]
}

/// A line as a quad at least one pixel wide.
fn line_polygon(a: Point, b: Point, width: f64) -> Vec<Point> {
    let (dx, dy) = (b[0] - a[0], b[1] - a[1]);
    let len = (dx * dx + dy * dy).sqrt().max(1e-9);
    let half = width.max(1.0) / 2.0;
    let (nx, ny) = (-dy / len * half, dx / len * half);
    let (ex, ey) = (dx / len * half, dy / len * half);
    vec![
        [a[0] - ex + nx, a[1] - ey + ny],
        [b[0] + ex + nx, b[1] + ey + ny],
        [b[0] + ex - nx, b[1] + ey - ny],
        [a[0] - ex - nx, a[1] - ey - ny],
    ]
}

impl PngBackend {
    /// Rasterise `drawing` into an image.
    pub fn rasterize(&self, drawing: &Drawing) -> Result<RgbaImage> {
        let s = self.scale();
        let (w, h) = (drawing.canvas.width * s, drawing.canvas.height * s);
        if !(w >= 1.0 && h >= 1.0 && w <= MAX_EDGE && h <= MAX_EDGE) {
            bail!("a {:.0}x{:.0} pixel image is out of range", w, h);
        }
        let mut img = RgbaImage::from_pixel(w.ceil() as u32, h.ceil() as u32, Rgba([255, 255, 255, 255]));
        let px = |p: Point| -> Point { [p[0] * s, p[1] * s] };

        for primitive in &drawing.primitives {
            match primitive {
                Primitive::Rect {
                    x,
                    y,
                    width,
                    height,
                    fill,
                } => {
                    let poly = rect_polygon(x * s, y * s, width * s, height * s);
                    fill_polygon(&mut img, &poly, rgba(*fill));
                }
                Primitive::Line {
                    x1,
                    y1,
                    x2,
                    y2,
                    width,
                    color,
                } => {
                    let poly = line_polygon(px([*x1, *y1]), px([*x2, *y2]), width * s);
                    fill_polygon(&mut img, &poly, rgba(*color));
                }
                Primitive::Glyph { color, .. } | Primitive::Text { color, .. } => {
                    if let Some(outline) = primitive.outline() {
                        for polygon in outline.map(px).polygons {
                            fill_polygon(&mut img, &polygon, rgba(*color));
                        }
                    }
                }
            }
        }
        Ok(img)
    }
}

impl Backend for PngBackend {
    fn render(&self, drawing: &Drawing) -> Result<Vec<u8>> {
        let img = self.rasterize(drawing)?;
        let mut bytes = Vec::new();
        DynamicImage::ImageRgba8(img)
            .write_to(&mut Cursor::new(&mut bytes), ImageOutputFormat::Png)
            .context("failed to encode PNG")?;
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use seqlogo_core::Canvas;

    fn square(color: Color) -> Drawing {
        Drawing {
            canvas: Canvas {
                width: 72.0,
                height: 36.0,
            },
            units: "bits".into(),
            primitives: vec![Primitive::Rect {
                x: 18.0,
                y: 9.0,
                width: 36.0,
                height: 18.0,
                fill: color,
            }],
        }
    }

    #[test]
    fn test_resolution_scales_pixels() {
        let img = PngBackend::new(144.0).unwrap().rasterize(&square(Color::BLACK)).unwrap();
        assert_eq!(img.dimensions(), (144, 72));
        let black = img.pixels().filter(|p| p.0 == [0, 0, 0, 255]).count();
        assert_eq!(black, 72 * 36);
    }

    #[test]
    fn test_glyph_fills_inside_box() {
        let mut drawing = square(Color::WHITE);
        drawing.primitives.push(Primitive::Glyph {
            symbol: 'I',
            x: 10.0,
            y: 5.0,
            width: 20.0,
            height: 20.0,
            color: Color::rgb(255, 0, 0),
        });
        let img = PngBackend::new(72.0).unwrap().rasterize(&drawing).unwrap();
        let red: Vec<(u32, u32)> = img
            .enumerate_pixels()
            .filter(|(_, _, p)| p.0 == [255, 0, 0, 255])
            .map(|(x, y, _)| (x, y))
            .collect();
        assert!(!red.is_empty());
        assert!(red.iter().all(|&(x, y)| (10..30).contains(&x) && (5..25).contains(&y)));
        // the serif bars of an I span the whole box
        assert!(red.contains(&(10, 5)) && red.contains(&(29, 24)));
    }

    #[test]
    fn test_rejects_bad_resolution() {
        assert!(PngBackend::new(0.0).is_err());
        assert!(PngBackend::new(f64::NAN).is_err());
    }

    #[test]
    fn test_encodes_png() {
        let bytes = PngBackend::new(72.0).unwrap().render(&square(Color::BLACK)).unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
        let decoded = image::load_from_memory(&bytes).unwrap().to_rgba8();
        assert_eq!(decoded.dimensions(), (72, 36));
    }
}
