//! Stroke-built outline font shared by every backend.
//!
//! Each character is drawn on a 4 x 6 design grid as a set of polylines.
//! Every stroke segment becomes one closed, counter-clockwise quad, so the
//! union of the quads fills correctly under the nonzero rule.
//!
//! [`outline`] stretches a character to fill the unit box (logo letters);
//! [`text_outline`] keeps its natural proportions in em units (labels).

/// A point, `[x, y]`, y up.
pub type Point = [f64; 2];

/// Fixed horizontal advance of every character, in em.
pub const ADVANCE: f64 = 0.6;
/// Height of capitals above the baseline, in em.
pub const CAP_HEIGHT: f64 = 0.7;

const GRID_WIDTH: f64 = 4.0;
const GRID_HEIGHT: f64 = 6.0;
/// Half the stroke width, in grid units.
const HALF_STROKE: f64 = 0.45;

type Stroke = &'static [(f64, f64)];

const BOX: &[Stroke] = &[&[(0.0, 0.0), (4.0, 0.0), (4.0, 6.0), (0.0, 6.0), (0.0, 0.0)]];

const O_RING: Stroke = &[
    (1.0, 0.0),
    (0.0, 1.0),
    (0.0, 5.0),
    (1.0, 6.0),
    (3.0, 6.0),
    (4.0, 5.0),
    (4.0, 1.0),
    (3.0, 0.0),
    (1.0, 0.0),
];
const P_BOWL: Stroke = &[
    (0.0, 0.0),
    (0.0, 6.0),
    (3.0, 6.0),
    (4.0, 5.0),
    (4.0, 4.0),
    (3.0, 3.0),
    (0.0, 3.0),
];

fn strokes(c: char) -> Option<&'static [Stroke]> {
    let s: &'static [Stroke] = match c.to_ascii_uppercase() {
        'A' => &[&[(0.0, 0.0), (2.0, 6.0), (4.0, 0.0)], &[(0.8, 2.4), (3.2, 2.4)]],
        'B' => &[
            &[(0.0, 0.0), (0.0, 6.0), (3.0, 6.0), (4.0, 5.0), (4.0, 4.0), (3.0, 3.0), (0.0, 3.0)],
            &[(3.0, 3.0), (4.0, 2.0), (4.0, 1.0), (3.0, 0.0), (0.0, 0.0)],
        ],
        'C' => &[&[
            (4.0, 5.0),
            (3.0, 6.0),
            (1.0, 6.0),
            (0.0, 5.0),
            (0.0, 1.0),
            (1.0, 0.0),
            (3.0, 0.0),
            (4.0, 1.0),
        ]],
        'D' => &[&[
            (0.0, 0.0),
            (0.0, 6.0),
            (2.5, 6.0),
            (4.0, 4.5),
            (4.0, 1.5),
            (2.5, 0.0),
            (0.0, 0.0),
        ]],
        'E' => &[&[(4.0, 6.0), (0.0, 6.0), (0.0, 0.0), (4.0, 0.0)], &[(0.0, 3.0), (3.0, 3.0)]],
        'F' => &[&[(4.0, 6.0), (0.0, 6.0), (0.0, 0.0)], &[(0.0, 3.0), (3.0, 3.0)]],
        'G' => &[&[
            (4.0, 5.0),
            (3.0, 6.0),
            (1.0, 6.0),
            (0.0, 5.0),
            (0.0, 1.0),
            (1.0, 0.0),
            (3.0, 0.0),
            (4.0, 1.0),
            (4.0, 3.0),
            (2.0, 3.0),
        ]],
        'H' => &[&[(0.0, 0.0), (0.0, 6.0)], &[(4.0, 0.0), (4.0, 6.0)], &[(0.0, 3.0), (4.0, 3.0)]],
        'I' => &[&[(0.0, 6.0), (4.0, 6.0)], &[(2.0, 6.0), (2.0, 0.0)], &[(0.0, 0.0), (4.0, 0.0)]],
        'J' => &[
            &[(1.0, 6.0), (4.0, 6.0)],
            &[(3.0, 6.0), (3.0, 1.0), (2.0, 0.0), (1.0, 0.0), (0.0, 1.0)],
        ],
        'K' => &[&[(0.0, 0.0), (0.0, 6.0)], &[(4.0, 6.0), (0.0, 2.0)], &[(1.2, 3.2), (4.0, 0.0)]],
        'L' => &[&[(0.0, 6.0), (0.0, 0.0), (4.0, 0.0)]],
        'M' => &[&[(0.0, 0.0), (0.0, 6.0), (2.0, 3.0), (4.0, 6.0), (4.0, 0.0)]],
        'N' => &[&[(0.0, 0.0), (0.0, 6.0), (4.0, 0.0), (4.0, 6.0)]],
        'O' => &[O_RING],
        'P' => &[P_BOWL],
        'Q' => &[O_RING, &[(2.5, 1.5), (4.0, 0.0)]],
        'R' => &[P_BOWL, &[(2.0, 3.0), (4.0, 0.0)]],
        'S' => &[&[
            (4.0, 5.0),
            (3.0, 6.0),
            (1.0, 6.0),
            (0.0, 5.0),
            (0.0, 4.0),
            (1.0, 3.0),
            (3.0, 3.0),
            (4.0, 2.0),
            (4.0, 1.0),
            (3.0, 0.0),
            (1.0, 0.0),
            (0.0, 1.0),
        ]],
        'T' => &[&[(0.0, 6.0), (4.0, 6.0)], &[(2.0, 6.0), (2.0, 0.0)]],
        'U' => &[&[(0.0, 6.0), (0.0, 1.0), (1.0, 0.0), (3.0, 0.0), (4.0, 1.0), (4.0, 6.0)]],
        'V' => &[&[(0.0, 6.0), (2.0, 0.0), (4.0, 6.0)]],
        'W' => &[&[(0.0, 6.0), (1.0, 0.0), (2.0, 4.0), (3.0, 0.0), (4.0, 6.0)]],
        'X' => &[&[(0.0, 0.0), (4.0, 6.0)], &[(0.0, 6.0), (4.0, 0.0)]],
        'Y' => &[&[(0.0, 6.0), (2.0, 3.0), (4.0, 6.0)], &[(2.0, 3.0), (2.0, 0.0)]],
        'Z' => &[&[(0.0, 6.0), (4.0, 6.0), (0.0, 0.0), (4.0, 0.0)]],
        '0' => &[O_RING, &[(1.0, 1.0), (3.0, 5.0)]],
        '1' => &[&[(1.0, 5.0), (2.0, 6.0), (2.0, 0.0)], &[(0.5, 0.0), (3.5, 0.0)]],
        '2' => &[&[
            (0.0, 5.0),
            (1.0, 6.0),
            (3.0, 6.0),
            (4.0, 5.0),
            (4.0, 4.0),
            (0.0, 0.0),
            (4.0, 0.0),
        ]],
        '3' => &[
            &[(0.0, 5.0), (1.0, 6.0), (3.0, 6.0), (4.0, 5.0), (4.0, 4.0), (3.0, 3.0), (1.5, 3.0)],
            &[(3.0, 3.0), (4.0, 2.0), (4.0, 1.0), (3.0, 0.0), (1.0, 0.0), (0.0, 1.0)],
        ],
        '4' => &[&[(3.0, 0.0), (3.0, 6.0), (0.0, 2.0), (4.0, 2.0)]],
        '5' => &[&[
            (4.0, 6.0),
            (0.0, 6.0),
            (0.0, 3.5),
            (3.0, 3.5),
            (4.0, 2.5),
            (4.0, 1.0),
            (3.0, 0.0),
            (1.0, 0.0),
            (0.0, 1.0),
        ]],
        '6' => &[&[
            (4.0, 5.0),
            (3.0, 6.0),
            (1.0, 6.0),
            (0.0, 5.0),
            (0.0, 1.0),
            (1.0, 0.0),
            (3.0, 0.0),
            (4.0, 1.0),
            (4.0, 2.5),
            (3.0, 3.5),
            (0.0, 3.5),
        ]],
        '7' => &[&[(0.0, 6.0), (4.0, 6.0), (1.5, 0.0)]],
        '8' => &[&[
            (1.0, 3.0),
            (0.0, 4.0),
            (0.0, 5.0),
            (1.0, 6.0),
            (3.0, 6.0),
            (4.0, 5.0),
            (4.0, 4.0),
            (3.0, 3.0),
            (1.0, 3.0),
            (0.0, 2.0),
            (0.0, 1.0),
            (1.0, 0.0),
            (3.0, 0.0),
            (4.0, 1.0),
            (4.0, 2.0),
            (3.0, 3.0),
        ]],
        '9' => &[&[
            (4.0, 3.5),
            (1.0, 3.5),
            (0.0, 4.5),
            (0.0, 5.0),
            (1.0, 6.0),
            (3.0, 6.0),
            (4.0, 5.0),
            (4.0, 1.0),
            (3.0, 0.0),
            (1.0, 0.0),
            (0.0, 1.0),
        ]],
        '-' => &[&[(0.5, 3.0), (3.5, 3.0)]],
        '_' => &[&[(0.0, -0.5), (4.0, -0.5)]],
        '.' => &[&[(2.0, 0.0), (2.0, 0.0)]],
        ',' => &[&[(2.2, 0.4), (1.5, -1.0)]],
        ':' => &[&[(2.0, 0.0), (2.0, 0.0)], &[(2.0, 3.5), (2.0, 3.5)]],
        '!' => &[&[(2.0, 6.0), (2.0, 1.5)], &[(2.0, 0.0), (2.0, 0.0)]],
        '?' => &[
            &[(0.0, 5.0), (1.0, 6.0), (3.0, 6.0), (4.0, 5.0), (4.0, 4.0), (2.0, 2.5), (2.0, 1.5)],
            &[(2.0, 0.0), (2.0, 0.0)],
        ],
        '\'' => &[&[(2.0, 6.0), (2.0, 4.5)]],
        '/' => &[&[(0.0, 0.0), (4.0, 6.0)]],
        '(' => &[&[(3.0, 6.0), (1.5, 4.5), (1.5, 1.5), (3.0, 0.0)]],
        ')' => &[&[(1.0, 6.0), (2.5, 4.5), (2.5, 1.5), (1.0, 0.0)]],
        '+' => &[&[(0.0, 3.0), (4.0, 3.0)], &[(2.0, 1.0), (2.0, 5.0)]],
        '=' => &[&[(0.5, 2.0), (3.5, 2.0)], &[(0.5, 4.0), (3.5, 4.0)]],
        '*' => &[
            &[(2.0, 1.5), (2.0, 4.5)],
            &[(0.7, 2.2), (3.3, 3.8)],
            &[(0.7, 3.8), (3.3, 2.2)],
        ],
        '~' => &[&[(0.0, 3.0), (1.0, 4.0), (3.0, 2.0), (4.0, 3.0)]],
        '<' => &[&[(4.0, 5.0), (0.0, 3.0), (4.0, 1.0)]],
        '>' => &[&[(0.0, 5.0), (4.0, 3.0), (0.0, 1.0)]],
        ' ' => &[],
        _ => return None,
    };
    Some(s)
}

/// A set of closed polygons.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Outline {
    pub polygons: Vec<Vec<Point>>,
}

impl Outline {
    pub fn is_empty(&self) -> bool {
        self.polygons.is_empty()
    }

    /// Bounding box as `(min, max)`.
    pub fn bounds(&self) -> Option<(Point, Point)> {
        let mut points = self.polygons.iter().flatten();
        let first = *points.next()?;
        Some(points.fold((first, first), |(lo, hi), p| {
            (
                [lo[0].min(p[0]), lo[1].min(p[1])],
                [hi[0].max(p[0]), hi[1].max(p[1])],
            )
        }))
    }

    /// Apply `f` to every point.
    pub fn map<F: Fn(Point) -> Point>(&self, f: F) -> Outline {
        Outline {
            polygons: self
                .polygons
                .iter()
                .map(|poly| poly.iter().map(|&p| f(p)).collect())
                .collect(),
        }
    }
}

fn segment_quad(a: (f64, f64), b: (f64, f64)) -> Vec<Point> {
    let (dx, dy) = (b.0 - a.0, b.1 - a.1);
    let len = (dx * dx + dy * dy).sqrt();
    let (ux, uy) = if len > 1e-9 { (dx / len, dy / len) } else { (1.0, 0.0) };
    // square caps on axis-aligned strokes, butt caps on diagonals; either way
    // no corner leaves the grid widened by the half width
    let cap = if ux.abs() < 1e-9 || uy.abs() < 1e-9 {
        HALF_STROKE
    } else {
        0.0
    };
    let (ex, ey) = (ux * cap, uy * cap);
    let (nx, ny) = (-uy * HALF_STROKE, ux * HALF_STROKE);
    let (sx, sy) = (a.0 - ex, a.1 - ey);
    let (tx, ty) = (b.0 + ex, b.1 + ey);
    // counter-clockwise in y-up coordinates
    vec![
        [sx - nx, sy - ny],
        [tx - nx, ty - ny],
        [tx + nx, ty + ny],
        [sx + nx, sy + ny],
    ]
}

fn grid_outline(c: char) -> Outline {
    let strokes = strokes(c).unwrap_or(BOX);
    let polygons = strokes
        .iter()
        .flat_map(|stroke| {
            let single = if stroke.len() == 1 { Some(segment_quad(stroke[0], stroke[0])) } else { None };
            stroke
                .windows(2)
                .map(|w| segment_quad(w[0], w[1]))
                .chain(single)
        })
        .collect();
    Outline { polygons }
}

/// Whether the font has a dedicated shape for `c`.
pub fn has_glyph(c: char) -> bool {
    strokes(c).is_some()
}

/// The outline of `c` stretched to fill the unit box `[0, 1] x [0, 1]`, y up.
///
/// Characters without a shape draw a box.
pub fn outline(c: char) -> Outline {
    let grid = grid_outline(c);
    let Some((lo, hi)) = grid.bounds() else {
        return grid;
    };
    let (w, h) = ((hi[0] - lo[0]).max(1e-9), (hi[1] - lo[1]).max(1e-9));
    grid.map(|[x, y]| [(x - lo[0]) / w, (y - lo[1]) / h])
}

/// The outline of `c` in em units: baseline at `y = 0`, capitals reaching
/// [`CAP_HEIGHT`], centred in an [`ADVANCE`]-wide cell.
pub fn text_outline(c: char) -> Outline {
    let sx = ADVANCE * 0.75 / (GRID_WIDTH + 2.0 * HALF_STROKE);
    let sy = CAP_HEIGHT / (GRID_HEIGHT + 2.0 * HALF_STROKE);
    let x0 = (ADVANCE - GRID_WIDTH * sx) / 2.0;
    grid_outline(c).map(|[x, y]| [x0 + x * sx, (y + HALF_STROKE) * sy])
}

/// Advance width of `text` set at `size`.
pub fn text_width(text: &str, size: f64) -> f64 {
    text.chars().count() as f64 * ADVANCE * size
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signed_area(poly: &[Point]) -> f64 {
        let n = poly.len();
        (0..n)
            .map(|i| {
                let (a, b) = (poly[i], poly[(i + 1) % n]);
                a[0] * b[1] - b[0] * a[1]
            })
            .sum::<f64>()
            / 2.0
    }

    #[test]
    fn test_letters_fill_unit_box() {
        for c in ('A'..='Z').chain('0'..='9') {
            let (lo, hi) = outline(c).bounds().unwrap();
            assert!(lo[0].abs() < 1e-9 && lo[1].abs() < 1e-9, "{}", c);
            assert!((hi[0] - 1.0).abs() < 1e-9 && (hi[1] - 1.0).abs() < 1e-9, "{}", c);
        }
    }

    #[test]
    fn test_quads_are_counter_clockwise() {
        for c in ('A'..='Z').chain(['.', '1', ':']) {
            for poly in &outline(c).polygons {
                assert_eq!(poly.len(), 4);
                assert!(signed_area(poly) > 0.0, "{}", c);
            }
        }
    }

    #[test]
    fn test_unknown_draws_box() {
        assert!(!has_glyph('#'));
        assert_eq!(outline('#').polygons.len(), 4);
        assert_eq!(outline('a'), outline('A'));
        assert!(outline(' ').is_empty());
    }

    #[test]
    fn test_text_metrics() {
        assert_eq!(text_width("bits", 10.0), 24.0);
        let (lo, hi) = text_outline('H').bounds().unwrap();
        assert!(lo[0] > 0.0 && hi[0] < ADVANCE);
        assert!(lo[1].abs() < 1e-9);
        assert!((hi[1] - CAP_HEIGHT).abs() < 1e-9);
        // the period stays small in text
        let (_, hi) = text_outline('.').bounds().unwrap();
        assert!(hi[1] < CAP_HEIGHT / 2.0);
    }

    #[test]
    fn test_text_stays_in_cell() {
        let chars = ('A'..='Z').chain('0'..='9').chain("'-.:!?/()+=*~<>".chars());
        for c in chars {
            let (lo, hi) = text_outline(c).bounds().unwrap();
            assert!(lo[0] >= 0.0 && hi[0] <= ADVANCE, "{} spans x {}..{}", c, lo[0], hi[0]);
            assert!(
                lo[1] >= -1e-9 && hi[1] <= CAP_HEIGHT + 1e-9,
                "{} spans y {}..{}",
                c,
                lo[1],
                hi[1]
            );
        }
    }

    #[test]
    fn test_diagonal_strokes_stay_in_grid() {
        for c in ['1', 'A', 'K', 'N', 'V', 'W', 'X', '/', '7'] {
            let (lo, hi) = grid_outline(c).bounds().unwrap();
            assert!(lo[0] >= -HALF_STROKE - 1e-9 && hi[0] <= GRID_WIDTH + HALF_STROKE + 1e-9, "{}", c);
            assert!(lo[1] >= -HALF_STROKE - 1e-9 && hi[1] <= GRID_HEIGHT + HALF_STROKE + 1e-9, "{}", c);
        }
    }
}
