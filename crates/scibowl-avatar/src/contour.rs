//! Marching squares over a [`ScalarField`].
//!
//! Each 2x2 block of samples is classified by which corners lie at or
//! above the threshold. The resulting 4-bit case selects zero, one, or two
//! line segments whose endpoints are linearly interpolated along the
//! block's edges.

use std::fmt::Write as _;

use crate::field::ScalarField;

/// A point in field coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    /// Column coordinate.
    pub x: f64,
    /// Row coordinate.
    pub y: f64,
}

/// A contour line segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    /// First endpoint.
    pub from: Point,
    /// Second endpoint.
    pub to: Point,
}

/// Corner bits: top-left 1, top-right 2, bottom-right 4, bottom-left 8.
pub fn cell_case(v00: f64, v10: f64, v11: f64, v01: f64, threshold: f64) -> u8 {
    let mut case = 0;
    if v00 >= threshold {
        case |= 1;
    }
    if v10 >= threshold {
        case |= 2;
    }
    if v11 >= threshold {
        case |= 4;
    }
    if v01 >= threshold {
        case |= 8;
    }
    case
}

#[allow(clippy::suboptimal_flops)]
fn edge_point(a: Point, va: f64, b: Point, vb: f64, threshold: f64) -> Point {
    let denom = vb - va;
    let t = if denom.abs() < f64::EPSILON {
        0.5
    } else {
        (threshold - va) / denom
    };
    Point {
        x: a.x + t * (b.x - a.x),
        y: a.y + t * (b.y - a.y),
    }
}

/// Trace every contour segment of `field` at `threshold`.
#[allow(clippy::cast_precision_loss)]
pub fn marching_squares(field: &ScalarField, threshold: f64) -> Vec<Segment> {
    let mut segments = Vec::new();
    let rows = field.height().saturating_sub(1);
    let cols = field.width().saturating_sub(1);

    for y in 0..rows {
        for x in 0..cols {
            let (x1, y1) = (x.saturating_add(1), y.saturating_add(1));
            let v00 = field.get(x, y);
            let v10 = field.get(x1, y);
            let v01 = field.get(x, y1);
            let v11 = field.get(x1, y1);

            let case = cell_case(v00, v10, v11, v01, threshold);
            if case == 0 || case == 15 {
                continue;
            }

            let (fx, fy) = (x as f64, y as f64);
            let p00 = Point { x: fx, y: fy };
            let p10 = Point { x: fx + 1.0, y: fy };
            let p01 = Point { x: fx, y: fy + 1.0 };
            let p11 = Point {
                x: fx + 1.0,
                y: fy + 1.0,
            };

            let top = edge_point(p00, v00, p10, v10, threshold);
            let right = edge_point(p10, v10, p11, v11, threshold);
            let bottom = edge_point(p01, v01, p11, v11, threshold);
            let left = edge_point(p00, v00, p01, v01, threshold);

            let seg = |from, to| Segment { from, to };
            match case {
                1 | 14 => segments.push(seg(left, top)),
                2 | 13 => segments.push(seg(top, right)),
                3 | 12 => segments.push(seg(left, right)),
                4 | 11 => segments.push(seg(right, bottom)),
                5 => {
                    segments.push(seg(left, top));
                    segments.push(seg(right, bottom));
                }
                6 | 9 => segments.push(seg(top, bottom)),
                7 | 8 => segments.push(seg(left, bottom)),
                10 => {
                    segments.push(seg(top, right));
                    segments.push(seg(left, bottom));
                }
                _ => {}
            }
        }
    }

    segments
}

/// Render segments as SVG path data (`M x y L x y` per segment).
pub fn path_data(segments: &[Segment]) -> String {
    let mut out = String::new();
    for (i, s) in segments.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        let _ = write!(
            out,
            "M {:.2} {:.2} L {:.2} {:.2}",
            s.from.x, s.from.y, s.to.x, s.to.y
        );
    }
    out
}
