//! Local-space polygons for building footprints, plus the convex polygon
//! helpers the rest of the crate measures them with.

use std::f64::consts::TAU;

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::types::{Point, Polygon};

/// Vertex count of the circle approximation.
pub const CIRCLE_SEGMENTS: usize = 32;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    Rectangle,
    /// Uses the template width as diameter; height is ignored.
    Circle,
}

/// Axis-aligned rectangle centered on the origin.
///
/// Half extents are `round(width / 2)` and `round(height / 2)`, so every
/// corner sits on an integer grid line and an even-sized rectangle covers
/// exactly `width * height` cells.
pub fn rectangle(width: f64, height: f64) -> Polygon {
    let hw = (width / 2.0).round();
    let hh = (height / 2.0).round();
    vec![
        DVec2::new(-hw, -hh),
        DVec2::new(hw, -hh),
        DVec2::new(hw, hh),
        DVec2::new(-hw, hh),
    ]
}

/// Regular [`CIRCLE_SEGMENTS`]-gon inscribed in a circle of `diameter`.
pub fn circle(diameter: f64) -> Polygon {
    let radius = diameter / 2.0;
    (0..CIRCLE_SEGMENTS)
        .map(|i| {
            let angle = i as f64 / CIRCLE_SEGMENTS as f64 * TAU;
            DVec2::new(angle.cos() * radius, angle.sin() * radius)
        })
        .collect()
}

/// Builds the `(outer, inner)` polygon pair for one building.
///
/// The inner polygon is the shape at its nominal size; the outer one is
/// inflated by `margin` (rectangles grow by `margin` per dimension, circles
/// by `margin / 2` in diameter).
pub fn build_pair(shape: ShapeKind, width: f64, height: f64, margin: f64) -> (Polygon, Polygon) {
    match shape {
        ShapeKind::Rectangle => (
            rectangle(width + margin, height + margin),
            rectangle(width, height),
        ),
        ShapeKind::Circle => (circle(width + margin / 2.0), circle(width)),
    }
}

/// Returns a copy of `poly` moved by `offset`.
pub fn translate(poly: &[Point], offset: DVec2) -> Polygon {
    poly.iter().map(|&p| p + offset).collect()
}

/// Axis-aligned bounds as `(min, max)`, or `None` for an empty polygon.
pub fn bounding_box(poly: &[Point]) -> Option<(DVec2, DVec2)> {
    let first = *poly.first()?;
    Some(
        poly.iter()
            .fold((first, first), |(lo, hi), &p| (lo.min(p), hi.max(p))),
    )
}

/// Signed shoelace area; positive for counter-clockwise winding (y up).
pub fn signed_area(poly: &[Point]) -> f64 {
    let n = poly.len();
    if n < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..n {
        let a = poly[i];
        let b = poly[(i + 1) % n];
        sum += a.perp_dot(b);
    }
    sum / 2.0
}

pub fn area(poly: &[Point]) -> f64 {
    signed_area(poly).abs()
}

/// Area of the intersection of two convex polygons.
///
/// Clips `subject` against every edge of `clip` (Sutherland–Hodgman) and
/// measures what is left. Both inputs must be convex; winding may differ.
pub fn convex_overlap_area(subject: &[Point], clip: &[Point]) -> f64 {
    if subject.len() < 3 || clip.len() < 3 {
        return 0.0;
    }
    let orient = signed_area(clip).signum();
    if orient == 0.0 {
        return 0.0;
    }

    let mut output: Polygon = subject.to_vec();
    let n = clip.len();
    for i in 0..n {
        if output.is_empty() {
            break;
        }
        let c1 = clip[i];
        let c2 = clip[(i + 1) % n];
        let edge = c2 - c1;
        let side = |p: DVec2| edge.perp_dot(p - c1) * orient;

        let input = std::mem::take(&mut output);
        let m = input.len();
        for j in 0..m {
            let cur = input[j];
            let prev = input[(j + m - 1) % m];
            let (s_cur, s_prev) = (side(cur), side(prev));

            if s_cur >= 0.0 {
                if s_prev < 0.0 {
                    output.push(prev + (cur - prev) * (s_prev / (s_prev - s_cur)));
                }
                output.push(cur);
            } else if s_prev >= 0.0 {
                output.push(prev + (cur - prev) * (s_prev / (s_prev - s_cur)));
            }
        }
    }

    area(&output)
}
