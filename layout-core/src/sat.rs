//! Separating-axis test for convex polygons.

use glam::DVec2;

use crate::types::Point;

/// Result of an overlapping [`test_polygons`] call.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Overlap {
    /// Penetration depth along `normal`. Zero when the polygons only touch.
    pub depth: f64,
    /// Unit axis of least penetration, pointing from `a` towards `b`.
    pub normal: DVec2,
}

impl Overlap {
    /// Minimum translation vector: moving `a` by `-mtv()` (or `b` by
    /// `+mtv()`) separates the pair.
    pub fn mtv(&self) -> DVec2 {
        self.normal * self.depth
    }
}

fn project(points: &[Point], offset: DVec2, axis: DVec2) -> (f64, f64) {
    points.iter().fold((f64::MAX, f64::MIN), |(lo, hi), &p| {
        let d = (p + offset).dot(axis);
        (lo.min(d), hi.max(d))
    })
}

/// Tests one candidate axis. Returns `None` if it separates the polygons,
/// otherwise the signed overlap along it (negative means the push-out runs
/// against the axis).
fn axis_overlap(a: (f64, f64), b: (f64, f64)) -> Option<f64> {
    let ((a_lo, a_hi), (b_lo, b_hi)) = (a, b);
    if a_lo > b_hi || b_lo > a_hi {
        return None;
    }

    let overlap = if a_lo < b_lo && a_hi < b_hi {
        a_hi - b_lo
    } else if a_lo >= b_lo && a_hi > b_hi {
        a_lo - b_hi
    } else {
        // One projection contains the other: push out whichever way is shorter.
        let forward = a_hi - b_lo;
        let backward = b_hi - a_lo;
        if forward < backward { forward } else { -backward }
    };
    Some(overlap)
}

/// Runs the separating-axis test on two convex polygons placed at `a_pos`
/// and `b_pos`.
///
/// Candidate axes are the edge normals of `a` followed by those of `b`.
/// Projections that merely touch do not separate, so touching polygons
/// report an [`Overlap`] with zero depth.
///
/// ### Returns
/// - `None` if some axis separates the polygons.
/// - `Some(Overlap)` with the axis of least penetration otherwise; ties keep
///   the first axis found.
pub fn test_polygons(a_pos: DVec2, a: &[Point], b_pos: DVec2, b: &[Point]) -> Option<Overlap> {
    let mut best = Overlap {
        depth: f64::MAX,
        normal: DVec2::ZERO,
    };

    for poly in [a, b] {
        let n = poly.len();
        for i in 0..n {
            let edge = poly[(i + 1) % n] - poly[i];
            let axis = DVec2::new(edge.y, -edge.x).normalize_or_zero();
            if axis == DVec2::ZERO {
                continue;
            }

            let overlap = axis_overlap(project(a, a_pos, axis), project(b, b_pos, axis))?;
            if overlap.abs() < best.depth {
                best.depth = overlap.abs();
                best.normal = if overlap < 0.0 { -axis } else { axis };
            }
        }
    }

    (best.normal != DVec2::ZERO).then_some(best)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{circle, rectangle};

    #[test]
    fn separated_squares_do_not_overlap() {
        let sq = rectangle(4.0, 4.0);
        assert!(test_polygons(DVec2::ZERO, &sq, DVec2::new(5.0, 0.0), &sq).is_none());
        assert!(test_polygons(DVec2::ZERO, &sq, DVec2::new(3.0, 4.5), &sq).is_none());
    }

    #[test]
    fn overlapping_squares_push_along_shortest_axis() {
        let sq = rectangle(4.0, 4.0);
        let hit = test_polygons(DVec2::ZERO, &sq, DVec2::new(3.0, 0.5), &sq).unwrap();
        assert!((hit.depth - 1.0).abs() < 1e-12);
        assert_eq!(hit.normal, DVec2::new(1.0, 0.0));
        assert_eq!(hit.mtv(), DVec2::new(1.0, 0.0));
    }

    #[test]
    fn normal_points_from_a_to_b() {
        let sq = rectangle(4.0, 4.0);
        let hit = test_polygons(DVec2::new(0.0, 3.0), &sq, DVec2::ZERO, &sq).unwrap();
        assert_eq!(hit.normal, DVec2::new(0.0, -1.0));
        assert!((hit.depth - 1.0).abs() < 1e-12);
    }

    #[test]
    fn touching_squares_report_zero_depth() {
        let sq = rectangle(4.0, 4.0);
        let hit = test_polygons(DVec2::ZERO, &sq, DVec2::new(4.0, 0.0), &sq).unwrap();
        assert_eq!(hit.depth, 0.0);
    }

    #[test]
    fn contained_polygon_escapes_the_short_way() {
        let big = rectangle(10.0, 10.0);
        let small = rectangle(2.0, 2.0);
        // small sits near big's right wall: leaving right costs 3, left costs 9.
        let hit = test_polygons(DVec2::ZERO, &big, DVec2::new(3.0, 0.0), &small).unwrap();
        assert_eq!(hit.normal, DVec2::new(1.0, 0.0));
        assert!((hit.depth - 3.0).abs() < 1e-12);
    }

    #[test]
    fn circles_overlap_by_radius_sum_minus_distance() {
        let c = circle(4.0);
        let hit = test_polygons(DVec2::ZERO, &c, DVec2::new(3.0, 0.0), &c).unwrap();
        assert!(hit.depth > 0.0 && hit.depth <= 1.0 + 1e-9);
        assert!(hit.normal.x > 0.9);
    }
}
