//! Conversion of continuous polygons into grid tiles.

use glam::{DVec2, IVec2};

use crate::config::CanvasConfig;
use crate::geometry::bounding_box;
use crate::types::{Point, Tile};

/// Even-odd ray-casting test.
///
/// A horizontal ray is cast from `point` towards +x and every polygon edge
/// it crosses toggles the result. An edge counts when exactly one of its end
/// points lies strictly above `point.y`, so horizontal edges never count and
/// shared vertices are counted once.
///
/// Points exactly on an edge resolve the usual half-open way: for an
/// axis-aligned rectangle the minimum-x and minimum-y edges are inside, the
/// maximum-x and maximum-y edges are outside.
pub fn point_in_polygon(point: Point, poly: &[Point]) -> bool {
    let (x, y) = (point.x, point.y);
    let mut inside = false;
    let n = poly.len();
    if n == 0 {
        return false;
    }

    let mut j = n - 1;
    for i in 0..n {
        let (pi, pj) = (poly[i], poly[j]);
        if (pi.y > y) != (pj.y > y) && x < (pj.x - pi.x) * (y - pi.y) / (pj.y - pi.y) + pi.x {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Cells sampled by [`polygon_to_grid_tiles`]: the canvas plus one full
/// canvas of overhang on every side, as half-open `(min, max)` corners.
pub fn sampling_window(canvas: &CanvasConfig) -> (IVec2, IVec2) {
    let size = IVec2::new(canvas.width, canvas.height);
    (-size, size * 2)
}

/// Rasterizes a local-space polygon into the cells whose centers lie inside
/// it.
///
/// Only cells inside [`sampling_window`] are considered. The result is in
/// row-major order (by `y`, then `x`) and contains each cell once. Tiles are
/// in the polygon's local frame; translate them by the body's grid position
/// before drawing.
pub fn polygon_to_grid_tiles(poly: &[Point], canvas: &CanvasConfig) -> Vec<Tile> {
    let Some((lo, hi)) = bounding_box(poly) else {
        return Vec::new();
    };
    let (win_lo, win_hi) = sampling_window(canvas);

    // Cells whose centers fall outside the bounding box can never test inside,
    // so scanning only the box gives the same set as scanning the window.
    // Clamp in f64 before casting; huge polygons would saturate the cast.
    let (wlo, whi) = (win_lo.as_dvec2(), win_hi.as_dvec2());
    let x0 = (lo.x.floor() - 1.0).clamp(wlo.x, whi.x) as i32;
    let x1 = (hi.x.ceil() + 1.0).clamp(wlo.x, whi.x) as i32;
    let y0 = (lo.y.floor() - 1.0).clamp(wlo.y, whi.y) as i32;
    let y1 = (hi.y.ceil() + 1.0).clamp(wlo.y, whi.y) as i32;

    let mut tiles = Vec::new();
    for y in y0..y1 {
        for x in x0..x1 {
            let center = DVec2::new(x as f64 + 0.5, y as f64 + 0.5);
            if point_in_polygon(center, poly) {
                tiles.push(IVec2::new(x, y));
            }
        }
    }
    tiles
}

/// Scales a tile coordinate to render units.
pub fn tile_to_coords(tile: Tile, cell_size: f64) -> DVec2 {
    tile.as_dvec2() * cell_size
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{circle, rectangle, translate};
    use proptest::prelude::*;
    use std::collections::HashSet;

    #[test]
    fn point_in_square() {
        let sq = rectangle(4.0, 4.0);
        assert!(point_in_polygon(DVec2::ZERO, &sq));
        assert!(!point_in_polygon(DVec2::new(3.0, 3.0), &sq));
    }

    #[test]
    fn edge_points_are_half_open() {
        let sq = rectangle(4.0, 4.0);
        assert!(point_in_polygon(DVec2::new(-2.0, 0.0), &sq));
        assert!(!point_in_polygon(DVec2::new(2.0, 0.0), &sq));
        assert!(point_in_polygon(DVec2::new(0.0, -2.0), &sq));
        assert!(!point_in_polygon(DVec2::new(0.0, 2.0), &sq));
    }

    #[test]
    fn degenerate_polygons_contain_nothing() {
        assert!(!point_in_polygon(DVec2::ZERO, &[]));
        assert!(polygon_to_grid_tiles(&[], &CanvasConfig::default()).is_empty());
    }

    #[test]
    fn concave_polygon_uses_even_odd_rule() {
        // A "U" shape: the notch between the arms is outside.
        let u = vec![
            DVec2::new(0.0, 0.0),
            DVec2::new(6.0, 0.0),
            DVec2::new(6.0, 6.0),
            DVec2::new(4.0, 6.0),
            DVec2::new(4.0, 2.0),
            DVec2::new(2.0, 2.0),
            DVec2::new(2.0, 6.0),
            DVec2::new(0.0, 6.0),
        ];
        assert!(point_in_polygon(DVec2::new(1.0, 4.0), &u));
        assert!(!point_in_polygon(DVec2::new(3.0, 4.0), &u));
        assert!(point_in_polygon(DVec2::new(5.0, 4.0), &u));
    }

    #[test]
    fn square_rasterizes_to_centered_block() {
        let tiles = polygon_to_grid_tiles(&rectangle(4.0, 4.0), &CanvasConfig::default());
        assert_eq!(tiles.len(), 16);
        assert_eq!(tiles.first(), Some(&IVec2::new(-2, -2)));
        assert_eq!(tiles.last(), Some(&IVec2::new(1, 1)));
    }

    #[test]
    fn tiles_are_unique_and_row_major() {
        let tiles = polygon_to_grid_tiles(&circle(9.0), &CanvasConfig::default());
        let set: HashSet<_> = tiles.iter().copied().collect();
        assert_eq!(set.len(), tiles.len());
        assert!(
            tiles
                .windows(2)
                .all(|w| (w[0].y, w[0].x) < (w[1].y, w[1].x))
        );
    }

    #[test]
    fn circle_footprint_is_symmetric() {
        let tiles: HashSet<_> = polygon_to_grid_tiles(&circle(8.0), &CanvasConfig::default())
            .into_iter()
            .collect();
        assert!(!tiles.is_empty());
        for t in &tiles {
            // Cell (x, y) mirrors onto (-x - 1, y) around the origin line.
            assert!(tiles.contains(&IVec2::new(-t.x - 1, t.y)), "{t}");
        }
    }

    #[test]
    fn tiles_outside_the_window_are_dropped() {
        let canvas = CanvasConfig {
            width: 10,
            height: 10,
            cell_size: 1.0,
        };
        // Spans x in [-20, 20); the window is [-10, 20).
        let tiles = polygon_to_grid_tiles(&rectangle(40.0, 2.0), &canvas);
        assert_eq!(tiles.len(), 30 * 2);
        assert!(tiles.iter().all(|t| t.x >= -10 && t.x < 20));
    }

    #[test]
    fn bounded_scan_matches_full_window_scan() {
        let canvas = CanvasConfig {
            width: 20,
            height: 20,
            cell_size: 1.0,
        };
        let poly = translate(&circle(7.5), DVec2::new(3.3, -1.7));

        let (lo, hi) = sampling_window(&canvas);
        let mut full = Vec::new();
        for y in lo.y..hi.y {
            for x in lo.x..hi.x {
                if point_in_polygon(DVec2::new(x as f64 + 0.5, y as f64 + 0.5), &poly) {
                    full.push(IVec2::new(x, y));
                }
            }
        }
        assert_eq!(polygon_to_grid_tiles(&poly, &canvas), full);
    }

    #[test]
    fn polygon_larger_than_window_is_clipped_to_window() {
        let canvas = CanvasConfig::default();
        let tiles = polygon_to_grid_tiles(&rectangle(1e10, 4.0), &canvas);

        // x spans the whole [-100, 200) window; y covers rows -2..2.
        assert_eq!(tiles.len(), 300 * 4);
        assert_eq!(tiles.first(), Some(&IVec2::new(-100, -2)));
        assert_eq!(tiles.last(), Some(&IVec2::new(199, 1)));
    }

    #[test]
    fn polygon_far_outside_window_has_no_tiles() {
        let poly = translate(&rectangle(4.0, 4.0), DVec2::new(1e12, -1e12));
        assert!(polygon_to_grid_tiles(&poly, &CanvasConfig::default()).is_empty());
    }

    #[test]
    fn tile_to_coords_scales_by_cell_size() {
        assert_eq!(tile_to_coords(IVec2::new(3, -2), 10.0), DVec2::new(30.0, -20.0));
    }

    proptest! {
        #[test]
        fn even_rectangle_covers_width_times_height(hw in 1i32..=50, hh in 1i32..=50) {
            let (w, h) = (hw * 2, hh * 2);
            let tiles = polygon_to_grid_tiles(&rectangle(w as f64, h as f64), &CanvasConfig::default());
            prop_assert_eq!(tiles.len(), (w * h) as usize);
        }
    }
}
