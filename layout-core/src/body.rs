use glam::{DVec2, IVec2};

use crate::building::BuildingTemplate;
use crate::geometry::translate;
use crate::types::Polygon;

/// A building instance inside one simulation run.
#[derive(Clone, Debug)]
pub struct Body {
    pub id: String,
    /// Collision footprint, local coordinates.
    pub outer: Polygon,
    /// Tile footprint, local coordinates.
    pub inner: Polygon,
    pub pos: DVec2,
    pub vel: DVec2,
    /// `floor(pos)`, refreshed after every tick.
    pub grid: IVec2,
}

impl Body {
    pub fn new(template: &BuildingTemplate, margin: f64, pos: DVec2) -> Self {
        let (outer, inner) = template.polygons(margin);
        let mut body = Self {
            id: template.id.clone(),
            outer,
            inner,
            pos,
            vel: DVec2::ZERO,
            grid: IVec2::ZERO,
        };
        body.snap();
        body
    }

    /// Floors the continuous position onto the grid.
    #[inline]
    pub fn snap(&mut self) {
        self.grid = self.pos.floor().as_ivec2();
    }

    pub fn world_outer(&self) -> Polygon {
        translate(&self.outer, self.pos)
    }
}

/// Borrows two distinct bodies mutably at once.
///
/// ### Panics
/// Panics if `i == j` or either index is out of bounds.
pub fn pair_mut(bodies: &mut [Body], i: usize, j: usize) -> (&mut Body, &mut Body) {
    assert_ne!(i, j);
    if i < j {
        let (lo, hi) = bodies.split_at_mut(j);
        (&mut lo[i], &mut hi[0])
    } else {
        let (lo, hi) = bodies.split_at_mut(i);
        (&mut hi[0], &mut lo[j])
    }
}
