use glam::{DVec2, IVec2};

use crate::config::CanvasConfig;
use crate::geometry::{ShapeKind, translate};
use crate::raster::polygon_to_grid_tiles;
use crate::types::{Polygon, Tile};

/// Where one building ended up.
#[derive(Clone, Debug, PartialEq)]
pub struct Placement {
    pub id: String,
    pub name: String,
    pub color: String,
    pub shape: ShapeKind,
    /// Continuous position at the time of the snapshot.
    pub position: DVec2,
    /// `floor(position)`; the position used for tiles and rendering.
    pub grid: IVec2,
    pub outer: Polygon,
    pub inner: Polygon,
}

impl Placement {
    /// Inner-polygon tiles in the building's local frame.
    pub fn local_tiles(&self, canvas: &CanvasConfig) -> Vec<Tile> {
        polygon_to_grid_tiles(&self.inner, canvas)
    }

    /// Inner-polygon tiles translated to the building's grid position.
    pub fn world_tiles(&self, canvas: &CanvasConfig) -> Vec<Tile> {
        let mut tiles = self.local_tiles(canvas);
        for t in tiles.iter_mut() {
            *t += self.grid;
        }
        tiles
    }

    /// Outer polygon at the grid position.
    pub fn grid_outer(&self) -> Polygon {
        translate(&self.outer, self.grid.as_dvec2())
    }

    /// Inner polygon at the grid position.
    pub fn grid_inner(&self) -> Polygon {
        translate(&self.inner, self.grid.as_dvec2())
    }
}

/// A snapshot of every building's placement.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Layout {
    pub placements: Vec<Placement>,
    pub canvas: CanvasConfig,
    /// Ticks run when the snapshot was taken.
    pub ticks: usize,
    pub converged: bool,
}

impl Layout {
    pub fn len(&self) -> usize {
        self.placements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Placement> {
        self.placements.iter().find(|p| p.id == id)
    }

    /// Half-open tile bounds `(min, max)` covering every building's world
    /// tiles, or `None` if no building covers a tile.
    pub fn bounds(&self) -> Option<(IVec2, IVec2)> {
        self.placements
            .iter()
            .flat_map(|p| p.world_tiles(&self.canvas))
            .fold(None, |acc, t| match acc {
                None => Some((t, t + IVec2::ONE)),
                Some((lo, hi)) => Some((lo.min(t), hi.max(t + IVec2::ONE))),
            })
    }
}
