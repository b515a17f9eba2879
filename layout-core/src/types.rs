use glam::{DVec2, IVec2};

/// Identifier for a body in a [`crate::simulation::Simulation`].
///
/// This is an index into the simulation's body list, and is only meaningful
/// within the lifetime of a given simulation run.
pub type BodyId = usize;

/// A continuous position in grid units.
pub type Point = DVec2;

/// A closed polygon in local (body-centered) coordinates. The closing edge
/// from the last vertex back to the first is implicit.
pub type Polygon = Vec<Point>;

/// One integer cell of the tile grid.
pub type Tile = IVec2;
