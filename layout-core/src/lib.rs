//! Core building layout library: seeded force-directed placement of
//! rectangular and circular buildings on a tile grid.
//!
//! Main components:
//! - [`random`] - deterministic Park–Miller generator driving every draw.
//! - [`geometry`] - shape construction and polygon helpers.
//! - [`raster`] - polygon to grid tile conversion.
//! - [`sat`] - separating-axis collision between convex polygons.
//! - [`building`] - building templates, links and layout requests.
//! - [`links`] - link resolution and auto-completion.
//! - [`body`] - per-run building state.
//! - [`forces`] - link, centering and collision forces.
//! - [`simulation`] - the tick loop and cooling schedule.
//! - [`layout`] - snapshots of final or intermediate placements.
//! - [`config`] - run tunables.
//! - [`error`] - error type for invalid input.
//! - [`types`] - shared type aliases and IDs.

pub mod body;
pub mod building;
pub mod config;
pub mod error;
pub mod forces;
pub mod geometry;
pub mod layout;
pub mod links;
pub mod random;
pub mod raster;
pub mod sat;
pub mod simulation;
pub mod types;

pub use building::{BuildingTemplate, LayoutRequest, LinkSpec};
pub use config::LayoutConfig;
pub use error::{LayoutError, Result};
pub use layout::{Layout, Placement};
pub use simulation::{Simulation, TickStatus, generate};
