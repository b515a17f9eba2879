use serde::{Deserialize, Serialize};

use crate::config::LayoutConfig;
use crate::error::{LayoutError, Result};
use crate::geometry::{ShapeKind, build_pair};
use crate::simulation::Simulation;
use crate::types::Polygon;

/// Immutable description of one building, as supplied by the caller.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BuildingTemplate {
    pub id: String,
    pub name: String,
    pub shape: ShapeKind,
    pub width: f64,
    /// Ignored for circles, which use `width` as diameter.
    pub height: f64,
    /// Render color, passed through untouched (e.g. `"#f97316"`).
    pub color: String,
}

impl BuildingTemplate {
    pub fn rectangle(id: &str, name: &str, width: f64, height: f64) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            shape: ShapeKind::Rectangle,
            width,
            height,
            color: String::from("#6b7280"),
        }
    }

    pub fn circle(id: &str, name: &str, diameter: f64) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            shape: ShapeKind::Circle,
            width: diameter,
            height: diameter,
            color: String::from("#6b7280"),
        }
    }

    pub fn with_color(mut self, color: &str) -> Self {
        self.color = color.to_string();
        self
    }

    /// Rejects templates that cannot produce a polygon.
    ///
    /// `index` is the template's position in the caller's list and is only
    /// used for the error message of an empty id.
    pub fn validate(&self, index: usize) -> Result<()> {
        if self.id.is_empty() {
            return Err(LayoutError::EmptyId { index });
        }
        let positive = |v: f64| v.is_finite() && v > 0.0;
        let height_ok = match self.shape {
            ShapeKind::Rectangle => positive(self.height),
            ShapeKind::Circle => true,
        };
        if !positive(self.width) || !height_ok {
            return Err(LayoutError::InvalidDimension {
                id: self.id.clone(),
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }

    /// `(outer, inner)` local polygons for this template.
    pub fn polygons(&self, margin: f64) -> (Polygon, Polygon) {
        build_pair(self.shape, self.width, self.height, margin)
    }
}

/// A weighted relationship between two buildings, by id. Direction carries
/// no meaning.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LinkSpec {
    pub source: String,
    pub target: String,
    /// Larger pulls the pair closer; the expected range is `[1, 10]`.
    pub strength: f64,
}

impl LinkSpec {
    pub fn new(source: &str, target: &str, strength: f64) -> Self {
        Self {
            source: source.to_string(),
            target: target.to_string(),
            strength,
        }
    }
}

/// Everything one layout run is a pure function of.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LayoutRequest {
    pub buildings: Vec<BuildingTemplate>,
    #[serde(default)]
    pub links: Vec<LinkSpec>,
    #[serde(default)]
    pub seed: i64,
    /// Run to convergence before returning instead of leaving the ticks to
    /// the caller.
    #[serde(default)]
    pub fast: bool,
}

impl LayoutRequest {
    /// Builds the simulation for this request. In fast mode the returned
    /// simulation has already converged.
    pub fn start(&self, cfg: &LayoutConfig) -> Result<Simulation> {
        let mut sim = Simulation::new(&self.buildings, &self.links, self.seed, cfg)?;
        if self.fast {
            sim.run_to_convergence();
        }
        Ok(sim)
    }
}
