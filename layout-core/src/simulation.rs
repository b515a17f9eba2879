//! The layout simulation: setup, the per-tick update, and the cooling
//! schedule that decides when a run is done.
//!
//! A run is driven in one of two ways:
//! - fast: [`Simulation::run_to_convergence`] (or [`generate`]) ticks in a
//!   tight loop and only the final state is observed;
//! - animated: the caller invokes [`Simulation::tick`] at its own pace and
//!   may read [`Simulation::layout`] between ticks, or drop the simulation
//!   at any point.

use std::collections::HashMap;

use glam::DVec2;
use tracing::{debug, debug_span, info, trace};

use crate::body::Body;
use crate::building::{BuildingTemplate, LinkSpec};
use crate::config::{CanvasConfig, LayoutConfig};
use crate::error::Result;
use crate::forces::{CenterForce, CollisionForce, Force, LinkForce};
use crate::geometry::convex_overlap_area;
use crate::layout::{Layout, Placement};
use crate::links::{self, ResolvedLink};
use crate::random::SeededRandom;
use crate::types::BodyId;

/// Mutable state of one run. Owned by a single [`Simulation`] and never
/// shared between runs.
#[derive(Clone, Debug)]
struct SimulationState {
    bodies: Vec<Body>,
    alpha: f64,
    alpha_min: f64,
    alpha_decay: f64,
    alpha_target: f64,
    velocity_decay: f64,
}

impl SimulationState {
    /// Advances the cooling schedule by one tick and returns the new alpha.
    fn cool(&mut self) -> f64 {
        self.alpha += (self.alpha_target - self.alpha) * self.alpha_decay;
        self.alpha
    }

    /// Damps velocities, moves bodies by them and snaps grid positions.
    fn integrate(&mut self) {
        for b in self.bodies.iter_mut() {
            b.vel *= self.velocity_decay;
            b.pos += b.vel;
            b.snap();
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickStatus {
    /// More ticks are needed.
    Running,
    /// Alpha has cooled below its floor (or the tick cap was hit); further
    /// ticks are no-ops.
    Converged,
}

/// One layout run.
#[derive(Clone, Debug)]
pub struct Simulation {
    state: SimulationState,
    forces: Vec<Force>,
    links: Vec<ResolvedLink>,
    templates: Vec<BuildingTemplate>,
    canvas: CanvasConfig,
    ticks: usize,
    max_ticks: usize,
}

impl Simulation {
    /// Sets up a run.
    ///
    /// 1. Validates `cfg` and every template.
    /// 2. Places each body at the canvas center plus seeded jitter, drawing
    ///    the x then y offset per building in input order.
    /// 3. Resolves `links` to body indices, dropping dangling, self and
    ///    duplicate links, then auto-completes missing pairs with weak links
    ///    when `cfg.auto_link` is set.
    /// 4. Builds the link, center and collision forces, in that order.
    ///
    /// An empty `buildings` list gives a simulation that is converged from
    /// the start and yields an empty layout.
    ///
    /// ### Parameters
    /// - `buildings` - Templates; ids must be unique (the first one wins
    ///   when they are not).
    /// - `links` - Caller links by id.
    /// - `seed` - Seed for the jitter and every other random draw of the run.
    /// - `cfg` - Run tunables.
    ///
    /// ### Returns
    /// The ready-to-tick simulation, or the first validation error.
    pub fn new(
        buildings: &[BuildingTemplate],
        links: &[LinkSpec],
        seed: i64,
        cfg: &LayoutConfig,
    ) -> Result<Self> {
        let _span = debug_span!("layout_setup", buildings = buildings.len(), seed).entered();

        cfg.validate()?;
        for (i, t) in buildings.iter().enumerate() {
            t.validate(i)?;
        }

        let mut rng = SeededRandom::new(seed);
        let center = cfg.canvas.center();
        let bodies: Vec<Body> = buildings
            .iter()
            .map(|t| {
                let x = rng.next_range(-cfg.jitter, cfg.jitter);
                let y = rng.next_range(-cfg.jitter, cfg.jitter);
                Body::new(t, cfg.margin, center + DVec2::new(x, y))
            })
            .collect();

        let mut index: HashMap<&str, BodyId> = HashMap::with_capacity(bodies.len());
        for (i, t) in buildings.iter().enumerate() {
            if *index.entry(t.id.as_str()).or_insert(i) != i {
                debug!(id = %t.id, "duplicate building id");
            }
        }

        let mut resolved = links::resolve(links, &index)?;
        if cfg.auto_link {
            links::complete(&mut resolved, bodies.len(), cfg.weak_link_strength);
        }
        debug!(links = resolved.len(), "links resolved");

        let forces = vec![
            Force::Link(LinkForce::new(&resolved, bodies.len(), cfg, rng)),
            Force::Center(CenterForce {
                target: center,
                strength: cfg.center_strength,
            }),
            Force::Collision(CollisionForce::new(&bodies, &cfg.collision)),
        ];

        Ok(Self {
            state: SimulationState {
                bodies,
                alpha: cfg.alpha,
                alpha_min: cfg.alpha_min,
                alpha_decay: cfg.alpha_decay,
                alpha_target: cfg.alpha_target,
                velocity_decay: cfg.velocity_decay,
            },
            forces,
            links: resolved,
            templates: buildings.to_vec(),
            canvas: cfg.canvas,
            ticks: 0,
            max_ticks: cfg.max_ticks,
        })
    }

    pub fn is_converged(&self) -> bool {
        self.state.bodies.is_empty()
            || self.state.alpha < self.state.alpha_min
            || self.ticks >= self.max_ticks
    }

    /// Runs one tick: cool, apply every force, integrate, snap.
    ///
    /// Once converged this does nothing and keeps returning
    /// [`TickStatus::Converged`].
    pub fn tick(&mut self) -> TickStatus {
        if self.is_converged() {
            return TickStatus::Converged;
        }

        let alpha = self.state.cool();
        for force in self.forces.iter_mut() {
            force.apply(&mut self.state.bodies, alpha);
        }
        self.state.integrate();
        self.ticks += 1;
        trace!(tick = self.ticks, alpha, "tick");

        if self.is_converged() {
            info!(ticks = self.ticks, alpha, "layout converged");
            TickStatus::Converged
        } else {
            TickStatus::Running
        }
    }

    /// Ticks until converged and returns the number of ticks run by this
    /// call.
    pub fn run_to_convergence(&mut self) -> usize {
        let _span = debug_span!("layout_run", bodies = self.state.bodies.len()).entered();
        let start = self.ticks;
        while self.tick() == TickStatus::Running {}
        self.ticks - start
    }

    pub fn alpha(&self) -> f64 {
        self.state.alpha
    }

    pub fn ticks(&self) -> usize {
        self.ticks
    }

    pub fn bodies(&self) -> &[Body] {
        &self.state.bodies
    }

    /// Links acting on the bodies, including synthesized ones.
    pub fn links(&self) -> &[ResolvedLink] {
        &self.links
    }

    pub fn canvas(&self) -> &CanvasConfig {
        &self.canvas
    }

    /// Sum of the pairwise overlap areas of all outer polygons at the
    /// current continuous positions.
    pub fn total_overlap(&self) -> f64 {
        let world: Vec<_> = self.state.bodies.iter().map(Body::world_outer).collect();
        let mut sum = 0.0;
        for i in 0..world.len() {
            for j in (i + 1)..world.len() {
                sum += convex_overlap_area(&world[i], &world[j]);
            }
        }
        sum
    }

    /// Snapshot of the current placements.
    pub fn layout(&self) -> Layout {
        let placements = self
            .state
            .bodies
            .iter()
            .zip(&self.templates)
            .map(|(b, t)| Placement {
                id: t.id.clone(),
                name: t.name.clone(),
                color: t.color.clone(),
                shape: t.shape,
                position: b.pos,
                grid: b.grid,
                outer: b.outer.clone(),
                inner: b.inner.clone(),
            })
            .collect();

        Layout {
            placements,
            canvas: self.canvas,
            ticks: self.ticks,
            converged: self.is_converged(),
        }
    }

    /// Runs to convergence and returns the final layout.
    pub fn finish(mut self) -> Layout {
        self.run_to_convergence();
        self.layout()
    }
}

/// Lays out `buildings` in fast mode.
pub fn generate(
    buildings: &[BuildingTemplate],
    links: &[LinkSpec],
    seed: i64,
    cfg: &LayoutConfig,
) -> Result<Layout> {
    Ok(Simulation::new(buildings, links, seed, cfg)?.finish())
}
