//! Per-tick forces acting on the bodies of a simulation.
//!
//! Each tick applies, in order:
//! 1. [`LinkForce`] - springs between linked bodies, written into velocities.
//! 2. [`CenterForce`] - rigid translation of the cluster toward the canvas
//!    center.
//! 3. [`CollisionForce`] - pairwise SAT push-apart of overlapping outer
//!    polygons, written straight into positions.
//!
//! The forces are variants of the plain [`Force`] enum and all share one
//! entry point, [`Force::apply`].

use glam::DVec2;

use crate::body::{Body, pair_mut};
use crate::config::{CollisionConfig, LayoutConfig};
use crate::links::{ResolvedLink, degrees};
use crate::random::SeededRandom;
use crate::sat;
use crate::types::BodyId;

/// One spring of a [`LinkForce`], with everything the tick needs
/// precomputed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Spring {
    pub source: BodyId,
    pub target: BodyId,
    pub stiffness: f64,
    /// Share of the correction taken by the target; the source takes
    /// `1 - bias`.
    pub bias: f64,
}

/// Springs pulling linked bodies toward a fixed separation.
#[derive(Clone, Debug)]
pub struct LinkForce {
    springs: Vec<Spring>,
    distance: f64,
    rng: SeededRandom,
}

impl LinkForce {
    /// Builds the springs for `links` between `count` bodies.
    ///
    /// Stiffness is the link strength divided by `cfg.strength_scale`, then
    /// by the smaller endpoint degree (at least 1). The bias hands the larger share of each
    /// correction to the less-connected endpoint.
    ///
    /// ### Parameters
    /// - `links` - Resolved links of the run.
    /// - `count` - Number of bodies the indices refer to.
    /// - `cfg` - Supplies `link_distance` and `strength_scale`.
    /// - `rng` - Stream used to jiggle coincident endpoints apart.
    pub fn new(links: &[ResolvedLink], count: usize, cfg: &LayoutConfig, rng: SeededRandom) -> Self {
        let deg = degrees(links, count);
        let springs = links
            .iter()
            .map(|l| {
                let (ds, dt) = (deg[l.source] as f64, deg[l.target] as f64);
                Spring {
                    source: l.source,
                    target: l.target,
                    stiffness: l.strength / cfg.strength_scale / ds.min(dt).max(1.0),
                    bias: ds / (ds + dt),
                }
            })
            .collect();

        Self {
            springs,
            distance: cfg.link_distance,
            rng,
        }
    }

    pub fn springs(&self) -> &[Spring] {
        &self.springs
    }

    fn jiggle(&mut self) -> f64 {
        (self.rng.next_f64() - 0.5) * 1e-6
    }

    fn apply(&mut self, bodies: &mut [Body], alpha: f64) {
        for i in 0..self.springs.len() {
            let s = self.springs[i];
            let (src, tgt) = (&bodies[s.source], &bodies[s.target]);

            // Separation after this tick's velocities.
            let mut d = (tgt.pos + tgt.vel) - (src.pos + src.vel);
            if d.x == 0.0 {
                d.x = self.jiggle();
            }
            if d.y == 0.0 {
                d.y = self.jiggle();
            }

            let len = d.length();
            let d = d * ((len - self.distance) / len * alpha * s.stiffness);

            bodies[s.target].vel -= d * s.bias;
            bodies[s.source].vel += d * (1.0 - s.bias);
        }
    }
}

/// Moves the whole cluster so its centroid approaches `target`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CenterForce {
    pub target: DVec2,
    /// Fraction of the centroid offset removed per tick.
    pub strength: f64,
}

impl CenterForce {
    fn apply(&self, bodies: &mut [Body]) {
        if bodies.is_empty() {
            return;
        }
        let centroid = bodies.iter().map(|b| b.pos).sum::<DVec2>() / bodies.len() as f64;
        let shift = (self.target - centroid) * self.strength;
        for b in bodies.iter_mut() {
            b.pos += shift;
        }
    }
}

/// Pushes apart bodies whose outer polygons overlap.
#[derive(Clone, Debug, PartialEq)]
pub struct CollisionForce {
    /// Participating bodies, ascending.
    members: Vec<BodyId>,
    iterations: usize,
    damping: f64,
}

impl CollisionForce {
    /// Selects the bodies whose id is not in `cfg.exclude_ids`.
    pub fn new(bodies: &[Body], cfg: &CollisionConfig) -> Self {
        let members = bodies
            .iter()
            .enumerate()
            .filter(|(_, b)| !cfg.exclude_ids.contains(&b.id))
            .map(|(i, _)| i)
            .collect();
        Self {
            members,
            iterations: cfg.iterations,
            damping: cfg.damping,
        }
    }

    pub fn members(&self) -> &[BodyId] {
        &self.members
    }

    /// Runs `iterations` relaxation passes over every member pair.
    ///
    /// For an overlapping pair `(a, b)` with minimum translation vector `v`
    /// (pointing from `a` to `b`), the offset `v * damping / 2` is applied
    /// twice to each side: `a -= 2 * offset`, `b += 2 * offset`. Each body
    /// therefore moves `damping * v`, and with the default damping of 0.5 a
    /// lone pair is fully separated in one pass.
    ///
    /// Chains of overlaps resolve progressively over passes and ticks; a
    /// single call does not guarantee zero overlap.
    pub fn apply(&self, bodies: &mut [Body]) {
        let scale = self.damping / 2.0;
        for _ in 0..self.iterations {
            for (k, &i) in self.members.iter().enumerate() {
                for &j in &self.members[k + 1..] {
                    let (a, b) = pair_mut(bodies, i, j);
                    let Some(hit) = sat::test_polygons(a.pos, &a.outer, b.pos, &b.outer) else {
                        continue;
                    };
                    let offset = hit.mtv() * scale;
                    a.pos -= offset * 2.0;
                    b.pos += offset * 2.0;
                }
            }
        }
    }
}

/// The forces a simulation applies each tick.
#[derive(Clone, Debug)]
pub enum Force {
    Link(LinkForce),
    Center(CenterForce),
    Collision(CollisionForce),
}

impl Force {
    /// Applies this force to `bodies` at the current `alpha`.
    ///
    /// Only the link force scales with `alpha`; centering and collision are
    /// positional corrections applied in full every tick.
    pub fn apply(&mut self, bodies: &mut [Body], alpha: f64) {
        match self {
            Force::Link(f) => f.apply(bodies, alpha),
            Force::Center(f) => f.apply(bodies),
            Force::Collision(f) => f.apply(bodies),
        }
    }
}
