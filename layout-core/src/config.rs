use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::error::{LayoutError, Result};

/// Size of the square grid the layout is centered in.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    /// Canvas width in cells.
    pub width: i32,
    /// Canvas height in cells.
    pub height: i32,
    /// Render units per cell.
    pub cell_size: f64,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: 100,
            height: 100,
            cell_size: 10.0,
        }
    }
}

impl CanvasConfig {
    /// Center of the canvas in grid units; the centering force pulls here.
    pub fn center(&self) -> DVec2 {
        DVec2::new(self.width as f64 / 2.0, self.height as f64 / 2.0)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollisionConfig {
    /// Relaxation passes per tick.
    pub iterations: usize,
    pub damping: f64,
    /// Buildings that never collide and are never displaced by collisions.
    pub exclude_ids: Vec<String>,
}

impl Default for CollisionConfig {
    fn default() -> Self {
        Self {
            iterations: 10,
            damping: 0.5,
            exclude_ids: Vec::new(),
        }
    }
}

/// Tunables for one layout run.
///
/// Every field has a default, so a partial JSON object deserializes into a
/// complete config.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub canvas: CanvasConfig,
    pub collision: CollisionConfig,

    /// Outer polygon inflation over the inner footprint.
    pub margin: f64,
    /// Separation the link force pulls linked centers toward.
    pub link_distance: f64,
    /// Strength given to links synthesized by auto-completion.
    pub weak_link_strength: f64,
    /// Upper end of the link strength range; strengths are divided by this
    /// before they become spring stiffness.
    pub strength_scale: f64,
    pub auto_link: bool,
    pub center_strength: f64,
    /// Initial positions are the canvas center plus a uniform offset in
    /// `[-jitter, jitter)` per axis.
    pub jitter: f64,

    pub alpha: f64,
    pub alpha_min: f64,
    pub alpha_decay: f64,
    pub alpha_target: f64,
    pub velocity_decay: f64,
    /// Upper bound on ticks for a run-to-convergence.
    pub max_ticks: usize,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        let alpha_min = 0.001;
        Self {
            canvas: CanvasConfig::default(),
            collision: CollisionConfig::default(),
            margin: 1.0,
            link_distance: 10.0,
            weak_link_strength: 1.0,
            strength_scale: 10.0,
            auto_link: true,
            center_strength: 0.1,
            jitter: 1.0,
            alpha: 1.0,
            alpha_min,
            // Reaches alpha_min from 1.0 in ~300 ticks.
            alpha_decay: 1.0 - alpha_min.powf(1.0 / 300.0),
            alpha_target: 0.0,
            velocity_decay: 0.6,
            max_ticks: 10_000,
        }
    }
}

impl LayoutConfig {
    /// Checks every field against its domain.
    ///
    /// ### Returns
    /// - `Ok(())` if the config can drive a simulation.
    /// - `Err(LayoutError::InvalidConfig)` naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        fn check(ok: bool, what: &str) -> Result<()> {
            if ok {
                Ok(())
            } else {
                Err(LayoutError::InvalidConfig(what.to_string()))
            }
        }

        let c = &self.canvas;
        check(c.width > 0 && c.height > 0, "canvas must be at least 1x1")?;
        check(
            c.cell_size.is_finite() && c.cell_size > 0.0,
            "cell_size must be positive",
        )?;
        check(
            self.margin.is_finite() && self.margin >= 0.0,
            "margin must be non-negative",
        )?;
        check(
            self.link_distance.is_finite() && self.link_distance >= 0.0,
            "link_distance must be non-negative",
        )?;
        check(
            self.weak_link_strength.is_finite() && self.weak_link_strength > 0.0,
            "weak_link_strength must be positive",
        )?;
        check(
            self.strength_scale.is_finite() && self.strength_scale > 0.0,
            "strength_scale must be positive",
        )?;
        check(
            (0.0..=1.0).contains(&self.center_strength),
            "center_strength must be in [0, 1]",
        )?;
        check(
            self.jitter.is_finite() && self.jitter >= 0.0,
            "jitter must be non-negative",
        )?;
        check(
            self.alpha_decay > 0.0 && self.alpha_decay <= 1.0,
            "alpha_decay must be in (0, 1]",
        )?;
        check(
            self.alpha_min.is_finite() && self.alpha_min > self.alpha_target,
            "alpha_min must exceed alpha_target",
        )?;
        check(self.alpha.is_finite(), "alpha must be finite")?;
        check(
            (0.0..=1.0).contains(&self.velocity_decay),
            "velocity_decay must be in [0, 1]",
        )?;
        check(
            (0.0..=1.0).contains(&self.collision.damping),
            "collision damping must be in [0, 1]",
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert_eq!(LayoutConfig::default().validate(), Ok(()));
    }

    #[test]
    fn default_decay_cools_in_about_300_ticks() {
        let cfg = LayoutConfig::default();
        assert!((cfg.alpha_decay - 0.0228).abs() < 1e-3);

        let mut alpha = cfg.alpha;
        let mut ticks = 0;
        while alpha >= cfg.alpha_min {
            alpha += (cfg.alpha_target - alpha) * cfg.alpha_decay;
            ticks += 1;
        }
        assert!((299..=301).contains(&ticks), "ticks = {ticks}");
    }

    #[test]
    fn validate_rejects_out_of_range_values() {
        let mut cfg = LayoutConfig::default();
        cfg.alpha_decay = 0.0;
        assert!(matches!(cfg.validate(), Err(LayoutError::InvalidConfig(_))));

        let mut cfg = LayoutConfig::default();
        cfg.canvas.width = 0;
        assert!(cfg.validate().is_err());

        let mut cfg = LayoutConfig::default();
        cfg.velocity_decay = 1.5;
        assert!(cfg.validate().is_err());

        // A target above the floor would never converge.
        let mut cfg = LayoutConfig::default();
        cfg.alpha_target = 0.5;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn partial_json_fills_in_defaults() {
        let cfg: LayoutConfig =
            serde_json::from_str(r#"{ "link_distance": 12.0, "collision": { "iterations": 4 } }"#)
                .unwrap();

        assert_eq!(cfg.link_distance, 12.0);
        assert_eq!(cfg.collision.iterations, 4);
        assert_eq!(cfg.collision.damping, 0.5);
        assert_eq!(cfg.canvas, CanvasConfig::default());
    }
}
