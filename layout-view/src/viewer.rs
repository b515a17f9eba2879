//! Interactive building layout viewer built with eframe/egui.
//!
//! This module defines [`Viewer`], which owns one [`Simulation`] plus the
//! request and configuration it was built from, and implements
//! [`eframe::App`] to animate and draw it.

use eframe::App;
use glam::DVec2;
use layout_core::{LayoutConfig, LayoutRequest, Simulation, TickStatus};
use rand::Rng;
use tracing::{error, info};

/// Main application state for the interactive viewer.
///
/// The typical per-frame update is:
/// 1. Handle UI interactions / input.
/// 2. If `running` is `true` and enough time has passed, call [`Viewer::step_once`].
/// 3. Render tiles, outlines, labels and links of the current snapshot.
///
/// ### Fields
/// - `request` - Buildings, links and seed the simulation was started from.
/// - `cfg` - Tunables applied on the next restart.
/// - `sim` - The live simulation.
///
/// - `running` - Whether the simulation is currently auto-advancing.
/// - `zoom` - Screen pixels per canvas cell.
/// - `pan` - Screen-space pan offset in pixels.
/// - `show_outlines` - Draw outer (collision) polygons.
/// - `show_links` - Draw lines between linked buildings.
///
/// - `step_interval` - Target time between automatic ticks (seconds).
/// - `last_step_time` - Time stamp of the last tick (egui time).
/// - `last_step_dt` - Actual time delta between the last two ticks (for display only).
pub struct Viewer {
    request: LayoutRequest,
    cfg: LayoutConfig,
    sim: Simulation,

    running: bool,
    zoom: f32,
    pan: egui::Vec2,
    show_outlines: bool,
    show_links: bool,

    step_interval: f64,
    last_step_time: f64,
    last_step_dt: f64,
}

impl Viewer {
    /// Creates a viewer for `request`.
    ///
    /// In fast mode the simulation is run to convergence right away and the
    /// final layout is shown; otherwise the viewer starts paused at tick 0.
    ///
    /// ### Returns
    /// - `Ok(Viewer)` ready to be passed to `eframe::run_native`.
    /// - `Err` if the request or configuration is invalid.
    pub fn new(request: LayoutRequest, cfg: LayoutConfig) -> layout_core::Result<Self> {
        let sim = request.start(&cfg)?;
        Ok(Self {
            request,
            cfg,
            sim,
            running: false,
            zoom: 6.0,
            pan: egui::vec2(0.0, 0.0),
            show_outlines: true,
            show_links: true,
            step_interval: 0.02,
            last_step_time: 0.0,
            last_step_dt: 0.0,
        })
    }

    /// Rebuilds the simulation from the current request and config.
    ///
    /// On an invalid config the old simulation is kept and the error is
    /// logged.
    fn restart(&mut self) {
        match self.request.start(&self.cfg) {
            Ok(sim) => {
                info!(seed = self.request.seed, fast = self.request.fast, "restarted layout");
                self.sim = sim;
            }
            Err(e) => error!(error = %e, "cannot restart layout"),
        }
        self.running = false;
        self.last_step_dt = 0.0;
    }

    /// Rolls a fresh seed and restarts.
    fn reseed(&mut self) {
        self.request.seed = rand::rng().random::<i32>() as i64;
        self.restart();
    }

    /// Advances the simulation by one tick and stops auto-running once it
    /// has converged.
    fn step_once(&mut self) {
        if self.sim.tick() == TickStatus::Converged {
            self.running = false;
        }
    }

    /// Converts a canvas position (in cells) to screen-space.
    ///
    /// The canvas center is mapped to the center of `rect`, offset by
    /// `pan`. Canvas y grows downward, like screen y.
    ///
    /// ### Parameters
    /// - `p` - Canvas-space position.
    /// - `rect` - Screen-space rectangle representing the drawing area.
    ///
    /// ### Returns
    /// The corresponding egui position in screen-space.
    fn world_to_screen(&self, p: DVec2, rect: egui::Rect) -> egui::Pos2 {
        let local = (p - self.sim.canvas().center()).as_vec2() * self.zoom;
        rect.center() + egui::vec2(local.x, local.y) + self.pan
    }

    /// Inverse of [`Viewer::world_to_screen`] (up to floating point
    /// rounding).
    fn screen_to_world(&self, p: egui::Pos2, rect: egui::Rect) -> DVec2 {
        let local = (p - rect.center() - self.pan) / self.zoom;
        DVec2::new(local.x as f64, local.y as f64) + self.sim.canvas().center()
    }

    /// Helper to draw a labeled `usize` [`egui::DragValue`].
    fn labeled_drag_usize(
        ui: &mut egui::Ui,
        label: &str,
        value: &mut usize,
        range: std::ops::RangeInclusive<usize>,
        speed: f64,
    ) {
        ui.horizontal(|ui| {
            ui.label(label);
            ui.add(egui::DragValue::new(value).range(range).speed(speed));
        });
    }

    /// Helper to draw a labeled `f64` [`egui::DragValue`].
    fn labeled_drag_f64(
        ui: &mut egui::Ui,
        label: &str,
        value: &mut f64,
        range: std::ops::RangeInclusive<f64>,
        speed: f64,
    ) {
        ui.horizontal(|ui| {
            ui.label(label);
            ui.add(egui::DragValue::new(value).range(range).speed(speed));
        });
    }

    /// Builds the top panel UI (run controls, stepping, seeding, display toggles).
    fn ui_top_panel(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                let converged = self.sim.is_converged();
                if ui
                    .add_enabled(
                        !converged,
                        egui::Button::new(if self.running { "⏸ Pause" } else { "▶ Run" }),
                    )
                    .clicked()
                {
                    self.running = !self.running;
                }

                ui.add(
                    egui::DragValue::new(&mut self.step_interval)
                        .prefix("dt target = ")
                        .range(0.0..=1.0)
                        .speed(0.01),
                );

                if ui.add_enabled(!converged, egui::Button::new("Step")).clicked() {
                    let now = ctx.input(|i| i.time);
                    if self.last_step_time > 0.0 {
                        self.last_step_dt = now - self.last_step_time;
                    }
                    self.step_once();
                    self.last_step_time = now;
                }

                if ui.button("Restart").clicked() {
                    self.restart();
                }

                if ui.button("🎲 New seed").clicked() {
                    self.reseed();
                }

                ui.checkbox(&mut self.request.fast, "Fast");

                ui.separator();
                ui.checkbox(&mut self.show_outlines, "Outlines");
                ui.checkbox(&mut self.show_links, "Links");

                ui.separator();
                ui.add(egui::Slider::new(&mut self.zoom, 1.0..=40.0).text("Zoom"));
            });
        });
    }

    /// Builds the bottom status bar (seed, tick count, alpha, overlap).
    fn ui_status_bar(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(format!("dt target = {:.3} s", self.step_interval));
                ui.label(format!("dt last = {:.3} s", self.last_step_dt));
                ui.separator();
                ui.label(format!("overlap = {:.3}", self.sim.total_overlap()));
                ui.label(format!("alpha = {:.4}", self.sim.alpha()));
                ui.label(format!("ticks = {}", self.sim.ticks()));
                ui.label(format!("seed = {}", self.request.seed));
                if self.sim.is_converged() {
                    ui.label("converged");
                }
            });
        });
    }

    /// Builds the right-hand configuration panel. Changes apply on restart.
    fn ui_config_panel(&mut self, ctx: &egui::Context) {
        egui::SidePanel::right("config_panel")
            .resizable(true)
            .default_width(220.0)
            .show(ctx, |ui| {
                ui.heading("Config");

                ui.separator();
                ui.label("Links");
                Self::labeled_drag_f64(
                    ui,
                    "link_distance:",
                    &mut self.cfg.link_distance,
                    0.0..=50.0,
                    0.5,
                );
                Self::labeled_drag_f64(
                    ui,
                    "weak_link_strength:",
                    &mut self.cfg.weak_link_strength,
                    0.1..=10.0,
                    0.1,
                );
                ui.checkbox(&mut self.cfg.auto_link, "auto_link");

                ui.separator();
                ui.label("Motion");
                Self::labeled_drag_f64(
                    ui,
                    "center_strength:",
                    &mut self.cfg.center_strength,
                    0.0..=1.0,
                    0.01,
                );
                Self::labeled_drag_f64(
                    ui,
                    "velocity_decay:",
                    &mut self.cfg.velocity_decay,
                    0.0..=1.0,
                    0.01,
                );
                Self::labeled_drag_f64(ui, "jitter:", &mut self.cfg.jitter, 0.0..=20.0, 0.1);

                ui.separator();
                ui.label("Collision");
                Self::labeled_drag_usize(
                    ui,
                    "iterations:",
                    &mut self.cfg.collision.iterations,
                    0..=50,
                    1.0,
                );
                Self::labeled_drag_f64(
                    ui,
                    "damping:",
                    &mut self.cfg.collision.damping,
                    0.0..=1.0,
                    0.01,
                );

                ui.separator();
                if ui.button("Apply & restart").clicked() {
                    self.restart();
                }
                if ui.button("Reset cfg to default").clicked() {
                    self.cfg = LayoutConfig::default();
                }
            });
    }

    /// Draws the canvas frame, building tiles, outlines, labels and links.
    fn draw_layout(&self, painter: &egui::Painter, rect: egui::Rect) {
        let canvas = *self.sim.canvas();
        let layout = self.sim.layout();

        let frame = egui::Rect::from_two_pos(
            self.world_to_screen(DVec2::ZERO, rect),
            self.world_to_screen(
                DVec2::new(canvas.width as f64, canvas.height as f64),
                rect,
            ),
        );
        painter.rect_stroke(
            frame,
            0.0,
            egui::Stroke::new(1.0, egui::Color32::DARK_GRAY),
            egui::StrokeKind::Inside,
        );

        for p in &layout.placements {
            let fill = building_color(&p.color);
            for tile in p.world_tiles(&canvas) {
                let min = self.world_to_screen(tile.as_dvec2(), rect);
                let max = self.world_to_screen(tile.as_dvec2() + DVec2::ONE, rect);
                painter.rect_filled(egui::Rect::from_two_pos(min, max), 0.0, fill);
            }

            if self.show_outlines {
                let pts: Vec<egui::Pos2> = p
                    .grid_outer()
                    .iter()
                    .map(|&v| self.world_to_screen(v, rect))
                    .collect();
                painter.add(egui::Shape::closed_line(
                    pts,
                    egui::Stroke::new(1.0, egui::Color32::LIGHT_GRAY),
                ));
            }
        }

        if self.show_links {
            for link in self.sim.links() {
                let a = &layout.placements[link.source];
                let b = &layout.placements[link.target];
                let color = if link.synthetic {
                    egui::Color32::from_rgba_unmultiplied(255, 255, 255, 40)
                } else {
                    egui::Color32::YELLOW
                };
                let width = (link.strength as f32 * 0.3).clamp(0.5, 3.0);
                painter.line_segment(
                    [
                        self.world_to_screen(a.grid.as_dvec2(), rect),
                        self.world_to_screen(b.grid.as_dvec2(), rect),
                    ],
                    egui::Stroke::new(width, color),
                );
            }
        }

        for p in &layout.placements {
            painter.text(
                self.world_to_screen(p.grid.as_dvec2(), rect),
                egui::Align2::CENTER_CENTER,
                &p.name,
                egui::FontId::proportional(12.0),
                egui::Color32::WHITE,
            );
        }
    }

    /// Builds the central panel where the layout is drawn and navigated.
    fn ui_central_panel(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            let response = ui.allocate_response(ui.available_size(), egui::Sense::drag());
            let rect = response.rect;
            let painter = ui.painter_at(rect);

            // Pan with drag.
            if response.dragged() {
                self.pan += response.drag_delta();
            }

            // Zoom around the mouse cursor.
            let scroll = ui.ctx().input(|i| i.raw_scroll_delta.y);
            if scroll != 0.0 {
                let pointer_screen = response.hover_pos().unwrap_or(rect.center());
                let world_before = self.screen_to_world(pointer_screen, rect);

                let factor = (1.0 + scroll * 0.001).clamp(0.5, 2.0);
                self.zoom = (self.zoom * factor).clamp(1.0, 40.0);

                let screen_after = self.world_to_screen(world_before, rect);
                self.pan += pointer_screen - screen_after;
            }

            self.draw_layout(&painter, rect);

            // Auto-run simulation if requested.
            if self.running {
                let now = ctx.input(|i| i.time);
                let elapsed = now - self.last_step_time;
                if elapsed >= self.step_interval {
                    if self.last_step_time > 0.0 {
                        self.last_step_dt = elapsed;
                    }
                    self.step_once();
                    self.last_step_time = now;
                }

                ctx.request_repaint();
            }
        });
    }
}

/// Parses a `#rrggbb` building color, falling back to gray.
fn building_color(hex: &str) -> egui::Color32 {
    egui::Color32::from_hex(hex).unwrap_or(egui::Color32::GRAY)
}

impl App for Viewer {
    /// eframe callback that builds all UI panels for each frame.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.ui_top_panel(ctx);
        self.ui_status_bar(ctx);
        self.ui_config_panel(ctx);
        self.ui_central_panel(ctx);
    }
}
