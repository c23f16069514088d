//! Interactive tractor–trailer parking viewer built with eframe/egui.
//!
//! This module defines [`Viewer`], which owns a [`Simulation`] plus the
//! camera and tuning state, and implements [`eframe::App`] to drive the
//! rig from the keyboard and paint it every frame.

use eframe::App;
use glam::Vec2;
use rig_core::{
    ConfigError, ControlInput, Outcome, Pose2D, RigConfig, Simulation, TickReport,
    collision::{Obstacle, ObstacleKind, ParkingZone, WorldBounds},
    config::HandlingConfig,
    level::{Level, ParkingTarget},
    phases::{Body, Collision},
    types::Corners,
};
use std::f32::consts::PI;
use tracing::warn;

/// The built-in level: back the trailer into a narrow bay between two
/// barriers under a wall.
pub fn first_delivery() -> Level {
    Level {
        name: "First Delivery".into(),
        description: "Reverse the trailer into the loading bay.".into(),
        start: Pose2D::new(600.0, 600.0, PI),
        parking_target: ParkingTarget::Trailer,
        parking_zone: ParkingZone {
            x: 572.0,
            y: 50.0,
            width: 56.0,
            height: 170.0,
            angle: 0.0,
        },
        obstacles: vec![
            Obstacle::new(ObstacleKind::Wall, 400.0, 30.0, 400.0, 15.0),
            Obstacle::new(ObstacleKind::Barrier, 560.0, 45.0, 10.0, 180.0),
            Obstacle::new(ObstacleKind::Barrier, 630.0, 45.0, 10.0, 180.0),
        ],
        bounds: WorldBounds::new(1200.0, 800.0),
    }
}

/// Maps held keys to a [`ControlInput`].
///
/// `down` reports whether a key is currently held, which keeps this
/// testable without an egui context.
pub fn controls_from_keys(down: impl Fn(egui::Key) -> bool) -> ControlInput {
    use egui::Key;
    ControlInput {
        accelerate: down(Key::ArrowUp) || down(Key::W),
        brake: down(Key::ArrowDown) || down(Key::S),
        steer_left: down(Key::ArrowLeft) || down(Key::A),
        steer_right: down(Key::ArrowRight) || down(Key::D),
    }
}

fn obstacle_color(kind: ObstacleKind) -> egui::Color32 {
    match kind {
        ObstacleKind::Wall => egui::Color32::from_rgb(90, 90, 100),
        ObstacleKind::Barrier => egui::Color32::from_rgb(200, 160, 40),
        ObstacleKind::ParkedTrailer => egui::Color32::from_rgb(110, 120, 140),
        ObstacleKind::Car => egui::Color32::from_rgb(150, 60, 60),
        ObstacleKind::Cone => egui::Color32::from_rgb(240, 120, 30),
    }
}

fn body_name(body: Body) -> &'static str {
    match body {
        Body::Tractor => "tractor",
        Body::Trailer => "trailer",
    }
}

fn outcome_text(outcome: Outcome) -> Option<(String, egui::Color32)> {
    match outcome {
        Outcome::Driving => None,
        Outcome::Parked => Some(("Parked! Press R to go again".into(), egui::Color32::GREEN)),
        Outcome::Collided(Collision::Obstacle { body, index }) => Some((
            format!("The {} hit obstacle #{index}. Press R", body_name(body)),
            egui::Color32::RED,
        )),
        Outcome::Collided(Collision::OutOfBounds { body }) => Some((
            format!("The {} left the yard. Press R", body_name(body)),
            egui::Color32::RED,
        )),
    }
}

/// Main application state for the interactive viewer.
///
/// ### Fields
/// - `sim` - Level plus the rig driving in it.
/// - `cfg` - Tuning the rig was built from; `handling` is live-editable.
/// - `running` - Whether a tick is taken every frame.
/// - `zoom` - World units to screen pixels.
/// - `pan` - Screen-space pan offset in pixels.
/// - `last_report` - Result of the most recent tick, used for painting.
pub struct Viewer {
    sim: Simulation,
    cfg: RigConfig,

    running: bool,
    zoom: f32,
    pan: egui::Vec2,

    last_report: TickReport,
}

impl Viewer {
    /// Creates a viewer on [`first_delivery`], running from the start pose.
    pub fn new(cfg: RigConfig) -> Self {
        let sim = Simulation::new(first_delivery(), &cfg);
        let last_report = sim.report();

        Self {
            sim,
            cfg,
            running: true,
            zoom: 0.7,
            pan: egui::vec2(0.0, 0.0),
            last_report,
        }
    }

    /// Puts the rig back at the level start and clears the outcome.
    fn restart(&mut self) {
        self.sim.restart();
        self.last_report = self.sim.report();
    }

    /// Advances the simulation by a single tick with the given input.
    fn step_once(&mut self, input: ControlInput) {
        self.last_report = self.sim.step(input);
    }

    /// Pushes edited handling constants into the live rig.
    ///
    /// The edit goes through [`RigConfig::validate`] first; a rejected
    /// edit leaves both `cfg` and the rig untouched.
    fn apply_handling(&mut self, handling: HandlingConfig) -> Result<(), ConfigError> {
        let candidate = RigConfig {
            handling,
            ..self.cfg
        };
        candidate.validate()?;

        self.cfg = candidate;
        self.sim.set_handling(handling);
        Ok(())
    }

    /// Converts a world-space position to screen-space.
    ///
    /// The world centre is placed at the centre of `rect`, scaled by
    /// `zoom` and offset by `pan`. Both spaces are y-down, so no flip.
    fn world_to_screen(&self, p: Vec2, rect: egui::Rect) -> egui::Pos2 {
        let center = rect.center();
        let local = (p - self.sim.level().bounds.center()) * self.zoom;
        egui::pos2(
            center.x + local.x + self.pan.x,
            center.y + local.y + self.pan.y,
        )
    }

    /// Inverse of [`Viewer::world_to_screen`].
    fn screen_to_world(&self, p: egui::Pos2, rect: egui::Rect) -> Vec2 {
        let center = rect.center();
        let local = Vec2::new(p.x - center.x - self.pan.x, p.y - center.y - self.pan.y);
        local / self.zoom + self.sim.level().bounds.center()
    }

    fn to_screen_points(&self, corners: &Corners, rect: egui::Rect) -> Vec<egui::Pos2> {
        corners
            .iter()
            .map(|&c| self.world_to_screen(c, rect))
            .collect()
    }

    /// Helper to draw a labeled `f32` [`egui::DragValue`].
    fn labeled_drag_f32(
        ui: &mut egui::Ui,
        label: &str,
        value: &mut f32,
        range: std::ops::RangeInclusive<f32>,
        speed: f64,
    ) {
        ui.horizontal(|ui| {
            ui.label(label);
            ui.add(egui::DragValue::new(value).range(range).speed(speed));
        });
    }

    /// Builds the top panel UI (run controls, stepping, zoom).
    fn ui_top_panel(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui
                    .button(if self.running { "⏸ Pause" } else { "▶ Run" })
                    .clicked()
                {
                    self.running = !self.running;
                }

                if ui.button("Step").clicked() {
                    let input = ctx.input(|i| controls_from_keys(|k| i.key_down(k)));
                    self.step_once(input);
                }

                if ui.button("Restart").clicked() {
                    self.restart();
                }

                ui.separator();
                ui.add(egui::Slider::new(&mut self.zoom, 0.1..=4.0).text("Zoom"));
            });
        });
    }

    /// Builds the bottom status bar (tick, level, outcome).
    fn ui_status_bar(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(format!("tick = {}", self.last_report.tick));
                ui.separator();
                ui.label(format!("outcome = {:?}", self.last_report.outcome));
                ui.separator();
                ui.label(self.sim.level().name.as_str());
            });
        });
    }

    /// Builds the right-hand panel: live rig readout and handling tuning.
    fn ui_config_panel(&mut self, ctx: &egui::Context) {
        egui::SidePanel::right("config_panel")
            .resizable(true)
            .default_width(240.0)
            .show(ctx, |ui| {
                let snap = &self.last_report.rig;

                ui.heading("Rig");
                ui.label(format!(
                    "speed: {:.2} / {:.2}",
                    snap.tractor.speed, snap.tractor.max_speed
                ));
                ui.label(format!(
                    "steering: {:.1}° / {:.1}°",
                    snap.tractor.steering_angle.to_degrees(),
                    snap.tractor.max_steering_angle.to_degrees()
                ));
                ui.label(format!(
                    "jackknife: {:.1}°",
                    snap.jackknife_angle.to_degrees()
                ));

                ui.separator();
                ui.heading("Handling");

                let mut h = self.cfg.handling;
                ui.label("Jackknife");
                Self::labeled_drag_f32(
                    ui,
                    "lock angle:",
                    &mut h.jackknife_lock_angle,
                    0.1..=PI,
                    0.01,
                );
                Self::labeled_drag_f32(
                    ui,
                    "warn factor:",
                    &mut h.jackknife_warn_factor,
                    0.01..=1.0,
                    0.01,
                );

                ui.separator();
                ui.label("Reverse");
                Self::labeled_drag_f32(
                    ui,
                    "speed cap:",
                    &mut h.reverse_speed_cap,
                    0.01..=1.0,
                    0.01,
                );
                Self::labeled_drag_f32(
                    ui,
                    "near-lock cap:",
                    &mut h.near_jackknife_reverse_cap,
                    0.01..=1.0,
                    0.01,
                );
                Self::labeled_drag_f32(
                    ui,
                    "near-lock brake:",
                    &mut h.near_jackknife_brake_factor,
                    0.01..=1.0,
                    0.01,
                );

                ui.separator();
                ui.label("Trailer");
                Self::labeled_drag_f32(ui, "damping:", &mut h.trailer_damping, 0.01..=1.0, 0.005);
                Self::labeled_drag_f32(
                    ui,
                    "turn coupling:",
                    &mut h.turn_coupling,
                    0.0..=0.1,
                    0.001,
                );

                ui.separator();
                Self::labeled_drag_f32(
                    ui,
                    "parked below:",
                    &mut h.parked_speed_limit,
                    0.01..=3.0,
                    0.01,
                );

                if h != self.cfg.handling
                    && let Err(error) = self.apply_handling(h)
                {
                    warn!(%error, "handling edit rejected");
                }

                ui.separator();
                if ui.button("Reset cfg to default").clicked()
                    && let Err(error) = self.apply_handling(HandlingConfig::default())
                {
                    warn!(%error, "default handling rejected");
                }
            });
    }

    /// Paints the level, the rig and any overlay text.
    fn paint(&self, painter: &egui::Painter, rect: egui::Rect) {
        let level = self.sim.level();
        let snap = &self.last_report.rig;

        // Yard outline.
        let b = level.bounds;
        let yard = egui::Rect::from_two_pos(
            self.world_to_screen(Vec2::ZERO, rect),
            self.world_to_screen(Vec2::new(b.width, b.height), rect),
        );
        painter.rect_filled(yard, 0.0, egui::Color32::from_rgb(40, 44, 40));

        let zone = self.to_screen_points(&level.parking_zone.corners(), rect);
        painter.add(egui::Shape::convex_polygon(
            zone,
            egui::Color32::from_rgba_unmultiplied(60, 200, 90, 50),
            egui::Stroke::new(1.5, egui::Color32::from_rgb(60, 200, 90)),
        ));

        for obstacle in &level.obstacles {
            let points = self.to_screen_points(&obstacle.corners(), rect);
            painter.add(egui::Shape::convex_polygon(
                points,
                obstacle_color(obstacle.kind),
                egui::Stroke::NONE,
            ));
        }

        let trailer_fill = if snap.jackknife_warning {
            egui::Color32::from_rgb(200, 120, 60)
        } else {
            egui::Color32::from_rgb(170, 170, 185)
        };
        let trailer = self.to_screen_points(&snap.trailer_corners, rect);
        painter.add(egui::Shape::convex_polygon(
            trailer,
            trailer_fill,
            egui::Stroke::new(1.0, egui::Color32::BLACK),
        ));

        let tractor = self.to_screen_points(&snap.tractor_corners, rect);
        painter.add(egui::Shape::convex_polygon(
            tractor,
            egui::Color32::from_rgb(50, 110, 200),
            egui::Stroke::new(1.0, egui::Color32::BLACK),
        ));

        // Front edge of the cab, so heading is readable at a glance.
        let front = [
            self.world_to_screen(snap.tractor_corners[0], rect),
            self.world_to_screen(snap.tractor_corners[1], rect),
        ];
        painter.line_segment(front, egui::Stroke::new(2.5, egui::Color32::WHITE));

        // Hitch link.
        let hitch = self.world_to_screen(snap.hitch, rect);
        let kingpin = self.world_to_screen(self.sim.rig().trailer_front_point(), rect);
        painter.line_segment(
            [kingpin, hitch],
            egui::Stroke::new(1.0, egui::Color32::DARK_GRAY),
        );
        painter.circle_filled(hitch, 3.0, egui::Color32::YELLOW);

        if snap.jackknife_warning {
            let text = if snap.jackknifed {
                "JACKKNIFED: pull forward"
            } else {
                "Jackknife warning"
            };
            painter.text(
                rect.center_top() + egui::vec2(0.0, 16.0),
                egui::Align2::CENTER_TOP,
                text,
                egui::FontId::proportional(18.0),
                egui::Color32::from_rgb(255, 140, 0),
            );
        }

        if let Some((text, color)) = outcome_text(self.last_report.outcome) {
            painter.text(
                rect.center(),
                egui::Align2::CENTER_CENTER,
                text,
                egui::FontId::proportional(28.0),
                color,
            );
        }
    }

    /// Builds the central panel: keyboard, camera and painting.
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
                self.zoom = (self.zoom * factor).clamp(0.1, 4.0);

                let screen_after = self.world_to_screen(world_before, rect);
                self.pan += pointer_screen - screen_after;
            }

            if ctx.input(|i| i.key_pressed(egui::Key::R)) {
                self.restart();
            }

            if self.running {
                let input = ctx.input(|i| controls_from_keys(|k| i.key_down(k)));
                self.step_once(input);
                ctx.request_repaint();
            }

            self.paint(&painter, rect);
        });
    }
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
