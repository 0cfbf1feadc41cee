//! UI overlays using bevy_egui: debug panel, joystick widget and control hint

use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts, EguiPrimaryContextPass};
use strider_core::joystick::Joystick;
use strider_core::pointer::ScreenRect;
use strider_core::telemetry::DebugInfo;

use crate::types::Control;

const PANEL_MARGIN: f32 = 12.0;
const KNOB_RADIUS: f32 = 28.0;

pub struct OverlayPlugin;

impl Plugin for OverlayPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(EguiPrimaryContextPass, (hint_overlay, debug_panel, joystick_overlay));
    }
}

fn hint_overlay(mut contexts: EguiContexts) {
    let Ok(ctx) = contexts.ctx_mut() else { return };

    egui::Area::new(egui::Id::new("control_hint"))
        .anchor(egui::Align2::LEFT_TOP, egui::vec2(PANEL_MARGIN, PANEL_MARGIN))
        .interactable(false)
        .show(ctx, |ui| {
            egui::Frame::new()
                .fill(egui::Color32::from_rgba_unmultiplied(255, 255, 255, 15))
                .stroke(egui::Stroke::new(1.0, egui::Color32::from_rgba_unmultiplied(255, 255, 255, 38)))
                .corner_radius(10.0)
                .inner_margin(egui::Margin::symmetric(10, 6))
                .show(ui, |ui| {
                    ui.label(
                        egui::RichText::new("Drag to orbit · Joystick to move · WASD on desktop")
                            .size(12.0)
                            .color(egui::Color32::WHITE),
                    );
                });
        });
}

fn debug_panel(mut contexts: EguiContexts, mut control: ResMut<Control>) {
    let Ok(ctx) = contexts.ctx_mut() else { return };

    let mut debug_on = control.0.debug_enabled();
    let mut lock_drag = control.0.lock_drag();
    let lock_percent = control.0.tunables().look.lock_drag_fraction * 100.0;
    let info = control.0.last_telemetry().copied();

    egui::Window::new("Debug")
        .anchor(egui::Align2::RIGHT_TOP, egui::vec2(-PANEL_MARGIN, PANEL_MARGIN))
        .title_bar(false)
        .resizable(false)
        .min_width(240.0)
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.checkbox(&mut debug_on, "Debug");
                ui.checkbox(&mut lock_drag, format!("Lock drag: top {:.0}%", lock_percent));
            });

            match (debug_on, info) {
                (false, _) => {
                    ui.label(egui::RichText::new("Debug OFF").weak());
                }
                (true, None) => {
                    ui.label(egui::RichText::new("Sampling...").weak());
                }
                (true, Some(info)) => render_debug_info(ui, &info),
            }
        });

    if debug_on != control.0.debug_enabled() {
        control.0.set_debug(debug_on);
    }
    if lock_drag != control.0.lock_drag() {
        control.0.set_lock_drag(lock_drag);
    }
}

fn render_debug_info(ui: &mut egui::Ui, info: &DebugInfo) {
    egui::Grid::new("debug_info")
        .num_columns(2)
        .striped(true)
        .show(ui, |ui| {
            let row = |ui: &mut egui::Ui, label: &str, value: String| {
                ui.label(label);
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.monospace(value);
                });
                ui.end_row();
            };
            row(ui, "FPS", format!("{:.0}", info.fps));
            row(ui, "dt (ms)", format!("{:.1}", info.dt_ms()));
            row(ui, "speed", format!("{:.3}", info.speed));
            row(
                ui,
                "yaw° / pitch°",
                format!("{:.1} / {:.1}", info.yaw_degrees(), info.pitch_degrees()),
            );
            row(
                ui,
                "pos (x,y,z)",
                format!(
                    "{:.2}, {:.2}, {:.2}",
                    info.position.x, info.position.y, info.position.z
                ),
            );
        });
}

/// Paint the joystick ring and knob behind every egui window
fn joystick_overlay(mut contexts: EguiContexts, control: Res<Control>) {
    let Ok(ctx) = contexts.ctx_mut() else { return };
    let painter = ctx.layer_painter(egui::LayerId::background());
    paint_joystick(&painter, control.0.joystick(), control.0.joystick_zone());
}

fn paint_joystick(painter: &egui::Painter, joystick: &Joystick, zone: ScreenRect) {
    let min = egui::pos2(zone.min.x, zone.min.y);
    let center = egui::pos2(
        (zone.min.x + zone.max.x) * 0.5,
        (zone.min.y + zone.max.y) * 0.5,
    );

    painter.circle(
        center,
        zone.width() * 0.5,
        egui::Color32::from_rgba_unmultiplied(255, 255, 255, 15),
        egui::Stroke::new(1.0, egui::Color32::from_rgba_unmultiplied(255, 255, 255, 46)),
    );

    match joystick.knob() {
        Some(knob) => {
            painter.circle(
                min + egui::vec2(knob.x, knob.y),
                KNOB_RADIUS,
                egui::Color32::from_rgba_unmultiplied(255, 255, 255, 64),
                egui::Stroke::new(1.0, egui::Color32::from_rgba_unmultiplied(255, 255, 255, 140)),
            );
        }
        None => {
            painter.circle_filled(center, 4.0, egui::Color32::from_rgba_unmultiplied(255, 255, 255, 128));
        }
    }
}
