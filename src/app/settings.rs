//! Settings sidebar: render cadence, spawn batch size, clear

use eframe::egui;
use crate::core::{RenderMode, SpawnParams};
use crate::theme::colors;
use super::SparksApp;

impl SparksApp {
    pub(crate) fn render_settings(&mut self, ctx: &egui::Context) {
        egui::SidePanel::left("settings")
            .default_width(220.0)
            .min_width(180.0)
            .resizable(true)
            .frame(egui::Frame::new().fill(colors::BG_PANEL).inner_margin(8.0))
            .show(ctx, |ui| {
                let group_frame = egui::Frame::new()
                    .stroke(egui::Stroke::new(1.0, colors::BORDER))
                    .corner_radius(4.0)
                    .inner_margin(6.0);

                group_frame.show(ui, |ui| {
                    ui.set_min_width(ui.available_width());
                    ui.label(egui::RichText::new("Rendering:").color(colors::TEXT_MUTED));
                    let mut mode = self.render_mode;
                    for &candidate in RenderMode::ALL {
                        ui.radio_value(&mut mode, candidate, candidate.label());
                    }
                    if mode != self.render_mode {
                        self.apply_render_mode(mode);
                    }
                    if mode == RenderMode::WhenDirty {
                        ui.label(
                            egui::RichText::new("  Frames advance only on touch")
                                .color(colors::TEXT_MUTED)
                                .small(),
                        );
                    }
                });

                ui.add_space(8.0);

                group_frame.show(ui, |ui| {
                    ui.set_min_width(ui.available_width());
                    let label = format!("Particles per touch: {}", self.per_touch);
                    ui.label(egui::RichText::new(label).color(colors::TEXT_MUTED));
                    ui.spacing_mut().slider_width = ui.available_width();
                    let mut per_touch = self.per_touch;
                    let response = ui.add(
                        egui::Slider::new(&mut per_touch, 1..=50)
                            .clamping(egui::SliderClamping::Always)
                            .show_value(false),
                    );
                    if response.double_clicked() {
                        per_touch = SpawnParams::default().per_touch;
                    }
                    if per_touch != self.per_touch {
                        self.apply_per_touch(per_touch);
                    }
                });

                ui.add_space(8.0);

                if ui.button("Clear").clicked() {
                    self.clear_particles();
                }
            });
    }
}
