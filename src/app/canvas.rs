//! Particle canvas: pointer input in, point sprites out

use eframe::{egui, egui_glow};
use parking_lot::Mutex;
use std::sync::Arc;

use super::SparksApp;
use crate::core::{PointBackend, PointVertex, RenderMode, TouchAction, Visualizer};
use crate::gl::{GlFrame, GlPointRenderer};
use crate::theme::spark_color;

impl SparksApp {
    pub(crate) fn render_canvas(&mut self, ui: &mut egui::Ui) {
        let available = ui.available_size();
        let (response, painter) = ui.allocate_painter(available, egui::Sense::click_and_drag());
        let rect = response.rect;

        self.input
            .on_surface_resized(rect.width().round() as u32, rect.height().round() as u32);

        if self.handle_pointer(ui, &response) && self.render_mode == RenderMode::WhenDirty {
            ui.ctx().request_repaint();
        }

        let step = self.visualizer.lock().should_render();

        match &self.gl_points {
            Some(points) if !self.use_cpu => {
                painter.add(gl_callback(rect, self.visualizer.clone(), points.clone(), step));
            }
            _ => {
                let mut backend = CpuPainter {
                    painter: &painter,
                    rect,
                    fade_size: self.fade_size,
                };
                let mut visualizer = self.visualizer.lock();
                if step {
                    visualizer.on_frame(&mut backend);
                } else {
                    visualizer.on_repaint(&mut backend);
                }
            }
        }

        self.live_count = self.store.len();
    }

    /// Forward this frame's pointer events to the input bridge.
    /// Returns `true` if any of them spawned particles.
    fn handle_pointer(&self, ui: &egui::Ui, response: &egui::Response) -> bool {
        let rect = response.rect;
        let held = response.is_pointer_button_down_on();
        let events = ui.input(|i| i.events.clone());

        let mut spawned = false;
        for event in &events {
            let (pos, action) = match event {
                egui::Event::PointerButton {
                    pos,
                    button: egui::PointerButton::Primary,
                    pressed,
                    ..
                } => (*pos, if *pressed { TouchAction::Down } else { TouchAction::Up }),
                egui::Event::PointerMoved(pos) if held => (*pos, TouchAction::Move),
                _ => continue,
            };
            if !rect.contains(pos) {
                continue;
            }
            let local = pos - rect.min;
            spawned |= self.input.on_touch(local.x, local.y, action);
        }
        spawned
    }
}

/// Paint callback that steps (or repaints) the visualizer into the GL program
fn gl_callback(
    rect: egui::Rect,
    visualizer: Arc<Mutex<Visualizer>>,
    points: Arc<Mutex<GlPointRenderer>>,
    step: bool,
) -> egui::PaintCallback {
    egui::PaintCallback {
        rect,
        callback: Arc::new(egui_glow::CallbackFn::new(move |info, painter| {
            let mut points = points.lock();
            let mut frame = GlFrame::new(painter.gl(), &mut points, info.pixels_per_point);
            let mut visualizer = visualizer.lock();
            if step {
                visualizer.on_frame(&mut frame);
            } else {
                visualizer.on_repaint(&mut frame);
            }
        })),
    }
}

/// Fallback backend drawing sparks as egui circles
struct CpuPainter<'a> {
    painter: &'a egui::Painter,
    rect: egui::Rect,
    fade_size: f32,
}

impl PointBackend for CpuPainter<'_> {
    fn draw_points(&mut self, bytes: &[u8], _count: usize) {
        let vertices: &[PointVertex] = bytemuck::cast_slice(bytes);
        let rect = self.rect;
        for v in vertices {
            let pos = egui::pos2(
                rect.left() + (v.x + 1.0) * 0.5 * rect.width(),
                rect.top() + (1.0 - v.y) * 0.5 * rect.height(),
            );
            // sizes are in points, matching gl_PointSize scaled by pixels_per_point
            self.painter
                .circle_filled(pos, v.size * 0.5, spark_color(v.size, self.fade_size));
        }
    }
}
