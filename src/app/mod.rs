//! egui front end
//!
//! Hosts the particle canvas on both native and WASM. Touches feed the
//! [`InputBridge`] during `update`; the simulation step and draw run in a
//! glow paint callback on the thread that owns the GL context.

mod canvas;
mod header;
mod settings;

use eframe::{egui, glow};
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::core::{FpsCounter, InputBridge, ParticleStore, RenderMode, SparksConfig, Visualizer};
use crate::gl::GlPointRenderer;
use crate::theme::canvas_visuals;

/// Touch sparks app - runs on both native and WASM
pub struct SparksApp {
    /// Simulation plus frame renderer, shared with the paint callback
    pub(crate) visualizer: Arc<Mutex<Visualizer>>,
    /// Input side of the visualizer
    pub(crate) input: InputBridge,
    pub(crate) store: Arc<ParticleStore>,
    /// GL point sprite program (None when painting on the CPU)
    pub(crate) gl_points: Option<Arc<Mutex<GlPointRenderer>>>,
    /// Paint particles with egui shapes instead of the GL program
    pub(crate) use_cpu: bool,
    /// Point size at which a spark is fully opaque
    pub(crate) fade_size: f32,
    pub(crate) fps_counter: FpsCounter,
    pub(crate) render_mode: RenderMode,
    pub(crate) per_touch: usize,
    pub(crate) show_settings: bool,
    /// Live particle count as of the last update
    pub(crate) live_count: usize,
}

impl SparksApp {
    pub fn new(cc: &eframe::CreationContext<'_>, config: SparksConfig, use_cpu: bool) -> Self {
        cc.egui_ctx.set_visuals(canvas_visuals());

        let gl_points = if use_cpu {
            info!("CPU painter requested");
            None
        } else {
            match cc.gl.as_ref() {
                Some(gl) => match GlPointRenderer::new(gl, config.spawn.max_size) {
                    Ok(points) => Some(Arc::new(Mutex::new(points))),
                    Err(e) => {
                        error!(error = %e, "Point sprite program unavailable, falling back to CPU painter");
                        None
                    }
                },
                None => {
                    warn!("No GL context, falling back to CPU painter");
                    None
                }
            }
        };

        let visualizer = Visualizer::new(&config);
        let input = visualizer.input();
        let store = visualizer.store().clone();

        Self {
            visualizer: Arc::new(Mutex::new(visualizer)),
            input,
            store,
            use_cpu: gl_points.is_none(),
            gl_points,
            fade_size: config.spawn.max_size,
            fps_counter: FpsCounter::new(),
            render_mode: config.render_mode,
            per_touch: config.spawn.per_touch,
            show_settings: false,
            live_count: 0,
        }
    }

    /// Push UI-side setting changes into the visualizer
    pub(crate) fn apply_render_mode(&mut self, mode: RenderMode) {
        self.render_mode = mode;
        let mut visualizer = self.visualizer.lock();
        visualizer.set_render_mode(mode);
        visualizer.request_render();
    }

    pub(crate) fn apply_per_touch(&mut self, count: usize) {
        self.per_touch = count;
        self.input.set_per_touch(count);
    }

    pub(crate) fn clear_particles(&mut self) {
        self.store.clear();
        self.visualizer.lock().request_render();
    }
}

impl eframe::App for SparksApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.fps_counter.tick_at(crate::time::now_seconds());

        if self.show_settings {
            self.render_settings(ctx);
        }

        egui::TopBottomPanel::top("header")
            .frame(egui::Frame::new().fill(crate::theme::colors::BG_PANEL).inner_margin(6.0))
            .show(ctx, |ui| self.render_header(ui));

        egui::CentralPanel::default()
            .frame(egui::Frame::new().fill(crate::theme::colors::BG_CANVAS))
            .show(ctx, |ui| self.render_canvas(ui));

        if self.render_mode == RenderMode::Continuously {
            ctx.request_repaint();
        }
    }

    fn on_exit(&mut self, gl: Option<&glow::Context>) {
        if let (Some(gl), Some(points)) = (gl, &self.gl_points) {
            points.lock().destroy(gl);
        }
    }
}
