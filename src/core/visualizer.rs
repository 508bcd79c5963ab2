//! Host-facing entry points
//!
//! A host wires three calls into its event loop: `on_surface_resized` and
//! `on_touch` from wherever input arrives, `on_frame` from the thread that
//! owns the graphics context. Touches may also be fed from another thread
//! through [`Visualizer::input`].

use std::sync::Arc;

use super::config::{RenderMode, SparksConfig};
use super::input::{InputBridge, RedrawRequest, TouchAction};
use super::render::{FrameOutcome, FrameRenderer, PointBackend};
use super::stats::FrameStats;
use super::store::ParticleStore;

pub struct Visualizer {
    store: Arc<ParticleStore>,
    input: InputBridge,
    renderer: FrameRenderer,
    redraw: RedrawRequest,
    render_mode: RenderMode,
    stats: FrameStats,
}

impl Visualizer {
    /// Visualizer seeded from OS entropy
    pub fn new(config: &SparksConfig) -> Self {
        Self::with_store(config, ParticleStore::from_entropy(config.spawn.clone()))
    }

    /// Visualizer with a reproducible spawn sequence
    pub fn with_seed(config: &SparksConfig, seed: u64) -> Self {
        Self::with_store(config, ParticleStore::with_seed(seed, config.spawn.clone()))
    }

    fn with_store(config: &SparksConfig, store: ParticleStore) -> Self {
        let store = Arc::new(store);
        let redraw = RedrawRequest::default();
        Self {
            input: InputBridge::new(store.clone(), redraw.clone()),
            renderer: FrameRenderer::new(config.physics.clone()),
            store,
            redraw,
            render_mode: config.render_mode,
            stats: FrameStats::default(),
        }
    }

    pub fn on_surface_resized(&self, width: u32, height: u32) {
        self.input.on_surface_resized(width, height);
    }

    pub fn on_touch(&self, raw_x: f32, raw_y: f32, action: TouchAction) -> bool {
        self.input.on_touch(raw_x, raw_y, action)
    }

    /// Run one frame: step, cull, draw. Call only from the graphics thread.
    pub fn on_frame<B>(&mut self, backend: &mut B) -> FrameOutcome
    where
        B: PointBackend + ?Sized,
    {
        self.on_frame_at(crate::time::now_seconds(), backend)
    }

    pub fn on_frame_at<B>(&mut self, now: f64, backend: &mut B) -> FrameOutcome
    where
        B: PointBackend + ?Sized,
    {
        let outcome = self.renderer.render_frame(&self.store, backend);
        self.stats.tick_at(now, outcome.live);
        outcome
    }

    /// Repaint the last frame without advancing the simulation, for hosts
    /// that must redraw the whole surface on every paint.
    pub fn on_repaint<B>(&self, backend: &mut B) -> bool
    where
        B: PointBackend + ?Sized,
    {
        self.renderer.redraw_last(backend)
    }

    /// Whether the host should run a frame now. Continuous mode always
    /// renders; on-demand mode renders once per raised request.
    pub fn should_render(&self) -> bool {
        match self.render_mode {
            RenderMode::Continuously => true,
            RenderMode::WhenDirty => self.redraw.take(),
        }
    }

    /// Ask an on-demand loop for one more frame
    pub fn request_render(&self) {
        self.redraw.request();
    }

    pub fn render_mode(&self) -> RenderMode {
        self.render_mode
    }

    pub fn set_render_mode(&mut self, mode: RenderMode) {
        if mode != self.render_mode {
            tracing::info!(?mode, "Render mode changed");
            self.render_mode = mode;
        }
    }

    /// Input handle for another thread
    pub fn input(&self) -> InputBridge {
        self.input.clone()
    }

    pub fn set_per_touch(&mut self, count: usize) {
        self.input.set_per_touch(count);
    }

    pub fn store(&self) -> &Arc<ParticleStore> {
        &self.store
    }

    pub fn live_count(&self) -> usize {
        self.store.len()
    }

    pub fn stats(&self) -> &FrameStats {
        &self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::render::RecordingBackend;
    use std::thread;

    fn config(mode: RenderMode) -> SparksConfig {
        SparksConfig {
            render_mode: mode,
            ..SparksConfig::default()
        }
    }

    #[test]
    fn touch_then_frame_draws_batch() {
        let mut vis = Visualizer::with_seed(&config(RenderMode::Continuously), 1);
        let mut backend = RecordingBackend::default();
        vis.on_surface_resized(100, 200);
        assert!(vis.on_touch(50.0, 100.0, TouchAction::Down));

        let outcome = vis.on_frame_at(0.0, &mut backend);
        assert_eq!(outcome, FrameOutcome { live: 10, drawn: true });
        assert_eq!(backend.points_drawn, 10);
        for v in &backend.last_frame {
            assert!(v.x.abs() <= 0.01 + 1e-6 && v.y.abs() <= 0.01 + 1e-6);
        }
    }

    #[test]
    fn touch_before_resize_is_dropped() {
        let mut vis = Visualizer::with_seed(&config(RenderMode::Continuously), 1);
        let mut backend = RecordingBackend::default();
        assert!(!vis.on_touch(50.0, 100.0, TouchAction::Down));
        assert!(!vis.on_frame_at(0.0, &mut backend).drawn);
        assert_eq!(backend.draw_calls, 0);
    }

    #[test]
    fn repaint_shows_last_frame_unchanged() {
        let mut vis = Visualizer::with_seed(&config(RenderMode::WhenDirty), 2);
        let mut backend = RecordingBackend::default();
        vis.on_surface_resized(100, 100);
        vis.on_touch(50.0, 50.0, TouchAction::Down);
        vis.on_frame_at(0.0, &mut backend);
        let shown = backend.last_frame.clone();

        assert!(vis.on_repaint(&mut backend));
        assert_eq!(backend.last_frame, shown);
        assert_eq!(vis.stats().total_frames(), 1);
    }

    #[test]
    fn continuous_mode_always_renders() {
        let vis = Visualizer::with_seed(&config(RenderMode::Continuously), 1);
        assert!(vis.should_render());
        assert!(vis.should_render());
    }

    #[test]
    fn on_demand_mode_renders_once_per_request() {
        let vis = Visualizer::with_seed(&config(RenderMode::WhenDirty), 1);
        assert!(!vis.should_render());

        vis.on_surface_resized(10, 10);
        vis.on_touch(5.0, 5.0, TouchAction::Move);
        assert!(vis.should_render());
        assert!(!vis.should_render());

        vis.request_render();
        assert!(vis.should_render());
    }

    #[test]
    fn render_mode_toggle() {
        let mut vis = Visualizer::with_seed(&config(RenderMode::WhenDirty), 1);
        assert!(!vis.should_render());
        vis.set_render_mode(RenderMode::Continuously);
        assert_eq!(vis.render_mode(), RenderMode::Continuously);
        assert!(vis.should_render());
    }

    #[test]
    fn input_from_another_thread() {
        let mut vis = Visualizer::with_seed(&config(RenderMode::Continuously), 4);
        vis.on_surface_resized(1000, 1000);
        let input = vis.input();
        let producer = thread::spawn(move || {
            for i in 0..10 {
                input.on_touch(i as f32 * 100.0, 500.0, TouchAction::Move);
            }
        });
        let mut backend = RecordingBackend::default();
        for frame in 0..30 {
            vis.on_frame_at(frame as f64 / 60.0, &mut backend);
        }
        producer.join().unwrap();
        assert_eq!(vis.live_count(), 100);
    }
}
