//! Per-frame renderer: step, snapshot, pack, draw
//!
//! The GPU itself sits behind [`PointBackend`]. The glow program in
//! `crate::gl` implements it for real frames, the CPU painter in the app
//! implements it as a fallback, and the headless CLI records draws.

use bytemuck::{Pod, Zeroable};

use super::config::PhysicsParams;
use super::particle::{step, Particle};
use super::store::ParticleStore;

/// GPU-compatible point sprite vertex (12 bytes)
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct PointVertex {
    pub x: f32,
    pub y: f32,
    pub size: f32,
}

/// Floats per vertex in the packed buffer
pub const FLOATS_PER_VERTEX: usize = 3;
/// Byte stride between consecutive vertices
pub const VERTEX_STRIDE: usize = std::mem::size_of::<PointVertex>();
/// Byte offset of the point size within a vertex
pub const SIZE_OFFSET: usize = 2 * std::mem::size_of::<f32>();

impl From<&Particle> for PointVertex {
    fn from(p: &Particle) -> Self {
        Self {
            x: p.x,
            y: p.y,
            size: p.size,
        }
    }
}

/// Interleaved `x, y, size` bytes in native byte order
pub fn pack_vertices(vertices: &[PointVertex]) -> &[u8] {
    bytemuck::cast_slice(vertices)
}

/// Something that can draw a batch of point sprites.
///
/// Never called with zero points.
pub trait PointBackend {
    /// `bytes` holds `count` tightly packed [`PointVertex`] values.
    fn draw_points(&mut self, bytes: &[u8], count: usize);
}

/// What happened during one frame
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameOutcome {
    /// Particles alive after this frame's step
    pub live: usize,
    /// Whether a draw call was issued
    pub drawn: bool,
}

/// Drives one simulation step plus one draw call per frame
pub struct FrameRenderer {
    physics: PhysicsParams,
    /// Reused snapshot buffer
    vertices: Vec<PointVertex>,
}

impl FrameRenderer {
    pub fn new(physics: PhysicsParams) -> Self {
        Self {
            physics,
            vertices: Vec::new(),
        }
    }

    pub fn physics(&self) -> &PhysicsParams {
        &self.physics
    }

    /// Step every particle, snapshot the survivors and hand them to `backend`.
    /// An empty store never reaches the backend.
    pub fn render_frame<B>(&mut self, store: &ParticleStore, backend: &mut B) -> FrameOutcome
    where
        B: PointBackend + ?Sized,
    {
        let physics = &self.physics;
        let live = store.advance_frame(|p| step(p, physics), &mut self.vertices);
        if self.vertices.is_empty() {
            return FrameOutcome { live, drawn: false };
        }

        backend.draw_points(pack_vertices(&self.vertices), self.vertices.len());
        FrameOutcome { live, drawn: true }
    }

    /// Draw the previous frame's snapshot again without stepping.
    /// Returns whether anything was drawn.
    pub fn redraw_last<B>(&self, backend: &mut B) -> bool
    where
        B: PointBackend + ?Sized,
    {
        if self.vertices.is_empty() {
            return false;
        }
        backend.draw_points(pack_vertices(&self.vertices), self.vertices.len());
        true
    }
}

/// Backend that keeps the last frame's vertices; used by the headless
/// driver and by tests.
#[derive(Debug, Default)]
pub struct RecordingBackend {
    pub draw_calls: u64,
    pub points_drawn: u64,
    pub bytes_uploaded: u64,
    pub last_frame: Vec<PointVertex>,
}

impl PointBackend for RecordingBackend {
    fn draw_points(&mut self, bytes: &[u8], count: usize) {
        self.draw_calls += 1;
        self.points_drawn += count as u64;
        self.bytes_uploaded += bytes.len() as u64;
        self.last_frame.clear();
        self.last_frame
            .extend_from_slice(bytemuck::cast_slice::<u8, PointVertex>(bytes));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::SpawnParams;

    #[test]
    fn vertex_layout_is_three_tight_floats() {
        assert_eq!(VERTEX_STRIDE, 12);
        assert_eq!(SIZE_OFFSET, 8);
        assert_eq!(FLOATS_PER_VERTEX * std::mem::size_of::<f32>(), VERTEX_STRIDE);
    }

    #[test]
    fn packed_bytes_are_native_order_floats() {
        let vertices = [
            PointVertex { x: 0.5, y: -0.25, size: 10.0 },
            PointVertex { x: -1.0, y: 1.0, size: 5.5 },
        ];
        let bytes = pack_vertices(&vertices);
        assert_eq!(bytes.len(), 24);
        assert_eq!(&bytes[0..4], &0.5f32.to_ne_bytes());
        assert_eq!(&bytes[4..8], &(-0.25f32).to_ne_bytes());
        assert_eq!(&bytes[8..12], &10.0f32.to_ne_bytes());
        assert_eq!(&bytes[20..24], &5.5f32.to_ne_bytes());
    }

    #[test]
    fn empty_store_skips_backend() {
        let store = ParticleStore::with_seed(1, SpawnParams::default());
        let mut renderer = FrameRenderer::new(PhysicsParams::default());
        let mut backend = RecordingBackend::default();

        let outcome = renderer.render_frame(&store, &mut backend);
        assert_eq!(outcome, FrameOutcome { live: 0, drawn: false });
        assert_eq!(backend.draw_calls, 0);
    }

    #[test]
    fn one_draw_call_per_frame_with_all_survivors() {
        let store = ParticleStore::with_seed(2, SpawnParams::default());
        store.spawn(0.0, 0.0, 10);
        store.spawn(0.5, 0.5, 10);
        let mut renderer = FrameRenderer::new(PhysicsParams::default());
        let mut backend = RecordingBackend::default();

        let outcome = renderer.render_frame(&store, &mut backend);
        assert_eq!(outcome, FrameOutcome { live: 20, drawn: true });
        assert_eq!(backend.draw_calls, 1);
        assert_eq!(backend.points_drawn, 20);
        assert_eq!(backend.bytes_uploaded, 20 * 12);
        assert_eq!(backend.last_frame, store.snapshot_vertex_data());
    }

    #[test]
    fn never_draws_culled_sizes() {
        let store = ParticleStore::with_seed(3, SpawnParams::default());
        store.spawn(0.0, 0.0, 50);
        let mut renderer = FrameRenderer::new(PhysicsParams::default());
        let mut backend = RecordingBackend::default();

        let mut frames = 0;
        while renderer.render_frame(&store, &mut backend).drawn {
            assert!(backend.last_frame.iter().all(|v| v.size >= 1.0));
            frames += 1;
        }
        assert!(store.is_empty());
        // 20 * 0.99^n < 1 caps the lifetime just under 300 frames
        assert!(frames < 300);
        assert_eq!(backend.draw_calls, frames);
    }

    #[test]
    fn redraw_last_does_not_step() {
        let store = ParticleStore::with_seed(4, SpawnParams::default());
        let mut renderer = FrameRenderer::new(PhysicsParams::default());
        let mut backend = RecordingBackend::default();
        assert!(!renderer.redraw_last(&mut backend));

        store.spawn(0.0, 0.0, 5);
        renderer.render_frame(&store, &mut backend);
        let first = backend.last_frame.clone();

        assert!(renderer.redraw_last(&mut backend));
        assert_eq!(backend.last_frame, first);
        assert_eq!(backend.draw_calls, 2);
        assert_eq!(store.snapshot_vertex_data(), first);
    }
}
