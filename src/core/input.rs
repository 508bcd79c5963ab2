//! Touch input bridge: surface pixels to normalized device coordinates

use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info};

use super::store::ParticleStore;

/// Pointer action reported by the host
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TouchAction {
    Down,
    Move,
    Up,
    Cancel,
}

impl TouchAction {
    /// Down and move spawn particles; lifting the pointer does nothing
    pub fn spawns(self) -> bool {
        matches!(self, TouchAction::Down | TouchAction::Move)
    }
}

/// Current surface dimensions in pixels
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SurfaceSize {
    pub width: u32,
    pub height: u32,
}

/// Map a surface coordinate to normalized device coordinates.
///
/// Surface Y grows downward, device Y grows upward. Returns `None` while the
/// surface has no area.
pub fn to_ndc(px: f32, py: f32, width: u32, height: u32) -> Option<(f32, f32)> {
    if width == 0 || height == 0 {
        return None;
    }
    let x = (px / width as f32) * 2.0 - 1.0;
    let y = 1.0 - (py / height as f32) * 2.0;
    Some((x, y))
}

/// Flag raised by input and consumed by an on-demand render loop
#[derive(Clone, Debug, Default)]
pub struct RedrawRequest(Arc<AtomicBool>);

impl RedrawRequest {
    pub fn request(&self) {
        self.0.store(true, Ordering::Release);
    }

    /// Clear the flag, returning whether it was set
    pub fn take(&self) -> bool {
        self.0.swap(false, Ordering::AcqRel)
    }

    pub fn is_requested(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Handle the input thread uses to turn touches into particles.
///
/// Cheap to clone; every clone shares the store, surface size and redraw flag.
#[derive(Clone)]
pub struct InputBridge {
    store: Arc<ParticleStore>,
    surface: Arc<Mutex<SurfaceSize>>,
    redraw: RedrawRequest,
    per_touch: usize,
}

impl InputBridge {
    pub fn new(store: Arc<ParticleStore>, redraw: RedrawRequest) -> Self {
        let per_touch = store.spawn_params().per_touch;
        Self {
            store,
            surface: Arc::new(Mutex::new(SurfaceSize::default())),
            redraw,
            per_touch,
        }
    }

    pub fn set_per_touch(&mut self, count: usize) {
        self.per_touch = count;
    }

    pub fn per_touch(&self) -> usize {
        self.per_touch
    }

    /// Record new surface dimensions. Returns `true` if they changed.
    pub fn on_surface_resized(&self, width: u32, height: u32) -> bool {
        let mut surface = self.surface.lock();
        let size = SurfaceSize { width, height };
        if *surface == size {
            return false;
        }
        *surface = size;
        info!(width, height, "Surface changed");
        true
    }

    pub fn surface_size(&self) -> SurfaceSize {
        *self.surface.lock()
    }

    /// Translate using the last reported surface size
    pub fn translate(&self, px: f32, py: f32) -> Option<(f32, f32)> {
        let SurfaceSize { width, height } = self.surface_size();
        to_ndc(px, py, width, height)
    }

    /// Handle one pointer event. Returns `true` if particles were spawned.
    pub fn on_touch(&self, px: f32, py: f32, action: TouchAction) -> bool {
        if !action.spawns() {
            return false;
        }
        let Some((x, y)) = self.translate(px, py) else {
            debug!(px, py, "Surface not sized yet, dropping touch");
            return false;
        };
        self.store.spawn(x, y, self.per_touch);
        self.redraw.request();
        true
    }
}
