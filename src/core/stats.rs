//! Frame-rate measurement

use tracing::debug;

/// Rolling FPS over the last 60 frames
pub struct FpsCounter {
    frames: Vec<f64>,
}

impl FpsCounter {
    pub fn new() -> Self {
        Self {
            frames: Vec::with_capacity(61),
        }
    }

    /// Record a frame at `now` (seconds)
    pub fn tick_at(&mut self, now: f64) {
        self.frames.push(now);
        if self.frames.len() > 60 {
            self.frames.remove(0);
        }
    }

    pub fn fps(&self) -> f64 {
        let (Some(first), Some(last)) = (self.frames.first(), self.frames.last()) else {
            return 0.0;
        };
        let elapsed = last - first;
        if self.frames.len() < 2 || elapsed <= 0.0 {
            return 0.0;
        }
        (self.frames.len() as f64 - 1.0) / elapsed
    }
}

impl Default for FpsCounter {
    fn default() -> Self {
        Self::new()
    }
}

/// Frames-per-second over whole one-second windows, logged as each window closes
#[derive(Debug, Default)]
pub struct FrameStats {
    window_start: Option<f64>,
    frames_in_window: u32,
    last_fps: f32,
    total_frames: u64,
}

impl FrameStats {
    /// Count a frame. Returns the FPS of the window that just closed, if any.
    pub fn tick_at(&mut self, now: f64, live: usize) -> Option<f32> {
        self.total_frames += 1;
        let Some(start) = self.window_start else {
            self.window_start = Some(now);
            self.frames_in_window = 1;
            return None;
        };
        let elapsed = now - start;
        if elapsed < 1.0 {
            self.frames_in_window += 1;
            return None;
        }
        // the current frame opens the next window
        self.last_fps = (self.frames_in_window as f64 / elapsed) as f32;
        self.frames_in_window = 1;
        self.window_start = Some(now);
        debug!(fps = self.last_fps, live, "FPS");
        Some(self.last_fps)
    }

    pub fn last_fps(&self) -> f32 {
        self.last_fps
    }

    pub fn total_frames(&self) -> u64 {
        self.total_frames
    }
}
