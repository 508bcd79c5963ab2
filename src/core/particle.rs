//! Particle state and the per-frame simulation step

use rand::Rng;

use super::config::{PhysicsParams, SpawnParams};

/// A single live particle.
///
/// Position is in normalized device coordinates. Velocity is a per-frame
/// displacement, so motion speed is tied to the frame rate.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Particle {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub size: f32,
}

impl Particle {
    pub fn new(x: f32, y: f32, vx: f32, vy: f32, size: f32) -> Self {
        Self { x, y, vx, vy, size }
    }

    /// Particle at `(x, y)` with velocity and size drawn from `params`
    pub fn random<R: Rng + ?Sized>(x: f32, y: f32, params: &SpawnParams, rng: &mut R) -> Self {
        let speed = params.max_speed.abs();
        let vx = rng.gen_range(-speed..=speed);
        let vy = rng.gen_range(-speed..=speed);
        let size = if params.min_size < params.max_size {
            rng.gen_range(params.min_size..params.max_size)
        } else {
            params.min_size
        };
        Self { x, y, vx, vy, size }
    }
}

/// Advance one particle by one frame. Returns `false` once it should be culled.
///
/// Order: integrate position, decay size, reflect velocity on any axis that
/// left [-1, 1], then test liveness. Position is never clamped, so a particle
/// may sit just outside the bounds for a frame until the reflected velocity
/// carries it back.
pub fn step(p: &mut Particle, physics: &PhysicsParams) -> bool {
    p.x += p.vx;
    p.y += p.vy;
    p.size *= physics.decay;

    if p.x > 1.0 || p.x < -1.0 {
        p.vx = -p.vx;
    }
    if p.y > 1.0 || p.y < -1.0 {
        p.vy = -p.vy;
    }

    p.size >= physics.cull_size
}
