//! Thread-safe particle collection
//!
//! The store owns its lock. Every public operation takes it for its whole
//! duration, so callers on the input thread and the render thread never
//! synchronize by hand. The spawn RNG lives behind the same lock.

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info, warn};

use super::config::SpawnParams;
use super::particle::Particle;
use super::render::PointVertex;

struct Inner {
    particles: Vec<Particle>,
    rng: StdRng,
}

/// Live particles plus the random source used to spawn them
pub struct ParticleStore {
    inner: Mutex<Inner>,
    spawn: SpawnParams,
    seed: u64,
}

impl ParticleStore {
    /// Store with a deterministic spawn sequence
    pub fn with_seed(seed: u64, spawn: SpawnParams) -> Self {
        Self {
            inner: Mutex::new(Inner {
                particles: Vec::new(),
                rng: StdRng::seed_from_u64(seed),
            }),
            spawn,
            seed,
        }
    }

    /// Store seeded from OS entropy. The seed is logged so a run can be replayed.
    pub fn from_entropy(spawn: SpawnParams) -> Self {
        let seed = entropy_seed();
        info!(seed, "Particle RNG seeded");
        Self::with_seed(seed, spawn)
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn spawn_params(&self) -> &SpawnParams {
        &self.spawn
    }

    /// Append `count` randomized particles at `(x, y)`
    pub fn spawn(&self, x: f32, y: f32, count: usize) {
        let mut inner = self.inner.lock();
        let Inner { particles, rng } = &mut *inner;
        particles.reserve(count);
        for _ in 0..count {
            particles.push(Particle::random(x, y, &self.spawn, rng));
        }
        debug!(x, y, count, total = particles.len(), "Spawned particles");
    }

    /// Apply `step_fn` to every particle once, dropping those it rejects.
    /// Returns the live count afterwards.
    pub fn for_each_surviving<F>(&self, step_fn: F) -> usize
    where
        F: FnMut(&mut Particle) -> bool,
    {
        let mut inner = self.inner.lock();
        inner.particles.retain_mut(step_fn);
        inner.particles.len()
    }

    /// Render-ready copy of every live particle
    pub fn snapshot_vertex_data(&self) -> Vec<PointVertex> {
        let inner = self.inner.lock();
        inner.particles.iter().map(PointVertex::from).collect()
    }

    /// One frame's worth of work under a single lock hold: step every
    /// particle, cull the dead, then write the survivors into `out`.
    /// A concurrent `spawn` lands entirely before or after this call.
    pub fn advance_frame<F>(&self, step_fn: F, out: &mut Vec<PointVertex>) -> usize
    where
        F: FnMut(&mut Particle) -> bool,
    {
        let mut inner = self.inner.lock();
        inner.particles.retain_mut(step_fn);
        out.clear();
        out.extend(inner.particles.iter().map(PointVertex::from));
        inner.particles.len()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().particles.is_empty()
    }

    pub fn clear(&self) {
        self.inner.lock().particles.clear();
    }
}

fn entropy_seed() -> u64 {
    let mut bytes = [0u8; 8];
    match getrandom::getrandom(&mut bytes) {
        Ok(()) => u64::from_le_bytes(bytes),
        Err(e) => {
            warn!(error = %e, "OS entropy unavailable, seeding from clock");
            (crate::time::now_seconds() * 1e9) as u64 ^ 0x9E37_79B9_7F4A_7C15
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::PhysicsParams;
    use crate::core::particle::step;
    use std::sync::{mpsc, Arc};
    use std::thread;

    fn store(seed: u64) -> ParticleStore {
        ParticleStore::with_seed(seed, SpawnParams::default())
    }

    #[test]
    fn spawn_adds_exact_count_with_distinct_state() {
        let store = store(1);
        store.spawn(0.5, -0.5, 10);
        assert_eq!(store.len(), 10);

        let snapshot = store.snapshot_vertex_data();
        for v in &snapshot {
            assert_eq!((v.x, v.y), (0.5, -0.5));
            assert!(v.size >= 5.0 && v.size < 20.0);
        }
        for i in 0..snapshot.len() {
            for j in (i + 1)..snapshot.len() {
                assert_ne!(snapshot[i].size, snapshot[j].size);
            }
        }
    }

    #[test]
    fn same_seed_same_particles() {
        let a = store(42);
        let b = store(42);
        a.spawn(0.0, 0.0, 20);
        b.spawn(0.0, 0.0, 20);
        assert_eq!(a.snapshot_vertex_data(), b.snapshot_vertex_data());
        assert_eq!(a.seed(), 42);
    }

    #[test]
    fn surviving_pass_removes_rejected_without_skipping() {
        let store = store(3);
        store.spawn(0.0, 0.0, 100);

        let mut visited = 0;
        let mut index = 0;
        let live = store.for_each_surviving(|p| {
            visited += 1;
            index += 1;
            // mark every particle with its visit order, keep odd ones
            p.x = index as f32;
            index % 2 == 1
        });
        assert_eq!(visited, 100);
        assert_eq!(live, 50);

        let xs: Vec<f32> = store.snapshot_vertex_data().iter().map(|v| v.x).collect();
        let expected: Vec<f32> = (1..=100).step_by(2).map(|i| i as f32).collect();
        assert_eq!(xs, expected);
    }

    #[test]
    fn small_particles_are_absent_after_step() {
        let spawn = SpawnParams {
            min_size: 1.0,
            max_size: 1.005,
            ..SpawnParams::default()
        };
        let store = ParticleStore::with_seed(9, spawn);
        store.spawn(0.0, 0.0, 10);
        store.spawn(0.1, 0.1, 0);
        let physics = PhysicsParams::default();
        let live = store.for_each_surviving(|p| step(p, &physics));
        assert_eq!(live, 0);
        assert!(store.is_empty());
    }

    #[test]
    fn advance_frame_snapshot_matches_survivors() {
        let store = store(5);
        store.spawn(0.0, 0.0, 30);
        let physics = PhysicsParams::default();
        let mut out = vec![PointVertex { x: 9.0, y: 9.0, size: 9.0 }; 3];
        let live = store.advance_frame(|p| step(p, &physics), &mut out);
        assert_eq!(live, 30);
        assert_eq!(out.len(), 30);
        assert_eq!(out, store.snapshot_vertex_data());
    }

    #[test]
    fn clear_empties_store() {
        let store = store(6);
        store.spawn(0.0, 0.0, 10);
        store.clear();
        assert!(store.is_empty());
    }

    #[test]
    fn concurrent_spawn_during_frame_is_not_lost() {
        let store = Arc::new(store(11));
        store.spawn(0.0, 0.0, 1000);

        let (started_tx, started_rx) = mpsc::channel();
        let spawner = {
            let store = store.clone();
            thread::spawn(move || {
                started_rx.recv().unwrap();
                store.spawn(0.3, 0.3, 100);
            })
        };

        let physics = PhysicsParams::default();
        let mut first = true;
        let mut out = Vec::new();
        let live = store.advance_frame(
            |p| {
                if first {
                    first = false;
                    started_tx.send(()).unwrap();
                    // give the spawner time to block on the lock
                    thread::sleep(std::time::Duration::from_millis(20));
                }
                step(p, &physics)
            },
            &mut out,
        );
        spawner.join().unwrap();

        // sizes start at >= 5, so one step culls nothing
        assert_eq!(live, 1000);
        assert_eq!(out.len(), 1000);
        assert_eq!(store.len(), 1100);

        let fresh = store
            .snapshot_vertex_data()
            .iter()
            .filter(|v| v.x == 0.3 && v.y == 0.3)
            .count();
        assert_eq!(fresh, 100);
    }

    #[test]
    fn many_threads_spawning_concurrently() {
        let store = Arc::new(store(12));
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = store.clone();
                thread::spawn(move || {
                    for _ in 0..50 {
                        store.spawn(i as f32 * 0.1, 0.0, 10);
                    }
                })
            })
            .collect();
        let physics = PhysicsParams::default();
        for _ in 0..20 {
            store.for_each_surviving(|p| step(p, &physics));
        }
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(store.len(), 8 * 50 * 10);
    }
}
