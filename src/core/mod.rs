//! Platform-agnostic core - shared between the egui front end and the CLI

pub mod config;
pub mod input;
pub mod particle;
pub mod render;
pub mod stats;
pub mod store;
pub mod visualizer;

pub use config::{ConfigError, HeadlessConfig, PhysicsParams, RenderMode, SparksConfig, SpawnParams};
pub use input::{to_ndc, InputBridge, RedrawRequest, SurfaceSize, TouchAction};
pub use particle::{step, Particle};
pub use render::{pack_vertices, FrameOutcome, FrameRenderer, PointBackend, PointVertex, RecordingBackend};
pub use stats::{FpsCounter, FrameStats};
pub use store::ParticleStore;
pub use visualizer::Visualizer;
