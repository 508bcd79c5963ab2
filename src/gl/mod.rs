//! OpenGL / WebGL2 point sprite renderer
//!
//! Draws the packed `x, y, size` vertex stream as `GL_POINTS` through glow,
//! inside an egui paint callback.

mod renderer;

pub use renderer::{GlFrame, GlPointRenderer, RenderError};
