//! glow point sprite program.
//!
//! Compiles and links once at startup; a failure there is returned to the
//! host, which must not try to draw with the program afterwards.

use eframe::glow::{self, HasContext};
use thiserror::Error;
use tracing::{debug, error, info};

use crate::core::render::{PointBackend, SIZE_OFFSET, VERTEX_STRIDE};

#[cfg(target_arch = "wasm32")]
const SHADER_VERSION: &str = "#version 300 es\n";
#[cfg(not(target_arch = "wasm32"))]
const SHADER_VERSION: &str = "#version 330\n";

const VERTEX_SHADER: &str = include_str!("points.vert");
const FRAGMENT_SHADER: &str = include_str!("points.frag");

/// Attribute names the vertex shader must expose
const POSITION_ATTRIB: &str = "position";
const POINT_SIZE_ATTRIB: &str = "pointSize";

/// Initialization-time GPU failures
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("{stage} shader failed to compile: {log}")]
    ShaderCompile { stage: &'static str, log: String },
    #[error("shader program failed to link: {log}")]
    ProgramLink { log: String },
    #[error("linked program has no `{name}` attribute")]
    MissingAttribute { name: &'static str },
    #[error("failed to create GL object: {0}")]
    Resource(String),
}

/// Linked point sprite program plus its vertex array and buffer
pub struct GlPointRenderer {
    program: glow::Program,
    vertex_array: glow::VertexArray,
    vertex_buffer: glow::Buffer,
    /// Bytes currently allocated in `vertex_buffer`
    buffer_capacity: usize,
    /// Point size at which a sprite is fully opaque
    fade_size: f32,
}

impl GlPointRenderer {
    pub fn new(gl: &glow::Context, fade_size: f32) -> Result<Self, RenderError> {
        unsafe {
            info!(version = %gl.get_parameter_string(glow::VERSION), "GL context");

            let program = link_program(gl)?;

            let located = (
                gl.get_attrib_location(program, POSITION_ATTRIB),
                gl.get_attrib_location(program, POINT_SIZE_ATTRIB),
            );
            let (position, point_size) = match located {
                (Some(p), Some(s)) => (p, s),
                (None, _) | (_, None) => {
                    gl.delete_program(program);
                    let name = if located.0.is_none() { POSITION_ATTRIB } else { POINT_SIZE_ATTRIB };
                    return Err(RenderError::MissingAttribute { name });
                }
            };

            let vertex_array = gl.create_vertex_array().map_err(RenderError::Resource)?;
            let vertex_buffer = gl.create_buffer().map_err(RenderError::Resource)?;

            gl.bind_vertex_array(Some(vertex_array));
            gl.bind_buffer(glow::ARRAY_BUFFER, Some(vertex_buffer));
            let stride = VERTEX_STRIDE as i32;
            gl.enable_vertex_attrib_array(position);
            gl.vertex_attrib_pointer_f32(position, 2, glow::FLOAT, false, stride, 0);
            gl.enable_vertex_attrib_array(point_size);
            gl.vertex_attrib_pointer_f32(point_size, 1, glow::FLOAT, false, stride, SIZE_OFFSET as i32);
            gl.bind_vertex_array(None);
            gl.bind_buffer(glow::ARRAY_BUFFER, None);

            debug!(position, point_size, "Point sprite program ready");

            Ok(Self {
                program,
                vertex_array,
                vertex_buffer,
                buffer_capacity: 0,
                fade_size,
            })
        }
    }

    /// Upload `bytes` and issue one `GL_POINTS` draw of `count` vertices
    fn draw(&mut self, gl: &glow::Context, bytes: &[u8], count: usize, pixels_per_point: f32) {
        unsafe {
            #[cfg(not(target_arch = "wasm32"))]
            gl.enable(glow::PROGRAM_POINT_SIZE);

            gl.use_program(Some(self.program));
            gl.uniform_1_f32(
                gl.get_uniform_location(self.program, "u_pixels_per_point").as_ref(),
                pixels_per_point,
            );
            gl.uniform_1_f32(
                gl.get_uniform_location(self.program, "u_fade_size").as_ref(),
                self.fade_size,
            );

            gl.bind_vertex_array(Some(self.vertex_array));
            gl.bind_buffer(glow::ARRAY_BUFFER, Some(self.vertex_buffer));
            if bytes.len() > self.buffer_capacity {
                gl.buffer_data_u8_slice(glow::ARRAY_BUFFER, bytes, glow::STREAM_DRAW);
                self.buffer_capacity = bytes.len();
            } else {
                gl.buffer_sub_data_u8_slice(glow::ARRAY_BUFFER, 0, bytes);
            }

            gl.draw_arrays(glow::POINTS, 0, count as i32);

            gl.bind_vertex_array(None);
            gl.bind_buffer(glow::ARRAY_BUFFER, None);
            gl.use_program(None);
        }
    }

    /// Release GL objects. Call with the context that created them.
    pub fn destroy(&self, gl: &glow::Context) {
        unsafe {
            gl.delete_program(self.program);
            gl.delete_vertex_array(self.vertex_array);
            gl.delete_buffer(self.vertex_buffer);
        }
    }
}

/// A [`GlPointRenderer`] bound to a context for one frame
pub struct GlFrame<'a> {
    gl: &'a glow::Context,
    points: &'a mut GlPointRenderer,
    pixels_per_point: f32,
}

impl<'a> GlFrame<'a> {
    pub fn new(gl: &'a glow::Context, points: &'a mut GlPointRenderer, pixels_per_point: f32) -> Self {
        Self {
            gl,
            points,
            pixels_per_point,
        }
    }
}

impl PointBackend for GlFrame<'_> {
    fn draw_points(&mut self, bytes: &[u8], count: usize) {
        self.points.draw(self.gl, bytes, count, self.pixels_per_point);
    }
}

unsafe fn compile_shader(
    gl: &glow::Context,
    kind: u32,
    stage: &'static str,
    source: &str,
) -> Result<glow::Shader, RenderError> {
    let shader = gl.create_shader(kind).map_err(RenderError::Resource)?;
    gl.shader_source(shader, &format!("{SHADER_VERSION}{source}"));
    gl.compile_shader(shader);
    if !gl.get_shader_compile_status(shader) {
        let log = gl.get_shader_info_log(shader);
        error!(stage, log = %log, "Shader compilation error");
        gl.delete_shader(shader);
        return Err(RenderError::ShaderCompile { stage, log });
    }
    Ok(shader)
}

unsafe fn link_program(gl: &glow::Context) -> Result<glow::Program, RenderError> {
    let vertex = compile_shader(gl, glow::VERTEX_SHADER, "vertex", VERTEX_SHADER)?;
    let fragment = match compile_shader(gl, glow::FRAGMENT_SHADER, "fragment", FRAGMENT_SHADER) {
        Ok(shader) => shader,
        Err(e) => {
            gl.delete_shader(vertex);
            return Err(e);
        }
    };

    let program = match gl.create_program() {
        Ok(program) => program,
        Err(e) => {
            gl.delete_shader(vertex);
            gl.delete_shader(fragment);
            return Err(RenderError::Resource(e));
        }
    };
    gl.attach_shader(program, vertex);
    gl.attach_shader(program, fragment);
    gl.link_program(program);
    let linked = gl.get_program_link_status(program);

    gl.detach_shader(program, vertex);
    gl.detach_shader(program, fragment);
    gl.delete_shader(vertex);
    gl.delete_shader(fragment);

    if !linked {
        let log = gl.get_program_info_log(program);
        error!(log = %log, "Program linking error");
        gl.delete_program(program);
        return Err(RenderError::ProgramLink { log });
    }
    Ok(program)
}
