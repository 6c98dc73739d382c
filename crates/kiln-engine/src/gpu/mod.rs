//! Low-level OpenGL command layer.
//!
//! Everything here talks to the GPU through [`GlDriver`]; the glow-backed
//! implementation is [`GlowDriver`]. GPU objects keep an `Rc<dyn GlDriver>` and
//! release themselves on drop, so they must not outlive the GL context.

mod barrier;
mod buffer;
mod driver;
mod error;
mod glow_driver;
mod renderer;
mod shader;

pub use barrier::BarrierMask;
pub use buffer::{IndexBuffer, VertexArray, VertexBuffer};
pub use driver::{
    BufferId, GlDriver, ProgramId, ShaderId, ShaderStage, UniformLocation, VertexArrayId,
    NULL_ID, UNIFORM_NOT_FOUND,
};
pub use error::ShaderError;
pub use glow_driver::GlowDriver;
pub use renderer::{BlendFactor, Elements, MagFilter, MinFilter, Renderer, WrapMode};
pub use shader::ShaderProgram;
