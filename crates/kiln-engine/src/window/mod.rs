//! Window surfaces.
//!
//! The frame loop only sees [`WindowSurface`]. [`GlWindow`] is the desktop
//! implementation (winit window + glutin GL context); [`HeadlessWindow`] has no
//! OS window and is fed scripted input.

mod gl_window;
mod headless;
mod surface;

pub use gl_window::{GlWindow, GlWindowSettings};
pub use headless::{HeadlessHandle, HeadlessWindow};
pub use surface::WindowSurface;
