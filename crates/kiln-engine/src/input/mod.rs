//! Input subsystem.
//!
//! Public API is platform-agnostic and does not expose winit types. The window
//! surface translates platform events into `InputEvent`s and feeds them to
//! `InputState` once per frame.

pub(crate) mod platform;
mod state;
mod types;

pub use state::InputState;
pub use types::{
    ButtonState, CursorMode, InputEvent, Key, Modifiers, MouseButton, MouseWheelDelta,
};
