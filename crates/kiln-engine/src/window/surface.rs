use anyhow::Result;

use crate::input::{CursorMode, InputState};

/// What the frame loop needs from a window.
pub trait WindowSurface {
    /// Drains pending OS events into `input` without blocking.
    fn pull_events(&mut self, input: &mut InputState);

    /// Shows the frame rendered since the last call.
    fn present(&mut self) -> Result<()>;

    /// `false` once the window has been destroyed.
    fn is_open(&self) -> bool;

    /// The user asked the window to close (title bar button, Alt+F4, ...).
    fn close_requested(&self) -> bool;

    /// Drawable size in physical pixels.
    fn size(&self) -> (u32, u32);

    /// Requests a new drawable size. The platform may pick a different one;
    /// [`WindowSurface::size`] reports what was applied.
    fn set_size(&mut self, width: u32, height: u32);

    /// Top-left corner of the window on the desktop, in physical pixels.
    fn position(&self) -> (i32, i32);
    fn set_position(&mut self, x: i32, y: i32);

    fn cursor_mode(&self) -> CursorMode;
    fn set_cursor_mode(&mut self, mode: CursorMode);

    /// Warps the cursor, in logical pixels.
    fn set_cursor_position(&mut self, x: f32, y: f32);

    fn set_title(&mut self, title: &str);
}
