use std::time::Duration;

use crate::input::Key;
use crate::window::GlWindowSettings;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub vsync: bool,
    /// Requested OpenGL core profile, `(major, minor)`.
    pub gl_version: (u8, u8),
    /// MSAA samples, 0 disables multisampling.
    pub samples: u8,

    /// Initial time scale.
    pub time_scale: f32,
    /// Key that closes the application when pressed.
    pub close_key: Option<Key>,

    /// Clamp range of the wall-clock frame delta.
    pub dt_min: Duration,
    pub dt_max: Duration,

    /// Show the runtime editor from the first frame.
    pub editor_enabled: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "kiln".to_string(),
            width: 1280,
            height: 720,
            vsync: true,
            gl_version: (4, 5),
            samples: 4,
            time_scale: 1.0,
            close_key: None,
            dt_min: Duration::from_micros(100),
            dt_max: Duration::from_millis(250),
            editor_enabled: false,
        }
    }
}

impl AppConfig {
    pub fn window_settings(&self) -> GlWindowSettings {
        GlWindowSettings {
            title: self.title.clone(),
            width: self.width,
            height: self.height,
            vsync: self.vsync,
            gl_version: self.gl_version,
            samples: self.samples,
        }
    }
}
