/// Loop flags shared by the engine and its hooks.
///
/// `should_close` is one-way: once set it stays set for the rest of the run.
#[derive(Debug, Clone)]
pub struct RunState {
    is_running: bool,
    should_close: bool,
    is_paused: bool,
    time_scale: f32,
}

impl RunState {
    pub fn new(time_scale: f32) -> Self {
        let mut state = Self {
            is_running: false,
            should_close: false,
            is_paused: false,
            time_scale: 1.0,
        };
        state.set_time_scale(time_scale);
        state
    }

    /// Requests the loop to stop after the current frame.
    ///
    /// Returns `false` when a close was already pending.
    pub fn close(&mut self) -> bool {
        if self.should_close {
            return false;
        }
        log::info!("application close requested");
        self.should_close = true;
        true
    }

    pub fn should_close(&self) -> bool {
        self.should_close
    }

    pub fn is_running(&self) -> bool {
        self.is_running
    }

    pub(crate) fn set_running(&mut self, running: bool) {
        self.is_running = running;
    }

    pub fn is_paused(&self) -> bool {
        self.is_paused
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.is_paused = paused;
    }

    pub fn time_scale(&self) -> f32 {
        self.time_scale
    }

    /// Negative and NaN scales are clamped to 0.
    pub fn set_time_scale(&mut self, scale: f32) {
        if scale.is_nan() || scale < 0.0 {
            log::warn!("invalid time scale {scale}, using 0");
            self.time_scale = 0.0;
        } else {
            self.time_scale = scale;
        }
    }
}

impl Default for RunState {
    fn default() -> Self {
        Self::new(1.0)
    }
}
