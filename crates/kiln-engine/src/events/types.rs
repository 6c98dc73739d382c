use crate::input::Key;

/// Published once per frame, right after the clock ticks.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FrameStarted {
    /// 1 for the first frame.
    pub frame: u64,
    pub time_delta: f32,
    pub unscaled_time_delta: f32,
}

/// The drawable size changed since the previous frame.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct WindowResized {
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct KeyPressed {
    pub key: Key,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct KeyReleased {
    pub key: Key,
}
