use std::time::{Duration, Instant};

/// Frame timing snapshot produced by [`FrameClock::tick`].
#[derive(Debug, Copy, Clone)]
pub struct FrameTime {
    /// Scaled delta in seconds. Zero while paused.
    pub dt: f32,

    /// Wall-clock delta in seconds, after clamping.
    pub unscaled_dt: f32,

    /// Monotonic timestamp taken at the tick.
    pub now: Instant,

    /// Monotonic frame counter.
    pub frame_index: u64,

    /// True on the tick that closed a one-second FPS window.
    pub fps_updated: bool,
}

/// Frame clock owning the engine's notion of time.
///
/// Invariant after every tick: `time_delta == unscaled_time_delta * time_scale`,
/// except while paused where `time_delta == 0`.
///
/// The unscaled delta is clamped to `[dt_min, dt_max]` so that debugger stalls,
/// minimized windows or tight loops do not feed pathological values into
/// update code.
#[derive(Debug, Clone)]
pub struct FrameClock {
    created: Instant,
    last: Instant,
    second_start: Instant,
    frames_this_second: u32,
    fps: u32,
    frame_index: u64,

    time_delta: f32,
    unscaled_time_delta: f32,
    total_elapsed: f32,

    dt_min: Duration,
    dt_max: Duration,
}

impl FrameClock {
    /// Creates a new clock with default clamps (100 µs .. 250 ms).
    pub fn new() -> Self {
        Self::with_clamps(Duration::from_micros(100), Duration::from_millis(250))
    }

    /// Creates a clock with custom delta-time clamps.
    pub fn with_clamps(dt_min: Duration, dt_max: Duration) -> Self {
        Self::starting_at(Instant::now(), dt_min, dt_max)
    }

    /// Creates a clock whose baseline is `start`.
    pub fn starting_at(start: Instant, dt_min: Duration, dt_max: Duration) -> Self {
        debug_assert!(dt_min <= dt_max);
        Self {
            created: start,
            last: start,
            second_start: start,
            frames_this_second: 0,
            fps: 0,
            frame_index: 0,
            time_delta: 0.0,
            unscaled_time_delta: 0.0,
            total_elapsed: 0.0,
            dt_min,
            dt_max,
        }
    }

    /// Resets the delta baseline without touching accumulated time.
    pub fn reset(&mut self) {
        self.last = Instant::now();
    }

    /// Advances the clock to `now`.
    ///
    /// `time_scale` is applied to the clamped wall-clock delta; `paused`
    /// forces the scaled delta to zero. Game time (`total_elapsed`) advances
    /// by the scaled delta.
    pub fn tick(&mut self, now: Instant, time_scale: f32, paused: bool) -> FrameTime {
        let dt = now
            .saturating_duration_since(self.last)
            .clamp(self.dt_min, self.dt_max);
        self.last = now;

        self.unscaled_time_delta = dt.as_secs_f32();
        self.time_delta = if paused {
            0.0
        } else {
            self.unscaled_time_delta * time_scale
        };
        self.total_elapsed += self.time_delta;

        self.frames_this_second += 1;
        let mut fps_updated = false;
        if now.saturating_duration_since(self.second_start) >= Duration::from_secs(1) {
            self.fps = self.frames_this_second;
            self.frames_this_second = 0;
            self.second_start = now;
            fps_updated = true;
        }

        let ft = FrameTime {
            dt: self.time_delta,
            unscaled_dt: self.unscaled_time_delta,
            now,
            frame_index: self.frame_index,
            fps_updated,
        };

        self.frame_index = self.frame_index.wrapping_add(1);
        ft
    }

    pub fn time_delta(&self) -> f32 {
        self.time_delta
    }

    pub fn unscaled_time_delta(&self) -> f32 {
        self.unscaled_time_delta
    }

    /// Scaled time accumulated over all ticks (or the last override).
    pub fn total_elapsed(&self) -> f32 {
        self.total_elapsed
    }

    /// Overrides accumulated game time, e.g. when restoring a saved scene.
    pub fn set_total_elapsed(&mut self, time: f32) {
        self.total_elapsed = time.max(0.0);
    }

    /// Wall time since the clock was created, independent of pause and scale.
    pub fn engine_time(&self) -> f32 {
        self.last.saturating_duration_since(self.created).as_secs_f32()
    }

    /// Frames counted over the last completed one-second window.
    pub fn fps(&self) -> u32 {
        self.fps
    }

    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}
