//! Time subsystem.
//!
//! One `FrameClock` per engine. The frame loop calls `tick()` exactly once per
//! frame; everything else only reads the resulting `FrameTime` or the clock's
//! accessors.

mod frame_clock;

pub use frame_clock::{FrameClock, FrameTime};
