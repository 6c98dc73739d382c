//! Scope profiling.
//!
//! Lightweight wall-clock timing for named frame sections (physics, each
//! update callback type, hooks). Statistics accumulate over a reporting window
//! and are logged at debug level when the frame clock closes an FPS window.

mod profiler;

pub use profiler::{Profiler, ScopeStats};
