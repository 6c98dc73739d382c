//! Kiln engine crate.
//!
//! Frame execution core (application loop, timing, input, physics hand-off,
//! component update dispatch, typed events) and the OpenGL command layer it renders through.

pub mod app;
pub mod dispatch;
pub mod editor;
pub mod events;
pub mod gpu;
pub mod input;
pub mod logging;
pub mod physics;
pub mod profiling;
pub mod time;
pub mod window;
pub mod world;

#[cfg(test)]
mod testing;

pub use app::{AppConfig, AppError, AppPhase, Application, Engine, Game};
pub use dispatch::{Update, UpdateCtx};
pub use world::{ObjectHandle, World};
