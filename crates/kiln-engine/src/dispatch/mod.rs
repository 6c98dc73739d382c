//! Per-frame update dispatch.
//!
//! - `UpdateRegistry`: append-only list of per-component-type update callbacks,
//!   invoked in registration order once per frame.
//! - `CollisionBuffers`: double-buffered contact pairs handed from physics to
//!   update code.
//! - `FrameCommands`: requests issued by components while the world is
//!   mutably borrowed; applied by the frame loop after the last callback.

mod collisions;
mod commands;
mod registry;

pub use collisions::{CollisionBuffers, CollisionPair, CollisionWriter};
pub use commands::{FrameCommand, FrameCommands};
pub use registry::{FrameInputs, Update, UpdateCtx, UpdateRegistry};
