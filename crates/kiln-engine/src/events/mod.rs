//! Typed engine events.
//!
//! - `EventDispatcher`: synchronous fan-out keyed by event type. Listeners
//!   run on the publishing call, in registration order.
//! - Built-in events published by the frame loop: [`FrameStarted`],
//!   [`WindowResized`], [`KeyPressed`] and [`KeyReleased`]. Games publish
//!   their own types through [`crate::Engine::publish_event`].

mod dispatcher;
mod types;

pub use dispatcher::EventDispatcher;
pub use types::{FrameStarted, KeyPressed, KeyReleased, WindowResized};
