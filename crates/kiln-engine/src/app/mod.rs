//! Application lifecycle and the per-frame loop.
//!
//! [`Application`] owns the user's [`Game`] and, once initialized, the
//! [`Engine`] context every hook receives. There is no global instance: hosts
//! construct one application and drive it with [`Application::run`] or, frame
//! by frame, with [`Application::frame`].

mod application;
mod config;
mod engine;
mod error;
mod game;
mod run_state;

pub use application::{AppPhase, Application};
pub use config::AppConfig;
pub use engine::{Engine, EVENT_LOGGER};
pub use error::AppError;
pub use game::Game;
pub use run_state::RunState;
