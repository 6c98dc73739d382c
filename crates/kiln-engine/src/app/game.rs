use anyhow::Result;

use super::Engine;

/// User hooks driven by [`super::Application`].
///
/// `on_create` and `on_destroy` run exactly once per run. `on_update` and
/// `on_render` run once per frame; an error from either is logged and the
/// frame continues.
pub trait Game {
    /// Called before the first frame. An error aborts the run.
    fn on_create(&mut self, engine: &mut Engine) -> Result<()> {
        let _ = engine;
        Ok(())
    }

    /// Called after physics and component updates.
    fn on_update(&mut self, engine: &mut Engine) -> Result<()> {
        let _ = engine;
        Ok(())
    }

    /// Called between the frame's clear and flush.
    fn on_render(&mut self, engine: &mut Engine) -> Result<()> {
        let _ = engine;
        Ok(())
    }

    /// Called once after the last frame.
    fn on_destroy(&mut self, engine: &mut Engine) {
        let _ = engine;
    }
}
