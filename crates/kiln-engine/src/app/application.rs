use std::rc::Rc;

use crate::gpu::{GlDriver, GlowDriver, Renderer};
use crate::window::{GlWindow, WindowSurface};

use super::{AppConfig, AppError, Engine, Game};

/// Lifecycle phase of an [`Application`].
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppPhase {
    Uninitialized,
    Created,
    Running,
    Closing,
    Destroyed,
}

/// Owns a [`Game`] and the [`Engine`] it runs on.
pub struct Application<G: Game> {
    game: G,
    engine: Option<Engine>,
    phase: AppPhase,
}

impl<G: Game> Application<G> {
    pub fn new(game: G) -> Self {
        Self {
            game,
            engine: None,
            phase: AppPhase::Uninitialized,
        }
    }

    /// Builds the engine around an existing window surface and renderer.
    pub fn init(
        &mut self,
        config: AppConfig,
        window: Box<dyn WindowSurface>,
        renderer: Renderer,
    ) -> Result<&mut Engine, AppError> {
        if self.engine.is_some() {
            return Err(AppError::AlreadyInitialized);
        }

        log::info!("initializing application \"{}\"", config.title);
        self.phase = AppPhase::Created;
        Ok(self.engine.insert(Engine::new(config, window, renderer)))
    }

    /// Opens a desktop window with an OpenGL context, then calls
    /// [`Application::init`].
    pub fn init_desktop(&mut self, config: AppConfig) -> Result<&mut Engine, AppError> {
        if self.engine.is_some() {
            return Err(AppError::AlreadyInitialized);
        }

        let (window, gl) = GlWindow::new(config.window_settings()).map_err(AppError::Desktop)?;
        let gl: Rc<dyn GlDriver> = Rc::new(GlowDriver::new(gl));

        let mut renderer = Renderer::new(gl);
        renderer
            .use_depth_buffer(true)
            .use_sampling(config.samples > 0)
            .use_clear_color(0.0, 0.0, 0.0, 1.0);

        self.init(config, Box::new(window), renderer)
    }

    pub fn phase(&self) -> AppPhase {
        self.phase
    }

    pub fn game(&self) -> &G {
        &self.game
    }

    pub fn game_mut(&mut self) -> &mut G {
        &mut self.game
    }

    pub fn engine(&self) -> Result<&Engine, AppError> {
        self.engine.as_ref().ok_or(AppError::NotInitialized)
    }

    pub fn engine_mut(&mut self) -> Result<&mut Engine, AppError> {
        self.engine.as_mut().ok_or(AppError::NotInitialized)
    }

    /// Requests the loop to stop at the end of the current frame.
    pub fn close_application(&mut self) -> Result<(), AppError> {
        self.engine_mut()?.close_application();
        Ok(())
    }

    /// Runs `on_create`, frames until close is requested, then `on_destroy`.
    ///
    /// A window lost mid-run still gets `on_destroy` before the error is
    /// returned.
    pub fn run(&mut self) -> Result<(), AppError> {
        if self.engine.is_none() {
            return Err(AppError::NotInitialized);
        }
        if self.phase != AppPhase::Created {
            return Err(AppError::InvalidPhase(self.phase));
        }

        self.start()?;

        let result = loop {
            if let Err(e) = self.frame() {
                break Err(e);
            }
            if self.phase == AppPhase::Destroyed {
                break Ok(());
            }
        };

        self.shutdown()?;
        result
    }

    /// Executes one frame.
    ///
    /// The step order is fixed: verify, pull events, tick clock, physics and
    /// collision swap, component updates, `on_update`, clear + `on_render` +
    /// flush, present. A close requested anywhere in the frame is honoured
    /// only after present, by [`Application::shutdown`].
    ///
    /// The first frame of a `Created` application runs `on_create` first, so
    /// a host may drive frames by hand instead of calling
    /// [`Application::run`].
    pub fn frame(&mut self) -> Result<(), AppError> {
        if self.engine.is_none() {
            return Err(AppError::NotInitialized);
        }
        match self.phase {
            AppPhase::Created => self.start()?,
            AppPhase::Running => {}
            other => return Err(AppError::InvalidPhase(other)),
        }

        let engine = self.engine.as_mut().ok_or(AppError::NotInitialized)?;
        engine.verify()?;
        engine.pull_events();
        engine.advance_time();
        engine.step_physics();
        engine.dispatch_updates();

        if let Err(e) = self.game.on_update(engine) {
            log::error!("on_update failed: {e:#}");
        }

        engine.begin_render();
        if let Err(e) = self.game.on_render(engine) {
            log::error!("on_render failed: {e:#}");
        }
        engine.end_render();

        engine.present();
        if engine.should_close() {
            self.shutdown()?;
        }
        Ok(())
    }

    /// Runs `on_destroy` and moves to `Destroyed`.
    ///
    /// Idempotent. An application that never started is marked destroyed
    /// without calling any hook.
    pub fn shutdown(&mut self) -> Result<(), AppError> {
        let engine = self.engine.as_mut().ok_or(AppError::NotInitialized)?;
        match self.phase {
            AppPhase::Running | AppPhase::Closing => {}
            AppPhase::Created => {
                self.phase = AppPhase::Destroyed;
                return Ok(());
            }
            AppPhase::Uninitialized | AppPhase::Destroyed => return Ok(()),
        }

        self.phase = AppPhase::Closing;
        self.game.on_destroy(engine);
        engine.set_running(false);
        self.phase = AppPhase::Destroyed;
        log::info!("application destroyed");
        Ok(())
    }

    fn start(&mut self) -> Result<(), AppError> {
        let engine = self.engine.as_mut().ok_or(AppError::NotInitialized)?;
        engine.verify()?;
        self.game.on_create(engine).map_err(|e| {
            log::error!("on_create failed: {e:#}");
            AppError::Create(e)
        })?;

        engine.set_running(true);
        self.phase = AppPhase::Running;
        log::info!("application started");
        Ok(())
    }
}
