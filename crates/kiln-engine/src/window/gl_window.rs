use std::num::NonZeroU32;
use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use glutin::config::{Config, ConfigTemplateBuilder};
use glutin::context::{ContextApi, ContextAttributesBuilder, GlProfile, PossiblyCurrentContext, Version};
use glutin::display::GetGlDisplay;
use glutin::prelude::*;
use glutin::surface::{Surface, SwapInterval, WindowSurface as GlutinSurface};
use glutin_winit::{DisplayBuilder, GlWindow as _};
use raw_window_handle::HasWindowHandle;
use winit::application::ApplicationHandler;
use winit::dpi::{LogicalPosition, LogicalSize, PhysicalPosition, PhysicalSize};
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::platform::pump_events::{EventLoopExtPumpEvents, PumpStatus};
use winit::window::{CursorGrabMode, Window, WindowId};

use super::WindowSurface;
use crate::input::platform::winit::translate_window_event;
use crate::input::{CursorMode, InputEvent, InputState};

// `resumed` normally arrives on the first pump; some platforms need a few.
const STARTUP_PUMPS: usize = 16;

/// Desktop window creation parameters.
#[derive(Debug, Clone)]
pub struct GlWindowSettings {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub vsync: bool,
    /// Requested core profile version, `(major, minor)`.
    pub gl_version: (u8, u8),
    /// MSAA sample count, 0 for none.
    pub samples: u8,
}

impl Default for GlWindowSettings {
    fn default() -> Self {
        Self {
            title: "kiln".to_string(),
            width: 1280,
            height: 720,
            vsync: true,
            gl_version: (4, 5),
            samples: 4,
        }
    }
}

/// winit window with a current OpenGL context.
///
/// The event loop is never handed control: each frame pumps it with a zero
/// timeout from [`WindowSurface::pull_events`].
pub struct GlWindow {
    state: WindowState,
    event_loop: EventLoop<()>,
}

// Field order is drop order: surface and context go before the window.
struct GlTarget {
    surface: Surface<GlutinSurface>,
    context: PossiblyCurrentContext,
    window: Window,
}

struct WindowState {
    settings: GlWindowSettings,
    target: Option<GlTarget>,
    loader: Option<glow::Context>,
    init_error: Option<anyhow::Error>,

    pending: Vec<InputEvent>,
    scale_factor: f64,
    size: (u32, u32),
    position: (i32, i32),
    cursor_mode: CursorMode,
    close_requested: bool,
    open: bool,
}

impl GlWindow {
    /// Opens the window, makes its GL context current on this thread and
    /// returns the loaded GL function table alongside it.
    pub fn new(settings: GlWindowSettings) -> Result<(Self, glow::Context)> {
        let mut event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut state = WindowState {
            size: (settings.width, settings.height),
            settings,
            target: None,
            loader: None,
            init_error: None,
            pending: Vec::new(),
            scale_factor: 1.0,
            position: (0, 0),
            cursor_mode: CursorMode::default(),
            close_requested: false,
            open: true,
        };

        for _ in 0..STARTUP_PUMPS {
            if let PumpStatus::Exit(code) =
                event_loop.pump_app_events(Some(Duration::ZERO), &mut state)
            {
                bail!("event loop exited during startup with code {code}");
            }
            if let Some(e) = state.init_error.take() {
                return Err(e);
            }
            if state.target.is_some() {
                break;
            }
        }

        let gl = state
            .loader
            .take()
            .ok_or_else(|| anyhow!("window was not created during startup"))?;

        Ok((Self { state, event_loop }, gl))
    }

    pub fn window(&self) -> Option<&Window> {
        self.state.target.as_ref().map(|t| &t.window)
    }
}

impl WindowSurface for GlWindow {
    fn pull_events(&mut self, input: &mut InputState) {
        if let PumpStatus::Exit(code) = self
            .event_loop
            .pump_app_events(Some(Duration::ZERO), &mut self.state)
        {
            log::info!(target: "window", "event loop exited with code {code}");
            self.state.open = false;
        }

        for ev in self.state.pending.drain(..) {
            input.apply_event(&ev);
        }
    }

    fn present(&mut self) -> Result<()> {
        let target = self
            .state
            .target
            .as_ref()
            .ok_or_else(|| anyhow!("no GL surface to present"))?;
        target
            .surface
            .swap_buffers(&target.context)
            .context("failed to swap buffers")
    }

    fn is_open(&self) -> bool {
        self.state.open && self.state.target.is_some()
    }

    fn close_requested(&self) -> bool {
        self.state.close_requested
    }

    fn size(&self) -> (u32, u32) {
        self.state.size
    }

    fn set_size(&mut self, width: u32, height: u32) {
        let Some(target) = &self.state.target else { return };
        // `Some` means the size was applied synchronously; otherwise a
        // `Resized` event follows.
        if let Some(size) = target
            .window
            .request_inner_size(PhysicalSize::new(width, height))
        {
            self.state.apply_resize(size);
        }
    }

    fn position(&self) -> (i32, i32) {
        self.state.position
    }

    fn set_position(&mut self, x: i32, y: i32) {
        if let Some(target) = &self.state.target {
            target.window.set_outer_position(PhysicalPosition::new(x, y));
            self.state.position = (x, y);
        }
    }

    fn cursor_mode(&self) -> CursorMode {
        self.state.cursor_mode
    }

    fn set_cursor_mode(&mut self, mode: CursorMode) {
        let Some(target) = &self.state.target else { return };
        let window = &target.window;

        let (visible, grab) = match mode {
            CursorMode::Normal => (true, CursorGrabMode::None),
            CursorMode::Hidden => (false, CursorGrabMode::None),
            CursorMode::Disabled => (false, CursorGrabMode::Locked),
        };

        window.set_cursor_visible(visible);
        if let Err(e) = window.set_cursor_grab(grab) {
            if grab == CursorGrabMode::Locked {
                // Locking is unsupported on some platforms (X11, Windows).
                if let Err(e) = window.set_cursor_grab(CursorGrabMode::Confined) {
                    log::warn!(target: "window", "failed to grab cursor: {e}");
                }
            } else {
                log::warn!(target: "window", "failed to release cursor: {e}");
            }
        }
        self.state.cursor_mode = mode;
    }

    fn set_cursor_position(&mut self, x: f32, y: f32) {
        let Some(target) = &self.state.target else { return };
        if let Err(e) = target
            .window
            .set_cursor_position(LogicalPosition::new(x as f64, y as f64))
        {
            log::warn!(target: "window", "failed to move cursor: {e}");
        }
    }

    fn set_title(&mut self, title: &str) {
        if let Some(target) = &self.state.target {
            target.window.set_title(title);
        }
    }
}

impl WindowState {
    fn apply_resize(&mut self, size: PhysicalSize<u32>) {
        self.size = (size.width, size.height);
        if let (Some(target), Some(w), Some(h)) = (
            &self.target,
            NonZeroU32::new(size.width),
            NonZeroU32::new(size.height),
        ) {
            target.surface.resize(&target.context, w, h);
        }
    }
}

impl ApplicationHandler for WindowState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.target.is_some() {
            return;
        }

        match create_target(event_loop, &self.settings) {
            Ok((target, gl)) => {
                self.scale_factor = target.window.scale_factor();
                let size = target.window.inner_size();
                self.size = (size.width, size.height);
                if let Ok(pos) = target.window.outer_position() {
                    self.position = (pos.x, pos.y);
                }
                self.target = Some(target);
                self.loader = Some(gl);
            }
            Err(e) => {
                log::error!(target: "window", "failed to create window: {e:#}");
                self.init_error = Some(e);
            }
        }
    }

    fn window_event(&mut self, _event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match &event {
            WindowEvent::CloseRequested => self.close_requested = true,

            WindowEvent::Destroyed => self.open = false,

            WindowEvent::Resized(size) => self.apply_resize(*size),

            WindowEvent::Moved(pos) => self.position = (pos.x, pos.y),

            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                self.scale_factor = *scale_factor;
            }

            _ => {
                if let Some(ev) = translate_window_event(self.scale_factor, &event) {
                    self.pending.push(ev);
                }
            }
        }
    }
}

fn create_target(
    event_loop: &ActiveEventLoop,
    settings: &GlWindowSettings,
) -> Result<(GlTarget, glow::Context)> {
    let attrs = Window::default_attributes()
        .with_title(settings.title.clone())
        .with_inner_size(LogicalSize::new(settings.width as f64, settings.height as f64));

    let mut template = ConfigTemplateBuilder::new()
        .with_alpha_size(8)
        .with_depth_size(24);
    if settings.samples > 0 {
        template = template.with_multisampling(settings.samples);
    }

    let (window, config) = DisplayBuilder::new()
        .with_window_attributes(Some(attrs))
        .build(event_loop, template, pick_config)
        .map_err(|e| anyhow!("failed to build GL display: {e}"))?;
    let window = window.ok_or_else(|| anyhow!("display builder did not create a window"))?;

    let raw_handle = window
        .window_handle()
        .context("window has no native handle")?
        .as_raw();
    let display = config.display();

    let (major, minor) = settings.gl_version;
    let context_attrs = ContextAttributesBuilder::new()
        .with_context_api(ContextApi::OpenGl(Some(Version::new(major, minor))))
        .with_profile(GlProfile::Core)
        .build(Some(raw_handle));

    // SAFETY: the raw handle belongs to `window`, which outlives the context.
    let not_current = unsafe { display.create_context(&config, &context_attrs) }
        .with_context(|| format!("failed to create OpenGL {major}.{minor} core context"))?;

    let surface_attrs = window
        .build_surface_attributes(Default::default())
        .context("failed to describe window surface")?;
    // SAFETY: as above.
    let surface = unsafe { display.create_window_surface(&config, &surface_attrs) }
        .context("failed to create window surface")?;

    let context = not_current
        .make_current(&surface)
        .context("failed to make GL context current")?;

    let interval = if settings.vsync {
        SwapInterval::Wait(NonZeroU32::MIN)
    } else {
        SwapInterval::DontWait
    };
    if let Err(e) = surface.set_swap_interval(&context, interval) {
        log::warn!(target: "window", "failed to set swap interval: {e}");
    }

    // SAFETY: the context is current on this thread.
    let gl = unsafe {
        glow::Context::from_loader_function_cstr(|name| display.get_proc_address(name))
    };

    log::info!(
        target: "window",
        "created {}x{} window with OpenGL {major}.{minor} ({} samples)",
        settings.width,
        settings.height,
        config.num_samples()
    );

    Ok((
        GlTarget {
            surface,
            context,
            window,
        },
        gl,
    ))
}

fn pick_config(configs: Box<dyn Iterator<Item = Config> + '_>) -> Config {
    configs
        .reduce(|best, c| if c.num_samples() > best.num_samples() { c } else { best })
        .expect("glutin offers at least one matching config")
}
