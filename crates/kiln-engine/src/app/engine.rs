use std::time::Instant;

use crate::dispatch::{
    CollisionBuffers, CollisionPair, FrameCommand, FrameCommands, FrameInputs, Update,
    UpdateRegistry,
};
use crate::editor::{LogEditor, RuntimeEditor};
use crate::events::{EventDispatcher, FrameStarted, KeyPressed, KeyReleased, WindowResized};
use crate::gpu::Renderer;
use crate::input::{InputState, Key};
use crate::physics::{NoPhysics, Physics};
use crate::profiling::Profiler;
use crate::time::{FrameClock, FrameTime};
use crate::window::WindowSurface;
use crate::world::{ObjectHandle, World};

use super::{AppConfig, AppError, RunState};

/// Listener name used by [`Engine::register_event_logger`].
pub const EVENT_LOGGER: &str = "EventLogger";

/// Engine context handed to every [`super::Game`] hook.
///
/// Owns the world, the frame clock, input, the update registry, collision
/// buffers, the event dispatcher and the window/renderer pair. Exactly one exists per
/// [`super::Application`].
pub struct Engine {
    config: AppConfig,
    run_state: RunState,
    clock: FrameClock,

    input: InputState,
    // Receives events while window updates are off.
    detached_input: InputState,
    window_updates: bool,
    close_key: Option<Key>,

    world: World,
    updates: UpdateRegistry,
    collisions: CollisionBuffers,
    commands: FrameCommands,

    events: EventDispatcher,
    frame_index: u64,
    last_size: (u32, u32),

    physics: Box<dyn Physics>,
    editor: Box<dyn RuntimeEditor>,
    profiler: Profiler,

    renderer: Renderer,
    window: Box<dyn WindowSurface>,
}

impl Engine {
    pub fn new(config: AppConfig, window: Box<dyn WindowSurface>, renderer: Renderer) -> Self {
        let mut editor = LogEditor::default();
        editor.toggle(config.editor_enabled);
        let last_size = window.size();

        Self {
            run_state: RunState::new(config.time_scale),
            clock: FrameClock::with_clamps(config.dt_min, config.dt_max),
            input: InputState::default(),
            detached_input: InputState::default(),
            window_updates: true,
            close_key: config.close_key,
            world: World::new(),
            updates: UpdateRegistry::new(),
            collisions: CollisionBuffers::new(),
            commands: FrameCommands::default(),
            events: EventDispatcher::new(),
            frame_index: 0,
            last_size,
            physics: Box::new(NoPhysics),
            editor: Box::new(editor),
            profiler: Profiler::default(),
            renderer,
            window,
            config,
        }
    }

    pub fn set_physics(&mut self, physics: impl Physics + 'static) {
        self.physics = Box::new(physics);
    }

    pub fn set_editor(&mut self, editor: impl RuntimeEditor + 'static) {
        self.editor = Box::new(editor);
    }

    /// Creates storage for `T` without per-frame dispatch.
    pub fn register_component<T: 'static>(&mut self) {
        self.world.register::<T>();
    }

    /// Creates storage for `T` and appends its update callback.
    pub fn register_component_update<T: Update>(&mut self) {
        self.world.register::<T>();
        self.updates.register::<T>();
    }

    /// Requests termination; the current frame still runs to completion.
    pub fn close_application(&mut self) {
        self.run_state.close();
    }

    pub fn is_running(&self) -> bool {
        self.run_state.is_running()
    }

    pub fn should_close(&self) -> bool {
        self.run_state.should_close()
    }

    pub fn is_paused(&self) -> bool {
        self.run_state.is_paused()
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.run_state.set_paused(paused);
    }

    pub fn time_scale(&self) -> f32 {
        self.run_state.time_scale()
    }

    pub fn set_time_scale(&mut self, scale: f32) {
        self.run_state.set_time_scale(scale);
    }

    /// Closes the application whenever `key` is pressed.
    pub fn close_on_key_press(&mut self, key: Key) {
        self.close_key = Some(key);
    }

    /// With updates off, window events are still pumped but no longer reach
    /// [`Engine::input`].
    ///
    /// Held keys and buttons are handed over on both edges, so a key released
    /// while updates were off is not held once they are back on.
    pub fn toggle_window_updates(&mut self, enabled: bool) {
        if enabled == self.window_updates {
            return;
        }
        if enabled {
            self.input.sync_held_from(&self.detached_input);
        } else {
            self.detached_input.sync_held_from(&self.input);
        }
        self.window_updates = enabled;
    }

    pub fn time_delta(&self) -> f32 {
        self.clock.time_delta()
    }

    pub fn unscaled_time_delta(&self) -> f32 {
        self.clock.unscaled_time_delta()
    }

    pub fn total_elapsed_time(&self) -> f32 {
        self.clock.total_elapsed()
    }

    pub fn set_total_elapsed_time(&mut self, time: f32) {
        self.clock.set_total_elapsed(time);
    }

    pub fn engine_time(&self) -> f32 {
        self.clock.engine_time()
    }

    pub fn current_fps(&self) -> u32 {
        self.clock.fps()
    }

    /// Frames started since init.
    pub fn frame_count(&self) -> u64 {
        self.frame_index
    }

    pub fn toggle_runtime_editor(&mut self, visible: bool) {
        self.editor.toggle(visible);
    }

    pub fn is_editor_active(&self) -> bool {
        self.editor.is_active()
    }

    pub fn is_key_held_in_editor(&self, key: Key) -> bool {
        self.editor.is_key_held(&self.input, key)
    }

    pub fn add_event_log_entry(&mut self, entry: &str) {
        self.editor.add_event_entry(entry);
    }

    /// Forwards every published `E` to the editor's event log, formatted by
    /// `format`.
    pub fn register_event_logger<E: 'static>(&mut self, format: impl Fn(&E) -> String + 'static) {
        self.events.add_logger::<E>(EVENT_LOGGER, format);
    }

    /// Runs the listeners of `E` now and returns how many ran.
    pub fn publish_event<E: 'static>(&mut self, event: E) -> usize {
        let n = self.events.publish(&event);
        for entry in self.events.take_log_entries() {
            self.editor.add_event_entry(&entry);
        }
        n
    }

    pub fn events(&self) -> &EventDispatcher {
        &self.events
    }

    pub fn events_mut(&mut self) -> &mut EventDispatcher {
        &mut self.events
    }

    /// Queues a contact. It is published with the next physics pass.
    pub fn add_collision_entry(&mut self, a: ObjectHandle, b: ObjectHandle) {
        self.collisions.push(a, b);
    }

    /// Contacts published by this frame's physics pass.
    pub fn collisions(&self) -> &[CollisionPair] {
        self.collisions.draining()
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn run_state(&self) -> &RunState {
        &self.run_state
    }

    pub fn clock(&self) -> &FrameClock {
        &self.clock
    }

    pub fn input(&self) -> &InputState {
        &self.input
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn updates(&self) -> &UpdateRegistry {
        &self.updates
    }

    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut Renderer {
        &mut self.renderer
    }

    pub fn window(&self) -> &dyn WindowSurface {
        self.window.as_ref()
    }

    pub fn window_mut(&mut self) -> &mut dyn WindowSurface {
        self.window.as_mut()
    }

    pub fn editor(&self) -> &dyn RuntimeEditor {
        self.editor.as_ref()
    }

    pub fn profiler(&self) -> &Profiler {
        &self.profiler
    }

    pub fn profiler_mut(&mut self) -> &mut Profiler {
        &mut self.profiler
    }

    pub(crate) fn set_running(&mut self, running: bool) {
        self.run_state.set_running(running);
    }

    pub(crate) fn verify(&self) -> Result<(), AppError> {
        if !self.window.is_open() {
            log::error!("window surface is not available");
            return Err(AppError::WindowUnavailable);
        }
        Ok(())
    }

    pub(crate) fn pull_events(&mut self) {
        self.input.begin_frame();
        let target = if self.window_updates {
            &mut self.input
        } else {
            self.detached_input.begin_frame();
            &mut self.detached_input
        };
        self.window.pull_events(target);

        let close_key = self.close_key.is_some_and(|k| target.is_key_pressed(k));
        if close_key || self.window.close_requested() {
            self.run_state.close();
        }

        let size = self.window.size();
        if size != self.last_size {
            self.last_size = size;
            self.publish_event(WindowResized {
                width: size.0,
                height: size.1,
            });
        }

        if self.window_updates {
            self.publish_key_events();
        }
    }

    fn publish_key_events(&mut self) {
        if self.events.has_listeners::<KeyPressed>() {
            let pressed: Vec<Key> = self.input.pressed_keys().collect();
            for key in pressed {
                self.publish_event(KeyPressed { key });
            }
        }
        if self.events.has_listeners::<KeyReleased>() {
            let released: Vec<Key> = self.input.released_keys().collect();
            for key in released {
                self.publish_event(KeyReleased { key });
            }
        }
    }

    pub(crate) fn advance_time(&mut self) -> FrameTime {
        let ft = self.clock.tick(
            Instant::now(),
            self.run_state.time_scale(),
            self.run_state.is_paused(),
        );
        if ft.fps_updated {
            log::debug!("fps: {}", self.clock.fps());
            self.profiler.report();
        }

        self.frame_index += 1;
        self.publish_event(FrameStarted {
            frame: self.frame_index,
            time_delta: self.clock.time_delta(),
            unscaled_time_delta: self.clock.unscaled_time_delta(),
        });
        ft
    }

    /// Runs physics, then publishes its contacts. This is the only place the
    /// collision buffers are swapped.
    pub(crate) fn step_physics(&mut self) {
        let dt = self.clock.time_delta();
        let (physics, world, collisions) = (&mut self.physics, &mut self.world, &mut self.collisions);
        self.profiler
            .measure("physics", || physics.step(world, dt, &mut collisions.writer()));
        self.collisions.swap();
    }

    pub(crate) fn dispatch_updates(&mut self) {
        let frame = FrameInputs {
            dt: self.clock.time_delta(),
            collisions: self.collisions.draining(),
            input: &self.input,
        };
        self.updates.invoke_all(
            &mut self.world,
            &frame,
            &mut self.commands,
            &mut self.profiler,
        );
        self.apply_commands();
    }

    fn apply_commands(&mut self) {
        let mut commands = std::mem::take(&mut self.commands);
        for cmd in commands.drain() {
            match cmd {
                FrameCommand::CloseApplication => self.close_application(),
                FrameCommand::SetPaused(paused) => self.set_paused(paused),
                FrameCommand::SetTimeScale(scale) => self.set_time_scale(scale),
                FrameCommand::AddCollision(a, b) => self.add_collision_entry(a, b),
                FrameCommand::Despawn(object) => {
                    self.world.despawn(object);
                }
                FrameCommand::LogEntry(entry) => self.add_event_log_entry(&entry),
            }
        }
        self.commands = commands;
    }

    pub(crate) fn begin_render(&mut self) {
        let (w, h) = self.window.size();
        if self.renderer.viewport() != (0, 0, w, h) {
            self.renderer.set_viewport(0, 0, w, h);
        }
        self.renderer.clear();
    }

    pub(crate) fn end_render(&mut self) {
        let renderer = &self.renderer;
        self.profiler.measure("renderer flush", || renderer.flush());
    }

    pub(crate) fn present(&mut self) {
        if let Err(e) = self.window.present() {
            log::warn!("present failed: {e:#}");
        }
    }
}
