use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use anyhow::Result;

use super::WindowSurface;
use crate::input::{ButtonState, CursorMode, InputEvent, InputState, Key};

struct Shared {
    queued: VecDeque<InputEvent>,
    open: bool,
    close_requested: bool,
    presents: u64,
    size: (u32, u32),
    position: (i32, i32),
    title: String,
    cursor_mode: CursorMode,
    cursor_pos: Option<(f32, f32)>,
}

/// Window surface without an OS window.
///
/// Input is scripted through a [`HeadlessHandle`]; queued events are delivered
/// on the next [`WindowSurface::pull_events`].
pub struct HeadlessWindow {
    shared: Rc<RefCell<Shared>>,
}

/// Remote control for a [`HeadlessWindow`] owned by the engine.
#[derive(Clone)]
pub struct HeadlessHandle {
    shared: Rc<RefCell<Shared>>,
}

impl HeadlessWindow {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            shared: Rc::new(RefCell::new(Shared {
                queued: VecDeque::new(),
                open: true,
                close_requested: false,
                presents: 0,
                size: (width, height),
                position: (0, 0),
                title: String::new(),
                cursor_mode: CursorMode::default(),
                cursor_pos: None,
            })),
        }
    }

    pub fn handle(&self) -> HeadlessHandle {
        HeadlessHandle {
            shared: self.shared.clone(),
        }
    }
}

impl HeadlessHandle {
    pub fn push_event(&self, event: InputEvent) {
        self.shared.borrow_mut().queued.push_back(event);
    }

    pub fn press_key(&self, key: Key) {
        self.push_event(InputEvent::Key {
            key,
            state: ButtonState::Pressed,
            repeat: false,
        });
    }

    pub fn release_key(&self, key: Key) {
        self.push_event(InputEvent::Key {
            key,
            state: ButtonState::Released,
            repeat: false,
        });
    }

    /// Same as the user clicking the close button.
    pub fn request_close(&self) {
        self.shared.borrow_mut().close_requested = true;
    }

    /// Tears the surface down; the next frame verification fails.
    pub fn destroy(&self) {
        self.shared.borrow_mut().open = false;
    }

    pub fn resize(&self, width: u32, height: u32) {
        self.shared.borrow_mut().size = (width, height);
    }

    /// Number of presented frames.
    pub fn presents(&self) -> u64 {
        self.shared.borrow().presents
    }

    pub fn title(&self) -> String {
        self.shared.borrow().title.clone()
    }

    pub fn cursor_position(&self) -> Option<(f32, f32)> {
        self.shared.borrow().cursor_pos
    }
}

impl WindowSurface for HeadlessWindow {
    fn pull_events(&mut self, input: &mut InputState) {
        let mut shared = self.shared.borrow_mut();
        for ev in shared.queued.drain(..) {
            input.apply_event(&ev);
        }
    }

    fn present(&mut self) -> Result<()> {
        self.shared.borrow_mut().presents += 1;
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.shared.borrow().open
    }

    fn close_requested(&self) -> bool {
        self.shared.borrow().close_requested
    }

    fn size(&self) -> (u32, u32) {
        self.shared.borrow().size
    }

    fn set_size(&mut self, width: u32, height: u32) {
        self.shared.borrow_mut().size = (width, height);
    }

    fn position(&self) -> (i32, i32) {
        self.shared.borrow().position
    }

    fn set_position(&mut self, x: i32, y: i32) {
        self.shared.borrow_mut().position = (x, y);
    }

    fn cursor_mode(&self) -> CursorMode {
        self.shared.borrow().cursor_mode
    }

    fn set_cursor_mode(&mut self, mode: CursorMode) {
        self.shared.borrow_mut().cursor_mode = mode;
    }

    fn set_cursor_position(&mut self, x: f32, y: f32) {
        self.shared.borrow_mut().cursor_pos = Some((x, y));
    }

    fn set_title(&mut self, title: &str) {
        self.shared.borrow_mut().title = title.to_string();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn queued_events_arrive_on_pull() {
        let mut window = HeadlessWindow::new(640, 480);
        let handle = window.handle();
        let mut input = InputState::default();

        handle.press_key(Key::Space);
        assert!(!input.is_key_held(Key::Space));

        window.pull_events(&mut input);
        assert!(input.is_key_pressed(Key::Space));

        input.begin_frame();
        window.pull_events(&mut input);
        assert!(!input.is_key_pressed(Key::Space));
        assert!(input.is_key_held(Key::Space));
    }

    #[test]
    fn handle_controls_lifecycle() {
        let mut window = HeadlessWindow::new(1, 1);
        let handle = window.handle();

        assert!(window.is_open());
        handle.request_close();
        assert!(window.close_requested());

        window.present().unwrap();
        assert_eq!(handle.presents(), 1);

        handle.destroy();
        assert!(!window.is_open());
    }

    #[test]
    fn cursor_and_title_are_recorded() {
        let mut window = HeadlessWindow::new(1, 1);
        let handle = window.handle();

        window.set_title("kiln");
        window.set_cursor_mode(CursorMode::Disabled);
        window.set_cursor_position(4.0, 2.0);

        assert_eq!(handle.title(), "kiln");
        assert_eq!(window.cursor_mode(), CursorMode::Disabled);
        assert_eq!(handle.cursor_position(), Some((4.0, 2.0)));
    }

    #[test]
    fn geometry_setters_apply_immediately() {
        let mut window = HeadlessWindow::new(1, 1);

        window.set_size(800, 600);
        window.set_position(-20, 35);

        assert_eq!(window.size(), (800, 600));
        assert_eq!(window.position(), (-20, 35));
    }
}
