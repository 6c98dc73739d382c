use std::collections::HashSet;

use super::types::{ButtonState, InputEvent, Key, Modifiers, MouseButton, MouseWheelDelta};

/// Input state for the engine window.
///
/// `held` sets reflect the raw key state; `pressed` / `released` record the
/// transitions observed since the last [`InputState::begin_frame`]. The frame
/// loop calls `begin_frame` right before pulling the frame's window events, so
/// the transition sets are stable for the rest of the frame.
#[derive(Debug, Default)]
pub struct InputState {
    pub modifiers: Modifiers,
    pub focused: bool,

    /// Cursor position in logical pixels, `None` when outside the window.
    pub cursor_pos: Option<(f32, f32)>,

    /// Accumulated wheel motion this frame, in lines.
    pub wheel: (f32, f32),

    keys_held: HashSet<Key>,
    keys_pressed: HashSet<Key>,
    keys_released: HashSet<Key>,

    buttons_held: HashSet<MouseButton>,
    buttons_pressed: HashSet<MouseButton>,
    buttons_released: HashSet<MouseButton>,
}

impl InputState {
    /// Clears per-frame transitions. Held state survives.
    pub fn begin_frame(&mut self) {
        self.keys_pressed.clear();
        self.keys_released.clear();
        self.buttons_pressed.clear();
        self.buttons_released.clear();
        self.wheel = (0.0, 0.0);
    }

    /// Applies one platform-agnostic event.
    pub fn apply_event(&mut self, ev: &InputEvent) {
        match ev {
            InputEvent::ModifiersChanged(m) => self.modifiers = *m,

            InputEvent::Focused(f) => {
                self.focused = *f;
                if !*f {
                    // Focus loss swallows release events; drop held state to
                    // avoid stuck keys.
                    self.keys_held.clear();
                    self.buttons_held.clear();
                }
            }

            InputEvent::CursorMoved { x, y } => self.cursor_pos = Some((*x, *y)),
            InputEvent::CursorLeft => self.cursor_pos = None,

            InputEvent::Key { key, state, .. } => match state {
                ButtonState::Pressed => {
                    // Auto-repeat arrives as Pressed while already held.
                    if self.keys_held.insert(*key) {
                        self.keys_pressed.insert(*key);
                    }
                }
                ButtonState::Released => {
                    if self.keys_held.remove(key) {
                        self.keys_released.insert(*key);
                    }
                }
            },

            InputEvent::MouseButton { button, state } => match state {
                ButtonState::Pressed => {
                    if self.buttons_held.insert(*button) {
                        self.buttons_pressed.insert(*button);
                    }
                }
                ButtonState::Released => {
                    if self.buttons_held.remove(button) {
                        self.buttons_released.insert(*button);
                    }
                }
            },

            InputEvent::MouseWheel(delta) => {
                let (x, y) = match delta {
                    MouseWheelDelta::Line { x, y } => (*x, *y),
                    // Roughly one line per 20 logical pixels.
                    MouseWheelDelta::Pixel { x, y } => (*x / 20.0, *y / 20.0),
                };
                self.wheel.0 += x;
                self.wheel.1 += y;
            }
        }
    }

    /// Adopts the held keys, buttons, modifiers and cursor of `other`.
    ///
    /// Transitions are left alone; the next [`InputState::begin_frame`]
    /// clears them.
    pub fn sync_held_from(&mut self, other: &InputState) {
        self.keys_held.clone_from(&other.keys_held);
        self.buttons_held.clone_from(&other.buttons_held);
        self.modifiers = other.modifiers;
        self.focused = other.focused;
        self.cursor_pos = other.cursor_pos;
    }

    /// Keys that went down this frame, in no particular order.
    pub fn pressed_keys(&self) -> impl Iterator<Item = Key> + '_ {
        self.keys_pressed.iter().copied()
    }

    /// Keys that went up this frame, in no particular order.
    pub fn released_keys(&self) -> impl Iterator<Item = Key> + '_ {
        self.keys_released.iter().copied()
    }

    pub fn is_key_held(&self, key: Key) -> bool {
        self.keys_held.contains(&key)
    }

    pub fn is_key_pressed(&self, key: Key) -> bool {
        self.keys_pressed.contains(&key)
    }

    pub fn is_key_released(&self, key: Key) -> bool {
        self.keys_released.contains(&key)
    }

    pub fn is_mouse_held(&self, button: MouseButton) -> bool {
        self.buttons_held.contains(&button)
    }

    pub fn is_mouse_pressed(&self, button: MouseButton) -> bool {
        self.buttons_pressed.contains(&button)
    }

    pub fn is_mouse_released(&self, button: MouseButton) -> bool {
        self.buttons_released.contains(&button)
    }

    pub fn any_key_event(&self) -> bool {
        !self.keys_pressed.is_empty() || !self.keys_released.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(key: Key, state: ButtonState) -> InputEvent {
        InputEvent::Key { key, state, repeat: false }
    }

    #[test]
    fn press_sets_held_and_pressed() {
        let mut s = InputState::default();
        s.begin_frame();
        s.apply_event(&key(Key::W, ButtonState::Pressed));

        assert!(s.is_key_held(Key::W));
        assert!(s.is_key_pressed(Key::W));
        assert!(!s.is_key_released(Key::W));
    }

    #[test]
    fn pressed_lasts_one_frame_held_persists() {
        let mut s = InputState::default();
        s.begin_frame();
        s.apply_event(&key(Key::Space, ButtonState::Pressed));

        s.begin_frame();
        assert!(s.is_key_held(Key::Space));
        assert!(!s.is_key_pressed(Key::Space));
    }

    #[test]
    fn repeat_does_not_retrigger_pressed() {
        let mut s = InputState::default();
        s.begin_frame();
        s.apply_event(&key(Key::A, ButtonState::Pressed));
        s.begin_frame();
        s.apply_event(&InputEvent::Key { key: Key::A, state: ButtonState::Pressed, repeat: true });

        assert!(!s.is_key_pressed(Key::A));
        assert!(s.is_key_held(Key::A));
    }

    #[test]
    fn sync_replaces_held_state() {
        let mut live = InputState::default();
        live.apply_event(&key(Key::W, ButtonState::Pressed));

        let mut other = InputState::default();
        other.apply_event(&key(Key::D, ButtonState::Pressed));
        other.cursor_pos = Some((3.0, 4.0));

        live.sync_held_from(&other);

        assert!(!live.is_key_held(Key::W));
        assert!(live.is_key_held(Key::D));
        assert_eq!(live.cursor_pos, Some((3.0, 4.0)));

        live.apply_event(&key(Key::D, ButtonState::Released));
        assert!(live.is_key_released(Key::D));
    }

    #[test]
    fn transition_iterators_follow_the_frame() {
        let mut s = InputState::default();
        s.begin_frame();
        s.apply_event(&key(Key::A, ButtonState::Pressed));
        s.apply_event(&key(Key::B, ButtonState::Pressed));
        s.apply_event(&key(Key::B, ButtonState::Released));

        let mut pressed: Vec<Key> = s.pressed_keys().collect();
        pressed.sort_by_key(|k| format!("{k:?}"));
        assert_eq!(pressed, vec![Key::A, Key::B]);
        assert_eq!(s.released_keys().collect::<Vec<_>>(), vec![Key::B]);

        s.begin_frame();
        assert_eq!(s.pressed_keys().count(), 0);
    }

    #[test]
    fn release_without_press_is_ignored() {
        let mut s = InputState::default();
        s.begin_frame();
        s.apply_event(&key(Key::Q, ButtonState::Released));
        assert!(!s.is_key_released(Key::Q));
    }

    #[test]
    fn focus_loss_clears_held() {
        let mut s = InputState::default();
        s.apply_event(&key(Key::Shift, ButtonState::Pressed));
        s.apply_event(&InputEvent::MouseButton {
            button: MouseButton::Left,
            state: ButtonState::Pressed,
        });
        s.apply_event(&InputEvent::Focused(false));

        assert!(!s.is_key_held(Key::Shift));
        assert!(!s.is_mouse_held(MouseButton::Left));
    }

    #[test]
    fn mouse_transitions() {
        let mut s = InputState::default();
        s.begin_frame();
        s.apply_event(&InputEvent::MouseButton {
            button: MouseButton::Right,
            state: ButtonState::Pressed,
        });
        s.apply_event(&InputEvent::MouseButton {
            button: MouseButton::Right,
            state: ButtonState::Released,
        });

        assert!(s.is_mouse_pressed(MouseButton::Right));
        assert!(s.is_mouse_released(MouseButton::Right));
        assert!(!s.is_mouse_held(MouseButton::Right));
    }

    #[test]
    fn cursor_tracking() {
        let mut s = InputState::default();
        s.apply_event(&InputEvent::CursorMoved { x: 4.0, y: 8.0 });
        assert_eq!(s.cursor_pos, Some((4.0, 8.0)));
        s.apply_event(&InputEvent::CursorLeft);
        assert_eq!(s.cursor_pos, None);
    }
}
