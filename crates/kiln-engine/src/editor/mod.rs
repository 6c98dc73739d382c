//! Runtime editor seam.
//!
//! The in-game editor UI lives outside this crate; the engine only forwards
//! event log lines and visibility toggles to it.

use std::collections::VecDeque;

use crate::input::{InputState, Key};

pub trait RuntimeEditor {
    fn add_event_entry(&mut self, entry: &str);
    fn is_active(&self) -> bool;
    fn toggle(&mut self, active: bool);
    /// Whether `key` is held while the editor has input focus.
    fn is_key_held(&self, input: &InputState, key: Key) -> bool;
}

/// Editor stand-in that keeps the most recent event entries and mirrors them
/// to the log.
#[derive(Debug)]
pub struct LogEditor {
    active: bool,
    capacity: usize,
    entries: VecDeque<String>,
}

impl LogEditor {
    pub const DEFAULT_CAPACITY: usize = 256;

    pub fn new(capacity: usize) -> Self {
        Self {
            active: false,
            capacity: capacity.max(1),
            entries: VecDeque::new(),
        }
    }

    /// Retained entries, oldest first.
    pub fn entries(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }
}

impl Default for LogEditor {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CAPACITY)
    }
}

impl RuntimeEditor for LogEditor {
    fn add_event_entry(&mut self, entry: &str) {
        log::info!(target: "editor", "{entry}");
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(entry.to_string());
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn toggle(&mut self, active: bool) {
        if self.active != active {
            log::debug!(target: "editor", "editor {}", if active { "shown" } else { "hidden" });
        }
        self.active = active;
    }

    fn is_key_held(&self, input: &InputState, key: Key) -> bool {
        self.active && input.is_key_held(key)
    }
}
