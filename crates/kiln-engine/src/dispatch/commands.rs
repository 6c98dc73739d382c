use crate::world::ObjectHandle;

/// Request issued from inside an update callback.
#[derive(Debug, Clone, PartialEq)]
pub enum FrameCommand {
    CloseApplication,
    SetPaused(bool),
    SetTimeScale(f32),
    AddCollision(ObjectHandle, ObjectHandle),
    Despawn(ObjectHandle),
    LogEntry(String),
}

/// Commands are buffered and applied by the frame loop once every update
/// callback of the frame has returned.
#[derive(Debug, Default)]
pub struct FrameCommands {
    commands: Vec<FrameCommand>,
}

impl FrameCommands {
    /// Requests termination. Honoured at the end of the current frame.
    pub fn close_application(&mut self) {
        self.commands.push(FrameCommand::CloseApplication);
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.commands.push(FrameCommand::SetPaused(paused));
    }

    pub fn set_time_scale(&mut self, scale: f32) {
        self.commands.push(FrameCommand::SetTimeScale(scale));
    }

    /// Queues a contact for the next physics hand-off.
    pub fn add_collision_entry(&mut self, a: ObjectHandle, b: ObjectHandle) {
        self.commands.push(FrameCommand::AddCollision(a, b));
    }

    pub fn despawn(&mut self, object: ObjectHandle) {
        self.commands.push(FrameCommand::Despawn(object));
    }

    /// Forwards a line to the runtime editor's event log.
    pub fn add_event_log_entry(&mut self, entry: impl Into<String>) {
        self.commands.push(FrameCommand::LogEntry(entry.into()));
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub(crate) fn drain(&mut self) -> std::vec::Drain<'_, FrameCommand> {
        self.commands.drain(..)
    }
}
