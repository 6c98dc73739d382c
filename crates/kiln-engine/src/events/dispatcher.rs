use std::any::{type_name, Any, TypeId};
use std::collections::HashMap;

type Callback = Box<dyn FnMut(&dyn Any, &mut Vec<String>)>;

struct Listener {
    name: String,
    callback: Callback,
}

/// Routes published events to the listeners registered for their type.
///
/// Loggers are listeners that turn an event into a line of text. Those lines
/// are queued until [`EventDispatcher::take_log_entries`]; the engine drains
/// them into the runtime editor after every publish.
#[derive(Default)]
pub struct EventDispatcher {
    listeners: HashMap<TypeId, Vec<Listener>>,
    log_entries: Vec<String>,
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_listener<E: 'static>(
        &mut self,
        name: impl Into<String>,
        mut callback: impl FnMut(&E) + 'static,
    ) {
        self.push::<E>(
            name.into(),
            Box::new(move |event: &dyn Any, _log: &mut Vec<String>| {
                if let Some(event) = event.downcast_ref::<E>() {
                    callback(event);
                }
            }),
        );
    }

    /// Registers a listener whose output is queued as an event log line.
    pub fn add_logger<E: 'static>(
        &mut self,
        name: impl Into<String>,
        format: impl Fn(&E) -> String + 'static,
    ) {
        self.push::<E>(
            name.into(),
            Box::new(move |event: &dyn Any, log: &mut Vec<String>| {
                if let Some(event) = event.downcast_ref::<E>() {
                    log.push(format(event));
                }
            }),
        );
    }

    /// Removes every listener of `E` registered under `name`.
    pub fn remove_listener<E: 'static>(&mut self, name: &str) -> usize {
        let Some(list) = self.listeners.get_mut(&TypeId::of::<E>()) else {
            return 0;
        };
        let before = list.len();
        list.retain(|l| l.name != name);
        before - list.len()
    }

    pub fn listener_count<E: 'static>(&self) -> usize {
        self.listeners
            .get(&TypeId::of::<E>())
            .map_or(0, Vec::len)
    }

    pub fn has_listeners<E: 'static>(&self) -> bool {
        self.listener_count::<E>() > 0
    }

    /// Calls every listener of `E` and returns how many ran.
    pub fn publish<E: 'static>(&mut self, event: &E) -> usize {
        let Some(list) = self.listeners.get_mut(&TypeId::of::<E>()) else {
            return 0;
        };

        let event: &dyn Any = event;
        for listener in list.iter_mut() {
            (listener.callback)(event, &mut self.log_entries);
        }
        log::trace!("published {} to {} listener(s)", type_name::<E>(), list.len());
        list.len()
    }

    /// Drains the lines produced by loggers since the last call.
    pub fn take_log_entries(&mut self) -> Vec<String> {
        std::mem::take(&mut self.log_entries)
    }

    pub fn clear(&mut self) {
        self.listeners.clear();
        self.log_entries.clear();
    }

    fn push<E: 'static>(&mut self, name: String, callback: Callback) {
        log::debug!("listener \"{name}\" added for {}", type_name::<E>());
        self.listeners
            .entry(TypeId::of::<E>())
            .or_default()
            .push(Listener { name, callback });
    }
}

impl std::fmt::Debug for EventDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventDispatcher")
            .field("event_types", &self.listeners.len())
            .field("queued_log_entries", &self.log_entries.len())
            .finish()
    }
}
