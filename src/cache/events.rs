use std::sync::{Arc, Mutex, PoisonError};

use event_emitter_rs::EventEmitter;

use super::CacheEvent;

/// Change notifications for list caches, backed by an [`EventEmitter`].
///
/// Listeners receive the name the events were created with (usually the
/// query key), so one listener can watch several caches. The emitter runs
/// listeners off the calling thread. Clone-friendly via Arc.
///
/// ## Example
///
/// ```ignore
/// let events = CacheEvents::new("todo.getAll");
/// events.on(CacheEvent::RolledBack, |key| println!("{} rolled back", key));
///
/// let cache = ListCache::new(query).with_events(events);
/// ```
#[derive(Clone)]
pub struct CacheEvents {
    name: Arc<str>,
    emitter: Arc<Mutex<EventEmitter>>,
}

impl CacheEvents {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Arc::from(name.into()),
            emitter: Arc::new(Mutex::new(EventEmitter::new())),
        }
    }

    /// The name passed to every listener.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Register a listener for `event`. Returns the listener id.
    pub fn on<F>(&self, event: CacheEvent, listener: F) -> String
    where
        F: Fn(String) + Send + Sync + 'static,
    {
        self.emitter
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .on(event.name(), listener)
    }

    /// Remove a listener by the id returned from [`on`](Self::on).
    pub fn remove_listener(&self, listener_id: &str) -> bool {
        self.emitter
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove_listener(listener_id)
            .is_some()
    }

    pub(crate) fn emit(&self, event: CacheEvent) {
        let mut emitter = self.emitter.lock().unwrap_or_else(PoisonError::into_inner);
        let _ = emitter.emit(event.name(), self.name.to_string());
    }
}
