//! Named-listener event emitter.
//!
//! Callers subscribe a handler to an event name and get a [`Subscription`]
//! back; removing the subscription stops delivery.
//!
//! ```
//! use locbridge::event::{EventEmitter, EventSink, RawLocation, normalize, ON_LOCATION_CHANGED_EVENT};
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use std::sync::Arc;
//!
//! let emitter = EventEmitter::new();
//! let seen = Arc::new(AtomicUsize::new(0));
//! let counter = Arc::clone(&seen);
//! let subscription = emitter.add_listener(ON_LOCATION_CHANGED_EVENT, move |_event| {
//!     counter.fetch_add(1, Ordering::SeqCst);
//! });
//!
//! emitter.emit(ON_LOCATION_CHANGED_EVENT, &normalize(&RawLocation::fix(1, 0.0, 0.0), false));
//! subscription.remove();
//! emitter.emit(ON_LOCATION_CHANGED_EVENT, &normalize(&RawLocation::fix(1, 0.0, 0.0), false));
//!
//! assert_eq!(seen.load(Ordering::SeqCst), 1);
//! ```

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::RwLock;
use tracing::trace;

use super::model::{LocationEvent, ON_LOCATION_CHANGED_EVENT};
use super::sink::EventSink;

type Handler = Arc<dyn Fn(&LocationEvent) + Send + Sync>;

#[derive(Default)]
struct EmitterInner {
    listeners: RwLock<HashMap<String, Vec<(u64, Handler)>>>,
    next_id: AtomicU64,
}

/// Event emitter with per-name listener lists.
#[derive(Clone, Default)]
pub struct EventEmitter {
    inner: Arc<EmitterInner>,
}

impl EventEmitter {
    /// Create an emitter with no listeners.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for `event_name`.
    pub fn add_listener<F>(&self, event_name: &str, handler: F) -> Subscription
    where
        F: Fn(&LocationEvent) + Send + Sync + 'static,
    {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        self.inner
            .listeners
            .write()
            .entry(event_name.to_string())
            .or_default()
            .push((id, Arc::new(handler)));

        Subscription {
            emitter: Arc::downgrade(&self.inner),
            event_name: event_name.to_string(),
            id,
        }
    }

    /// Register `handler` for location change events.
    pub fn add_location_listener<F>(&self, handler: F) -> Subscription
    where
        F: Fn(&LocationEvent) + Send + Sync + 'static,
    {
        self.add_listener(ON_LOCATION_CHANGED_EVENT, handler)
    }

    /// Number of handlers registered for `event_name`.
    pub fn listener_count(&self, event_name: &str) -> usize {
        self.inner
            .listeners
            .read()
            .get(event_name)
            .map_or(0, Vec::len)
    }

    /// Drop every handler for `event_name`.
    pub fn remove_all_listeners(&self, event_name: &str) {
        self.inner.listeners.write().remove(event_name);
    }
}

impl EventSink for EventEmitter {
    fn emit(&self, event_name: &str, event: &LocationEvent) {
        // Snapshot so handlers can add or remove listeners.
        let handlers: Vec<Handler> = match self.inner.listeners.read().get(event_name) {
            Some(list) => list.iter().map(|(_, h)| Arc::clone(h)).collect(),
            None => Vec::new(),
        };

        if handlers.is_empty() {
            trace!(event = event_name, "No listeners, dropping event");
            return;
        }

        for handler in handlers {
            handler(event);
        }
    }
}

impl fmt::Debug for EventEmitter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let listeners = self.inner.listeners.read();
        f.debug_struct("EventEmitter")
            .field("events", &listeners.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Handle returned by [`EventEmitter::add_listener`].
///
/// Dropping the handle does not unsubscribe; call [`Subscription::remove`].
#[derive(Debug)]
pub struct Subscription {
    emitter: Weak<EmitterInner>,
    event_name: String,
    id: u64,
}

impl Subscription {
    /// Event name this subscription listens to.
    pub fn event_name(&self) -> &str {
        &self.event_name
    }

    /// Stop delivering events to this handler.
    pub fn remove(self) {
        let Some(inner) = self.emitter.upgrade() else {
            return;
        };
        let mut listeners = inner.listeners.write();
        if let Some(list) = listeners.get_mut(&self.event_name) {
            list.retain(|(id, _)| *id != self.id);
            if list.is_empty() {
                listeners.remove(&self.event_name);
            }
        }
    }
}
