//! Event sinks: where normalized events go.
//!
//! Emission is fire-and-forget. A sink never reports failure back to the
//! session; if nobody is listening the event is dropped.

use std::sync::Arc;

use tokio::sync::broadcast;
use tracing::trace;

use super::model::LocationEvent;

/// Default capacity of the broadcast channel.
pub const DEFAULT_EVENT_CHANNEL_CAPACITY: usize = 64;

/// Receives named events from the session controller.
pub trait EventSink: Send + Sync {
    /// Emit `event` under `event_name`.
    fn emit(&self, event_name: &str, event: &LocationEvent);
}

impl<T: EventSink + ?Sized> EventSink for Arc<T> {
    fn emit(&self, event_name: &str, event: &LocationEvent) {
        (**self).emit(event_name, event)
    }
}

/// An event as seen by broadcast subscribers.
#[derive(Debug, Clone, PartialEq)]
pub struct EmittedEvent {
    pub name: String,
    pub event: LocationEvent,
}

/// Broadcast sink for async consumers.
///
/// Slow subscribers lag and lose old events rather than applying
/// backpressure to the engine's callback thread.
#[derive(Debug, Clone)]
pub struct BroadcastSink {
    tx: broadcast::Sender<EmittedEvent>,
}

impl BroadcastSink {
    /// Create a sink with the given channel capacity (minimum 1).
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// Subscribe to subsequent events.
    pub fn subscribe(&self) -> broadcast::Receiver<EmittedEvent> {
        self.tx.subscribe()
    }

    /// Number of live subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for BroadcastSink {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_CHANNEL_CAPACITY)
    }
}

impl EventSink for BroadcastSink {
    fn emit(&self, event_name: &str, event: &LocationEvent) {
        let emitted = EmittedEvent {
            name: event_name.to_string(),
            event: event.clone(),
        };
        // Err only means there are no receivers.
        if self.tx.send(emitted).is_err() {
            trace!(event = event_name, "No subscribers, dropping event");
        }
    }
}
