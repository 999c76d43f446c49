//! Runtime configuration for a [`LocationModule`](crate::session::LocationModule).

use crate::event::DEFAULT_EVENT_CHANNEL_CAPACITY;

/// Module settings that are not part of any single location request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleConfig {
    /// Capacity of the broadcast channel used for event delivery.
    pub event_channel_capacity: usize,

    /// Drop callbacks from sessions that were replaced or destroyed.
    ///
    /// Off by default: a callback racing a destroy is still emitted.
    pub suppress_stale_callbacks: bool,
}

impl Default for ModuleConfig {
    fn default() -> Self {
        Self {
            event_channel_capacity: DEFAULT_EVENT_CHANNEL_CAPACITY,
            suppress_stale_callbacks: false,
        }
    }
}

impl ModuleConfig {
    /// Set the broadcast channel capacity.
    pub fn with_event_channel_capacity(mut self, capacity: usize) -> Self {
        self.event_channel_capacity = capacity;
        self
    }

    /// Enable or disable stale-callback suppression.
    pub fn with_suppress_stale_callbacks(mut self, suppress: bool) -> Self {
        self.suppress_stale_callbacks = suppress;
        self
    }
}
