//! Callback path from the engine to the event sink.
//!
//! The engine holds a [`LocationListener`] per session. Every callback goes
//! through the shared [`CallbackRouter`], which normalizes it and emits it
//! under [`ON_LOCATION_CHANGED_EVENT`].
//!
//! Sessions are tagged with a generation. By default the router emits
//! callbacks from any generation (a callback racing a destroy may still be
//! emitted). With `suppress_stale` set, only the live generation is emitted.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tracing::{debug, trace};

use crate::event::{EventNormalizer, EventSink, RawLocation, ON_LOCATION_CHANGED_EVENT};

/// Generation value meaning "no live session".
const NO_SESSION: u64 = 0;

/// Normalizes callbacks and hands them to the sink.
pub struct CallbackRouter {
    normalizer: EventNormalizer,
    sink: Arc<dyn EventSink>,
    live_generation: AtomicU64,
    suppress_stale: bool,
}

impl CallbackRouter {
    /// Create a router with detail mode off and no live session.
    pub fn new(sink: Arc<dyn EventSink>, suppress_stale: bool) -> Self {
        Self {
            normalizer: EventNormalizer::new(),
            sink,
            live_generation: AtomicU64::new(NO_SESSION),
            suppress_stale,
        }
    }

    /// Shared detail-mode holder.
    pub fn normalizer(&self) -> &EventNormalizer {
        &self.normalizer
    }

    /// Mark `generation` as the live session.
    pub fn activate(&self, generation: u64) {
        self.live_generation.store(generation, Ordering::Release);
    }

    /// Mark that no session is live.
    pub fn deactivate(&self) {
        self.live_generation.store(NO_SESSION, Ordering::Release);
    }

    /// Generation of the live session, if any.
    pub fn live_generation(&self) -> Option<u64> {
        match self.live_generation.load(Ordering::Acquire) {
            NO_SESSION => None,
            generation => Some(generation),
        }
    }

    fn route(&self, generation: u64, raw: Option<&RawLocation>) {
        let Some(raw) = raw else {
            trace!(generation, "Ignoring empty location callback");
            return;
        };

        if self.suppress_stale && self.live_generation() != Some(generation) {
            debug!(
                generation,
                live = ?self.live_generation(),
                "Dropping callback from stale location session"
            );
            return;
        }

        let event = self.normalizer.normalize(raw);
        trace!(generation, error = event.is_error(), "Emitting location event");
        self.sink.emit(ON_LOCATION_CHANGED_EVENT, &event);
    }
}

impl fmt::Debug for CallbackRouter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallbackRouter")
            .field("detail_mode", &self.normalizer.detail_mode())
            .field("live_generation", &self.live_generation())
            .field("suppress_stale", &self.suppress_stale)
            .finish()
    }
}

/// Callback handle handed to the engine for one session.
#[derive(Clone, Debug)]
pub struct LocationListener {
    router: Arc<CallbackRouter>,
    generation: u64,
}

impl LocationListener {
    /// Bind a listener to `generation`.
    pub fn new(router: Arc<CallbackRouter>, generation: u64) -> Self {
        Self { router, generation }
    }

    /// Session generation this listener reports for.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Engine callback. `None` models a null payload and is ignored.
    pub fn on_location_changed(&self, raw: Option<&RawLocation>) {
        self.router.route(self.generation, raw);
    }
}
