//! Host application lifecycle signals.
//!
//! The host delivers resume/pause/destroy through a [`HostLifecycle`]
//! registry. Listeners are held weakly so a registry never keeps a
//! controller alive.

use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use tracing::trace;

/// Receives host lifecycle signals.
pub trait LifecycleListener: Send + Sync {
    /// The host came to the foreground.
    fn on_host_resume(&self);

    /// The host went to the background.
    fn on_host_pause(&self);

    /// The host is being torn down.
    fn on_host_destroy(&self);
}

struct Registration {
    key: usize,
    listener: Weak<dyn LifecycleListener>,
}

/// Registry the host dispatches lifecycle signals through.
#[derive(Default)]
pub struct HostLifecycle {
    listeners: Mutex<Vec<Registration>>,
}

impl HostLifecycle {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `listener`. Registering the same listener twice is a no-op.
    pub fn add_lifecycle_listener(&self, listener: &Arc<dyn LifecycleListener>) {
        let key = listener_key(listener);
        let mut listeners = self.listeners.lock();
        listeners.retain(|r| r.listener.strong_count() > 0);
        if listeners.iter().any(|r| r.key == key) {
            return;
        }
        listeners.push(Registration {
            key,
            listener: Arc::downgrade(listener),
        });
    }

    /// Unregister `listener` if present.
    pub fn remove_lifecycle_listener(&self, listener: &Arc<dyn LifecycleListener>) {
        let key = listener_key(listener);
        self.listeners
            .lock()
            .retain(|r| r.key != key && r.listener.strong_count() > 0);
    }

    /// Number of live registered listeners.
    pub fn listener_count(&self) -> usize {
        self.listeners
            .lock()
            .iter()
            .filter(|r| r.listener.strong_count() > 0)
            .count()
    }

    pub fn dispatch_resume(&self) {
        trace!("Host resume");
        for listener in self.snapshot() {
            listener.on_host_resume();
        }
    }

    pub fn dispatch_pause(&self) {
        trace!("Host pause");
        for listener in self.snapshot() {
            listener.on_host_pause();
        }
    }

    pub fn dispatch_destroy(&self) {
        trace!("Host destroy");
        for listener in self.snapshot() {
            listener.on_host_destroy();
        }
    }

    /// Upgrade listeners outside the lock so callbacks may re-register.
    fn snapshot(&self) -> Vec<Arc<dyn LifecycleListener>> {
        self.listeners
            .lock()
            .iter()
            .filter_map(|r| r.listener.upgrade())
            .collect()
    }
}

impl std::fmt::Debug for HostLifecycle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostLifecycle")
            .field("listeners", &self.listener_count())
            .finish()
    }
}

fn listener_key(listener: &Arc<dyn LifecycleListener>) -> usize {
    Arc::as_ptr(listener) as *const () as usize
}
