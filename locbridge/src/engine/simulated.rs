//! Simulated location engine.
//!
//! Replays a script of [`RawLocation`] callbacks on a background thread,
//! paced by the request's `interval_ms`. Single-fix requests deliver the
//! first entry and finish. Used by the CLI and by integration tests in place
//! of a device engine.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle, ThreadId};
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};
use tracing::{debug, trace};

use super::{EngineError, LocationClient, LocationEngine};
use crate::event::RawLocation;
use crate::options::LocationRequestConfig;
use crate::session::LocationListener;

/// Observations shared between the engine and its clients.
#[derive(Debug, Default)]
struct EngineStats {
    clients_created: AtomicUsize,
    last_option: Mutex<Option<LocationRequestConfig>>,
}

/// In-process engine replaying recorded callbacks.
#[derive(Debug, Clone)]
pub struct SimulatedEngine {
    script: Arc<Vec<RawLocation>>,
    repeat: bool,
    stats: Arc<EngineStats>,
}

impl SimulatedEngine {
    /// Create an engine that replays `script` once per session.
    pub fn new(script: Vec<RawLocation>) -> Self {
        Self {
            script: Arc::new(script),
            repeat: false,
            stats: Arc::new(EngineStats::default()),
        }
    }

    /// Parse a script from JSON lines, one `RawLocation` per line.
    ///
    /// Blank lines are skipped.
    pub fn from_json_lines(text: &str) -> Result<Self, serde_json::Error> {
        let script = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(|line| serde_json::from_str::<RawLocation>(line))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(script))
    }

    /// Loop the script in continuous mode instead of finishing.
    pub fn with_repeat(mut self, repeat: bool) -> Self {
        self.repeat = repeat;
        self
    }

    /// Number of scripted callbacks.
    pub fn script_len(&self) -> usize {
        self.script.len()
    }

    /// Number of clients created so far.
    pub fn clients_created(&self) -> usize {
        self.stats.clients_created.load(Ordering::SeqCst)
    }

    /// Most recent option applied by any client.
    pub fn last_option(&self) -> Option<LocationRequestConfig> {
        self.stats.last_option.lock().clone()
    }
}

impl LocationEngine for SimulatedEngine {
    type Client = SimulatedClient;

    fn create_client(&self, listener: LocationListener) -> Result<SimulatedClient, EngineError> {
        self.stats.clients_created.fetch_add(1, Ordering::SeqCst);
        Ok(SimulatedClient {
            script: Arc::clone(&self.script),
            repeat: self.repeat,
            stats: Arc::clone(&self.stats),
            listener,
            option: LocationRequestConfig::default(),
            worker: None,
            destroyed: false,
        })
    }
}

/// Stop flag the replay thread can sleep on.
#[derive(Debug, Default)]
struct StopSignal {
    stopped: Mutex<bool>,
    cv: Condvar,
}

impl StopSignal {
    fn stop(&self) {
        *self.stopped.lock() = true;
        self.cv.notify_all();
    }

    /// Sleep up to `timeout`; returns true if stopped.
    fn wait(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let mut stopped = self.stopped.lock();
        while !*stopped {
            if self.cv.wait_until(&mut stopped, deadline).timed_out() {
                break;
            }
        }
        *stopped
    }

    fn is_stopped(&self) -> bool {
        *self.stopped.lock()
    }
}

#[derive(Debug)]
struct Worker {
    stop: Arc<StopSignal>,
    handle: JoinHandle<()>,
}

impl Worker {
    fn thread_id(&self) -> ThreadId {
        self.handle.thread().id()
    }
}

/// One simulated session.
#[derive(Debug)]
pub struct SimulatedClient {
    script: Arc<Vec<RawLocation>>,
    repeat: bool,
    stats: Arc<EngineStats>,
    listener: LocationListener,
    option: LocationRequestConfig,
    worker: Option<Worker>,
    destroyed: bool,
}

impl SimulatedClient {
    /// Whether the replay thread is running.
    pub fn is_running(&self) -> bool {
        self.worker
            .as_ref()
            .is_some_and(|worker| !worker.handle.is_finished())
    }

    fn halt_worker(&mut self, command: &'static str) -> Result<(), EngineError> {
        let Some(worker) = self.worker.take() else {
            return Ok(());
        };
        worker.stop.stop();

        // Commands issued from inside a callback run on the worker itself.
        if worker.thread_id() == thread::current().id() {
            return Ok(());
        }
        worker.handle.join().map_err(|_| EngineError::Command {
            command,
            reason: "replay thread panicked".to_string(),
        })
    }
}

impl LocationClient for SimulatedClient {
    fn set_location_option(&mut self, option: &LocationRequestConfig) -> Result<(), EngineError> {
        if self.destroyed {
            return Err(EngineError::Destroyed);
        }
        self.option = option.clone();
        *self.stats.last_option.lock() = Some(option.clone());
        Ok(())
    }

    fn start_location(&mut self) -> Result<(), EngineError> {
        if self.destroyed {
            return Err(EngineError::Destroyed);
        }
        self.halt_worker("start")?;

        let stop = Arc::new(StopSignal::default());
        let script = Arc::clone(&self.script);
        let listener = self.listener.clone();
        let interval = Duration::from_millis(self.option.interval_ms);
        let once = self.option.once_location;
        let repeat = self.repeat && !once;
        let thread_stop = Arc::clone(&stop);

        let handle = thread::Builder::new()
            .name("locbridge-sim".to_string())
            .spawn(move || replay(&script, &listener, &thread_stop, interval, once, repeat))
            .map_err(|e| EngineError::Command {
                command: "start",
                reason: e.to_string(),
            })?;

        debug!(
            callbacks = self.script.len(),
            interval_ms = self.option.interval_ms,
            once,
            "Simulated engine started"
        );
        self.worker = Some(Worker { stop, handle });
        Ok(())
    }

    fn stop_location(&mut self) -> Result<(), EngineError> {
        if self.destroyed {
            return Err(EngineError::Destroyed);
        }
        self.halt_worker("stop")
    }

    fn on_destroy(&mut self) -> Result<(), EngineError> {
        if self.destroyed {
            return Ok(());
        }
        self.destroyed = true;
        self.halt_worker("destroy")
    }
}

impl Drop for SimulatedClient {
    fn drop(&mut self) {
        // Abandoned clients are signalled but not joined.
        if let Some(worker) = self.worker.take() {
            worker.stop.stop();
        }
    }
}

fn replay(
    script: &[RawLocation],
    listener: &LocationListener,
    stop: &StopSignal,
    interval: Duration,
    once: bool,
    repeat: bool,
) {
    let mut index = 0;
    while !stop.is_stopped() {
        let raw = match script.get(index) {
            Some(raw) => raw,
            None if repeat && !script.is_empty() => {
                index = 0;
                continue;
            }
            None => break,
        };

        listener.on_location_changed(Some(raw));
        index += 1;

        if once || stop.wait(interval) {
            break;
        }
    }
    trace!(delivered = index, "Simulated replay finished");
}
