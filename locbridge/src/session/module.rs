//! Session Controller.
//!
//! [`LocationModule`] is the command surface the caller talks to. It owns
//! exactly one session slot, creates a native client per start, and binds
//! that client to the shared [`CallbackRouter`].
//!
//! # Commands
//!
//! - `start_location(options)` - build a request, replace the session, start it
//! - `stop_location()` - halt callbacks, keep the session
//! - `destroy_location()` - release the session; always ends in `Destroyed`
//!
//! Commands never fail towards the caller. Engine errors are logged and the
//! session state stays consistent.
//!
//! # Concurrency
//!
//! Commands are serialized through the slot mutex, but the lock is never
//! held across an engine call. The client is taken out of the slot, the
//! lock released, the engine called, and the result published under the
//! lock again. A command issued while another one is in flight, from a
//! callback or from another thread, is queued and run by the caller that
//! is already draining the queue. Callbacks and status queries therefore
//! never wait on an engine call.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::{Mutex, MutexGuard};
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use super::lifecycle::{HostLifecycle, LifecycleListener};
use super::listener::{CallbackRouter, LocationListener};
use super::state::SessionState;
use crate::config::ModuleConfig;
use crate::engine::{LocationClient, LocationEngine};
use crate::event::{BroadcastSink, EventSink};
use crate::options::{self, LocationRequestConfig};

/// Name the module registers under with the host.
pub const MODULE_NAME: &str = "EleRNLocation";

/// A command waiting for its turn on the session slot.
enum SessionCommand<C> {
    Start {
        client: C,
        generation: u64,
        config: LocationRequestConfig,
    },
    Stop,
    Destroy,
}

struct SessionSlot<C> {
    client: Option<C>,
    state: SessionState,
    generation: u64,
    /// A caller is draining `pending`.
    busy: bool,
    /// The client is out of the slot while a start or stop runs.
    checked_out: bool,
    pending: VecDeque<SessionCommand<C>>,
}

impl<C> Default for SessionSlot<C> {
    fn default() -> Self {
        Self {
            client: None,
            state: SessionState::Idle,
            generation: 0,
            busy: false,
            checked_out: false,
            pending: VecDeque::new(),
        }
    }
}

type SlotGuard<'a, C> = MutexGuard<'a, SessionSlot<C>>;

struct ModuleInner<E: LocationEngine> {
    engine: E,
    slot: Mutex<SessionSlot<E::Client>>,
    router: Arc<CallbackRouter>,
    next_generation: AtomicU64,
}

/// Location module: one engine, one session slot, one event sink.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use locbridge::config::ModuleConfig;
/// use locbridge::engine::SimulatedEngine;
/// use locbridge::event::{BroadcastSink, RawLocation};
/// use locbridge::session::{LocationModule, SessionState};
/// use serde_json::json;
///
/// let engine = SimulatedEngine::new(vec![RawLocation::fix(1, 31.2, 121.5)]);
/// let sink = BroadcastSink::default();
/// let module = LocationModule::new(engine, Arc::new(sink.clone()), ModuleConfig::default());
///
/// module.start_location(Some(&json!({ "onceLocation": true })));
/// assert_eq!(module.state(), SessionState::Active);
///
/// module.destroy_location();
/// assert_eq!(module.state(), SessionState::Destroyed);
/// ```
pub struct LocationModule<E: LocationEngine> {
    inner: Arc<ModuleInner<E>>,
    lifecycle: Option<Arc<HostLifecycle>>,
}

impl<E: LocationEngine> LocationModule<E> {
    /// Create a module emitting into `sink`.
    pub fn new(engine: E, sink: Arc<dyn EventSink>, config: ModuleConfig) -> Self {
        let router = Arc::new(CallbackRouter::new(sink, config.suppress_stale_callbacks));
        Self {
            inner: Arc::new(ModuleInner {
                engine,
                slot: Mutex::new(SessionSlot::default()),
                router,
                next_generation: AtomicU64::new(1),
            }),
            lifecycle: None,
        }
    }

    /// Create a module emitting into a new broadcast sink sized by
    /// `config.event_channel_capacity`.
    pub fn with_broadcast(engine: E, config: ModuleConfig) -> (Self, BroadcastSink) {
        let sink = BroadcastSink::new(config.event_channel_capacity);
        let module = Self::new(engine, Arc::new(sink.clone()), config);
        (module, sink)
    }

    /// Attach the host lifecycle registry. The module registers itself on
    /// every start.
    pub fn with_lifecycle(mut self, lifecycle: Arc<HostLifecycle>) -> Self {
        self.lifecycle = Some(lifecycle);
        self
    }

    /// Registration name.
    pub fn name(&self) -> &'static str {
        MODULE_NAME
    }

    /// Constants exported to the caller (none).
    pub fn constants(&self) -> Map<String, Value> {
        Map::new()
    }

    /// Start a session with the given options.
    ///
    /// Any previous session is replaced without being stopped.
    pub fn start_location(&self, options: Option<&Value>) {
        let config = options::build(options);
        if self.inner.start(config) {
            self.register_lifecycle();
        }
    }

    /// Ask the engine to halt. No-op without a session.
    pub fn stop_location(&self) {
        self.inner.stop();
    }

    /// Release the session. Idempotent.
    pub fn destroy_location(&self) {
        self.inner.destroy();
        if let Some(lifecycle) = &self.lifecycle {
            lifecycle.remove_lifecycle_listener(&self.as_lifecycle_listener());
        }
    }

    /// Current session state.
    pub fn state(&self) -> SessionState {
        self.inner.slot.lock().state
    }

    /// Whether fix events carry the extended field set.
    pub fn detail_mode(&self) -> bool {
        self.inner.router.normalizer().detail_mode()
    }

    /// Generation of the current session, `None` before the first start.
    pub fn generation(&self) -> Option<u64> {
        match self.inner.slot.lock().generation {
            0 => None,
            generation => Some(generation),
        }
    }

    /// Whether a native client is currently held.
    pub fn has_session(&self) -> bool {
        let slot = self.inner.slot.lock();
        slot.client.is_some() || slot.checked_out
    }

    /// Host resume signal (no effect).
    pub fn on_host_resume(&self) {
        self.inner.on_host_resume();
    }

    /// Host pause signal (no effect).
    pub fn on_host_pause(&self) {
        self.inner.on_host_pause();
    }

    /// Host destroy signal; same as `destroy_location`.
    pub fn on_host_destroy(&self) {
        self.destroy_location();
    }

    fn as_lifecycle_listener(&self) -> Arc<dyn LifecycleListener> {
        self.inner.clone()
    }

    fn register_lifecycle(&self) {
        if let Some(lifecycle) = &self.lifecycle {
            lifecycle.add_lifecycle_listener(&self.as_lifecycle_listener());
        }
    }
}

impl<E: LocationEngine> std::fmt::Debug for LocationModule<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocationModule")
            .field("state", &self.state())
            .field("router", &self.inner.router)
            .finish()
    }
}

impl<E: LocationEngine> ModuleInner<E> {
    /// Returns true when a new session was created.
    fn start(&self, config: LocationRequestConfig) -> bool {
        self.router.normalizer().set_detail_mode(true);

        let generation = self.next_generation.fetch_add(1, Ordering::Relaxed);
        let listener = LocationListener::new(Arc::clone(&self.router), generation);

        let client = match self.engine.create_client(listener) {
            Ok(client) => client,
            Err(e) => {
                warn!(error = %e, generation, "Failed to create location client");
                return false;
            }
        };

        self.submit(SessionCommand::Start {
            client,
            generation,
            config,
        });
        true
    }

    fn stop(&self) {
        self.submit(SessionCommand::Stop);
    }

    fn destroy(&self) {
        self.submit(SessionCommand::Destroy);
    }

    /// Queue `command`, then drain the queue unless another caller already is.
    fn submit(&self, command: SessionCommand<E::Client>) {
        let mut slot = self.slot.lock();
        slot.pending.push_back(command);
        if slot.busy {
            debug!("Location command queued behind a running command");
            return;
        }

        slot.busy = true;
        while let Some(command) = slot.pending.pop_front() {
            match command {
                SessionCommand::Start {
                    client,
                    generation,
                    config,
                } => run_start(&mut slot, &self.router, client, generation, &config),
                SessionCommand::Stop => run_stop(&mut slot),
                SessionCommand::Destroy => run_destroy(&mut slot, &self.router),
            }
        }
        slot.busy = false;
    }
}

fn run_start<C: LocationClient>(
    slot: &mut SlotGuard<'_, C>,
    router: &CallbackRouter,
    mut client: C,
    generation: u64,
    config: &LocationRequestConfig,
) {
    let previous = slot.client.take();
    if previous.is_some() {
        debug!(
            previous = slot.generation,
            generation, "Replacing location session without stopping it"
        );
    }
    slot.generation = generation;
    slot.checked_out = true;
    router.activate(generation);

    let (client, state) = MutexGuard::unlocked(slot, move || {
        // The old client is abandoned here; its Drop decides how it winds down.
        drop(previous);

        if let Err(e) = client.set_location_option(config) {
            warn!(error = %e, generation, "Engine rejected location options");
        }
        let state = match client.start_location() {
            Ok(()) => {
                info!(
                    generation,
                    mode = %config.mode,
                    once = config.once_location,
                    interval_ms = config.interval_ms,
                    "Location session started"
                );
                SessionState::Active
            }
            Err(e) => {
                warn!(error = %e, generation, "Failed to start location session");
                SessionState::Stopped
            }
        };
        (client, state)
    });

    slot.client = Some(client);
    slot.checked_out = false;
    slot.state = state;
}

fn run_stop<C: LocationClient>(slot: &mut SlotGuard<'_, C>) {
    let generation = slot.generation;
    let Some(mut client) = slot.client.take() else {
        debug!("Stop requested without a location session");
        return;
    };
    slot.checked_out = true;

    let client = MutexGuard::unlocked(slot, move || {
        if let Err(e) = client.stop_location() {
            warn!(error = %e, generation, "Failed to stop location session");
        }
        client
    });

    slot.client = Some(client);
    slot.checked_out = false;
    slot.state = SessionState::Stopped;
    info!(generation, "Location session stopped");
}

fn run_destroy<C: LocationClient>(slot: &mut SlotGuard<'_, C>, router: &CallbackRouter) {
    let generation = slot.generation;
    router.deactivate();
    slot.state = SessionState::Destroyed;

    let Some(mut client) = slot.client.take() else {
        debug!("Destroy requested without a location session");
        return;
    };
    MutexGuard::unlocked(slot, move || {
        if let Err(e) = client.on_destroy() {
            warn!(error = %e, generation, "Failed to destroy location session");
        }
    });
    info!(generation, "Location session destroyed");
}

impl<E: LocationEngine> LifecycleListener for ModuleInner<E> {
    fn on_host_resume(&self) {
        debug!("Host resumed");
    }

    fn on_host_pause(&self) {
        debug!("Host paused");
    }

    fn on_host_destroy(&self) {
        debug!("Host destroyed, releasing location session");
        self.destroy();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{mpsc, OnceLock};
    use std::thread;
    use std::time::Duration;

    use crate::engine::{EngineError, SimulatedEngine};
    use crate::event::{
        BroadcastSink, EmittedEvent, EventEmitter, LocationEvent, RawLocation,
        DETAIL_FIELD_COUNT,
    };
    use crate::options::LocationMode;
    use serde_json::json;
    use tokio::sync::broadcast;

    #[derive(Debug, Clone, PartialEq)]
    enum Command {
        Create(u64),
        SetOption(LocationRequestConfig),
        Start,
        Stop,
        Destroy,
    }

    /// Records commands and keeps listeners so tests can fire callbacks.
    #[derive(Default)]
    struct RecordingEngine {
        commands: Arc<Mutex<Vec<Command>>>,
        listeners: Arc<Mutex<Vec<LocationListener>>>,
        fail_create: bool,
        fail_start: bool,
        /// Delivered synchronously from inside `start_location`.
        fire_on_start: Option<RawLocation>,
    }

    struct RecordingClient {
        commands: Arc<Mutex<Vec<Command>>>,
        fail_start: bool,
        listener: LocationListener,
        fire_on_start: Option<RawLocation>,
    }

    impl LocationEngine for RecordingEngine {
        type Client = RecordingClient;

        fn create_client(&self, listener: LocationListener) -> Result<RecordingClient, EngineError> {
            if self.fail_create {
                return Err(EngineError::ClientCreation("no key".to_string()));
            }
            self.commands
                .lock()
                .push(Command::Create(listener.generation()));
            self.listeners.lock().push(listener.clone());
            Ok(RecordingClient {
                commands: Arc::clone(&self.commands),
                fail_start: self.fail_start,
                listener,
                fire_on_start: self.fire_on_start.clone(),
            })
        }
    }

    impl LocationClient for RecordingClient {
        fn set_location_option(
            &mut self,
            option: &LocationRequestConfig,
        ) -> Result<(), EngineError> {
            self.commands.lock().push(Command::SetOption(option.clone()));
            Ok(())
        }

        fn start_location(&mut self) -> Result<(), EngineError> {
            self.commands.lock().push(Command::Start);
            if let Some(raw) = &self.fire_on_start {
                self.listener.on_location_changed(Some(raw));
            }
            if self.fail_start {
                return Err(EngineError::Command {
                    command: "start",
                    reason: "denied".to_string(),
                });
            }
            Ok(())
        }

        fn stop_location(&mut self) -> Result<(), EngineError> {
            self.commands.lock().push(Command::Stop);
            Ok(())
        }

        fn on_destroy(&mut self) -> Result<(), EngineError> {
            self.commands.lock().push(Command::Destroy);
            Ok(())
        }
    }

    struct Harness {
        module: LocationModule<RecordingEngine>,
        commands: Arc<Mutex<Vec<Command>>>,
        listeners: Arc<Mutex<Vec<LocationListener>>>,
        rx: broadcast::Receiver<EmittedEvent>,
    }

    fn harness_with(engine: RecordingEngine, config: ModuleConfig) -> Harness {
        let commands = Arc::clone(&engine.commands);
        let listeners = Arc::clone(&engine.listeners);
        let sink = BroadcastSink::new(16);
        let rx = sink.subscribe();
        let module = LocationModule::new(engine, Arc::new(sink), config);
        Harness {
            module,
            commands,
            listeners,
            rx,
        }
    }

    fn harness() -> Harness {
        harness_with(RecordingEngine::default(), ModuleConfig::default())
    }

    impl Harness {
        fn fire(&self, index: usize, raw: &RawLocation) {
            let listener = self.listeners.lock()[index].clone();
            listener.on_location_changed(Some(raw));
        }

        fn next_event(&mut self) -> Option<LocationEvent> {
            self.rx.try_recv().ok().map(|emitted| emitted.event)
        }
    }

    #[test]
    fn test_initial_state() {
        let h = harness();
        assert_eq!(h.module.state(), SessionState::Idle);
        assert!(!h.module.detail_mode());
        assert!(!h.module.has_session());
        assert_eq!(h.module.generation(), None);
        assert_eq!(h.module.name(), "EleRNLocation");
        assert!(h.module.constants().is_empty());
    }

    #[test]
    fn test_start_builds_config_and_starts() {
        let h = harness();
        h.module
            .start_location(Some(&json!({ "accuracy": "HighAccuracy", "interval": 5000 })));

        assert_eq!(h.module.state(), SessionState::Active);
        assert!(h.module.detail_mode());

        let commands = h.commands.lock().clone();
        assert_eq!(commands.len(), 3);
        assert_eq!(commands[0], Command::Create(1));
        match &commands[1] {
            Command::SetOption(config) => {
                assert_eq!(config.mode, LocationMode::HighAccuracy);
                assert_eq!(config.interval_ms, 5000);
            }
            other => panic!("unexpected command {other:?}"),
        }
        assert_eq!(commands[2], Command::Start);
    }

    #[test]
    fn test_start_without_options_uses_defaults() {
        let h = harness();
        h.module.start_location(None);

        let commands = h.commands.lock().clone();
        assert_eq!(
            commands[1],
            Command::SetOption(LocationRequestConfig::default())
        );
    }

    #[test]
    fn test_stop_then_start_recreates_session() {
        let h = harness();
        h.module.start_location(None);
        h.module.stop_location();
        assert_eq!(h.module.state(), SessionState::Stopped);

        h.module.start_location(None);
        assert_eq!(h.module.state(), SessionState::Active);
        assert_eq!(h.module.generation(), Some(2));

        let creates = h
            .commands
            .lock()
            .iter()
            .filter(|c| matches!(c, Command::Create(_)))
            .count();
        assert_eq!(creates, 2);
    }

    #[test]
    fn test_restart_does_not_stop_previous_session() {
        let h = harness();
        h.module.start_location(None);
        h.module.start_location(None);

        let commands = h.commands.lock().clone();
        assert!(!commands.contains(&Command::Stop));
        assert!(!commands.contains(&Command::Destroy));
    }

    #[test]
    fn test_stop_without_session_is_noop() {
        let h = harness();
        h.module.stop_location();
        assert_eq!(h.module.state(), SessionState::Idle);
        assert!(h.commands.lock().is_empty());
    }

    #[test]
    fn test_destroy_is_idempotent() {
        let h = harness();
        h.module.destroy_location();
        assert_eq!(h.module.state(), SessionState::Destroyed);

        h.module.start_location(None);
        h.module.destroy_location();
        h.module.destroy_location();

        assert_eq!(h.module.state(), SessionState::Destroyed);
        assert!(!h.module.has_session());
        let destroys = h
            .commands
            .lock()
            .iter()
            .filter(|c| **c == Command::Destroy)
            .count();
        assert_eq!(destroys, 1);
    }

    #[test]
    fn test_stop_after_destroy_is_noop() {
        let h = harness();
        h.module.start_location(None);
        h.module.destroy_location();
        h.module.stop_location();

        assert_eq!(h.module.state(), SessionState::Destroyed);
        assert!(!h.commands.lock().contains(&Command::Stop));
    }

    #[test]
    fn test_start_after_destroy_creates_new_session() {
        let h = harness();
        h.module.start_location(None);
        h.module.destroy_location();
        h.module.start_location(None);

        assert_eq!(h.module.state(), SessionState::Active);
        assert!(h.module.has_session());
    }

    #[test]
    fn test_callback_emits_detailed_fix() {
        let mut h = harness();
        h.module.start_location(None);

        let raw = RawLocation {
            accuracy: 10.0,
            ..RawLocation::fix(1, 31.2, 121.5)
        };
        h.fire(0, &raw);

        let event = h.next_event().expect("event emitted");
        assert_eq!(event.to_payload().len(), 3 + DETAIL_FIELD_COUNT);
        assert_eq!(event.to_payload()["accuracy"], 10.0);
    }

    #[test]
    fn test_callback_error_variant() {
        let mut h = harness();
        h.module.start_location(None);

        h.fire(0, &RawLocation::error(5, "timeout"));

        let event = h.next_event().expect("event emitted");
        assert_eq!(
            Value::Object(event.to_payload()),
            json!({ "errorCode": 5, "errorInfo": "timeout" })
        );
    }

    #[test]
    fn test_stray_callback_after_destroy_is_emitted_by_default() {
        let mut h = harness();
        h.module.start_location(None);
        h.module.destroy_location();

        h.fire(0, &RawLocation::fix(1, 1.0, 2.0));

        assert!(h.next_event().is_some());
    }

    #[test]
    fn test_stale_callbacks_suppressed_when_configured() {
        let mut h = harness_with(
            RecordingEngine::default(),
            ModuleConfig::default().with_suppress_stale_callbacks(true),
        );
        h.module.start_location(None);
        h.module.start_location(None);

        h.fire(0, &RawLocation::fix(1, 1.0, 2.0));
        assert!(h.next_event().is_none());

        h.fire(1, &RawLocation::fix(1, 1.0, 2.0));
        assert!(h.next_event().is_some());

        h.module.destroy_location();
        h.fire(1, &RawLocation::fix(1, 1.0, 2.0));
        assert!(h.next_event().is_none());
    }

    #[test]
    fn test_client_creation_failure_keeps_state() {
        let h = harness_with(
            RecordingEngine {
                fail_create: true,
                ..RecordingEngine::default()
            },
            ModuleConfig::default(),
        );

        h.module.start_location(None);

        assert_eq!(h.module.state(), SessionState::Idle);
        assert!(!h.module.has_session());
        assert!(h.module.detail_mode());
    }

    #[test]
    fn test_engine_start_failure_leaves_session_stopped() {
        let h = harness_with(
            RecordingEngine {
                fail_start: true,
                ..RecordingEngine::default()
            },
            ModuleConfig::default(),
        );

        h.module.start_location(None);

        assert_eq!(h.module.state(), SessionState::Stopped);
        assert!(h.module.has_session());
    }

    #[test]
    fn test_host_lifecycle_destroy() {
        let lifecycle = Arc::new(HostLifecycle::new());
        let engine = RecordingEngine::default();
        let commands = Arc::clone(&engine.commands);
        let module = LocationModule::new(
            engine,
            Arc::new(BroadcastSink::default()),
            ModuleConfig::default(),
        )
        .with_lifecycle(Arc::clone(&lifecycle));

        assert_eq!(lifecycle.listener_count(), 0);
        module.start_location(None);
        module.start_location(None);
        assert_eq!(lifecycle.listener_count(), 1);

        lifecycle.dispatch_resume();
        lifecycle.dispatch_pause();
        assert_eq!(module.state(), SessionState::Active);

        lifecycle.dispatch_destroy();
        assert_eq!(module.state(), SessionState::Destroyed);
        assert!(commands.lock().contains(&Command::Destroy));
    }

    #[test]
    fn test_host_destroy_from_idle() {
        let h = harness();
        h.module.on_host_resume();
        h.module.on_host_pause();
        h.module.on_host_destroy();
        assert_eq!(h.module.state(), SessionState::Destroyed);
    }

    #[test]
    fn test_destroy_deregisters_lifecycle() {
        let lifecycle = Arc::new(HostLifecycle::new());
        let module = LocationModule::new(
            RecordingEngine::default(),
            Arc::new(BroadcastSink::default()),
            ModuleConfig::default(),
        )
        .with_lifecycle(Arc::clone(&lifecycle));

        module.start_location(None);
        module.destroy_location();

        assert_eq!(lifecycle.listener_count(), 0);
    }

    /// Emitter whose handler runs `on_event` against the module once it is set.
    fn reentrant_emitter<E: LocationEngine>(
        on_event: impl Fn(&LocationModule<E>) + Send + Sync + 'static,
    ) -> (EventEmitter, Arc<OnceLock<Arc<LocationModule<E>>>>) {
        let emitter = EventEmitter::new();
        let slot: Arc<OnceLock<Arc<LocationModule<E>>>> = Arc::new(OnceLock::new());
        let handler_slot = Arc::clone(&slot);
        emitter.add_location_listener(move |_| {
            if let Some(module) = handler_slot.get() {
                on_event(module);
            }
        });
        (emitter, slot)
    }

    #[test]
    fn test_callback_can_query_module_while_stop_waits_on_engine() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_in_handler = Arc::clone(&seen);
        let (emitter, slot) = reentrant_emitter(move |module: &LocationModule<SimulatedEngine>| {
            thread::sleep(Duration::from_millis(150));
            seen_in_handler.lock().push(module.state());
            module.stop_location();
        });

        let engine = SimulatedEngine::new(vec![RawLocation::fix(1, 31.2, 121.5)]).with_repeat(true);
        let module = Arc::new(LocationModule::new(
            engine,
            Arc::new(emitter),
            ModuleConfig::default(),
        ));
        assert!(slot.set(Arc::clone(&module)).is_ok());

        module.start_location(Some(&json!({ "interval": 10 })));
        // Let the first callback get into its handler.
        thread::sleep(Duration::from_millis(50));

        let (done_tx, done_rx) = mpsc::channel();
        let stopper = Arc::clone(&module);
        thread::spawn(move || {
            stopper.stop_location();
            let _ = done_tx.send(());
        });

        assert!(
            done_rx.recv_timeout(Duration::from_secs(5)).is_ok(),
            "stop_location must return while a callback queries the module"
        );
        assert_eq!(module.state(), SessionState::Stopped);
        assert!(!seen.lock().is_empty());

        module.destroy_location();
        assert_eq!(module.state(), SessionState::Destroyed);
    }

    #[test]
    fn test_synchronous_callback_during_start_can_command_module() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_in_handler = Arc::clone(&seen);
        let (emitter, slot) = reentrant_emitter(move |module: &LocationModule<RecordingEngine>| {
            seen_in_handler
                .lock()
                .push((module.state(), module.has_session(), module.generation()));
            module.stop_location();
        });

        let engine = RecordingEngine {
            fire_on_start: Some(RawLocation::fix(1, 31.2, 121.5)),
            ..RecordingEngine::default()
        };
        let commands = Arc::clone(&engine.commands);
        let module = Arc::new(LocationModule::new(
            engine,
            Arc::new(emitter),
            ModuleConfig::default(),
        ));
        assert!(slot.set(Arc::clone(&module)).is_ok());

        module.start_location(None);

        // The handler ran mid-start; its stop was queued and ran afterwards.
        assert_eq!(
            seen.lock().clone(),
            vec![(SessionState::Idle, true, Some(1))]
        );
        assert_eq!(module.state(), SessionState::Stopped);
        let commands = commands.lock().clone();
        assert_eq!(commands[commands.len() - 2..], [Command::Start, Command::Stop]);
    }

    #[test]
    fn test_destroy_queued_during_start_runs_last() {
        let (emitter, slot) = reentrant_emitter(|module: &LocationModule<RecordingEngine>| {
            module.destroy_location();
        });
        let engine = RecordingEngine {
            fire_on_start: Some(RawLocation::error(4, "network")),
            ..RecordingEngine::default()
        };
        let commands = Arc::clone(&engine.commands);
        let module = Arc::new(LocationModule::new(
            engine,
            Arc::new(emitter),
            ModuleConfig::default(),
        ));
        assert!(slot.set(Arc::clone(&module)).is_ok());

        module.start_location(None);

        assert_eq!(module.state(), SessionState::Destroyed);
        assert!(!module.has_session());
        assert_eq!(commands.lock().last(), Some(&Command::Destroy));
    }
}
