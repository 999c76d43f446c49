//! `locbridge run` - drive one session against the simulated engine.
//!
//! Every emitted event is printed to stdout as one JSON line. Events travel
//! over the module's broadcast channel, sized by `[module]
//! event_channel_capacity`; if output falls behind, the oldest events are
//! skipped and reported. The command finishes when the script is exhausted,
//! `--max-events` is reached, or Ctrl-C is pressed, then stops and destroys
//! the session.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use clap::Args;
use locbridge::config::ConfigFile;
use locbridge::engine::SimulatedEngine;
use locbridge::event::EmittedEvent;
use locbridge::logging::init_logging;
use locbridge::{LocationEvent, LocationModule};
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::broadcast::Receiver;
use tracing::{info, warn};

use super::common::parse_options;
use crate::error::CliError;

/// How often the main loop wakes to check for Ctrl-C.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Arguments for the run command.
#[derive(Debug, Args)]
pub struct RunArgs {
    /// Options object as JSON (omit for defaults)
    #[arg(long)]
    pub options: Option<String>,

    /// JSON-lines file of engine callbacks to replay
    #[arg(long)]
    pub fixes: PathBuf,

    /// Stop after this many events
    #[arg(long)]
    pub max_events: Option<usize>,

    /// Loop the script until stopped (continuous mode only)
    #[arg(long)]
    pub repeat: bool,

    /// Drop callbacks from replaced sessions
    #[arg(long)]
    pub suppress_stale: bool,

    /// Do not write a log file
    #[arg(long)]
    pub no_log_file: bool,
}

/// Run the command with the loaded config file.
pub fn run(args: RunArgs, config: ConfigFile) -> Result<(), CliError> {
    let _logging_guard = if args.no_log_file {
        None
    } else {
        let guard = init_logging(&config.logging.directory, &config.logging.file)
            .map_err(|e| CliError::LoggingInit(e.to_string()))?;
        Some(guard)
    };

    let options = parse_options(args.options.as_deref())?;
    let text = std::fs::read_to_string(&args.fixes).map_err(|error| CliError::FixesRead {
        path: args.fixes.display().to_string(),
        error,
    })?;
    let engine = SimulatedEngine::from_json_lines(&text)
        .map_err(|error| CliError::FixesParse {
            path: args.fixes.display().to_string(),
            error,
        })?
        .with_repeat(args.repeat);

    let request = locbridge::build(options.as_ref());
    let limit = expected_events(
        engine.script_len(),
        request.once_location,
        args.repeat,
        args.max_events,
    );

    let shutdown = Arc::new(AtomicBool::new(false));
    let shutdown_clone = shutdown.clone();
    ctrlc::set_handler(move || {
        shutdown_clone.store(true, Ordering::SeqCst);
    })
    .map_err(|e| CliError::Signal(e.to_string()))?;

    let suppress_stale = config.module.suppress_stale_callbacks || args.suppress_stale;
    let module_config = config
        .module
        .with_suppress_stale_callbacks(suppress_stale);
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .map_err(|e| CliError::Runtime(e.to_string()))?;

    let (module, sink) = LocationModule::with_broadcast(engine, module_config);
    let mut rx = sink.subscribe();

    info!(
        fixes = %args.fixes.display(),
        mode = %request.mode,
        interval_ms = request.interval_ms,
        once = request.once_location,
        "Starting location session"
    );
    module.start_location(options.as_ref());

    let delivered = if module.state().is_active() {
        runtime.block_on(print_events(&mut rx, limit, &shutdown))
    } else {
        warn!(state = %module.state(), "Location session did not start");
        0
    };

    module.stop_location();
    module.destroy_location();

    info!(delivered, state = %module.state(), "Location session finished");
    Ok(())
}

/// Print events until `limit` is reached, the channel closes or Ctrl-C.
///
/// Skipped events count towards the limit.
async fn print_events(
    rx: &mut Receiver<EmittedEvent>,
    limit: Option<usize>,
    shutdown: &AtomicBool,
) -> usize {
    let mut delivered = 0usize;
    while limit.map_or(true, |limit| delivered < limit) {
        if shutdown.load(Ordering::SeqCst) {
            info!("Interrupted");
            break;
        }
        match tokio::time::timeout(POLL_INTERVAL, rx.recv()).await {
            Err(_) => continue,
            Ok(Ok(emitted)) => {
                delivered += 1;
                print_event(&emitted.event);
            }
            Ok(Err(RecvError::Lagged(skipped))) => {
                warn!(
                    skipped,
                    "Event output fell behind; raise [module] event_channel_capacity"
                );
                let skipped = usize::try_from(skipped).unwrap_or(usize::MAX);
                delivered = delivered.saturating_add(skipped);
            }
            Ok(Err(RecvError::Closed)) => break,
        }
    }
    delivered
}

/// Number of events to wait for, `None` for unbounded.
fn expected_events(
    script_len: usize,
    once: bool,
    repeat: bool,
    max_events: Option<usize>,
) -> Option<usize> {
    let from_script = if once {
        Some(script_len.min(1))
    } else if repeat && script_len > 0 {
        None
    } else {
        Some(script_len)
    };

    match (from_script, max_events) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, b) => a.or(b),
    }
}

fn print_event(event: &LocationEvent) {
    match serde_json::to_string(&event.to_payload()) {
        Ok(line) => println!("{}", line),
        Err(e) => eprintln!("Failed to encode event: {}", e),
    }
}
