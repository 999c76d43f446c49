//! `locbridge build` - show how an options object is interpreted.

use clap::Args;
use locbridge::options::DEFAULT_HTTP_TIMEOUT_MS;
use locbridge::LocationRequestConfig;

use super::common::parse_options;
use crate::error::CliError;

/// Arguments for the build command.
#[derive(Debug, Args)]
pub struct BuildArgs {
    /// Options object as JSON (omit for defaults)
    #[arg(long)]
    pub options: Option<String>,
}

/// Print the built request as pretty JSON, then what the engine will do.
pub fn run(args: BuildArgs) -> Result<(), CliError> {
    let options = parse_options(args.options.as_deref())?;
    let config = locbridge::build(options.as_ref());

    match serde_json::to_string_pretty(&config) {
        Ok(text) => println!("{}", text),
        Err(_) => println!("{:#?}", config),
    }

    println!();
    println!("Engine Behavior");
    println!("===============");
    for (label, value) in effective_behavior(&config) {
        println!("  {:<22} {}", label, value);
    }

    for note in mode_notes(&config) {
        println!();
        println!("Note: {}", note);
    }

    Ok(())
}

/// Resolved engine behavior, with provider defaults filled in.
fn effective_behavior(config: &LocationRequestConfig) -> Vec<(&'static str, String)> {
    let updates = if config.is_continuous() {
        format!("continuous, every {} ms", config.interval_ms)
    } else if config.once_location_latest {
        "single fix (best of recent window)".to_string()
    } else {
        "single fix".to_string()
    };

    vec![
        ("updates", updates),
        ("reverse geocoding", on_off(config.effective_need_address())),
        ("wifi active scan", on_off(config.effective_wifi_active_scan())),
        ("location cache", on_off(config.effective_location_cache_enable())),
    ]
}

/// Settings the caller made that the engine ignores in the chosen mode.
fn mode_notes(config: &LocationRequestConfig) -> Vec<&'static str> {
    let mut notes = Vec::new();
    if !config.mode.uses_network()
        && (config.wifi_active_scan.is_some() || config.http_timeout_ms != DEFAULT_HTTP_TIMEOUT_MS)
    {
        notes.push("wifiActiveScan and httpTimeOut have no effect in DeviceSensors mode");
    }
    if !config.mode.allows_mock() && config.mock_enable {
        notes.push("mockEnable has no effect in BatterySaving mode");
    }
    notes
}

fn on_off(enabled: bool) -> String {
    if enabled { "on" } else { "off" }.to_string()
}
