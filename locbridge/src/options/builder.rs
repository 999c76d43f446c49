//! Option bag → [`LocationRequestConfig`].
//!
//! The caller's options arrive loosely typed. Malformed input never fails
//! the build: each recognized key is applied only when it has the expected
//! type, and everything else falls back to the engine default.

use serde_json::Value;
use tracing::debug;

use super::request::LocationRequestConfig;
use super::table::{lookup, option_fields, ApplyOutcome};

/// Build a request configuration from an optional option bag.
///
/// `None`, `null` and non-object values all yield the default config.
///
/// # Example
///
/// ```
/// use locbridge::options::{build, LocationMode};
/// use serde_json::json;
///
/// let options = json!({ "accuracy": "HighAccuracy", "interval": 5000 });
/// let config = build(Some(&options));
/// assert_eq!(config.mode, LocationMode::HighAccuracy);
/// assert_eq!(config.interval_ms, 5000);
/// ```
pub fn build(options: Option<&Value>) -> LocationRequestConfig {
    let mut config = LocationRequestConfig::default();

    let Some(map) = options.and_then(Value::as_object) else {
        if let Some(other) = options.filter(|v| !v.is_null()) {
            debug!(options = %other, "Location options are not an object, using defaults");
        }
        return config;
    };

    for field in option_fields() {
        let Some(value) = map.get(field.key) else {
            continue;
        };
        match field.apply(&mut config, value) {
            ApplyOutcome::Applied => {}
            ApplyOutcome::WrongType => {
                debug!(
                    key = field.key,
                    expected = %field.kind(),
                    value = %value,
                    "Ignoring mistyped location option"
                );
            }
            ApplyOutcome::UnknownLiteral => {
                debug!(
                    key = field.key,
                    value = %value,
                    "Ignoring unrecognized location option value"
                );
            }
        }
    }

    for key in map.keys().filter(|key| lookup(key).is_none()) {
        debug!(key = %key, "Ignoring unknown location option");
    }

    config
}
