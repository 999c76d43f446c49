//! Declarative option table.
//!
//! One [`OptionField`] per recognized option key. The builder walks this
//! table and nothing else, so the interpretation policy for every key is
//! visible in one place:
//!
//! | key                   | kind    | target field            |
//! |-----------------------|---------|-------------------------|
//! | `accuracy`            | text    | `mode`                  |
//! | `needAddress`         | bool    | `need_address`          |
//! | `onceLocation`        | bool    | `once_location`         |
//! | `onceLocationLatest`  | bool    | `once_location_latest`  |
//! | `wifiActiveScan`      | bool    | `wifi_active_scan`      |
//! | `mockEnable`          | bool    | `mock_enable`           |
//! | `interval`            | integer | `interval_ms`           |
//! | `httpTimeOut`         | integer | `http_timeout_ms`       |
//! | `protocol`            | text    | `protocol`              |
//! | `locationCacheEnable` | bool    | `location_cache_enable` |

use std::fmt;

use serde_json::Value;

use super::request::{LocationMode, LocationProtocol, LocationRequestConfig};

/// JSON type an option value must have to be applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionKind {
    /// JSON `true` / `false`.
    Bool,
    /// Non-negative integral JSON number.
    Integer,
    /// JSON string matched against a fixed set of literals.
    Text,
}

impl fmt::Display for OptionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool => write!(f, "bool"),
            Self::Integer => write!(f, "integer"),
            Self::Text => write!(f, "text"),
        }
    }
}

/// Result of applying one option value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// The value was written into the config.
    Applied,
    /// The value had the wrong JSON type; the field keeps its default.
    WrongType,
    /// A text value was not one of the accepted literals.
    UnknownLiteral,
}

#[derive(Clone, Copy)]
enum Setter {
    Bool(fn(&mut LocationRequestConfig, bool)),
    Integer(fn(&mut LocationRequestConfig, u64)),
    /// Returns false when the literal is not recognized.
    Text(fn(&mut LocationRequestConfig, &str) -> bool),
}

/// A recognized option key and how it maps onto [`LocationRequestConfig`].
#[derive(Clone, Copy)]
pub struct OptionField {
    /// Key as supplied by the caller.
    pub key: &'static str,
    /// Human-readable default, for listings.
    pub default: &'static str,
    /// Accepted literals for text keys (empty otherwise).
    pub literals: &'static [&'static str],
    setter: Setter,
}

impl OptionField {
    /// Expected JSON type.
    pub fn kind(&self) -> OptionKind {
        match self.setter {
            Setter::Bool(_) => OptionKind::Bool,
            Setter::Integer(_) => OptionKind::Integer,
            Setter::Text(_) => OptionKind::Text,
        }
    }

    /// Apply `value` to `config` if it has the expected type.
    pub fn apply(&self, config: &mut LocationRequestConfig, value: &Value) -> ApplyOutcome {
        match self.setter {
            Setter::Bool(set) => match value.as_bool() {
                Some(b) => {
                    set(config, b);
                    ApplyOutcome::Applied
                }
                None => ApplyOutcome::WrongType,
            },
            Setter::Integer(set) => match as_non_negative_integer(value) {
                Some(n) => {
                    set(config, n);
                    ApplyOutcome::Applied
                }
                None => ApplyOutcome::WrongType,
            },
            Setter::Text(set) => match value.as_str() {
                Some(s) if set(config, s) => ApplyOutcome::Applied,
                Some(_) => ApplyOutcome::UnknownLiteral,
                None => ApplyOutcome::WrongType,
            },
        }
    }
}

impl fmt::Debug for OptionField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OptionField")
            .field("key", &self.key)
            .field("kind", &self.kind())
            .field("default", &self.default)
            .finish()
    }
}

static OPTION_FIELDS: &[OptionField] = &[
    OptionField {
        key: "accuracy",
        default: "ProviderDefault",
        literals: &["BatterySaving", "DeviceSensors", "HighAccuracy"],
        setter: Setter::Text(|config, value| match LocationMode::from_option(value) {
            Some(mode) => {
                config.mode = mode;
                true
            }
            None => false,
        }),
    },
    OptionField {
        key: "needAddress",
        default: "provider (true)",
        literals: &[],
        setter: Setter::Bool(|config, value| config.need_address = Some(value)),
    },
    OptionField {
        key: "onceLocation",
        default: "false",
        literals: &[],
        setter: Setter::Bool(|config, value| config.once_location = value),
    },
    OptionField {
        key: "onceLocationLatest",
        default: "false",
        literals: &[],
        setter: Setter::Bool(|config, value| config.once_location_latest = value),
    },
    OptionField {
        key: "wifiActiveScan",
        default: "provider (true)",
        literals: &[],
        setter: Setter::Bool(|config, value| config.wifi_active_scan = Some(value)),
    },
    OptionField {
        key: "mockEnable",
        default: "false",
        literals: &[],
        setter: Setter::Bool(|config, value| config.mock_enable = value),
    },
    OptionField {
        key: "interval",
        default: "2000",
        literals: &[],
        setter: Setter::Integer(|config, value| config.interval_ms = value),
    },
    OptionField {
        key: "httpTimeOut",
        default: "30000",
        literals: &[],
        setter: Setter::Integer(|config, value| config.http_timeout_ms = value),
    },
    OptionField {
        key: "protocol",
        default: "ProviderDefault",
        literals: &["http", "https"],
        setter: Setter::Text(|config, value| match LocationProtocol::from_option(value) {
            Some(protocol) => {
                config.protocol = protocol;
                true
            }
            None => false,
        }),
    },
    OptionField {
        key: "locationCacheEnable",
        default: "provider (true)",
        literals: &[],
        setter: Setter::Bool(|config, value| config.location_cache_enable = Some(value)),
    },
];

/// All recognized option keys, in table order.
pub fn option_fields() -> &'static [OptionField] {
    OPTION_FIELDS
}

/// Find the table entry for `key`.
pub fn lookup(key: &str) -> Option<&'static OptionField> {
    OPTION_FIELDS.iter().find(|field| field.key == key)
}

/// Accept `5000` and `5000.0`; reject negatives, fractions and non-numbers.
fn as_non_negative_integer(value: &Value) -> Option<u64> {
    if let Some(n) = value.as_u64() {
        return Some(n);
    }
    let f = value.as_f64()?;
    // u64::MAX as f64 rounds up to 2^64, which is already out of range.
    if f >= 0.0 && f.fract() == 0.0 && f < u64::MAX as f64 {
        Some(f as u64)
    } else {
        None
    }
}
