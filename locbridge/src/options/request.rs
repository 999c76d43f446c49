//! Strongly-typed location request handed to the native engine.
//!
//! A [`LocationRequestConfig`] is built once per session start and is
//! immutable afterwards. Fields the caller did not set keep the engine's
//! built-in default.

use std::fmt;

use serde::Serialize;

/// Default fix cadence for continuous mode, in milliseconds.
pub const DEFAULT_INTERVAL_MS: u64 = 2000;

/// Default network timeout, in milliseconds.
pub const DEFAULT_HTTP_TIMEOUT_MS: u64 = 30_000;

/// Power/accuracy tradeoff used by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum LocationMode {
    /// Network positioning only (Wi-Fi/cell), lowest power.
    BatterySaving,
    /// GNSS only, no network assistance.
    DeviceSensors,
    /// Fused GNSS + network positioning.
    HighAccuracy,
    /// Leave the mode to the engine.
    #[default]
    ProviderDefault,
}

impl LocationMode {
    /// Parse the caller-facing literal (`"BatterySaving"`, ...).
    ///
    /// Returns `None` for anything else; matching is case-sensitive.
    pub fn from_option(value: &str) -> Option<Self> {
        match value {
            "BatterySaving" => Some(Self::BatterySaving),
            "DeviceSensors" => Some(Self::DeviceSensors),
            "HighAccuracy" => Some(Self::HighAccuracy),
            _ => None,
        }
    }

    /// Whether network-side settings (`wifiActiveScan`, `httpTimeOut`)
    /// have any effect in this mode.
    pub fn uses_network(&self) -> bool {
        !matches!(self, Self::DeviceSensors)
    }

    /// Whether mock locations can be honored in this mode.
    pub fn allows_mock(&self) -> bool {
        !matches!(self, Self::BatterySaving)
    }
}

impl fmt::Display for LocationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BatterySaving => write!(f, "BatterySaving"),
            Self::DeviceSensors => write!(f, "DeviceSensors"),
            Self::HighAccuracy => write!(f, "HighAccuracy"),
            Self::ProviderDefault => write!(f, "ProviderDefault"),
        }
    }
}

/// Transport used by the engine for network positioning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum LocationProtocol {
    Http,
    Https,
    #[default]
    ProviderDefault,
}

impl LocationProtocol {
    /// Parse `"http"` / `"https"`; anything else is `None`.
    pub fn from_option(value: &str) -> Option<Self> {
        match value {
            "http" => Some(Self::Http),
            "https" => Some(Self::Https),
            _ => None,
        }
    }
}

impl fmt::Display for LocationProtocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Http => write!(f, "http"),
            Self::Https => write!(f, "https"),
            Self::ProviderDefault => write!(f, "ProviderDefault"),
        }
    }
}

/// Location request configuration.
///
/// `Default` is the engine's own configuration: every field holds the value
/// the engine would apply if nobody touched it. `Option<bool>` fields are
/// left entirely to the engine when `None`.
///
/// The "no effect in mode X" notes are engine behavior. The config stores
/// what the caller asked for regardless of mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationRequestConfig {
    /// Power/accuracy tradeoff.
    pub mode: LocationMode,

    /// Reverse-geocode each fix into an address.
    pub need_address: Option<bool>,

    /// Single fix instead of continuous updates.
    pub once_location: bool,

    /// In single-fix mode, return the best fix from a short recent window.
    pub once_location_latest: bool,

    /// Force a Wi-Fi scan before each fix. No effect in `DeviceSensors`.
    pub wifi_active_scan: Option<bool>,

    /// Accept mock locations. No effect in `BatterySaving`.
    pub mock_enable: bool,

    /// Fix cadence in continuous mode.
    pub interval_ms: u64,

    /// Network timeout. No effect in `DeviceSensors`.
    pub http_timeout_ms: u64,

    /// Network transport.
    pub protocol: LocationProtocol,

    /// Allow the engine to answer from its own fix cache.
    pub location_cache_enable: Option<bool>,
}

impl Default for LocationRequestConfig {
    fn default() -> Self {
        Self {
            mode: LocationMode::ProviderDefault,
            need_address: None,
            once_location: false,
            once_location_latest: false,
            wifi_active_scan: None,
            mock_enable: false,
            interval_ms: DEFAULT_INTERVAL_MS,
            http_timeout_ms: DEFAULT_HTTP_TIMEOUT_MS,
            protocol: LocationProtocol::ProviderDefault,
            location_cache_enable: None,
        }
    }
}

impl LocationRequestConfig {
    /// Whether the engine will reverse-geocode (engine default: yes).
    pub fn effective_need_address(&self) -> bool {
        self.need_address.unwrap_or(true)
    }

    /// Whether the engine will force Wi-Fi scans (engine default: yes).
    pub fn effective_wifi_active_scan(&self) -> bool {
        self.wifi_active_scan.unwrap_or(true)
    }

    /// Whether the engine may serve cached fixes (engine default: yes).
    pub fn effective_location_cache_enable(&self) -> bool {
        self.location_cache_enable.unwrap_or(true)
    }

    /// Whether this request produces a stream of fixes.
    pub fn is_continuous(&self) -> bool {
        !self.once_location
    }
}
