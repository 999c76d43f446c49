//! Raw callback payload produced by the native engine.

use serde::{Deserialize, Serialize};

/// One engine callback: either an error or a fix.
///
/// Field defaults are the engine's "unknown" values (zero / empty string),
/// so a sparse JSON record deserializes into a complete payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawLocation {
    /// Engine error code; `0` means success.
    pub error_code: i32,
    /// Engine error description; only meaningful when `error_code > 0`.
    pub error_info: String,

    /// Engine-specific positioning source (GPS, Wi-Fi, cell, cache, ...).
    pub location_type: i32,
    pub latitude: f64,
    pub longitude: f64,

    /// Horizontal accuracy in meters.
    pub accuracy: f64,
    /// Altitude in meters (GPS only).
    pub altitude: f64,
    /// Speed in m/s (GPS only).
    pub speed: f64,
    /// Bearing in degrees (GPS only).
    pub bearing: f64,

    pub address: String,
    pub ad_code: String,
    pub country: String,
    pub province: String,
    pub poi_name: String,
    pub aoi_name: String,
    pub street: String,
    pub street_num: String,
    pub city: String,
    pub city_code: String,
    pub district: String,

    /// GPS signal quality as reported by the engine.
    pub gps_accuracy_status: i32,
    /// Free-form diagnostic text from the engine.
    pub location_detail: String,
}

impl RawLocation {
    /// A successful fix with only the base fields set.
    pub fn fix(location_type: i32, latitude: f64, longitude: f64) -> Self {
        Self {
            location_type,
            latitude,
            longitude,
            ..Self::default()
        }
    }

    /// An error callback.
    pub fn error(error_code: i32, error_info: impl Into<String>) -> Self {
        Self {
            error_code,
            error_info: error_info.into(),
            ..Self::default()
        }
    }

    /// Whether this callback reports a failure.
    pub fn is_error(&self) -> bool {
        self.error_code > 0
    }
}
