//! Normalized event payload delivered to the caller.
//!
//! Serialized as one flat key/value map, e.g.
//!
//! ```text
//! {"errorCode": 5, "errorInfo": "timeout"}
//! {"locationType": 1, "latitude": 31.2, "longitude": 121.5, "accuracy": 10.0, ...}
//! ```

use serde::Serialize;
use serde_json::{Map, Value};

/// Event name every location payload is emitted under.
pub const ON_LOCATION_CHANGED_EVENT: &str = "onLocationChangedEvent";

/// Number of fields in [`LocationDetail`].
pub const DETAIL_FIELD_COUNT: usize = 17;

/// Error variant payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationError {
    pub error_code: i32,
    pub error_info: String,
}

/// Extended fix metadata, emitted only in detail mode.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationDetail {
    pub accuracy: f64,
    pub altitude: f64,
    pub speed: f64,
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
    pub gps_status: i32,
    pub location_detail: String,
}

/// Fix variant payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationFix {
    pub location_type: i32,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(flatten)]
    pub detail: Option<LocationDetail>,
}

/// A normalized location event.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum LocationEvent {
    Error(LocationError),
    Fix(LocationFix),
}

impl LocationEvent {
    /// Whether this is the error variant.
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    /// Flat key/value payload as handed to the event transport.
    pub fn to_payload(&self) -> Map<String, Value> {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        }
    }
}
