//! Raw engine callback → [`LocationEvent`].

use std::sync::atomic::{AtomicBool, Ordering};

use super::model::{LocationDetail, LocationError, LocationEvent, LocationFix};
use super::raw::RawLocation;

/// Shapes raw callbacks into events.
///
/// Holds the detail-mode flag; the session controller turns it on at every
/// start and callbacks read it from the engine's thread.
#[derive(Debug, Default)]
pub struct EventNormalizer {
    detail: AtomicBool,
}

impl EventNormalizer {
    /// Create a normalizer with detail mode off.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the extended field set is emitted.
    pub fn detail_mode(&self) -> bool {
        self.detail.load(Ordering::Acquire)
    }

    /// Switch detail mode.
    pub fn set_detail_mode(&self, enabled: bool) {
        self.detail.store(enabled, Ordering::Release);
    }

    /// Normalize with the current detail mode.
    pub fn normalize(&self, raw: &RawLocation) -> LocationEvent {
        normalize(raw, self.detail_mode())
    }
}

/// Normalize one callback.
///
/// Errors short-circuit: only `errorCode`/`errorInfo` are kept. Fixes carry
/// the three base fields plus, with `detail`, the extended set copied
/// verbatim.
pub fn normalize(raw: &RawLocation, detail: bool) -> LocationEvent {
    if raw.is_error() {
        return LocationEvent::Error(LocationError {
            error_code: raw.error_code,
            error_info: raw.error_info.clone(),
        });
    }

    LocationEvent::Fix(LocationFix {
        location_type: raw.location_type,
        latitude: raw.latitude,
        longitude: raw.longitude,
        detail: detail.then(|| LocationDetail {
            accuracy: raw.accuracy,
            altitude: raw.altitude,
            speed: raw.speed,
            bearing: raw.bearing,
            address: raw.address.clone(),
            ad_code: raw.ad_code.clone(),
            country: raw.country.clone(),
            province: raw.province.clone(),
            poi_name: raw.poi_name.clone(),
            aoi_name: raw.aoi_name.clone(),
            street: raw.street.clone(),
            street_num: raw.street_num.clone(),
            city: raw.city.clone(),
            city_code: raw.city_code.clone(),
            district: raw.district.clone(),
            gps_status: raw.gps_accuracy_status,
            location_detail: raw.location_detail.clone(),
        }),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::DETAIL_FIELD_COUNT;
    use serde_json::{json, Value};

    fn detailed_raw() -> RawLocation {
        RawLocation {
            accuracy: 10.0,
            altitude: 4.5,
            speed: 1.2,
            bearing: 270.0,
            address: "1 Century Ave".to_string(),
            ad_code: "310115".to_string(),
            country: "China".to_string(),
            province: "Shanghai".to_string(),
            poi_name: "Tower".to_string(),
            aoi_name: "Lujiazui".to_string(),
            street: "Century Ave".to_string(),
            street_num: "1".to_string(),
            city: "Shanghai".to_string(),
            city_code: "021".to_string(),
            district: "Pudong".to_string(),
            gps_accuracy_status: 1,
            location_detail: "#csid:abc".to_string(),
            ..RawLocation::fix(1, 31.2, 121.5)
        }
    }

    #[test]
    fn test_error_short_circuits() {
        let raw = RawLocation {
            latitude: 31.2,
            city: "Shanghai".to_string(),
            ..RawLocation::error(5, "timeout")
        };

        let event = normalize(&raw, true);

        assert_eq!(
            Value::Object(event.to_payload()),
            json!({ "errorCode": 5, "errorInfo": "timeout" })
        );
    }

    #[test]
    fn test_detail_mode_emits_all_fields() {
        let event = normalize(&detailed_raw(), true);
        let payload = event.to_payload();

        assert_eq!(payload.len(), 3 + DETAIL_FIELD_COUNT);
        assert_eq!(payload["bearing"], 270.0);
        assert_eq!(payload["adCode"], "310115");
        assert_eq!(payload["gpsStatus"], 1);
        assert_eq!(payload["locationDetail"], "#csid:abc");
    }

    #[test]
    fn test_without_detail_emits_base_fields() {
        let event = normalize(&detailed_raw(), false);
        let payload = event.to_payload();

        assert_eq!(payload.len(), 3);
        assert_eq!(payload["locationType"], 1);
    }

    #[test]
    fn test_normalizer_tracks_detail_flag() {
        let normalizer = EventNormalizer::new();
        assert!(!normalizer.detail_mode());
        assert_eq!(normalizer.normalize(&detailed_raw()).to_payload().len(), 3);

        normalizer.set_detail_mode(true);
        assert!(normalizer.detail_mode());
        assert_eq!(
            normalizer.normalize(&detailed_raw()).to_payload().len(),
            3 + DETAIL_FIELD_COUNT
        );
    }
}
