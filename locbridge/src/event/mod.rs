//! Event Normalizer and event transport.
//!
//! - [`raw`] - `RawLocation`, the engine's callback payload
//! - [`model`] - `LocationEvent`, the normalized flat payload
//! - [`normalizer`] - `normalize()` and the detail-mode holder
//! - [`sink`] - `EventSink` trait and the broadcast sink
//! - [`emitter`] - `EventEmitter`, named listeners with removable subscriptions

mod emitter;
mod model;
mod normalizer;
mod raw;
mod sink;

pub use emitter::{EventEmitter, Subscription};
pub use model::{
    LocationDetail, LocationError, LocationEvent, LocationFix, DETAIL_FIELD_COUNT,
    ON_LOCATION_CHANGED_EVENT,
};
pub use normalizer::{normalize, EventNormalizer};
pub use raw::RawLocation;
pub use sink::{BroadcastSink, EmittedEvent, EventSink, DEFAULT_EVENT_CHANNEL_CAPACITY};
