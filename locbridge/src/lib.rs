//! locbridge - event-based bridge to a native location engine.
//!
//! A scripted caller hands over a loosely-typed options object; this crate
//! turns it into a typed request, runs one location session against the
//! engine, and delivers every engine callback as a flat, normalized event
//! named `onLocationChangedEvent`.
//!
//! ```text
//! options ──► options::build ──► LocationModule ──► LocationEngine
//!                                     ▲                   │
//!                                     │             RawLocation callbacks
//!                                     │                   ▼
//!                           EventSink ◄── normalize ◄── LocationListener
//! ```
//!
//! # Modules
//!
//! - [`options`] - Request Builder
//! - [`session`] - Session Controller and host lifecycle
//! - [`event`] - Event Normalizer and sinks
//! - [`engine`] - native engine traits and a simulated engine
//! - [`config`] - module settings and INI config file
//! - [`logging`] - tracing subscriber setup

pub mod config;
pub mod engine;
pub mod event;
pub mod logging;
pub mod options;
pub mod session;

pub use event::{LocationEvent, ON_LOCATION_CHANGED_EVENT};
pub use options::{build, LocationRequestConfig};
pub use session::{LocationModule, SessionState};
