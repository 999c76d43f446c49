//! Request Builder: caller options → typed location request.
//!
//! - [`request`] - `LocationRequestConfig` and its enums
//! - [`table`] - declarative table of recognized option keys
//! - [`builder`] - `build()`, the single pure mapping function

mod builder;
mod request;
mod table;

pub use builder::build;
pub use request::{
    LocationMode, LocationProtocol, LocationRequestConfig, DEFAULT_HTTP_TIMEOUT_MS,
    DEFAULT_INTERVAL_MS,
};
pub use table::{lookup, option_fields, ApplyOutcome, OptionField, OptionKind};
