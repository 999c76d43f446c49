//! Session Controller.
//!
//! - [`state`] - `SessionState` machine
//! - [`listener`] - `LocationListener` handed to the engine, `CallbackRouter`
//! - [`lifecycle`] - host lifecycle signals
//! - [`module`] - `LocationModule`, the command surface

mod lifecycle;
mod listener;
mod module;
mod state;

pub use lifecycle::{HostLifecycle, LifecycleListener};
pub use listener::{CallbackRouter, LocationListener};
pub use module::{LocationModule, MODULE_NAME};
pub use state::SessionState;
