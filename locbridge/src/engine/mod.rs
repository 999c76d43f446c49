//! Native location engine collaborator.
//!
//! The engine is a black box: it takes a [`LocationRequestConfig`], runs the
//! actual positioning, and reports fixes or errors through the
//! [`LocationListener`] it was handed at client creation.
//!
//! - [`LocationEngine`] - factory for per-session clients
//! - [`LocationClient`] - one session's command interface
//! - [`SimulatedEngine`] - in-process engine replaying recorded callbacks

mod error;
mod simulated;

pub use error::EngineError;
pub use simulated::{SimulatedClient, SimulatedEngine};

use crate::options::LocationRequestConfig;
use crate::session::LocationListener;

/// Command interface of one native session.
///
/// Commands are fire-and-forget: they return once the engine accepted them,
/// and results arrive later through the listener.
pub trait LocationClient: Send + 'static {
    /// Apply the request configuration. Called before `start_location`.
    fn set_location_option(&mut self, option: &LocationRequestConfig) -> Result<(), EngineError>;

    /// Begin producing callbacks.
    fn start_location(&mut self) -> Result<(), EngineError>;

    /// Stop producing callbacks. The client may be started again.
    fn stop_location(&mut self) -> Result<(), EngineError>;

    /// Release native resources. The client is unusable afterwards.
    fn on_destroy(&mut self) -> Result<(), EngineError>;
}

/// Factory for native sessions.
pub trait LocationEngine: Send + Sync + 'static {
    type Client: LocationClient;

    /// Create a client that reports to `listener`.
    fn create_client(&self, listener: LocationListener) -> Result<Self::Client, EngineError>;
}

impl<E: LocationEngine> LocationEngine for std::sync::Arc<E> {
    type Client = E::Client;

    fn create_client(&self, listener: LocationListener) -> Result<Self::Client, EngineError> {
        (**self).create_client(listener)
    }
}
