//! Engine error types.

use thiserror::Error;

/// Errors reported by a native location engine.
///
/// These never reach the caller of the command surface; the session
/// controller logs them and keeps its state consistent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// The engine could not create a client for a new session.
    #[error("Failed to create location client: {0}")]
    ClientCreation(String),

    /// A start/stop/option command was rejected.
    #[error("Location command '{command}' failed: {reason}")]
    Command {
        command: &'static str,
        reason: String,
    },

    /// The client has already released its native resources.
    #[error("Location client has been destroyed")]
    Destroyed,
}
