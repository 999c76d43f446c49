//! Session lifecycle state.

use std::fmt;

/// State of the controller's single session.
///
/// ```text
/// Idle --start--> Active --stop--> Stopped --start--> Active
/// Active/Stopped --destroy--> Destroyed
/// any --host destroy--> Destroyed
/// ```
///
/// `Destroyed` is terminal for the bound session; a later start creates a
/// fresh one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    /// No session has been started.
    #[default]
    Idle,
    /// The engine is producing callbacks.
    Active,
    /// The session exists but the engine was asked to halt.
    Stopped,
    /// Native resources were released.
    Destroyed,
}

impl SessionState {
    /// Whether callbacks are expected in this state.
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active)
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "Idle"),
            Self::Active => write!(f, "Active"),
            Self::Stopped => write!(f, "Stopped"),
            Self::Destroyed => write!(f, "Destroyed"),
        }
    }
}
