use std::fmt;

/// Rejected state transitions. These never mutate the state they were
/// issued against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateError {
    /// A run is active; starting another one is not allowed.
    AlreadyRunning,
    /// The requested transition is not valid from the current state.
    InvalidTransition,
}

impl fmt::Display for StateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StateError::AlreadyRunning => write!(f, "a job is already running"),
            StateError::InvalidTransition => write!(f, "invalid state transition"),
        }
    }
}

impl std::error::Error for StateError {}
