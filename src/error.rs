//! Error types for the timer core and the shared session state

use thiserror::Error;

/// Contract violations raised by the countdown timer and session controller
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimerError {
    /// A duration setting below one second
    #[error("{setting} duration must be at least 1 second, got {seconds}")]
    InvalidDuration { setting: &'static str, seconds: u64 },

    /// A duration whose millisecond count does not fit in a u64
    #[error("duration of {seconds} seconds is too large")]
    DurationOverflow { seconds: u64 },

    /// A tick reached a timer that is not running
    #[error("tick delivered to a stopped timer")]
    TickWhileStopped,
}

impl TimerError {
    /// Whether the error was caused by bad caller input rather than an internal fault
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            TimerError::InvalidDuration { .. } | TimerError::DurationOverflow { .. }
        )
    }
}

/// Failures of the shared application state
#[derive(Debug, Error)]
pub enum StateError {
    #[error(transparent)]
    Timer(#[from] TimerError),

    #[error("failed to lock session state: {0}")]
    LockPoisoned(String),
}

impl StateError {
    /// Whether the error was caused by bad caller input
    pub fn is_invalid_input(&self) -> bool {
        match self {
            StateError::Timer(e) => e.is_invalid_input(),
            StateError::LockPoisoned(_) => false,
        }
    }
}
