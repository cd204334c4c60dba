//! State management module
//!
//! This module contains the countdown timer, the session phase state machine
//! and the shared application state that wraps them.

pub mod app_state;
pub mod countdown;
pub mod phase;
pub mod session;

// Re-export main types
pub use app_state::AppState;
pub use countdown::{CountdownTimer, Remaining, TimerSnapshot, TICK_STEP_MILLIS};
pub use phase::{Phase, Settings, SettingsUpdate};
pub use session::{SessionController, SessionEvent, SessionObserver, SessionStatus};
