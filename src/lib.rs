//! Speech Timer - a speech/discussion session timer
//!
//! A session counts down a speech interval, then automatically counts down a
//! discussion interval, and re-arms for the next speaker. The core is the
//! [`state::CountdownTimer`] and the [`state::SessionController`] phase state
//! machine; the rest is a tokio ticker, a view model and a small HTTP API.

pub mod api;
pub mod config;
pub mod error;
pub mod state;
pub mod tasks;
pub mod utils;
pub mod view;

// Re-export commonly used types
pub use api::create_router;
pub use config::Config;
pub use error::{StateError, TimerError};
pub use state::{AppState, Phase, SessionController, SessionEvent, Settings};
pub use utils::signals::shutdown_signal;
