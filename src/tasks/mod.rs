//! Background tasks module
//!
//! This module contains background tasks that run alongside the HTTP server.

pub mod phase_logger;
pub mod session_ticker;

// Re-export main functions
pub use phase_logger::phase_logger_task;
pub use session_ticker::session_ticker_task;
