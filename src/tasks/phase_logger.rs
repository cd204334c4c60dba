//! Console rendering of session events

use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tracing::{info, trace};

use crate::{
    state::{AppState, SessionEvent},
    view::render_line,
};

/// Background task that logs every phase change as a rendered status line
pub async fn phase_logger_task(state: Arc<AppState>) {
    info!("Starting phase logger task");

    let mut events = state.subscribe_events();

    loop {
        match events.recv().await {
            Ok(SessionEvent::PhaseChanged { phase, timer }) => {
                info!("{}", render_line(phase, &timer));
            }
            Ok(SessionEvent::Tick { phase, timer }) => {
                trace!("{} {:02}:{:02}.{:03}", phase, timer.minutes, timer.seconds, timer.milliseconds);
            }
            Err(RecvError::Lagged(skipped)) => {
                trace!("Phase logger skipped {} events", skipped);
            }
            Err(RecvError::Closed) => break,
        }
    }
}
