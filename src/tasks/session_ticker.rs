//! Session ticker background task

use std::{sync::Arc, time::Duration};
use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};
use tracing::{debug, error, info, trace};

use crate::state::{AppState, SessionStatus, TICK_STEP_MILLIS};

/// Interval armed for one particular timer generation
struct ArmedTicker {
    generation: u64,
    interval: Interval,
}

impl ArmedTicker {
    fn new(generation: u64) -> Self {
        let step = Duration::from_millis(TICK_STEP_MILLIS);
        let mut interval = interval_at(Instant::now() + step, step);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        Self { generation, interval }
    }
}

/// Bring the armed interval in line with the latest status.
///
/// A running timer gets an interval tagged with its generation; a new
/// generation replaces the interval, and a stopped timer drops it.
fn reconcile(armed: &mut Option<ArmedTicker>, status: &SessionStatus) {
    if !status.timer.running {
        if armed.take().is_some() {
            debug!("Session stopped, cancelling ticker");
        }
        return;
    }

    match armed {
        Some(ticker) if ticker.generation == status.generation => {}
        _ => {
            debug!("Arming ticker for {} timer (generation {})", status.phase, status.generation);
            *armed = Some(ArmedTicker::new(status.generation));
        }
    }
}

/// Background task that feeds fixed-step ticks to the running session timer
pub async fn session_ticker_task(state: Arc<AppState>) {
    info!("Starting session ticker task");

    let mut status_rx = state.status_tx.subscribe();
    let mut armed: Option<ArmedTicker> = None;

    loop {
        let status = status_rx.borrow_and_update().clone();
        reconcile(&mut armed, &status);

        let Some(ticker) = armed.as_mut() else {
            // Nothing running, wait for a command to start the session
            if status_rx.changed().await.is_err() {
                break;
            }
            continue;
        };
        let generation = ticker.generation;

        let woke_by_tick = tokio::select! {
            _ = ticker.interval.tick() => true,
            changed = status_rx.changed() => {
                if changed.is_err() {
                    break;
                }
                false
            }
        };

        if woke_by_tick {
            match state.tick(generation) {
                Ok(Some(status)) => {
                    trace!("{} tick: {}ms left", status.phase, status.timer.remaining_millis);
                }
                Ok(None) => {}
                Err(e) => {
                    error!("Failed to deliver tick, stopping ticker: {}", e);
                    break;
                }
            }
        }
    }

    info!("Session ticker task stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{Phase, Settings};

    fn spawn_session(speech: u64, discussion: u64) -> Arc<AppState> {
        let state = Arc::new(
            AppState::new(0, "127.0.0.1".to_string(), Settings::new(speech, discussion).unwrap())
                .unwrap(),
        );
        tokio::spawn(session_ticker_task(Arc::clone(&state)));
        state
    }

    async fn sleep_ms(millis: u64) {
        tokio::time::sleep(Duration::from_millis(millis)).await;
    }

    #[tokio::test(start_paused = true)]
    async fn one_second_phases_cycle_back_to_stopped() {
        let state = spawn_session(1, 1);
        state.toggle().unwrap();

        sleep_ms(1010).await;
        let status = state.get_status().unwrap();
        assert_eq!(status.phase, Phase::Discussion);
        assert!(status.timer.running);
        assert_eq!(status.timer.remaining_millis, 1000);

        sleep_ms(1000).await;
        let status = state.get_status().unwrap();
        assert_eq!(status.phase, Phase::Stopped);
        assert!(!status.timer.running);
        assert_eq!(status.timer.remaining_millis, 1000);
    }

    #[tokio::test(start_paused = true)]
    async fn ticks_arrive_every_step() {
        let state = spawn_session(10, 5);
        state.toggle().unwrap();

        sleep_ms(525).await;
        let status = state.get_status().unwrap();
        assert_eq!(status.phase, Phase::Speech);
        assert_eq!(status.timer.remaining_millis, 9500);
    }

    #[tokio::test(start_paused = true)]
    async fn toggle_stop_cancels_ticks() {
        let state = spawn_session(10, 5);
        state.toggle().unwrap();
        sleep_ms(210).await;

        state.toggle().unwrap();
        sleep_ms(1000).await;

        let status = state.get_status().unwrap();
        assert_eq!(status.phase, Phase::Stopped);
        assert_eq!(status.timer.remaining_millis, 10_000);
    }

    #[tokio::test(start_paused = true)]
    async fn restart_after_reset_counts_from_full_time() {
        let state = spawn_session(10, 5);
        state.toggle().unwrap();
        sleep_ms(510).await;
        state.set_speech_duration(20).unwrap();

        state.toggle().unwrap();
        sleep_ms(110).await;
        let status = state.get_status().unwrap();
        assert_eq!(status.phase, Phase::Speech);
        assert_eq!(status.timer.remaining_millis, 19_900);
    }

    #[tokio::test(start_paused = true)]
    async fn idle_session_never_ticks() {
        let state = spawn_session(1, 1);
        sleep_ms(5000).await;

        let status = state.get_status().unwrap();
        assert_eq!(status.phase, Phase::Stopped);
        assert_eq!(status.timer.remaining_millis, 1000);
    }
}
