use std::{sync::Arc, time::Duration};

use speech_timer::{
    state::{AppState, Phase, SessionEvent, Settings},
    tasks::session_ticker_task,
};
use tokio::sync::broadcast::error::TryRecvError;

fn spawn_session(speech: u64, discussion: u64) -> Arc<AppState> {
    let state = Arc::new(
        AppState::new(0, "127.0.0.1".to_string(), Settings::new(speech, discussion).unwrap())
            .unwrap(),
    );
    tokio::spawn(session_ticker_task(Arc::clone(&state)));
    state
}

fn drain(rx: &mut tokio::sync::broadcast::Receiver<SessionEvent>) -> Vec<SessionEvent> {
    let mut events = Vec::new();
    loop {
        match rx.try_recv() {
            Ok(event) => events.push(event),
            Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
            Err(TryRecvError::Lagged(n)) => panic!("lagged by {n} events"),
        }
    }
    events
}

#[tokio::test(start_paused = true)]
async fn full_cycle_emits_ordered_events() {
    let state = spawn_session(1, 1);
    let mut rx = state.subscribe_events();

    state.toggle().unwrap();
    tokio::time::sleep(Duration::from_millis(2010)).await;

    let events = drain(&mut rx);
    let phases: Vec<Phase> = events
        .iter()
        .filter(|e| matches!(e, SessionEvent::PhaseChanged { .. }))
        .map(SessionEvent::phase)
        .collect();
    assert_eq!(phases, vec![Phase::Speech, Phase::Discussion, Phase::Stopped]);

    let speech_ticks: Vec<u64> = events
        .iter()
        .filter(|e| matches!(e, SessionEvent::Tick { phase: Phase::Speech, .. }))
        .map(|e| e.timer().remaining_millis)
        .collect();
    assert_eq!(speech_ticks.len(), 20);
    assert!(speech_ticks.windows(2).all(|w| w[1] < w[0]));
    assert_eq!(speech_ticks.last(), Some(&0));

    let discussion_ticks = events
        .iter()
        .filter(|e| matches!(e, SessionEvent::Tick { phase: Phase::Discussion, .. }))
        .count();
    assert_eq!(discussion_ticks, 20);

    // Re-armed, not running, full speech time on the clock.
    let status = state.get_status().unwrap();
    assert_eq!(status.phase, Phase::Stopped);
    assert!(!status.timer.running);
    assert_eq!(status.timer.remaining_millis, 1000);
    assert_eq!(status.timer.progress, 1.0);
}

#[tokio::test(start_paused = true)]
async fn no_ticks_after_stop() {
    let state = spawn_session(5, 5);
    state.toggle().unwrap();
    tokio::time::sleep(Duration::from_millis(260)).await;

    let mut rx = state.subscribe_events();
    state.toggle().unwrap();
    tokio::time::sleep(Duration::from_millis(1000)).await;

    let events = drain(&mut rx);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].phase(), Phase::Stopped);
    assert_eq!(events[0].timer().remaining_millis, 5000);
}

#[tokio::test(start_paused = true)]
async fn longer_speech_setting_is_used_on_next_start() {
    let state = spawn_session(1, 1);
    state.set_speech_duration(2).unwrap();
    state.toggle().unwrap();

    tokio::time::sleep(Duration::from_millis(1510)).await;
    let status = state.get_status().unwrap();
    assert_eq!(status.phase, Phase::Speech);
    assert_eq!(status.timer.remaining_millis, 500);
}
