//! Main application state management

use std::{
    sync::{Arc, Mutex, MutexGuard},
    time::Instant,
};
use chrono::{DateTime, Utc};
use tokio::sync::{broadcast, watch};
use tracing::{debug, info, warn};

use super::{SessionController, SessionEvent, SessionStatus, Settings, SettingsUpdate};
use crate::error::{StateError, TimerError};

/// Shared state: one session controller plus its notification channels
#[derive(Debug)]
pub struct AppState {
    /// The session state machine
    pub session: Arc<Mutex<SessionController>>,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    pub last_action: Arc<Mutex<Option<String>>>,
    pub last_action_time: Arc<Mutex<Option<DateTime<Utc>>>>,
    /// Phase changes and ticks, fed by the controller
    pub event_tx: broadcast::Sender<SessionEvent>,
    /// Latest session status, watched by the ticker task
    pub status_tx: watch::Sender<SessionStatus>,
    /// Keep the receiver alive to prevent channel closure
    pub _status_rx: watch::Receiver<SessionStatus>,
}

impl AppState {
    /// Create the state with a stopped session using `settings`
    pub fn new(port: u16, host: String, settings: Settings) -> Result<Self, TimerError> {
        let (event_tx, _) = broadcast::channel(256);

        let mut controller = SessionController::new(settings)?;
        controller.subscribe(Box::new(event_tx.clone()));
        let (status_tx, status_rx) = watch::channel(controller.status());

        Ok(Self {
            session: Arc::new(Mutex::new(controller)),
            start_time: Instant::now(),
            port,
            host,
            last_action: Arc::new(Mutex::new(None)),
            last_action_time: Arc::new(Mutex::new(None)),
            event_tx,
            status_tx,
            _status_rx: status_rx,
        })
    }

    fn lock_session(&self) -> Result<MutexGuard<'_, SessionController>, StateError> {
        self.session
            .lock()
            .map_err(|e| StateError::LockPoisoned(e.to_string()))
    }

    /// Apply a user command to the session and publish the result
    pub fn update_session<F>(&self, action: &str, updater: F) -> Result<SessionStatus, StateError>
    where
        F: FnOnce(&mut SessionController) -> Result<(), TimerError>,
    {
        let mut session = self.lock_session()?;
        updater(&mut *session)?;
        let status = session.status();
        drop(session); // Release the lock early

        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some(action.to_string());
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }

        self.publish_status(status.clone());
        Ok(status)
    }

    /// Start the speech phase, or stop and re-arm a running session
    pub fn toggle(&self) -> Result<SessionStatus, StateError> {
        let status = self.update_session("toggle", |session| session.toggle().map(|_| ()))?;
        info!("Toggle: session is now {}", status.phase);
        Ok(status)
    }

    /// Re-arm the session with the current settings
    pub fn initialize(&self) -> Result<SessionStatus, StateError> {
        self.update_session("reset", |session| session.initialize())
    }

    pub fn set_speech_duration(&self, seconds: u64) -> Result<SessionStatus, StateError> {
        self.update_session("speech-duration", |session| session.set_speech_duration(seconds))
    }

    pub fn set_discussion_duration(&self, seconds: u64) -> Result<SessionStatus, StateError> {
        self.update_session("discussion-duration", |session| {
            session.set_discussion_duration(seconds)
        })
    }

    /// Change one or both durations with a single reset
    pub fn update_settings(&self, update: SettingsUpdate) -> Result<SessionStatus, StateError> {
        self.update_session("settings", |session| session.update_settings(update))
    }

    /// Deliver a tick scheduled for timer `generation`.
    ///
    /// Returns `None` when the controller has moved on to another timer since
    /// the tick was scheduled; such a tick is dropped.
    pub fn tick(&self, generation: u64) -> Result<Option<SessionStatus>, StateError> {
        let mut session = self.lock_session()?;
        if session.generation() != generation || !session.is_running() {
            debug!(
                "Dropping stale tick for generation {} (current {})",
                generation,
                session.generation()
            );
            return Ok(None);
        }

        session.tick()?;
        let status = session.status();
        drop(session);

        self.publish_status(status.clone());
        Ok(Some(status))
    }

    /// Get the current session status
    pub fn get_status(&self) -> Result<SessionStatus, StateError> {
        Ok(self.lock_session()?.status())
    }

    /// Subscribe to phase changes and ticks
    pub fn subscribe_events(&self) -> broadcast::Receiver<SessionEvent> {
        self.event_tx.subscribe()
    }

    fn publish_status(&self, status: SessionStatus) {
        if let Err(e) = self.status_tx.send(status) {
            warn!("Failed to publish session status: {}", e);
        }
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }
}
