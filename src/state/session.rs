//! Session controller: the speech/discussion phase state machine

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::{debug, info, trace};

use super::{
    countdown::{CountdownTimer, TimerSnapshot},
    phase::{validate_duration, Phase, Settings, SettingsUpdate},
};
use crate::error::TimerError;

/// Notification emitted by a session controller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    PhaseChanged { phase: Phase, timer: TimerSnapshot },
    Tick { phase: Phase, timer: TimerSnapshot },
}

impl SessionEvent {
    pub fn phase(&self) -> Phase {
        match self {
            SessionEvent::PhaseChanged { phase, .. } | SessionEvent::Tick { phase, .. } => *phase,
        }
    }

    pub fn timer(&self) -> &TimerSnapshot {
        match self {
            SessionEvent::PhaseChanged { timer, .. } | SessionEvent::Tick { timer, .. } => timer,
        }
    }
}

/// Receives phase and tick notifications from a [`SessionController`]
pub trait SessionObserver: Send {
    /// Called after every phase transition, including re-initialization
    fn on_phase_change(&self, _phase: Phase, _timer: &TimerSnapshot) {}

    /// Called after every tick, before any phase change the tick causes
    fn on_tick(&self, _phase: Phase, _timer: &TimerSnapshot) {}
}

impl SessionObserver for broadcast::Sender<SessionEvent> {
    fn on_phase_change(&self, phase: Phase, timer: &TimerSnapshot) {
        if self
            .send(SessionEvent::PhaseChanged { phase, timer: timer.clone() })
            .is_err()
        {
            trace!("No event subscribers for phase change");
        }
    }

    fn on_tick(&self, phase: Phase, timer: &TimerSnapshot) {
        if self
            .send(SessionEvent::Tick { phase, timer: timer.clone() })
            .is_err()
        {
            trace!("No event subscribers for tick");
        }
    }
}

/// Full snapshot of a session, published after every change
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionStatus {
    pub phase: Phase,
    pub settings: Settings,
    pub generation: u64,
    pub timer: TimerSnapshot,
}

/// Drives one speech/discussion session.
///
/// The controller always holds exactly one timer. In [`Phase::Stopped`] it is
/// a fresh speech timer that has not been started; in the other phases it is
/// running. Every replacement of the timer bumps `generation`.
pub struct SessionController {
    settings: Settings,
    phase: Phase,
    timer: CountdownTimer,
    generation: u64,
    observers: Vec<Box<dyn SessionObserver>>,
}

impl SessionController {
    /// Create a controller in the stopped state with a ready speech timer
    pub fn new(settings: Settings) -> Result<Self, TimerError> {
        settings.validate()?;
        let timer = CountdownTimer::new(settings.speech_seconds)?;

        Ok(Self {
            settings,
            phase: Phase::Stopped,
            timer,
            generation: 0,
            observers: Vec::new(),
        })
    }

    /// Register an observer for phase and tick notifications
    pub fn subscribe(&mut self, observer: Box<dyn SessionObserver>) {
        self.observers.push(observer);
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn settings(&self) -> Settings {
        self.settings
    }

    pub fn timer(&self) -> &CountdownTimer {
        &self.timer
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_running(&self) -> bool {
        self.timer.is_started()
    }

    pub fn status(&self) -> SessionStatus {
        SessionStatus {
            phase: self.phase,
            settings: self.settings,
            generation: self.generation,
            timer: self.timer.snapshot(),
        }
    }

    /// Tear down the current timer and re-arm a fresh speech timer
    pub fn initialize(&mut self) -> Result<(), TimerError> {
        let timer = CountdownTimer::new(self.settings.seconds_for(Phase::Speech))?;
        self.replace_timer(timer);
        self.phase = Phase::Stopped;

        debug!(
            "Session initialized: speech={}s discussion={}s",
            self.settings.speech_seconds, self.settings.discussion_seconds
        );
        self.notify_phase_change();
        Ok(())
    }

    /// Start the speech phase. Returns false when a phase is already running.
    pub fn start(&mut self) -> bool {
        if self.phase != Phase::Stopped {
            debug!("Ignoring start while in {} phase", self.phase);
            return false;
        }
        if !self.timer.start() {
            return false;
        }

        self.phase = Phase::Speech;
        info!("Speech phase started ({}s)", self.settings.speech_seconds);
        self.notify_phase_change();
        true
    }

    /// Start when idle, otherwise stop and re-arm
    pub fn toggle(&mut self) -> Result<Phase, TimerError> {
        if self.timer.is_started() {
            info!("Stopping {} phase", self.phase);
            self.initialize()?;
        } else {
            self.start();
        }
        Ok(self.phase)
    }

    /// Change the speech length; always resets the session
    pub fn set_speech_duration(&mut self, seconds: u64) -> Result<(), TimerError> {
        validate_duration("speech", seconds)?;
        self.settings.speech_seconds = seconds;
        info!("Speech duration set to {}s", seconds);
        self.initialize()
    }

    /// Change the discussion length; always resets the session
    pub fn set_discussion_duration(&mut self, seconds: u64) -> Result<(), TimerError> {
        validate_duration("discussion", seconds)?;
        self.settings.discussion_seconds = seconds;
        info!("Discussion duration set to {}s", seconds);
        self.initialize()
    }

    /// Apply several setting changes with a single reset.
    /// An invalid value rejects the whole update and leaves the session untouched.
    pub fn update_settings(&mut self, update: SettingsUpdate) -> Result<(), TimerError> {
        let settings = update.apply_to(self.settings)?;
        self.settings = settings;
        info!(
            "Settings updated: speech={}s discussion={}s",
            settings.speech_seconds, settings.discussion_seconds
        );
        self.initialize()
    }

    /// Deliver one tick to the running timer and handle its expiry
    pub fn tick(&mut self) -> Result<TimerSnapshot, TimerError> {
        let snapshot = self.timer.tick()?;
        for observer in &self.observers {
            observer.on_tick(self.phase, &snapshot);
        }

        if snapshot.is_expired() {
            self.on_expiry()?;
        }
        Ok(snapshot)
    }

    fn on_expiry(&mut self) -> Result<(), TimerError> {
        match self.phase {
            Phase::Speech => {
                let mut timer = CountdownTimer::new(self.settings.seconds_for(Phase::Discussion))?;
                timer.start();
                self.replace_timer(timer);
                self.phase = Phase::Discussion;
                info!("Speech time is up, discussion phase started ({}s)", self.settings.discussion_seconds);
                self.notify_phase_change();
                Ok(())
            }
            Phase::Discussion => {
                info!("Discussion time is up, re-arming for the next speaker");
                self.initialize()
            }
            // A stopped session never holds a running timer, so it cannot expire.
            Phase::Stopped => Err(TimerError::TickWhileStopped),
        }
    }

    fn replace_timer(&mut self, timer: CountdownTimer) {
        self.timer.stop();
        self.timer = timer;
        self.generation += 1;
    }

    fn notify_phase_change(&self) {
        let snapshot = self.timer.snapshot();
        for observer in &self.observers {
            observer.on_phase_change(self.phase, &snapshot);
        }
    }
}

impl std::fmt::Debug for SessionController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionController")
            .field("settings", &self.settings)
            .field("phase", &self.phase)
            .field("timer", &self.timer)
            .field("generation", &self.generation)
            .field("observers", &self.observers.len())
            .finish()
    }
}
