//! Countdown timer for a single session phase

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::TimerError;

/// Fixed amount of time removed from a running timer on every tick
pub const TICK_STEP_MILLIS: u64 = 50;

/// Remaining time split into display units, truncated rather than rounded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Remaining {
    pub minutes: u64,
    pub seconds: u64,
    pub milliseconds: u64,
}

impl Remaining {
    /// Decompose a millisecond count
    pub fn from_millis(millis: u64) -> Self {
        Self {
            minutes: millis / 60_000,
            seconds: (millis / 1000) % 60,
            milliseconds: millis % 1000,
        }
    }
}

/// Point-in-time view of a timer, handed to observers and renderers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimerSnapshot {
    pub minutes: u64,
    pub seconds: u64,
    pub milliseconds: u64,
    pub remaining_millis: u64,
    pub limit_millis: u64,
    pub progress: f64,
    pub running: bool,
}

impl TimerSnapshot {
    /// Whether the countdown has reached zero
    pub fn is_expired(&self) -> bool {
        self.remaining_millis == 0
    }
}

/// A single countdown. Once it reaches zero it stays stopped for good.
#[derive(Debug, Clone)]
pub struct CountdownTimer {
    limit_millis: u64,
    remaining_millis: u64,
    running: bool,
}

impl CountdownTimer {
    /// Create a stopped timer holding the full `limit_seconds`
    pub fn new(limit_seconds: u64) -> Result<Self, TimerError> {
        if limit_seconds == 0 {
            return Err(TimerError::InvalidDuration {
                setting: "timer",
                seconds: limit_seconds,
            });
        }
        let limit_millis = limit_seconds
            .checked_mul(1000)
            .ok_or(TimerError::DurationOverflow { seconds: limit_seconds })?;

        Ok(Self {
            limit_millis,
            remaining_millis: limit_millis,
            running: false,
        })
    }

    /// Start ticking. Returns false if the timer was already running or has expired.
    pub fn start(&mut self) -> bool {
        if self.running {
            debug!("Ignoring start: timer already running");
            return false;
        }
        if self.is_expired() {
            debug!("Ignoring start: timer already expired");
            return false;
        }
        self.running = true;
        true
    }

    /// Stop ticking, keeping the remaining time as is
    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Advance by one step and return the updated snapshot.
    ///
    /// The terminal tick clamps to zero and stops the timer before the
    /// snapshot is taken, so it reports `remaining == 0` with `running == false`.
    pub fn tick(&mut self) -> Result<TimerSnapshot, TimerError> {
        if !self.running {
            return Err(TimerError::TickWhileStopped);
        }

        self.remaining_millis = self.remaining_millis.saturating_sub(TICK_STEP_MILLIS);
        if self.remaining_millis == 0 {
            self.running = false;
        }

        Ok(self.snapshot())
    }

    pub fn is_started(&self) -> bool {
        self.running
    }

    pub fn is_stopped(&self) -> bool {
        !self.is_started()
    }

    pub fn is_expired(&self) -> bool {
        self.remaining_millis == 0
    }

    pub fn limit_millis(&self) -> u64 {
        self.limit_millis
    }

    pub fn remaining_millis(&self) -> u64 {
        self.remaining_millis
    }

    /// Remaining time as minutes, seconds and milliseconds
    pub fn remaining(&self) -> Remaining {
        Remaining::from_millis(self.remaining_millis)
    }

    /// Fraction of time left: 1.0 when fresh, 0.0 when expired
    pub fn progress(&self) -> f64 {
        if self.limit_millis == 0 {
            return 0.0;
        }
        self.remaining_millis as f64 / self.limit_millis as f64
    }

    pub fn snapshot(&self) -> TimerSnapshot {
        let remaining = self.remaining();
        TimerSnapshot {
            minutes: remaining.minutes,
            seconds: remaining.seconds,
            milliseconds: remaining.milliseconds,
            remaining_millis: self.remaining_millis,
            limit_millis: self.limit_millis,
            progress: self.progress(),
            running: self.running,
        }
    }
}
