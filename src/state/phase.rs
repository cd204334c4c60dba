//! Session phase and duration settings

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TimerError;

/// Which part of the session is currently counting down
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Stopped,
    Speech,
    Discussion,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Stopped => "stopped",
            Phase::Speech => "speech",
            Phase::Discussion => "discussion",
        }
    }

    /// Whether a timer is counting down in this phase
    pub fn is_active(&self) -> bool {
        !matches!(self, Phase::Stopped)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Speech and discussion lengths, in whole seconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    pub speech_seconds: u64,
    pub discussion_seconds: u64,
}

impl Settings {
    /// Build validated settings
    pub fn new(speech_seconds: u64, discussion_seconds: u64) -> Result<Self, TimerError> {
        let settings = Self {
            speech_seconds,
            discussion_seconds,
        };
        settings.validate()?;
        Ok(settings)
    }

    /// Reject durations shorter than one second or too long to count in milliseconds
    pub fn validate(&self) -> Result<(), TimerError> {
        validate_duration("speech", self.speech_seconds)?;
        validate_duration("discussion", self.discussion_seconds)
    }

    /// Duration used for the timer of the given phase
    pub fn seconds_for(&self, phase: Phase) -> u64 {
        match phase {
            Phase::Discussion => self.discussion_seconds,
            Phase::Stopped | Phase::Speech => self.speech_seconds,
        }
    }
}

/// Partial settings change; missing fields keep their current value
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingsUpdate {
    #[serde(default)]
    pub speech_seconds: Option<u64>,
    #[serde(default)]
    pub discussion_seconds: Option<u64>,
}

impl SettingsUpdate {
    /// Merge onto `current`, validating the result
    pub fn apply_to(&self, current: Settings) -> Result<Settings, TimerError> {
        Settings::new(
            self.speech_seconds.unwrap_or(current.speech_seconds),
            self.discussion_seconds.unwrap_or(current.discussion_seconds),
        )
    }

    pub fn is_empty(&self) -> bool {
        self.speech_seconds.is_none() && self.discussion_seconds.is_none()
    }
}

pub(crate) fn validate_duration(setting: &'static str, seconds: u64) -> Result<(), TimerError> {
    if seconds == 0 {
        return Err(TimerError::InvalidDuration { setting, seconds });
    }
    if seconds.checked_mul(1000).is_none() {
        return Err(TimerError::DurationOverflow { seconds });
    }
    Ok(())
}
