//! Presentation model for a session status
//!
//! Pure functions that turn a [`SessionStatus`] into what a renderer shows:
//! the `MM:SS` clock, the start/stop button label, the progress bar and the
//! phase indicator. Nothing here touches a terminal or a browser.

use serde::{Deserialize, Serialize};

use crate::state::{Phase, SessionStatus, TimerSnapshot};

/// Elapsed percentage from which the progress bar turns red
pub const WARNING_THRESHOLD_PERCENT: f64 = 90.0;

const BAR_CELLS: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BarColor {
    Blue,
    Green,
    Red,
}

/// Progress bar filling up as time elapses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressBar {
    /// Elapsed share of the phase, 0.00 to 100.00
    pub width_percent: f64,
    /// `None` while no timer is running
    pub color: Option<BarColor>,
}

/// Which phase label is visible; exactly one flag is set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseIndicator {
    pub stopped: bool,
    pub speech: bool,
    pub discussion: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewModel {
    pub phase: Phase,
    pub clock: String,
    pub button_label: String,
    pub progress: ProgressBar,
    pub indicator: PhaseIndicator,
}

impl ViewModel {
    pub fn new(phase: Phase, timer: &TimerSnapshot) -> Self {
        Self {
            phase,
            clock: clock_text(timer),
            button_label: button_label(timer).to_string(),
            progress: progress_bar(timer, phase),
            indicator: phase_indicator(phase),
        }
    }

    pub fn from_status(status: &SessionStatus) -> Self {
        Self::new(status.phase, &status.timer)
    }
}

/// Zero-padded `MM:SS`
pub fn clock_text(timer: &TimerSnapshot) -> String {
    format!("{:02}:{:02}", timer.minutes, timer.seconds)
}

pub fn button_label(timer: &TimerSnapshot) -> &'static str {
    if timer.running {
        "stop"
    } else {
        "start"
    }
}

pub fn progress_bar(timer: &TimerSnapshot, phase: Phase) -> ProgressBar {
    if !timer.running {
        return ProgressBar {
            width_percent: 0.0,
            color: None,
        };
    }

    let width_percent = round_hundredths((1.0 - timer.progress) * 100.0);
    let color = if width_percent >= WARNING_THRESHOLD_PERCENT {
        BarColor::Red
    } else if phase == Phase::Speech {
        BarColor::Blue
    } else {
        BarColor::Green
    };

    ProgressBar {
        width_percent,
        color: Some(color),
    }
}

pub fn phase_indicator(phase: Phase) -> PhaseIndicator {
    PhaseIndicator {
        stopped: phase == Phase::Stopped,
        speech: phase == Phase::Speech,
        discussion: phase == Phase::Discussion,
    }
}

/// One-line textual rendering, e.g. `[speech] 04:12 [####----------------] 21.33% stop`
pub fn render_line(phase: Phase, timer: &TimerSnapshot) -> String {
    let view = ViewModel::new(phase, timer);
    let filled = ((view.progress.width_percent / 100.0) * BAR_CELLS as f64).round() as usize;
    let filled = filled.min(BAR_CELLS);

    format!(
        "[{}] {} [{}{}] {:.2}% {}",
        view.phase,
        view.clock,
        "#".repeat(filled),
        "-".repeat(BAR_CELLS - filled),
        view.progress.width_percent,
        view.button_label,
    )
}

fn round_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{CountdownTimer, Settings};

    fn snapshot(limit_seconds: u64, ticks: usize) -> TimerSnapshot {
        let mut timer = CountdownTimer::new(limit_seconds).unwrap();
        timer.start();
        for _ in 0..ticks {
            timer.tick().unwrap();
        }
        timer.snapshot()
    }

    fn status(phase: Phase, timer: TimerSnapshot) -> SessionStatus {
        SessionStatus {
            phase,
            settings: Settings::new(300, 120).unwrap(),
            generation: 0,
            timer,
        }
    }

    #[test]
    fn clock_is_zero_padded() {
        let timer = CountdownTimer::new(305).unwrap().snapshot();
        assert_eq!(clock_text(&timer), "05:05");

        let timer = CountdownTimer::new(6000).unwrap().snapshot();
        assert_eq!(clock_text(&timer), "100:00");
    }

    #[test]
    fn clock_truncates_partial_seconds() {
        // 59.95s left shows as 00:59
        assert_eq!(clock_text(&snapshot(60, 1)), "00:59");
    }

    #[test]
    fn idle_bar_is_empty() {
        let timer = CountdownTimer::new(10).unwrap().snapshot();
        let bar = progress_bar(&timer, Phase::Stopped);
        assert_eq!(bar, ProgressBar { width_percent: 0.0, color: None });
        assert_eq!(button_label(&timer), "start");
    }

    #[test]
    fn bar_color_follows_phase_until_threshold() {
        // 1s timer: 17 ticks = 85% elapsed, 18 ticks = 90%
        let speech = progress_bar(&snapshot(1, 17), Phase::Speech);
        assert_eq!(speech.width_percent, 85.0);
        assert_eq!(speech.color, Some(BarColor::Blue));

        let discussion = progress_bar(&snapshot(1, 17), Phase::Discussion);
        assert_eq!(discussion.color, Some(BarColor::Green));

        let late = progress_bar(&snapshot(1, 18), Phase::Speech);
        assert_eq!(late.width_percent, 90.0);
        assert_eq!(late.color, Some(BarColor::Red));
    }

    #[test]
    fn bar_stays_phase_colored_just_below_threshold() {
        // 500s timer: 8999 ticks = 449.95s elapsed = 89.99%
        let bar = progress_bar(&snapshot(500, 8999), Phase::Speech);
        assert_eq!(bar.width_percent, 89.99);
        assert_eq!(bar.color, Some(BarColor::Blue));

        let bar = progress_bar(&snapshot(500, 9000), Phase::Discussion);
        assert_eq!(bar.width_percent, 90.0);
        assert_eq!(bar.color, Some(BarColor::Red));
    }

    #[test]
    fn width_is_rounded_to_hundredths() {
        // 3s timer after one tick: 50/3000 elapsed = 1.666..%
        let bar = progress_bar(&snapshot(3, 1), Phase::Speech);
        assert_eq!(bar.width_percent, 1.67);
    }

    #[test]
    fn view_model_from_status() {
        let view = ViewModel::from_status(&status(Phase::Discussion, snapshot(2, 4)));
        assert_eq!(view.clock, "00:01");
        assert_eq!(view.button_label, "stop");
        assert_eq!(view.progress.width_percent, 10.0);
        assert_eq!(view.progress.color, Some(BarColor::Green));
        assert!(view.indicator.discussion);

        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["phase"], "discussion");
        assert_eq!(json["progress"]["color"], "green");
    }

    #[test]
    fn indicator_shows_exactly_one_phase() {
        let indicator = phase_indicator(Phase::Discussion);
        assert!(indicator.discussion);
        assert!(!indicator.speech);
        assert!(!indicator.stopped);
    }

    #[test]
    fn render_line_for_running_speech() {
        let line = render_line(Phase::Speech, &snapshot(10, 50));
        assert_eq!(line, "[speech] 00:07 [#####---------------] 25.00% stop");
    }

    #[test]
    fn render_line_for_stopped_session() {
        let line = render_line(Phase::Stopped, &CountdownTimer::new(300).unwrap().snapshot());
        assert_eq!(line, "[stopped] 05:00 [--------------------] 0.00% start");
    }
}
