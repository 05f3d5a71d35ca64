//! Timer phases, button labels and status snapshots

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::machine::MachineKind;

/// Where a machine's countdown is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerPhase {
    /// Never started, or freshly reset
    Idle,
    /// Counting down; ticks are being processed
    Running,
    /// Stopped mid-count with the elapsed time frozen
    Paused,
    /// Ran out of time and raised the alarm
    Finished,
}

impl TimerPhase {
    /// Whether ticks should advance this machine
    pub fn is_ticking(self) -> bool {
        self == TimerPhase::Running
    }
}

/// Action the start button performs when pressed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StartButton {
    Start,
    Restart,
    Reset,
}

/// Action the stop button performs when pressed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StopButton {
    Stop,
    Resume,
}

impl StartButton {
    pub fn label(self) -> &'static str {
        match self {
            StartButton::Start => "Start",
            StartButton::Restart => "Restart",
            StartButton::Reset => "Reset",
        }
    }
}

impl StopButton {
    pub fn label(self) -> &'static str {
        match self {
            StopButton::Stop => "Stop",
            StopButton::Resume => "Resume",
        }
    }
}

impl fmt::Display for StartButton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl fmt::Display for StopButton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Labels currently shown on a machine's two buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ButtonLabels {
    pub start: StartButton,
    pub stop: StopButton,
}

impl ButtonLabels {
    /// Labels of a machine that is ready to start
    pub fn ready() -> Self {
        Self {
            start: StartButton::Start,
            stop: StopButton::Stop,
        }
    }
}

impl Default for ButtonLabels {
    fn default() -> Self {
        Self::ready()
    }
}

/// Point-in-time view of one machine's timer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimerState {
    pub machine: MachineKind,
    pub phase: TimerPhase,
    pub configured_seconds: i64,
    pub remaining_seconds: Option<i64>,
    /// Text currently on the time label
    pub display: String,
    pub buttons: ButtonLabels,
}

impl TimerState {
    /// Check if the timer is counting down
    pub fn is_active(&self) -> bool {
        self.phase.is_ticking()
    }

    /// Get remaining seconds if the timer has run at all
    pub fn remaining_seconds(&self) -> Option<i64> {
        self.remaining_seconds
    }
}
