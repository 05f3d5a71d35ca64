//! Countdown state machine for a single washer or dryer

use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};
use tracing::{debug, info};

use super::kind::{minutes, MachineKind, SECONDS_PER_MINUTE};
use crate::{
    services::{AlarmPlayer, Clock, DisplaySurface, PreferenceStore},
    state::{ButtonLabels, StartButton, StopButton, TimerPhase, TimerState},
};

/// Label shown once a countdown has run out
pub const DONE_TEXT: &str = "DONE!";

/// Number of times the alarm sound repeats when a countdown finishes
pub const ALARM_LOOPS: u32 = 20;

/// Format a remaining duration as `M:SS`, truncating to whole seconds
pub fn format_remaining(remaining: TimeDelta) -> String {
    let total = remaining.num_seconds().max(0);
    format!("{}:{:02}", total / SECONDS_PER_MINUTE, total % SECONDS_PER_MINUTE)
}

/// Countdown timer for one machine.
///
/// The machine does not schedule anything itself: the owner calls
/// [`TimerMachine::tick`] periodically and the machine ignores ticks unless it
/// is running. Elapsed time is always recomputed from the injected clock, so
/// the tick rate only affects how often the label refreshes.
pub struct TimerMachine {
    kind: MachineKind,
    configured: TimeDelta,
    start_epoch: Option<DateTime<Utc>>,
    elapsed: TimeDelta,
    phase: TimerPhase,
    buttons: ButtonLabels,
    shown: String,
    clock: Arc<dyn Clock>,
    preferences: Arc<dyn PreferenceStore>,
    display: Box<dyn DisplaySurface>,
    alarm: Option<Box<dyn AlarmPlayer>>,
}

impl TimerMachine {
    /// Create a machine with its built-in default duration, then reset it so
    /// any stored preference is applied and the label shows the full time.
    pub fn new(
        kind: MachineKind,
        clock: Arc<dyn Clock>,
        preferences: Arc<dyn PreferenceStore>,
        display: Box<dyn DisplaySurface>,
        alarm: Option<Box<dyn AlarmPlayer>>,
    ) -> Self {
        let mut machine = Self {
            kind,
            configured: kind.default_duration(),
            start_epoch: None,
            elapsed: TimeDelta::zero(),
            phase: TimerPhase::Idle,
            buttons: ButtonLabels::ready(),
            shown: String::new(),
            clock,
            preferences,
            display,
            alarm,
        };
        machine.reset();
        machine
    }

    pub fn kind(&self) -> MachineKind {
        self.kind
    }

    pub fn phase(&self) -> TimerPhase {
        self.phase
    }

    pub fn buttons(&self) -> ButtonLabels {
        self.buttons
    }

    /// Length of the countdown currently being (or about to be) run
    pub fn configured(&self) -> TimeDelta {
        self.configured
    }

    /// Elapsed time as of the last tick or stop
    pub fn elapsed(&self) -> TimeDelta {
        self.elapsed
    }

    /// Text last pushed to the label
    pub fn display_text(&self) -> &str {
        &self.shown
    }

    pub fn has_alarm(&self) -> bool {
        self.alarm.is_some()
    }

    /// Cancel any countdown and return to the full configured duration.
    ///
    /// The configured duration is reloaded from the preference store; when
    /// nothing is stored the current value is kept.
    pub fn reset(&mut self) {
        self.silence_alarm();

        if let Some(stored) = self.preferences.get_minutes(self.kind.key()) {
            let stored = minutes(stored);
            if stored != self.configured {
                debug!(
                    "{}: configured duration {}s -> {}s from preferences",
                    self.kind,
                    self.configured.num_seconds(),
                    stored.num_seconds()
                );
                self.configured = stored;
            }
        }

        self.phase = TimerPhase::Idle;
        self.start_epoch = None;
        self.elapsed = TimeDelta::zero();
        self.buttons = ButtonLabels::ready();
        self.show(&format_remaining(self.configured));
    }

    /// Reset and begin a fresh countdown
    pub fn start(&mut self) {
        self.reset();

        self.start_epoch = Some(self.clock.now());
        self.phase = TimerPhase::Running;
        self.buttons = ButtonLabels {
            start: StartButton::Restart,
            stop: StopButton::Stop,
        };
        info!("{}: started {} countdown", self.kind, format_remaining(self.configured));
    }

    /// Advance the countdown from the clock; does nothing unless running
    pub fn tick(&mut self) {
        if !self.phase.is_ticking() {
            return;
        }
        let Some(elapsed) = self.elapsed_since_start() else {
            return;
        };
        self.elapsed = elapsed;

        if self.elapsed >= self.configured {
            self.finish();
        } else {
            self.show(&format_remaining(self.configured - self.elapsed));
        }
    }

    /// Pause a running countdown, or silence a finished one
    pub fn stop(&mut self) {
        match self.phase {
            TimerPhase::Running => {
                if let Some(elapsed) = self.elapsed_since_start() {
                    self.elapsed = elapsed;
                }
            }
            TimerPhase::Finished => {}
            TimerPhase::Idle | TimerPhase::Paused => {
                debug!("{}: stop ignored while {:?}", self.kind, self.phase);
                return;
            }
        }

        self.silence_alarm();
        self.phase = TimerPhase::Paused;
        self.buttons = ButtonLabels {
            start: StartButton::Reset,
            stop: StopButton::Resume,
        };
        info!("{}: stopped after {}s", self.kind, self.elapsed.num_seconds());
    }

    /// Continue a paused countdown.
    ///
    /// The time that was left becomes the new configured duration, so the
    /// resumed run is a fresh countdown of whatever remained.
    pub fn resume(&mut self) {
        if self.phase != TimerPhase::Paused {
            debug!("{}: resume ignored while {:?}", self.kind, self.phase);
            return;
        }

        let remaining = self.configured - self.elapsed;
        if remaining <= TimeDelta::zero() {
            debug!("{}: nothing left to resume", self.kind);
            return;
        }

        self.configured = remaining;
        self.elapsed = TimeDelta::zero();
        self.start_epoch = Some(self.clock.now());
        self.phase = TimerPhase::Running;
        self.buttons.stop = StopButton::Stop;
        info!("{}: resumed with {} left", self.kind, format_remaining(remaining));
    }

    /// Time left on the countdown.
    ///
    /// While running this is computed from the clock; after a stop it is
    /// derived from the frozen elapsed time. A machine that has not run
    /// since its last reset has no remaining time.
    pub fn remaining_time(&self) -> Option<TimeDelta> {
        if self.phase.is_ticking() {
            if let Some(elapsed) = self.elapsed_since_start() {
                return Some(self.configured - elapsed);
            }
        }

        if self.elapsed != TimeDelta::zero() {
            Some(self.configured - self.elapsed)
        } else {
            None
        }
    }

    /// Apply the stored preference, or the built-in default when unset.
    ///
    /// Only an idle machine refreshes its label; a countdown in progress
    /// keeps showing its own time.
    pub fn sync_from_preferences(&mut self) {
        self.configured = self
            .preferences
            .get_minutes(self.kind.key())
            .map(minutes)
            .unwrap_or_else(|| self.kind.default_duration());

        if self.phase == TimerPhase::Idle {
            self.show(&format_remaining(self.configured));
        }
    }

    pub fn snapshot(&self) -> TimerState {
        TimerState {
            machine: self.kind,
            phase: self.phase,
            configured_seconds: self.configured.num_seconds(),
            remaining_seconds: self.remaining_time().map(|remaining| remaining.num_seconds()),
            display: self.shown.clone(),
            buttons: self.buttons,
        }
    }

    fn show(&mut self, text: &str) {
        self.display.show(text);
        self.shown = text.to_string();
    }

    fn elapsed_since_start(&self) -> Option<TimeDelta> {
        self.start_epoch.map(|start| self.clock.now() - start)
    }

    fn finish(&mut self) {
        info!("{}: countdown finished", self.kind);

        self.phase = TimerPhase::Finished;
        self.buttons = ButtonLabels {
            start: StartButton::Reset,
            stop: StopButton::Stop,
        };
        self.show(DONE_TEXT);

        if let Some(alarm) = self.alarm.as_mut() {
            alarm.stop();
            alarm.play(ALARM_LOOPS);
        }
    }

    fn silence_alarm(&mut self) {
        if let Some(alarm) = self.alarm.as_mut() {
            alarm.stop();
        }
    }
}

impl std::fmt::Debug for TimerMachine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimerMachine")
            .field("kind", &self.kind)
            .field("configured", &self.configured)
            .field("start_epoch", &self.start_epoch)
            .field("elapsed", &self.elapsed)
            .field("phase", &self.phase)
            .field("buttons", &self.buttons)
            .field("has_alarm", &self.alarm.is_some())
            .finish()
    }
}
