//! Main application state management

use std::{sync::Arc, time::Instant};

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use super::{StartButton, StopButton, TimerPhase, TimerState};
use crate::{
    machine::{MachineKind, TimerMachine},
    services::{parse_minutes, PreferenceStore},
};

/// Owns the washer and dryer timers and maps button presses onto them
pub struct AppState {
    washer: TimerMachine,
    dryer: TimerMachine,
    preferences: Arc<dyn PreferenceStore>,
    start_time: Instant,
    /// Last action tracking
    last_action: Option<String>,
    last_action_time: Option<DateTime<Utc>>,
}

impl AppState {
    /// Create the application state from its two machines.
    ///
    /// The machines are resynced with the stored preferences so both labels
    /// show the durations the user configured.
    pub fn new(
        washer: TimerMachine,
        dryer: TimerMachine,
        preferences: Arc<dyn PreferenceStore>,
    ) -> Self {
        debug_assert_eq!(washer.kind(), MachineKind::Washer);
        debug_assert_eq!(dryer.kind(), MachineKind::Dryer);

        let mut state = Self {
            washer,
            dryer,
            preferences,
            start_time: Instant::now(),
            last_action: None,
            last_action_time: None,
        };
        state.resync();
        state
    }

    pub fn machine(&self, kind: MachineKind) -> &TimerMachine {
        match kind {
            MachineKind::Washer => &self.washer,
            MachineKind::Dryer => &self.dryer,
        }
    }

    pub fn machine_mut(&mut self, kind: MachineKind) -> &mut TimerMachine {
        match kind {
            MachineKind::Washer => &mut self.washer,
            MachineKind::Dryer => &mut self.dryer,
        }
    }

    /// Press a machine's start button; returns the action it performed
    pub fn press_start(&mut self, kind: MachineKind) -> StartButton {
        let action = self.machine(kind).buttons().start;
        let machine = self.machine_mut(kind);
        match action {
            StartButton::Reset => machine.reset(),
            StartButton::Start | StartButton::Restart => machine.start(),
        }

        self.record_action(kind, action.label());
        action
    }

    /// Press a machine's stop button; returns the action it performed
    pub fn press_stop(&mut self, kind: MachineKind) -> StopButton {
        let action = self.machine(kind).buttons().stop;
        let machine = self.machine_mut(kind);
        match action {
            StopButton::Resume => machine.resume(),
            StopButton::Stop => machine.stop(),
        }

        self.record_action(kind, action.label());
        action
    }

    /// Validate and store a new default duration for a machine
    pub fn set_minutes(&mut self, kind: MachineKind, input: &str) -> Result<u32, String> {
        let minutes = parse_minutes(input)
            .map_err(|e| format!("The {} timer needs more minutes: {}", kind.label(), e))?;

        self.preferences.set_minutes(kind.key(), minutes)?;
        info!("{} default set to {} minutes", kind.label(), minutes);

        self.resync();
        self.record_action(kind, "Set");
        Ok(minutes)
    }

    /// Refresh idle machines from the stored preferences
    pub fn resync(&mut self) {
        for kind in MachineKind::ALL {
            let machine = self.machine_mut(kind);
            if machine.phase() == TimerPhase::Idle {
                machine.sync_from_preferences();
            }
        }
    }

    /// Advance every running countdown
    pub fn tick(&mut self) {
        self.washer.tick();
        self.dryer.tick();
    }

    /// Snapshots of both timers
    pub fn timer_states(&self) -> Vec<TimerState> {
        MachineKind::ALL
            .iter()
            .map(|kind| self.machine(*kind).snapshot())
            .collect()
    }

    /// Calculate uptime as a formatted string
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
        (self.last_action.clone(), self.last_action_time)
    }

    /// Warn about machines that will finish without a sound
    pub fn check_alarms(&self) {
        for kind in MachineKind::ALL {
            if !self.machine(kind).has_alarm() {
                warn!("{} has no alarm sound", kind.label());
            }
        }
    }

    fn record_action(&mut self, kind: MachineKind, action: &str) {
        self.last_action = Some(format!("{} {}", action.to_lowercase(), kind));
        self.last_action_time = Some(Utc::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::{DisplaySurface, ManualClock, MemoryPreferenceStore};
    use chrono::TimeDelta;

    struct NullDisplay;

    impl DisplaySurface for NullDisplay {
        fn show(&mut self, _text: &str) {}
    }

    fn app(preferences: Arc<MemoryPreferenceStore>) -> (ManualClock, AppState) {
        let clock = ManualClock::default();
        let machine = |kind| {
            TimerMachine::new(
                kind,
                Arc::new(clock.clone()),
                preferences.clone(),
                Box::new(NullDisplay),
                None,
            )
        };
        let state = AppState::new(
            machine(MachineKind::Washer),
            machine(MachineKind::Dryer),
            preferences.clone(),
        );
        (clock, state)
    }

    #[test]
    fn start_button_cycles_through_restart_and_reset() {
        let (clock, mut state) = app(Arc::new(MemoryPreferenceStore::new()));

        assert_eq!(state.press_start(MachineKind::Washer), StartButton::Start);
        assert_eq!(state.machine(MachineKind::Washer).phase(), TimerPhase::Running);

        clock.advance_secs(30);
        assert_eq!(state.press_start(MachineKind::Washer), StartButton::Restart);
        assert_eq!(
            state.machine(MachineKind::Washer).remaining_time(),
            Some(TimeDelta::seconds(2700))
        );

        assert_eq!(state.press_stop(MachineKind::Washer), StopButton::Stop);
        assert_eq!(state.press_start(MachineKind::Washer), StartButton::Reset);
        assert_eq!(state.machine(MachineKind::Washer).phase(), TimerPhase::Idle);
    }

    #[test]
    fn stop_button_toggles_between_stop_and_resume() {
        let (clock, mut state) = app(Arc::new(MemoryPreferenceStore::new()));
        state.press_start(MachineKind::Dryer);
        clock.advance_secs(600);

        assert_eq!(state.press_stop(MachineKind::Dryer), StopButton::Stop);
        assert_eq!(state.machine(MachineKind::Dryer).phase(), TimerPhase::Paused);

        assert_eq!(state.press_stop(MachineKind::Dryer), StopButton::Resume);
        assert_eq!(state.machine(MachineKind::Dryer).phase(), TimerPhase::Running);
        assert_eq!(
            state.machine(MachineKind::Dryer).configured(),
            TimeDelta::seconds(3000)
        );

        let (action, at) = state.get_last_action();
        assert_eq!(action.as_deref(), Some("resume dryer"));
        assert!(at.is_some());
    }

    #[test]
    fn machines_are_independent() {
        let (clock, mut state) = app(Arc::new(MemoryPreferenceStore::new()));
        state.press_start(MachineKind::Washer);
        clock.advance_secs(2700);
        state.tick();

        assert_eq!(state.machine(MachineKind::Washer).phase(), TimerPhase::Finished);
        assert_eq!(state.machine(MachineKind::Dryer).phase(), TimerPhase::Idle);
        assert_eq!(state.machine(MachineKind::Dryer).remaining_time(), None);
    }

    #[test]
    fn set_minutes_persists_and_resyncs_idle_machines() {
        let preferences = Arc::new(MemoryPreferenceStore::new());
        let (_clock, mut state) = app(preferences.clone());
        state.press_start(MachineKind::Dryer);

        assert_eq!(state.set_minutes(MachineKind::Washer, "30"), Ok(30));
        assert_eq!(state.set_minutes(MachineKind::Dryer, "50"), Ok(50));
        assert_eq!(preferences.get_minutes("washer"), Some(30));

        assert_eq!(
            state.machine(MachineKind::Washer).configured(),
            TimeDelta::seconds(1800)
        );
        // The running dryer keeps its countdown until it is reset
        assert_eq!(
            state.machine(MachineKind::Dryer).configured(),
            TimeDelta::seconds(3600)
        );
        state.press_stop(MachineKind::Dryer);
        state.press_start(MachineKind::Dryer);
        assert_eq!(
            state.machine(MachineKind::Dryer).configured(),
            TimeDelta::seconds(3000)
        );
    }

    #[test]
    fn paused_machine_keeps_its_countdown_until_reset() {
        let preferences = Arc::new(MemoryPreferenceStore::new());
        let (clock, mut state) = app(preferences.clone());
        state.press_start(MachineKind::Washer);
        clock.advance_secs(600);
        state.press_stop(MachineKind::Washer);

        assert_eq!(state.set_minutes(MachineKind::Washer, "20"), Ok(20));
        let washer = state.machine(MachineKind::Washer);
        assert_eq!(washer.phase(), TimerPhase::Paused);
        assert_eq!(washer.configured(), TimeDelta::seconds(2700));
        assert_eq!(washer.remaining_time(), Some(TimeDelta::seconds(2100)));

        // Resuming picks up where the paused load left off
        assert_eq!(state.press_stop(MachineKind::Washer), StopButton::Resume);
        assert_eq!(
            state.machine(MachineKind::Washer).configured(),
            TimeDelta::seconds(2100)
        );

        state.press_stop(MachineKind::Washer);
        assert_eq!(state.press_start(MachineKind::Washer), StartButton::Reset);
        assert_eq!(
            state.machine(MachineKind::Washer).configured(),
            TimeDelta::seconds(1200)
        );
    }

    #[test]
    fn set_minutes_rejects_invalid_input() {
        let preferences = Arc::new(MemoryPreferenceStore::new());
        let (_clock, mut state) = app(preferences.clone());

        assert!(state.set_minutes(MachineKind::Washer, "0").is_err());
        assert!(state.set_minutes(MachineKind::Washer, "").is_err());
        assert_eq!(preferences.get_minutes("washer"), None);
        assert_eq!(
            state.machine(MachineKind::Washer).configured(),
            TimeDelta::seconds(2700)
        );
    }

    #[test]
    fn stored_preferences_apply_at_startup() {
        let preferences = Arc::new(MemoryPreferenceStore::new());
        preferences.set_minutes("dryer", 75).unwrap();
        let (_clock, state) = app(preferences);

        let states = state.timer_states();
        assert_eq!(states.len(), 2);
        assert_eq!(states[1].machine, MachineKind::Dryer);
        assert_eq!(states[1].configured_seconds, 4500);
        assert_eq!(states[0].configured_seconds, 2700);
    }
}
