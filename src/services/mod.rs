//! Collaborators injected into the timer machines
//!
//! This module contains the clock, the preference store, the label display
//! and the alarm player.

pub mod alarm;
pub mod clock;
pub mod display;
pub mod preferences;

// Re-export main types
pub use alarm::{load_alarm, AlarmPlayer, SoundAlarm};
pub use clock::{Clock, ManualClock, SystemClock};
pub use display::{DisplaySurface, TerminalLabel};
pub use preferences::{
    default_preferences_path, parse_minutes, JsonPreferenceStore, MemoryPreferenceStore,
    PreferenceStore,
};
