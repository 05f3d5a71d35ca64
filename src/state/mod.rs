//! State management module
//!
//! This module contains the controller that owns both machines and the
//! snapshot types describing a timer.

pub mod app_state;
pub mod timer_state;

// Re-export main types
pub use app_state::AppState;
pub use timer_state::{ButtonLabels, StartButton, StopButton, TimerPhase, TimerState};
