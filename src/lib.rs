//! Laundry Timer - Washer and dryer countdown timers
//!
//! This library provides a countdown state machine per machine, the
//! collaborators it drives (label display, alarm, preference store, clock)
//! and the command loop that ties them to a terminal.

pub mod api;
pub mod config;
pub mod machine;
pub mod services;
pub mod state;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use machine::{MachineKind, TimerMachine};
pub use state::AppState;
pub use tasks::run_tick_loop;
pub use utils::signals::shutdown_signal;
