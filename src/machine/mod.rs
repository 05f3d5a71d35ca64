//! Machine kinds and the per-machine countdown
//!
//! Each washer or dryer owns a [`TimerMachine`] that counts down from its
//! configured duration and raises the alarm when it runs out.

pub mod kind;
pub mod timer;

// Re-export main types
pub use kind::{MachineConfig, MachineKind};
pub use timer::{format_remaining, TimerMachine, ALARM_LOOPS, DONE_TEXT};
