//! Background tasks module
//!
//! This module contains the loop that ticks the timers and reads commands.

pub mod tick_loop;

// Re-export main functions
pub use tick_loop::{run_tick_loop, LoopExit};
