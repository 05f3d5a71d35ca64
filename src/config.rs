//! Configuration and CLI argument handling

use std::{path::PathBuf, time::Duration};

use clap::Parser;

use crate::services::default_preferences_path;

/// CLI argument parsing structure
#[derive(Parser, Debug)]
#[command(name = "laundry-timer")]
#[command(about = "Washer and dryer countdown timers with a completion alarm")]
#[command(version)]
pub struct Config {
    /// File holding the default minutes for each machine
    #[arg(long, value_name = "PATH")]
    pub prefs: Option<PathBuf>,

    /// Keep preferences in memory only
    #[arg(long, conflicts_with = "prefs")]
    pub no_persist: bool,

    /// Alarm sound to play instead of the bundled one
    #[arg(long, value_name = "PATH")]
    pub alarm: Option<PathBuf>,

    /// How often the labels refresh, in milliseconds
    #[arg(long, default_value = "200", value_parser = clap::value_parser!(u64).range(10..=5000))]
    pub tick_ms: u64,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Where preferences are stored, or `None` to keep them in memory
    pub fn preferences_path(&self) -> Option<PathBuf> {
        if self.no_persist {
            return None;
        }
        self.prefs.clone().or_else(default_preferences_path)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }
}
