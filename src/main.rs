//! Laundry Timer - Washer and dryer countdown timers
//!
//! This is the main entry point for the laundry-timer application.

use std::sync::Arc;
use tokio::io::BufReader;
use tracing::info;

use laundry_timer::{
    config::Config,
    machine::{MachineKind, TimerMachine},
    services::{
        load_alarm, Clock, JsonPreferenceStore, MemoryPreferenceStore, PreferenceStore,
        SystemClock, TerminalLabel,
    },
    state::AppState,
    tasks::{run_tick_loop, LoopExit},
    utils::shutdown_signal,
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Logs go to stderr so the labels on stdout stay readable
    tracing_subscriber::fmt()
        .with_env_filter(format!("laundry_timer={}", config.log_level()))
        .with_writer(std::io::stderr)
        .init();

    info!("Starting laundry-timer v{}", env!("CARGO_PKG_VERSION"));

    let preferences: Arc<dyn PreferenceStore> = match config.preferences_path() {
        Some(path) => {
            info!("Preferences: {}", path.display());
            Arc::new(JsonPreferenceStore::open(path))
        }
        None => {
            info!("Preferences kept in memory only");
            Arc::new(MemoryPreferenceStore::new())
        }
    };
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    let build_machine = |kind: MachineKind| {
        TimerMachine::new(
            kind,
            Arc::clone(&clock),
            Arc::clone(&preferences),
            Box::new(TerminalLabel::new(kind.key())),
            load_alarm(config.alarm.as_deref()),
        )
    };
    let washer = build_machine(MachineKind::Washer);
    let dryer = build_machine(MachineKind::Dryer);

    let mut state = AppState::new(washer, dryer, Arc::clone(&preferences));
    state.check_alarms();

    println!("{}", laundry_timer::api::HELP);

    let input = BufReader::new(tokio::io::stdin());
    let exit = run_tick_loop(&mut state, input, config.tick_interval(), shutdown_signal()).await?;

    if exit == LoopExit::Shutdown {
        info!("Stopping timers");
    }
    info!("laundry-timer shutdown complete");
    Ok(())
}
