//! Tick loop driving both timers and the command input

use std::{future::Future, time::Duration};

use tokio::{
    io::{AsyncBufRead, AsyncBufReadExt},
    time::MissedTickBehavior,
};
use tracing::{debug, error, info};

use crate::{
    api::{handle_command, parse_command, Reply},
    state::AppState,
};

/// Why the loop returned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopExit {
    Quit,
    Shutdown,
}

/// Run until `quit` is entered or `shutdown` resolves.
///
/// Ticks and commands are handled on this one task, so the machines are
/// never touched concurrently. When `input` reaches end of file the timers
/// keep running until shutdown.
pub async fn run_tick_loop<R, S>(
    state: &mut AppState,
    input: R,
    tick_interval: Duration,
    shutdown: S,
) -> anyhow::Result<LoopExit>
where
    R: AsyncBufRead + Unpin,
    S: Future<Output = ()>,
{
    info!("Starting tick loop ({}ms interval)", tick_interval.as_millis());

    let mut interval = tokio::time::interval(tick_interval);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let mut lines = input.lines();
    let mut input_open = true;
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = interval.tick() => {
                state.tick();
            }

            line = lines.next_line(), if input_open => {
                match line {
                    Ok(Some(line)) => {
                        if handle_line(state, &line) == Some(LoopExit::Quit) {
                            info!("Quit requested");
                            return Ok(LoopExit::Quit);
                        }
                    }
                    Ok(None) => {
                        debug!("Input closed, timers keep running until shutdown");
                        input_open = false;
                    }
                    Err(e) => {
                        error!("Failed to read input: {}", e);
                        input_open = false;
                    }
                }
            }

            _ = &mut shutdown => {
                info!("Shutdown signal received");
                return Ok(LoopExit::Shutdown);
            }
        }
    }
}

/// Parse and apply one input line, printing the reply
fn handle_line(state: &mut AppState, line: &str) -> Option<LoopExit> {
    let reply = match parse_command(line) {
        Ok(Some(command)) => handle_command(state, command),
        Ok(None) => return None,
        Err(e) => {
            println!("error: {}", e);
            return None;
        }
    };

    if let Reply::Quit = reply {
        return Some(LoopExit::Quit);
    }
    if let Some(text) = reply.render() {
        println!("{}", text);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        machine::{MachineKind, TimerMachine},
        services::{DisplaySurface, ManualClock, MemoryPreferenceStore},
        state::TimerPhase,
    };
    use std::sync::Arc;
    use tokio::io::BufReader;

    struct NullDisplay;

    impl DisplaySurface for NullDisplay {
        fn show(&mut self, _text: &str) {}
    }

    fn app(clock: &ManualClock) -> AppState {
        let preferences = Arc::new(MemoryPreferenceStore::new());
        let machine = |kind| {
            TimerMachine::new(
                kind,
                Arc::new(clock.clone()),
                preferences.clone(),
                Box::new(NullDisplay),
                None,
            )
        };
        AppState::new(
            machine(MachineKind::Washer),
            machine(MachineKind::Dryer),
            preferences.clone(),
        )
    }

    #[tokio::test]
    async fn commands_drive_the_machines_until_quit() {
        let clock = ManualClock::default();
        let mut state = app(&clock);
        let input = BufReader::new(&b"start washer\nset dryer 30\nbogus\n\nstatus\nquit\nstart dryer\n"[..]);

        let exit = run_tick_loop(
            &mut state,
            input,
            Duration::from_millis(200),
            std::future::pending(),
        )
        .await
        .unwrap();

        assert_eq!(exit, LoopExit::Quit);
        assert_eq!(state.machine(MachineKind::Washer).phase(), TimerPhase::Running);
        // Lines after quit are never read
        assert_eq!(state.machine(MachineKind::Dryer).phase(), TimerPhase::Idle);
        assert_eq!(state.machine(MachineKind::Dryer).configured().num_seconds(), 1800);
    }

    #[tokio::test(start_paused = true)]
    async fn ticks_continue_after_input_closes() {
        let clock = ManualClock::default();
        let mut state = app(&clock);
        state.press_start(MachineKind::Dryer);
        clock.advance_secs(3600);

        let exit = run_tick_loop(
            &mut state,
            BufReader::new(&b""[..]),
            Duration::from_millis(200),
            tokio::time::sleep(Duration::from_secs(1)),
        )
        .await
        .unwrap();

        assert_eq!(exit, LoopExit::Shutdown);
        assert_eq!(state.machine(MachineKind::Dryer).phase(), TimerPhase::Finished);
    }
}
