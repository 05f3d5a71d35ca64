//! Command handlers

use chrono::Utc;
use tracing::{debug, warn};

use super::{
    responses::{ApiResponse, Reply, StatusResponse},
    Command,
};
use crate::{
    machine::{format_remaining, MachineKind},
    state::{AppState, StartButton, StopButton},
};

/// Apply a command to the application state
pub fn handle_command(state: &mut AppState, command: Command) -> Reply {
    debug!("Handling command: {:?}", command);

    match command {
        Command::Start(kind) => start_handler(state, kind),
        Command::Stop(kind) => stop_handler(state, kind),
        Command::SetMinutes(kind, input) => set_minutes_handler(state, kind, &input),
        Command::Status => status_handler(state),
        Command::Help => Reply::Help,
        Command::Quit => Reply::Quit,
    }
}

/// Handle `start` - Press the start button
fn start_handler(state: &mut AppState, kind: MachineKind) -> Reply {
    let action = state.press_start(kind);
    let machine = state.machine(kind);

    let message = match action {
        StartButton::Start | StartButton::Restart => format!(
            "{} {} ({})",
            kind.label(),
            if action == StartButton::Start { "started" } else { "restarted" },
            format_remaining(machine.configured())
        ),
        StartButton::Reset => format!(
            "{} reset to {}",
            kind.label(),
            format_remaining(machine.configured())
        ),
    };

    Reply::Action(ApiResponse::ok(message))
}

/// Handle `stop` - Press the stop button
fn stop_handler(state: &mut AppState, kind: MachineKind) -> Reply {
    let before = state.machine(kind).phase();
    let action = state.press_stop(kind);
    let machine = state.machine(kind);

    if machine.phase() == before {
        let message = format!("{} is {:?}, nothing to {}", kind, before, action.label());
        return Reply::Action(ApiResponse::error(message.to_lowercase()));
    }

    let remaining = machine
        .remaining_time()
        .map(format_remaining)
        .unwrap_or_else(|| "-".to_string());

    let message = match action {
        StopButton::Stop => format!("{} stopped with {} left", kind.label(), remaining),
        StopButton::Resume => format!("{} resumed with {} left", kind.label(), remaining),
    };

    Reply::Action(ApiResponse::ok(message))
}

/// Handle `set` - Validate and store a machine's default minutes
fn set_minutes_handler(state: &mut AppState, kind: MachineKind, input: &str) -> Reply {
    match state.set_minutes(kind, input) {
        Ok(minutes) => Reply::Action(ApiResponse::ok(format!(
            "{} default is now {} minutes",
            kind.label(),
            minutes
        ))),
        Err(e) => {
            warn!("Rejected minutes for {}: {}", kind, e);
            Reply::Action(ApiResponse::error(e))
        }
    }
}

/// Handle `status` - Report both timers
fn status_handler(state: &AppState) -> Reply {
    let (last_action, last_action_time) = state.get_last_action();

    Reply::Status(StatusResponse {
        timers: state.timer_states(),
        uptime: state.get_uptime(),
        last_action,
        last_action_time,
        timestamp: Utc::now(),
    })
}
