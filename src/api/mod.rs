//! Command surface
//!
//! Each line typed on stdin is one button press or settings change. This
//! module parses those lines and hands them to the handlers.

pub mod handlers;
pub mod responses;

use crate::machine::MachineKind;

pub use handlers::handle_command;
pub use responses::{ApiResponse, Reply, StatusResponse};

/// A parsed input line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Press the start (restart/reset) button
    Start(MachineKind),
    /// Press the stop (resume) button
    Stop(MachineKind),
    /// Store a new default duration, still unvalidated
    SetMinutes(MachineKind, String),
    Status,
    Help,
    Quit,
}

pub const HELP: &str = "\
Commands:
  start <washer|dryer>          Start, restart or reset a timer
  stop <washer|dryer>           Stop or resume a timer
  set <washer|dryer> <minutes>  Change a timer's default minutes
  status                        Show both timers as JSON
  help                          Show this help
  quit                          Exit";

/// Parse one input line. Blank lines yield `Ok(None)`.
pub fn parse_command(line: &str) -> Result<Option<Command>, String> {
    let mut words = line.split_whitespace();
    let Some(verb) = words.next() else {
        return Ok(None);
    };

    let mut machine = || -> Result<MachineKind, String> {
        words
            .next()
            .ok_or_else(|| format!("'{}' needs a machine (washer or dryer)", verb))?
            .parse()
    };

    let command = match verb.to_ascii_lowercase().as_str() {
        "start" => Command::Start(machine()?),
        "stop" => Command::Stop(machine()?),
        "set" => {
            let kind = machine()?;
            let minutes = words.collect::<Vec<_>>().join(" ");
            Command::SetMinutes(kind, minutes)
        }
        "status" => Command::Status,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => return Err(format!("Unknown command '{}', try 'help'", other)),
    };

    Ok(Some(command))
}
