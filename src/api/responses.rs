//! Reply structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::state::TimerState;

/// Reply to a command that changed (or failed to change) a timer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl ApiResponse {
    /// Create a new response
    pub fn new(status: String, message: String) -> Self {
        Self {
            status,
            message,
            timestamp: Utc::now(),
        }
    }

    /// Create a success response
    pub fn ok(message: String) -> Self {
        Self::new("ok".to_string(), message)
    }

    /// Create an error response
    pub fn error(message: String) -> Self {
        Self::new("error".to_string(), message)
    }

    pub fn is_error(&self) -> bool {
        self.status == "error"
    }
}

/// Status of both timers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub timers: Vec<TimerState>,
    pub uptime: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
    pub timestamp: DateTime<Utc>,
}

/// What the command loop should do after handling a line
#[derive(Debug, Clone)]
pub enum Reply {
    Action(ApiResponse),
    Status(StatusResponse),
    Help,
    Quit,
}

impl Reply {
    /// Text to print for this reply, if any
    pub fn render(&self) -> Option<String> {
        match self {
            Reply::Action(response) if response.is_error() => {
                Some(format!("error: {}", response.message))
            }
            Reply::Action(response) => Some(response.message.clone()),
            Reply::Status(status) => Some(
                serde_json::to_string_pretty(status)
                    .unwrap_or_else(|e| format!("error: failed to serialize status: {}", e)),
            ),
            Reply::Help => Some(super::HELP.to_string()),
            Reply::Quit => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_are_prefixed_when_rendered() {
        let reply = Reply::Action(ApiResponse::error("bad minutes".to_string()));
        assert_eq!(reply.render().as_deref(), Some("error: bad minutes"));

        let reply = Reply::Action(ApiResponse::ok("Washer started".to_string()));
        assert_eq!(reply.render().as_deref(), Some("Washer started"));
        assert!(Reply::Quit.render().is_none());
    }
}
