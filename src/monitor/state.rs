use serde::Serialize;

use crate::fastchannel_client::{HealthStatus, LogEntry, Statistics};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    Success,
    Error,
}

/// The toast shown at the top of the screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    pub text: String,
    pub kind: MessageKind,
}

/// Everything the monitor screen renders.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewState {
    pub health: HealthStatus,
    pub stats: Statistics,
    pub logs: Vec<LogEntry>,
    pub syncing: bool,
    pub message: Option<Message>,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            health: HealthStatus::checking(),
            stats: Statistics::default(),
            logs: Vec::new(),
            syncing: false,
            message: None,
        }
    }
}
