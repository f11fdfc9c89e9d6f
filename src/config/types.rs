use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Configuration for the Fastchannel monitor screen
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default)]
    pub transport: TransportKind,

    #[serde(default)]
    pub mge_session: Option<String>,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    #[serde(default = "default_message_ttl_ms")]
    pub message_ttl_ms: u64,

    #[serde(default)]
    pub message_timer: MessageTimerPolicy,

    #[serde(default = "default_log_limit")]
    pub log_limit: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            transport: TransportKind::default(),
            mge_session: None,
            request_timeout_secs: default_request_timeout_secs(),
            message_ttl_ms: default_message_ttl_ms(),
            message_timer: MessageTimerPolicy::default(),
            log_limit: default_log_limit(),
        }
    }
}

impl Config {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    pub fn message_ttl(&self) -> Duration {
        Duration::from_millis(self.message_ttl_ms)
    }
}

fn default_base_url() -> String {
    "http://127.0.0.1:8180".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_message_ttl_ms() -> u64 {
    5000
}

fn default_log_limit() -> u32 {
    50
}

/// Which RPC path the monitor uses to reach the service layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportKind {
    /// Session-authenticated gateway call with a status envelope.
    Proxy,
    /// Direct servlet returning raw bodies.
    Invoker,
    /// Plain `service.sbr` POST.
    #[default]
    Http,
}

impl fmt::Display for TransportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TransportKind::Proxy => "proxy",
            TransportKind::Invoker => "invoker",
            TransportKind::Http => "http",
        };
        f.write_str(name)
    }
}

impl FromStr for TransportKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "proxy" => Ok(TransportKind::Proxy),
            "invoker" => Ok(TransportKind::Invoker),
            "http" => Ok(TransportKind::Http),
            other => Err(format!(
                "unknown transport `{other}` (expected proxy, invoker or http)"
            )),
        }
    }
}

/// How a new toast message interacts with the clear timer of the previous one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageTimerPolicy {
    /// Cancel the pending clear and restart the full delay.
    #[default]
    Reset,
    /// Leave earlier timers running; the oldest one clears whatever is shown.
    Legacy,
}
