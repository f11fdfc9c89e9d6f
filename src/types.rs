use thiserror::Error;

/// Errors raised while talking to the ERP service layer or preparing the monitor.
///
/// The `Display` text of the transport variants is what the screen shows to
/// the operator, so it is kept short and stable.
#[derive(Debug, Error)]
pub enum MonitorError {
    #[error("Network error")]
    Network(#[from] reqwest::Error),

    #[error("HTTP {0}")]
    HttpStatus(u16),

    #[error("Parse error")]
    Parse(#[source] serde_json::Error),

    #[error("{service} returned an unexpected body: {source}")]
    Decode {
        service: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("{0}")]
    Service(String),

    #[error("{0}")]
    Dispatch(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl MonitorError {
    /// Text suitable for the operator, or `None` when the failure carried nothing readable.
    pub fn user_message(&self) -> Option<String> {
        let text = self.to_string();
        let trimmed = text.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }
}
