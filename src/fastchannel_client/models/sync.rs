use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::value::{is_truthy, text_of};

/// Reply of `syncAll`. `success` follows loose truthiness, so `1` or
/// `"true"` count as success and a body without the flag is a rejection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncResult {
    pub success: bool,
    pub message: Option<String>,
}

impl SyncResult {
    pub fn from_value(value: &Value) -> Self {
        Self {
            success: value.get("success").is_some_and(is_truthy),
            message: value.get("message").and_then(text_of),
        }
    }

    /// The server message, unless it is missing or blank.
    pub fn message_text(&self) -> Option<&str> {
        self.message
            .as_deref()
            .map(str::trim)
            .filter(|message| !message.is_empty())
    }
}

impl<'de> Deserialize<'de> for SyncResult {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Value::deserialize(deserializer).map(|value| Self::from_value(&value))
    }
}
