use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

const NAIVE_TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
];

/// One integration log row. The shape belongs to the backend, so the entry is
/// kept verbatim and only read through the accessors below.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LogEntry(Value);

impl LogEntry {
    pub fn new(raw: Value) -> Self {
        Self(raw)
    }

    pub fn raw(&self) -> &Value {
        &self.0
    }

    pub fn id(&self) -> Option<i64> {
        match self.0.get("id")? {
            Value::Number(id) => id.as_i64(),
            Value::String(id) => id.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn level(&self) -> Option<&str> {
        self.text_field("nivel")
    }

    pub fn operation(&self) -> Option<&str> {
        self.text_field("operacao")
    }

    pub fn reference(&self) -> Option<&str> {
        self.text_field("referencia")
    }

    pub fn message(&self) -> Option<&str> {
        self.text_field("mensagem")
    }

    /// `dhLog` as text, whatever its encoding.
    pub fn raw_timestamp(&self) -> Option<String> {
        match self.0.get("dhLog")? {
            Value::String(raw) => Some(raw.clone()),
            Value::Number(raw) => Some(raw.to_string()),
            _ => None,
        }
    }

    /// `dhLog` parsed as RFC 3339, a naive local timestamp (read as UTC) or
    /// epoch milliseconds.
    pub fn logged_at(&self) -> Option<DateTime<Utc>> {
        match self.0.get("dhLog")? {
            Value::String(raw) => parse_timestamp(raw.trim()),
            Value::Number(millis) => millis.as_i64().and_then(DateTime::<Utc>::from_timestamp_millis),
            _ => None,
        }
    }

    fn text_field(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    NAIVE_TIMESTAMP_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(|naive| naive.and_utc())
}

/// Reply of `getIntegrationLogs`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LogsPayload {
    #[serde(default)]
    pub logs: Option<Vec<LogEntry>>,
}
