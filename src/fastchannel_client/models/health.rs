use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use super::value::{is_truthy, text_of};

const CHECKING_LABEL: &str = "Verificando...";
const OFFLINE_LABEL: &str = "OFFLINE";

/// Reply of `getApiHealth`. Any JSON body is accepted; fields beyond
/// `status`/`online` are kept as sent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthStatus {
    pub status: String,
    pub online: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl HealthStatus {
    /// Placeholder shown before the first health check answers.
    pub fn checking() -> Self {
        Self {
            status: CHECKING_LABEL.to_string(),
            online: None,
            extra: Map::new(),
        }
    }

    /// Sentinel used whenever the health check itself fails.
    pub fn offline() -> Self {
        Self {
            status: OFFLINE_LABEL.to_string(),
            online: Some(false),
            extra: Map::new(),
        }
    }

    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Object(fields) => {
                let mut extra = fields.clone();
                let status = extra.remove("status");
                let online = extra.remove("online");
                Self {
                    status: status.as_ref().and_then(text_of).unwrap_or_default(),
                    online: online
                        .as_ref()
                        .filter(|flag| !flag.is_null())
                        .map(is_truthy),
                    extra,
                }
            }
            other => Self {
                status: text_of(other).unwrap_or_default(),
                online: None,
                extra: Map::new(),
            },
        }
    }
}

impl Default for HealthStatus {
    fn default() -> Self {
        Self::checking()
    }
}

impl<'de> Deserialize<'de> for HealthStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Value::deserialize(deserializer).map(|value| Self::from_value(&value))
    }
}
