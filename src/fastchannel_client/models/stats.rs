use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Integration counters for the last 24 hours, as reported by `getStatistics`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    #[serde(rename = "success24h", default)]
    pub success_24h: u64,
    #[serde(rename = "error24h", default)]
    pub error_24h: u64,
    #[serde(rename = "successRate", default)]
    pub success_rate: f64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for Statistics {
    fn default() -> Self {
        Self {
            success_24h: 0,
            error_24h: 0,
            success_rate: 100.0,
            extra: Map::new(),
        }
    }
}
