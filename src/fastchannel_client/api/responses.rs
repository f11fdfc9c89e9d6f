use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::types::MonitorError;

/// Normalized reply of every RPC path: `{"responseBody": ...}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServiceResponse {
    #[serde(rename = "responseBody", default)]
    pub response_body: Option<Value>,
}

impl ServiceResponse {
    /// Wrap a raw service body into the envelope.
    pub fn wrap(body: Value) -> Self {
        Self {
            response_body: Some(body),
        }
    }

    /// Take `responseBody` out of an already enveloped reply. Replies that are
    /// not JSON objects carry no body.
    pub fn from_reply(reply: Value) -> Self {
        match reply {
            Value::Object(mut fields) => Self {
                response_body: fields.remove("responseBody"),
            },
            _ => Self::default(),
        }
    }

    /// The body, treating JSON `null` as absent.
    pub fn body(&self) -> Option<&Value> {
        self.response_body.as_ref().filter(|body| !body.is_null())
    }

    /// Decode the body into `T`. `Ok(None)` when the reply had no body.
    pub fn decode<T>(&self, service: &str) -> Result<Option<T>, MonitorError>
    where
        T: DeserializeOwned,
    {
        let Some(body) = self.body() else {
            return Ok(None);
        };
        T::deserialize(body)
            .map(Some)
            .map_err(|source| MonitorError::Decode {
                service: service.to_string(),
                source,
            })
    }
}

/// Reply of the session-authenticated gateway. `status` is `"1"` on success,
/// anything else carries a `statusMessage`.
#[derive(Debug, Deserialize)]
pub struct GatewayEnvelope {
    #[serde(default)]
    pub status: Option<Value>,
    #[serde(rename = "statusMessage", default)]
    pub status_message: Option<String>,
    #[serde(rename = "responseBody", default)]
    pub response_body: Option<Value>,
}

impl GatewayEnvelope {
    pub fn is_ok(&self) -> bool {
        match &self.status {
            None => true,
            Some(Value::String(status)) => status.trim() == "1",
            Some(Value::Number(status)) => status.as_u64() == Some(1),
            Some(_) => false,
        }
    }

    pub fn into_response(self) -> Result<ServiceResponse, MonitorError> {
        if self.is_ok() {
            Ok(ServiceResponse {
                response_body: self.response_body,
            })
        } else {
            Err(MonitorError::Service(self.status_message.unwrap_or_default()))
        }
    }
}
