use serde::Serialize;
use serde_json::Value;

/// JSON body posted to the `service.sbr` gateway.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_name: Option<&'a str>,
    pub request_body: &'a Value,
}

impl<'a> ServiceRequest<'a> {
    /// `{"requestBody": params}`
    pub fn anonymous(request_body: &'a Value) -> Self {
        Self {
            service_name: None,
            request_body,
        }
    }

    /// `{"serviceName": name, "requestBody": params}`
    pub fn named(service_name: &'a str, request_body: &'a Value) -> Self {
        Self {
            service_name: Some(service_name),
            request_body,
        }
    }
}
