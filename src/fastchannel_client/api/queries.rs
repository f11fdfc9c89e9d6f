use serde::Serialize;

use crate::fastchannel_client::helpers::OUTPUT_TYPE_JSON;

/// Query string of the `service.sbr` gateway.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceQuery<'a> {
    pub service_name: &'a str,
    pub output_type: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mge_session: Option<&'a str>,
}

impl<'a> ServiceQuery<'a> {
    pub fn new(service_name: &'a str, mge_session: Option<&'a str>) -> Self {
        Self {
            service_name,
            output_type: OUTPUT_TYPE_JSON,
            mge_session,
        }
    }
}

/// Query string of the direct servlet.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectQuery<'a> {
    pub service_name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mge_session: Option<&'a str>,
}

/// Parameters of `getIntegrationLogs`.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct LogsParams {
    pub limit: u32,
}
