use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use crate::types::MonitorError;

use super::api::{GatewayEnvelope, ServiceQuery, ServiceRequest, ServiceResponse};
use super::client::RpcClient;
use super::core::HttpClient;
use super::helpers::{full_service_name, SERVICE_GATEWAY_PATH};

/// Preferred path: prepared calls against the session-authenticated gateway.
pub struct ProxyCallClient {
    http: HttpClient,
}

/// A call prepared by [`ProxyCallClient::create_call`], consumed by `execute`.
pub struct ServiceCall<'a> {
    http: &'a HttpClient,
    service_name: String,
    params: Value,
}

impl ProxyCallClient {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    pub fn create_call(&self, service_name: String, params: Value) -> ServiceCall<'_> {
        ServiceCall {
            http: &self.http,
            service_name,
            params,
        }
    }
}

impl ServiceCall<'_> {
    pub async fn execute(self) -> Result<ServiceResponse, MonitorError> {
        let query = ServiceQuery::new(&self.service_name, self.http.mge_session());
        let body = ServiceRequest::named(&self.service_name, &self.params);
        let reply = self
            .http
            .post_json(SERVICE_GATEWAY_PATH, &query, &body)
            .await?;

        let envelope: GatewayEnvelope = serde_json::from_value(reply).map_err(MonitorError::Parse)?;
        if !envelope.is_ok() {
            debug!(
                service = %self.service_name,
                status = ?envelope.status,
                "Gateway rejected service call"
            );
        }
        envelope.into_response()
    }
}

#[async_trait]
impl RpcClient for ProxyCallClient {
    async fn invoke(
        &self,
        service: &str,
        method: &str,
        params: Value,
    ) -> Result<ServiceResponse, MonitorError> {
        self.create_call(full_service_name(service, method), params)
            .execute()
            .await
    }
}
