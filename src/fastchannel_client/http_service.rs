use async_trait::async_trait;
use serde_json::Value;

use crate::types::MonitorError;

use super::api::{ServiceQuery, ServiceRequest, ServiceResponse};
use super::client::RpcClient;
use super::core::HttpClient;
use super::helpers::{full_service_name, SERVICE_GATEWAY_PATH};

/// Plain `service.sbr` POST with `{"requestBody": params}`; the reply is
/// expected to be enveloped already.
pub struct HttpServiceClient {
    http: HttpClient,
}

impl HttpServiceClient {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }
}

#[async_trait]
impl RpcClient for HttpServiceClient {
    async fn invoke(
        &self,
        service: &str,
        method: &str,
        params: Value,
    ) -> Result<ServiceResponse, MonitorError> {
        let service_name = full_service_name(service, method);
        let query = ServiceQuery::new(&service_name, None);
        let reply = self
            .http
            .post_json(
                SERVICE_GATEWAY_PATH,
                &query,
                &ServiceRequest::anonymous(&params),
            )
            .await?;
        Ok(ServiceResponse::from_reply(reply))
    }
}
