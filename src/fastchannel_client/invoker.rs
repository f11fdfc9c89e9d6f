use async_trait::async_trait;
use serde_json::Value;

use crate::types::MonitorError;

use super::api::{DirectQuery, ServiceResponse};
use super::client::RpcClient;
use super::core::HttpClient;
use super::helpers::{full_service_name, DIRECT_SERVLET_PATH};

/// Legacy path through the direct servlet. The servlet takes the raw
/// parameters as the body and answers with the raw service result, which is
/// wrapped here.
pub struct InvokerClient {
    http: HttpClient,
}

impl InvokerClient {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }
}

#[async_trait]
impl RpcClient for InvokerClient {
    async fn invoke(
        &self,
        service: &str,
        method: &str,
        params: Value,
    ) -> Result<ServiceResponse, MonitorError> {
        let service_name = full_service_name(service, method);
        let query = DirectQuery {
            service_name: &service_name,
            mge_session: self.http.mge_session(),
        };
        let body = self
            .http
            .post_json(DIRECT_SERVLET_PATH, &query, &params)
            .await?;
        Ok(ServiceResponse::wrap(body))
    }
}
