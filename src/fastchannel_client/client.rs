use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::info;

use crate::config::{Config, TransportKind};
use crate::types::MonitorError;

use super::api::ServiceResponse;
use super::core::HttpClient;
use super::http_service::HttpServiceClient;
use super::invoker::InvokerClient;
use super::proxy::ProxyCallClient;

/// Invokes a named remote procedure of the ERP service layer.
///
/// Every implementation resolves each call exactly once, and a successful
/// reply is always normalized to the `{"responseBody": ...}` envelope.
#[async_trait]
pub trait RpcClient: Send + Sync {
    async fn invoke(
        &self,
        service: &str,
        method: &str,
        params: Value,
    ) -> Result<ServiceResponse, MonitorError>;
}

/// Build the RPC path selected by `config.transport`.
pub fn build_client(config: &Config) -> Result<Arc<dyn RpcClient>, MonitorError> {
    let http = HttpClient::new(config)?;
    let client: Arc<dyn RpcClient> = match config.transport {
        TransportKind::Proxy => Arc::new(ProxyCallClient::new(http)),
        TransportKind::Invoker => Arc::new(InvokerClient::new(http)),
        TransportKind::Http => Arc::new(HttpServiceClient::new(http)),
    };
    info!(
        transport = %config.transport,
        base_url = %config.base_url,
        "RPC transport ready"
    );
    Ok(client)
}
