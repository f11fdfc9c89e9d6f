mod api;
mod client;
mod core;
mod helpers;
mod http_service;
mod invoker;
mod models;
mod proxy;

pub use api::{LogsParams, ServiceResponse};
pub use client::{build_client, RpcClient};
pub use helpers::{
    format_relative_time, full_service_name, INTEGRATION_SERVICE, MONITOR_SERVICE,
};
pub use http_service::HttpServiceClient;
pub use invoker::InvokerClient;
pub use models::{HealthStatus, LogEntry, LogsPayload, Statistics, SyncResult};
pub use proxy::{ProxyCallClient, ServiceCall};

#[cfg(test)]
#[path = "tests/transport_tests.rs"]
mod transport_tests;

#[cfg(test)]
#[path = "tests/model_tests.rs"]
mod model_tests;
