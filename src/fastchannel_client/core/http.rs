use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::config::Config;
use crate::fastchannel_client::helpers::join_url;
use crate::types::MonitorError;

/// Thin reqwest wrapper shared by the HTTP-based RPC paths.
#[derive(Clone)]
pub struct HttpClient {
    http: Client,
    base_url: String,
    mge_session: Option<String>,
}

impl HttpClient {
    pub fn new(config: &Config) -> Result<Self, MonitorError> {
        let http = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(MonitorError::Network)?;

        Ok(Self {
            http,
            base_url: config.base_url.clone(),
            mge_session: config.mge_session.clone(),
        })
    }

    pub fn mge_session(&self) -> Option<&str> {
        self.mge_session.as_deref()
    }

    /// POST `body` as JSON to `path` and parse the reply as JSON.
    /// - non-2xx replies become `HttpStatus`
    /// - unparsable replies become `Parse`
    /// - connection failures and timeouts become `Network`
    pub async fn post_json<Q, B>(&self, path: &str, query: &Q, body: &B) -> Result<Value, MonitorError>
    where
        Q: Serialize + ?Sized,
        B: Serialize + ?Sized,
    {
        let payload = serde_json::to_vec(body)
            .map_err(|err| MonitorError::Dispatch(format!("Failed to encode request: {err}")))?;
        let url = join_url(&self.base_url, path);
        debug!(url = %url, bytes = payload.len(), "Posting service request");

        let response = self
            .http
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .query(query)
            .body(payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(MonitorError::HttpStatus(status.as_u16()));
        }

        let text = response.text().await?;
        serde_json::from_str(&text).map_err(MonitorError::Parse)
    }
}
