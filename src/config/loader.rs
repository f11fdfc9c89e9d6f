use std::env;
use std::path::Path;

use tokio::fs;
use tracing::{debug, info, warn};

use crate::types::MonitorError;

use super::{paths, Config};

const ENV_BASE_URL: &str = "FASTCHANNEL_BASE_URL";
const ENV_TRANSPORT: &str = "FASTCHANNEL_TRANSPORT";
const ENV_MGE_SESSION: &str = "FASTCHANNEL_MGE_SESSION";

impl Config {
    /// Load configuration from `explicit` or from config.json in the app directory,
    /// then apply environment overrides.
    /// Falls back to defaults if the file doesn't exist or can't be parsed
    pub async fn load(explicit: Option<&Path>) -> Self {
        let config_path = match explicit {
            Some(path) => path.to_path_buf(),
            None => paths::get_config_path(),
        };

        let mut config = match Self::try_load(&config_path).await {
            Ok(config) => config,
            Err(err) => {
                warn!(error = ?err, "Failed to load config.json, using defaults");
                Self::default()
            }
        };
        config.apply_overrides(|key| env::var(key).ok());

        info!(
            base_url = %config.base_url,
            transport = %config.transport,
            session = config.mge_session.is_some(),
            "Loaded configuration"
        );
        config
    }

    async fn try_load(config_path: &Path) -> Result<Self, MonitorError> {
        if !config_path.exists() {
            warn!(path = %config_path.display(), "Config file not found, using defaults");
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(config_path)
            .await
            .map_err(|err| MonitorError::Config(format!("Failed to read config file: {err}")))?;

        Self::from_json(&contents)
    }

    pub fn from_json(contents: &str) -> Result<Self, MonitorError> {
        serde_json::from_str(contents)
            .map_err(|err| MonitorError::Config(format!("Failed to parse config.json: {err}")))
    }

    /// Apply `FASTCHANNEL_*` overrides. Blank or invalid values are ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        if let Some(base_url) = read(ENV_BASE_URL) {
            debug!(base_url = %base_url, "Base URL overridden from environment");
            self.base_url = base_url;
        }

        if let Some(raw) = read(ENV_TRANSPORT) {
            match raw.parse() {
                Ok(transport) => self.transport = transport,
                Err(err) => warn!(value = %raw, error = %err, "Ignoring transport override"),
            }
        }

        if let Some(session) = read(ENV_MGE_SESSION) {
            self.mge_session = Some(session);
        }
    }
}
