use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::json;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::config::{Config, MessageTimerPolicy};
use crate::fastchannel_client::{
    full_service_name, HealthStatus, LogsParams, LogsPayload, RpcClient, Statistics, SyncResult,
    INTEGRATION_SERVICE, MONITOR_SERVICE,
};
use crate::types::MonitorError;

use super::events::{StateChange, ViewUpdate};
use super::sequence::{RequestKind, RequestSequencer, RequestTicket};
use super::state::{Message, MessageKind, ViewState};

const UPDATE_CHANNEL_CAPACITY: usize = 256;

const LOGS_LOAD_FAILED: &str = "Erro ao carregar logs";
const SYNC_STARTED: &str = "Iniciando sincronizacao...";
const SYNC_COMPLETED: &str = "Sincronizacao concluida!";
const SYNC_FAILED: &str = "Erro na sincronizacao";
const UNKNOWN_ERROR: &str = "Erro desconhecido";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControllerSettings {
    pub message_ttl: Duration,
    pub message_timer: MessageTimerPolicy,
    pub log_limit: u32,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl ControllerSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            message_ttl: config.message_ttl(),
            message_timer: config.message_timer,
            log_limit: config.log_limit,
        }
    }
}

/// How a [`ScreenController::force_sync`] call ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Another sync was still running; nothing was sent.
    AlreadyRunning,
    Succeeded,
    /// The service answered with `success: false`.
    Rejected,
    /// The service answered without a body.
    Unreported,
    /// The request itself failed.
    Failed,
}

/// Controller behind the Fastchannel monitor screen.
///
/// Holds the view state, talks to the service layer through the injected
/// [`RpcClient`] and publishes a [`ViewUpdate`] after every state mutation.
/// Cloning is cheap; all clones drive the same screen.
#[derive(Clone)]
pub struct ScreenController {
    inner: Arc<Inner>,
}

struct Inner {
    rpc: Arc<dyn RpcClient>,
    settings: ControllerSettings,
    screen: Mutex<Screen>,
    updates: broadcast::Sender<ViewUpdate>,
    sequencer: RequestSequencer,
    message_timer: Mutex<Option<JoinHandle<()>>>,
}

#[derive(Default)]
struct Screen {
    view: ViewState,
    revision: u64,
    message_generation: u64,
}

impl Drop for Inner {
    fn drop(&mut self) {
        let pending = self
            .message_timer
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(handle) = pending {
            handle.abort();
        }
    }
}

impl ScreenController {
    pub fn new(rpc: Arc<dyn RpcClient>, settings: ControllerSettings) -> Self {
        let (updates, _) = broadcast::channel(UPDATE_CHANNEL_CAPACITY);
        Self {
            inner: Arc::new(Inner {
                rpc,
                settings,
                screen: Mutex::new(Screen::default()),
                updates,
                sequencer: RequestSequencer::default(),
                message_timer: Mutex::new(None),
            }),
        }
    }

    pub fn from_config(rpc: Arc<dyn RpcClient>, config: &Config) -> Self {
        Self::new(rpc, ControllerSettings::from_config(config))
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ViewUpdate> {
        self.inner.updates.subscribe()
    }

    pub fn snapshot(&self) -> ViewState {
        self.lock_screen().view.clone()
    }

    /// Fire the health check, statistics load and log load concurrently.
    /// The handles are returned for hosts that want to wait; nothing joins them otherwise.
    pub fn initialize(&self) -> Vec<JoinHandle<()>> {
        info!("Fastchannel monitor initialized");
        let health = self.clone();
        let stats = self.clone();
        let logs = self.clone();
        vec![
            tokio::spawn(async move { health.check_health().await }),
            tokio::spawn(async move { stats.load_stats().await }),
            tokio::spawn(async move { logs.load_logs().await }),
        ]
    }

    pub async fn check_health(&self) {
        let ticket = self.inner.sequencer.begin(RequestKind::Health);
        debug!("Checking API health");

        let result: Result<Option<HealthStatus>, MonitorError> = self
            .request(MONITOR_SERVICE, "getApiHealth", &json!({}))
            .await;
        match result {
            Ok(Some(health)) => {
                self.apply(ticket, StateChange::Health, |view| view.health = health);
            }
            Ok(None) => debug!("Health check answered without a body"),
            Err(err) => {
                warn!(error = ?err, "Health check failed");
                self.apply(ticket, StateChange::Health, |view| {
                    view.health = HealthStatus::offline()
                });
            }
        }
    }

    pub async fn load_stats(&self) {
        let ticket = self.inner.sequencer.begin(RequestKind::Stats);

        let result: Result<Option<Statistics>, MonitorError> = self
            .request(MONITOR_SERVICE, "getStatistics", &json!({}))
            .await;
        match result {
            Ok(Some(stats)) => {
                self.apply(ticket, StateChange::Stats, |view| view.stats = stats);
            }
            Ok(None) => debug!("Statistics answered without a body"),
            Err(err) => warn!(error = ?err, "Failed to load stats"),
        }
    }

    pub async fn load_logs(&self) {
        let ticket = self.inner.sequencer.begin(RequestKind::Logs);
        let params = LogsParams {
            limit: self.inner.settings.log_limit,
        };

        let result: Result<Option<LogsPayload>, MonitorError> = self
            .request(MONITOR_SERVICE, "getIntegrationLogs", &params)
            .await;
        match result {
            Ok(Some(LogsPayload { logs: Some(logs) })) => {
                debug!(count = logs.len(), "Integration logs loaded");
                self.apply(ticket, StateChange::Logs, |view| view.logs = logs);
            }
            Ok(_) => debug!("Log reply carried no entries"),
            Err(err) => {
                warn!(error = ?err, "Failed to load logs");
                if self.inner.sequencer.is_current(ticket) {
                    self.show_message(LOGS_LOAD_FAILED, MessageKind::Error);
                }
            }
        }
    }

    /// Ask the integration service to sync everything now.
    /// A call made while a sync is running returns immediately without a request.
    pub async fn force_sync(&self) -> SyncOutcome {
        {
            let mut screen = self.lock_screen();
            if screen.view.syncing {
                debug!("Sync already running, ignoring request");
                return SyncOutcome::AlreadyRunning;
            }
            screen.view.syncing = true;
            self.publish(&mut screen, StateChange::Syncing);
        }
        let syncing = SyncingGuard(self);
        self.show_message(SYNC_STARTED, MessageKind::Success);
        info!("Forcing Fastchannel sync");

        let result: Result<Option<SyncResult>, MonitorError> = self
            .request(INTEGRATION_SERVICE, "syncAll", &json!({}))
            .await;
        drop(syncing);

        match result {
            Ok(report) => {
                let outcome = match report {
                    Some(report) if report.success => {
                        info!(detail = ?report.message, "Sync finished");
                        self.show_message(
                            report.message_text().unwrap_or(SYNC_COMPLETED),
                            MessageKind::Success,
                        );
                        SyncOutcome::Succeeded
                    }
                    Some(report) => {
                        warn!(detail = ?report.message, "Sync reported failure");
                        self.show_message(
                            report.message_text().unwrap_or(SYNC_FAILED),
                            MessageKind::Error,
                        );
                        SyncOutcome::Rejected
                    }
                    None => SyncOutcome::Unreported,
                };
                tokio::join!(self.load_stats(), self.load_logs());
                outcome
            }
            Err(err) => {
                error!(error = ?err, "Sync failed");
                let detail = err
                    .user_message()
                    .unwrap_or_else(|| UNKNOWN_ERROR.to_string());
                self.show_message(format!("{SYNC_FAILED}: {detail}"), MessageKind::Error);
                SyncOutcome::Failed
            }
        }
    }

    async fn request<T, P>(
        &self,
        service: &str,
        method: &str,
        params: &P,
    ) -> Result<Option<T>, MonitorError>
    where
        T: DeserializeOwned,
        P: Serialize + ?Sized,
    {
        let service_name = full_service_name(service, method);
        let params = serde_json::to_value(params).map_err(|err| {
            MonitorError::Dispatch(format!("Failed to encode parameters for {service_name}: {err}"))
        })?;
        let response = self.inner.rpc.invoke(service, method, params).await?;
        response.decode(&service_name)
    }

    /// Apply a reply to the view state unless a newer request of the same kind was issued since.
    fn apply<F>(&self, ticket: RequestTicket, change: StateChange, mutate: F)
    where
        F: FnOnce(&mut ViewState),
    {
        let mut screen = self.lock_screen();
        if !self.inner.sequencer.is_current(ticket) {
            debug!(kind = ?ticket.kind, seq = ticket.seq, "Dropping stale reply");
            return;
        }
        mutate(&mut screen.view);
        self.publish(&mut screen, change);
    }

    fn set_syncing(&self, syncing: bool) {
        let mut screen = self.lock_screen();
        screen.view.syncing = syncing;
        self.publish(&mut screen, StateChange::Syncing);
    }

    fn show_message(&self, text: impl Into<String>, kind: MessageKind) {
        let generation = {
            let mut screen = self.lock_screen();
            screen.view.message = Some(Message {
                text: text.into(),
                kind,
            });
            screen.message_generation += 1;
            self.publish(&mut screen, StateChange::Message);
            screen.message_generation
        };
        self.schedule_message_clear(generation);
    }

    fn schedule_message_clear(&self, generation: u64) {
        let ttl = self.inner.settings.message_ttl;
        let policy = self.inner.settings.message_timer;
        let inner = Arc::downgrade(&self.inner);
        let handle = tokio::spawn(async move {
            tokio::time::sleep(ttl).await;
            if let Some(inner) = inner.upgrade() {
                ScreenController { inner }.clear_message(policy, generation);
            }
        });

        match policy {
            MessageTimerPolicy::Reset => {
                let previous = self
                    .inner
                    .message_timer
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .replace(handle);
                if let Some(previous) = previous {
                    previous.abort();
                }
            }
            // Earlier timers stay armed and clear whatever is on screen when they fire.
            MessageTimerPolicy::Legacy => drop(handle),
        }
    }

    fn clear_message(&self, policy: MessageTimerPolicy, generation: u64) {
        let mut screen = self.lock_screen();
        if policy == MessageTimerPolicy::Reset && screen.message_generation != generation {
            return;
        }
        if screen.view.message.take().is_some() {
            self.publish(&mut screen, StateChange::Message);
        }
    }

    fn publish(&self, screen: &mut Screen, change: StateChange) {
        screen.revision += 1;
        // No subscriber is fine: the state stays readable through snapshot().
        let _ = self.inner.updates.send(ViewUpdate {
            revision: screen.revision,
            change,
        });
    }

    fn lock_screen(&self) -> MutexGuard<'_, Screen> {
        self.inner
            .screen
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

/// Clears the syncing flag when the sync request ends, including when the
/// `force_sync` future is dropped mid-request.
struct SyncingGuard<'a>(&'a ScreenController);

impl Drop for SyncingGuard<'_> {
    fn drop(&mut self) {
        self.0.set_syncing(false);
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
