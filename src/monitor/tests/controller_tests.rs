use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::sync::broadcast::error::TryRecvError;

use super::*;
use crate::fastchannel_client::ServiceResponse;

enum Reply {
    Body(Value),
    Empty,
    Fail(MonitorError),
}

struct Scripted {
    delay: Duration,
    reply: Reply,
}

/// In-memory service layer: replies are queued per method and handed out in call order.
#[derive(Default)]
struct ScriptedRpc {
    replies: Mutex<HashMap<String, VecDeque<Scripted>>>,
    calls: Mutex<Vec<(String, Value)>>,
}

impl ScriptedRpc {
    fn reply(self, method: &str, body: Value) -> Self {
        self.push(method, Duration::ZERO, Reply::Body(body))
    }

    fn fail(self, method: &str, err: MonitorError) -> Self {
        self.push(method, Duration::ZERO, Reply::Fail(err))
    }

    fn push(self, method: &str, delay: Duration, reply: Reply) -> Self {
        self.replies
            .lock()
            .expect("replies lock")
            .entry(method.to_string())
            .or_default()
            .push_back(Scripted { delay, reply });
        self
    }

    fn calls_to(&self, method: &str) -> Vec<Value> {
        self.calls
            .lock()
            .expect("calls lock")
            .iter()
            .filter(|(name, _)| name.ends_with(&format!(".{method}")))
            .map(|(_, params)| params.clone())
            .collect()
    }
}

#[async_trait]
impl RpcClient for ScriptedRpc {
    async fn invoke(
        &self,
        service: &str,
        method: &str,
        params: Value,
    ) -> Result<ServiceResponse, MonitorError> {
        self.calls
            .lock()
            .expect("calls lock")
            .push((full_service_name(service, method), params));
        let scripted = {
            let mut replies = self.replies.lock().expect("replies lock");
            replies.get_mut(method).and_then(VecDeque::pop_front)
        };
        let Some(scripted) = scripted else {
            return Err(MonitorError::Dispatch(format!("no scripted reply for {method}")));
        };
        if !scripted.delay.is_zero() {
            tokio::time::sleep(scripted.delay).await;
        }
        match scripted.reply {
            Reply::Body(body) => Ok(ServiceResponse::wrap(body)),
            Reply::Empty => Ok(ServiceResponse::default()),
            Reply::Fail(err) => Err(err),
        }
    }
}

fn controller_with(rpc: ScriptedRpc) -> (ScreenController, Arc<ScriptedRpc>) {
    controller_with_settings(rpc, ControllerSettings::default())
}

fn controller_with_settings(
    rpc: ScriptedRpc,
    settings: ControllerSettings,
) -> (ScreenController, Arc<ScriptedRpc>) {
    let rpc = Arc::new(rpc);
    let controller = ScreenController::new(rpc.clone(), settings);
    (controller, rpc)
}

fn drain(updates: &mut broadcast::Receiver<ViewUpdate>) -> Vec<StateChange> {
    let mut changes = Vec::new();
    loop {
        match updates.try_recv() {
            Ok(update) => changes.push(update.change),
            Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => return changes,
            Err(TryRecvError::Lagged(_)) => continue,
        }
    }
}

fn message_of(controller: &ScreenController) -> Option<(String, MessageKind)> {
    controller
        .snapshot()
        .message
        .map(|message| (message.text, message.kind))
}

fn sample_logs() -> Value {
    json!([
        {"id": 2, "nivel": "ERROR", "operacao": "PRICE_SYNC", "mensagem": "timeout"},
        {"id": 1, "nivel": "INFO", "operacao": "STOCK_SYNC", "mensagem": "ok"}
    ])
}

#[test]
fn new_controller_shows_placeholders() {
    let view = ViewState::default();
    assert_eq!(view.health.status, "Verificando...");
    assert_eq!(view.health.online, None);
    assert_eq!(view.stats.success_24h, 0);
    assert_eq!(view.stats.error_24h, 0);
    assert_eq!(view.stats.success_rate, 100.0);
    assert!(view.logs.is_empty());
    assert!(!view.syncing);
    assert!(view.message.is_none());
}

#[tokio::test]
async fn initialize_fires_all_three_loads() {
    let rpc = ScriptedRpc::default()
        .reply("getApiHealth", json!({"status": "ONLINE", "online": true}))
        .reply(
            "getStatistics",
            json!({"success24h": 40, "error24h": 2, "successRate": 95.2}),
        )
        .reply("getIntegrationLogs", json!({"logs": sample_logs()}));
    let (controller, rpc) = controller_with(rpc);

    for handle in controller.initialize() {
        handle.await.expect("load task");
    }

    let view = controller.snapshot();
    assert_eq!(view.health.status, "ONLINE");
    assert_eq!(view.health.online, Some(true));
    assert_eq!(view.stats.success_24h, 40);
    assert_eq!(view.stats.success_rate, 95.2);
    assert_eq!(view.logs.len(), 2);
    assert!(view.message.is_none());

    assert_eq!(rpc.calls_to("getApiHealth"), vec![json!({})]);
    assert_eq!(rpc.calls_to("getStatistics"), vec![json!({})]);
    assert_eq!(rpc.calls_to("getIntegrationLogs"), vec![json!({"limit": 50})]);
}

#[tokio::test]
async fn each_successful_load_emits_exactly_one_update() {
    let rpc = ScriptedRpc::default()
        .reply("getApiHealth", json!({"status": "ONLINE", "online": true}))
        .reply(
            "getStatistics",
            json!({"success24h": 1, "error24h": 0, "successRate": 100}),
        )
        .reply("getIntegrationLogs", json!({"logs": []}));
    let (controller, _rpc) = controller_with(rpc);
    let mut updates = controller.subscribe();

    controller.check_health().await;
    assert_eq!(drain(&mut updates), vec![StateChange::Health]);

    controller.load_stats().await;
    assert_eq!(drain(&mut updates), vec![StateChange::Stats]);

    controller.load_logs().await;
    assert_eq!(drain(&mut updates), vec![StateChange::Logs]);
}

#[tokio::test]
async fn revisions_increase_by_one_per_update() {
    let rpc = ScriptedRpc::default()
        .reply("getApiHealth", json!({"status": "ONLINE", "online": true}))
        .reply("getApiHealth", json!({"status": "DEGRADED", "online": true}));
    let (controller, _rpc) = controller_with(rpc);
    let mut updates = controller.subscribe();

    controller.check_health().await;
    controller.check_health().await;

    let first = updates.try_recv().expect("first update");
    let second = updates.try_recv().expect("second update");
    assert_eq!(second.revision, first.revision + 1);
}

#[tokio::test]
async fn health_reply_replaces_status_verbatim() {
    let rpc = ScriptedRpc::default().reply(
        "getApiHealth",
        json!({"status": "ONLINE", "online": true, "tokenValid": true}),
    );
    let (controller, _rpc) = controller_with(rpc);

    controller.check_health().await;

    let health = controller.snapshot().health;
    assert_eq!(health.status, "ONLINE");
    assert_eq!(health.extra.get("tokenValid"), Some(&json!(true)));
}

#[tokio::test]
async fn health_reply_with_loose_types_is_not_offline() {
    let rpc = ScriptedRpc::default()
        .reply("getApiHealth", json!({"status": "ONLINE", "online": 1}))
        .reply("getApiHealth", json!({"status": null, "online": true}));
    let (controller, _rpc) = controller_with(rpc);

    controller.check_health().await;
    let health = controller.snapshot().health;
    assert_eq!(health.status, "ONLINE");
    assert_eq!(health.online, Some(true));

    controller.check_health().await;
    let health = controller.snapshot().health;
    assert_eq!(health.status, "");
    assert_eq!(health.online, Some(true));
}

#[tokio::test]
async fn health_failure_sets_offline_sentinel_silently() {
    let rpc = ScriptedRpc::default().fail(
        "getApiHealth",
        MonitorError::Service("token expired, please reauthenticate".to_string()),
    );
    let (controller, _rpc) = controller_with(rpc);

    controller.check_health().await;

    let view = controller.snapshot();
    assert_eq!(view.health, HealthStatus::offline());
    assert_eq!(view.health.status, "OFFLINE");
    assert_eq!(view.health.online, Some(false));
    assert!(view.message.is_none());
}

#[tokio::test]
async fn health_reply_without_body_changes_nothing() {
    let rpc = ScriptedRpc::default().push("getApiHealth", Duration::ZERO, Reply::Empty);
    let (controller, _rpc) = controller_with(rpc);
    let mut updates = controller.subscribe();

    controller.check_health().await;

    assert_eq!(controller.snapshot().health, HealthStatus::checking());
    assert!(drain(&mut updates).is_empty());
}

#[tokio::test]
async fn stats_failure_keeps_previous_values() {
    let rpc = ScriptedRpc::default()
        .reply(
            "getStatistics",
            json!({"success24h": 12, "error24h": 1, "successRate": 92.3}),
        )
        .fail("getStatistics", MonitorError::HttpStatus(503));
    let (controller, _rpc) = controller_with(rpc);

    controller.load_stats().await;
    let before = controller.snapshot().stats;
    let mut updates = controller.subscribe();

    controller.load_stats().await;

    assert_eq!(controller.snapshot().stats, before);
    assert!(controller.snapshot().message.is_none());
    assert!(drain(&mut updates).is_empty());
}

#[tokio::test]
async fn mismatched_stats_body_is_treated_as_failure() {
    let rpc = ScriptedRpc::default().reply("getStatistics", json!({"success24h": "lots"}));
    let (controller, _rpc) = controller_with(rpc);

    controller.load_stats().await;

    assert_eq!(controller.snapshot().stats, Statistics::default());
}

#[tokio::test]
async fn logs_failure_keeps_entries_and_reports_once() {
    let rpc = ScriptedRpc::default()
        .reply("getIntegrationLogs", json!({"logs": sample_logs()}))
        .fail("getIntegrationLogs", MonitorError::HttpStatus(500));
    let (controller, _rpc) = controller_with(rpc);

    controller.load_logs().await;
    let before = controller.snapshot().logs;
    let mut updates = controller.subscribe();

    controller.load_logs().await;

    let view = controller.snapshot();
    assert_eq!(view.logs, before);
    assert_eq!(
        message_of(&controller),
        Some(("Erro ao carregar logs".to_string(), MessageKind::Error))
    );
    assert_eq!(drain(&mut updates), vec![StateChange::Message]);
}

#[tokio::test]
async fn logs_reply_without_logs_field_keeps_entries() {
    let rpc = ScriptedRpc::default()
        .reply("getIntegrationLogs", json!({"logs": sample_logs()}))
        .reply("getIntegrationLogs", json!({"total": 0}));
    let (controller, _rpc) = controller_with(rpc);

    controller.load_logs().await;
    controller.load_logs().await;

    assert_eq!(controller.snapshot().logs.len(), 2);
}

#[tokio::test]
async fn logs_request_uses_configured_limit() {
    let rpc = ScriptedRpc::default().reply("getIntegrationLogs", json!({"logs": []}));
    let settings = ControllerSettings {
        log_limit: 10,
        ..ControllerSettings::default()
    };
    let (controller, rpc) = controller_with_settings(rpc, settings);

    controller.load_logs().await;

    assert_eq!(rpc.calls_to("getIntegrationLogs"), vec![json!({"limit": 10})]);
}

#[tokio::test]
async fn force_sync_success_shows_server_message_and_reloads() {
    let rpc = ScriptedRpc::default()
        .reply("syncAll", json!({"success": true, "message": "X"}))
        .reply(
            "getStatistics",
            json!({"success24h": 7, "error24h": 0, "successRate": 100}),
        )
        .reply("getIntegrationLogs", json!({"logs": sample_logs()}));
    let (controller, rpc) = controller_with(rpc);

    let outcome = controller.force_sync().await;

    assert_eq!(outcome, SyncOutcome::Succeeded);
    let view = controller.snapshot();
    assert!(!view.syncing);
    assert_eq!(
        message_of(&controller),
        Some(("X".to_string(), MessageKind::Success))
    );
    assert_eq!(view.stats.success_24h, 7);
    assert_eq!(view.logs.len(), 2);
    assert_eq!(rpc.calls_to("syncAll"), vec![json!({})]);
    assert_eq!(rpc.calls_to("getStatistics").len(), 1);
    assert_eq!(rpc.calls_to("getIntegrationLogs").len(), 1);
}

#[tokio::test]
async fn force_sync_success_without_message_uses_default_text() {
    let rpc = ScriptedRpc::default()
        .reply("syncAll", json!({"success": true}))
        .reply("getStatistics", json!({}))
        .reply("getIntegrationLogs", json!({"logs": []}));
    let (controller, _rpc) = controller_with(rpc);

    controller.force_sync().await;

    assert_eq!(
        message_of(&controller),
        Some(("Sincronizacao concluida!".to_string(), MessageKind::Success))
    );
}

#[tokio::test]
async fn force_sync_accepts_string_success_flag() {
    let rpc = ScriptedRpc::default()
        .reply("syncAll", json!({"success": "true", "message": "ok"}))
        .reply("getStatistics", json!({"success24h": 3}))
        .reply("getIntegrationLogs", json!({"logs": []}));
    let (controller, rpc) = controller_with(rpc);

    let outcome = controller.force_sync().await;

    assert_eq!(outcome, SyncOutcome::Succeeded);
    assert_eq!(
        message_of(&controller),
        Some(("ok".to_string(), MessageKind::Success))
    );
    assert_eq!(controller.snapshot().stats.success_24h, 3);
    assert_eq!(rpc.calls_to("getStatistics").len(), 1);
    assert_eq!(rpc.calls_to("getIntegrationLogs").len(), 1);
}

#[tokio::test]
async fn force_sync_rejection_shows_error_and_still_reloads() {
    let rpc = ScriptedRpc::default()
        .reply("syncAll", json!({"success": false}))
        .reply("getStatistics", json!({}))
        .reply("getIntegrationLogs", json!({"logs": []}));
    let (controller, rpc) = controller_with(rpc);

    let outcome = controller.force_sync().await;

    assert_eq!(outcome, SyncOutcome::Rejected);
    assert_eq!(
        message_of(&controller),
        Some(("Erro na sincronizacao".to_string(), MessageKind::Error))
    );
    assert_eq!(rpc.calls_to("getStatistics").len(), 1);
    assert_eq!(rpc.calls_to("getIntegrationLogs").len(), 1);
}

#[tokio::test]
async fn force_sync_without_report_keeps_start_message_and_reloads() {
    let rpc = ScriptedRpc::default()
        .push("syncAll", Duration::ZERO, Reply::Empty)
        .reply("getStatistics", json!({}))
        .reply("getIntegrationLogs", json!({"logs": []}));
    let (controller, rpc) = controller_with(rpc);

    let outcome = controller.force_sync().await;

    assert_eq!(outcome, SyncOutcome::Unreported);
    assert_eq!(
        message_of(&controller),
        Some(("Iniciando sincronizacao...".to_string(), MessageKind::Success))
    );
    assert_eq!(rpc.calls_to("getStatistics").len(), 1);
}

#[tokio::test]
async fn force_sync_failure_prefixes_error_and_skips_reload() {
    let rpc = ScriptedRpc::default().fail("syncAll", MonitorError::HttpStatus(502));
    let (controller, rpc) = controller_with(rpc);

    let outcome = controller.force_sync().await;

    assert_eq!(outcome, SyncOutcome::Failed);
    assert!(!controller.snapshot().syncing);
    assert_eq!(
        message_of(&controller),
        Some((
            "Erro na sincronizacao: HTTP 502".to_string(),
            MessageKind::Error
        ))
    );
    assert!(rpc.calls_to("getStatistics").is_empty());
    assert!(rpc.calls_to("getIntegrationLogs").is_empty());
}

#[tokio::test]
async fn force_sync_failure_without_text_reports_unknown_error() {
    let rpc = ScriptedRpc::default().fail("syncAll", MonitorError::Service(String::new()));
    let (controller, _rpc) = controller_with(rpc);

    controller.force_sync().await;

    assert_eq!(
        message_of(&controller),
        Some((
            "Erro na sincronizacao: Erro desconhecido".to_string(),
            MessageKind::Error
        ))
    );
}

#[tokio::test(start_paused = true)]
async fn force_sync_is_ignored_while_running() {
    let rpc = ScriptedRpc::default()
        .push(
            "syncAll",
            Duration::from_millis(100),
            Reply::Body(json!({"success": true})),
        )
        .reply("getStatistics", json!({}))
        .reply("getIntegrationLogs", json!({"logs": []}));
    let (controller, rpc) = controller_with(rpc);
    let mut updates = controller.subscribe();

    let running = tokio::spawn({
        let controller = controller.clone();
        async move { controller.force_sync().await }
    });
    loop {
        let update = updates.recv().await.expect("update");
        if update.change == StateChange::Syncing {
            break;
        }
    }

    let before = controller.snapshot();
    assert!(before.syncing);
    assert_eq!(controller.force_sync().await, SyncOutcome::AlreadyRunning);
    assert_eq!(controller.snapshot(), before);
    assert_eq!(rpc.calls_to("syncAll").len(), 1);

    assert_eq!(running.await.expect("sync task"), SyncOutcome::Succeeded);
    assert!(!controller.snapshot().syncing);
}

#[tokio::test(start_paused = true)]
async fn abandoned_sync_releases_the_guard() {
    let rpc = ScriptedRpc::default()
        .push(
            "syncAll",
            Duration::from_millis(100),
            Reply::Body(json!({"success": true})),
        )
        .reply("syncAll", json!({"success": true}))
        .reply("getStatistics", json!({}))
        .reply("getIntegrationLogs", json!({"logs": []}));
    let (controller, rpc) = controller_with(rpc);
    let mut updates = controller.subscribe();

    let abandoned = tokio::time::timeout(Duration::from_millis(10), controller.force_sync()).await;
    assert!(abandoned.is_err());
    assert!(!controller.snapshot().syncing);
    let changes = drain(&mut updates);
    assert_eq!(changes.first(), Some(&StateChange::Syncing));
    assert_eq!(changes.last(), Some(&StateChange::Syncing));

    assert_eq!(controller.force_sync().await, SyncOutcome::Succeeded);
    assert_eq!(rpc.calls_to("syncAll").len(), 2);
    assert!(!controller.snapshot().syncing);
}

#[tokio::test(start_paused = true)]
async fn stale_reply_does_not_overwrite_newer_one() {
    let rpc = ScriptedRpc::default()
        .push(
            "getStatistics",
            Duration::from_millis(100),
            Reply::Body(json!({"success24h": 1, "error24h": 0, "successRate": 100})),
        )
        .push(
            "getStatistics",
            Duration::from_millis(10),
            Reply::Body(json!({"success24h": 2, "error24h": 0, "successRate": 100})),
        );
    let (controller, _rpc) = controller_with(rpc);
    let mut updates = controller.subscribe();

    tokio::join!(controller.load_stats(), controller.load_stats());

    assert_eq!(controller.snapshot().stats.success_24h, 2);
    assert_eq!(drain(&mut updates), vec![StateChange::Stats]);
}

#[tokio::test(start_paused = true)]
async fn stale_health_failure_does_not_mark_offline() {
    let rpc = ScriptedRpc::default()
        .push(
            "getApiHealth",
            Duration::from_millis(100),
            Reply::Fail(MonitorError::HttpStatus(504)),
        )
        .push(
            "getApiHealth",
            Duration::from_millis(10),
            Reply::Body(json!({"status": "ONLINE", "online": true})),
        );
    let (controller, _rpc) = controller_with(rpc);

    tokio::join!(controller.check_health(), controller.check_health());

    assert_eq!(controller.snapshot().health.online, Some(true));
}

#[tokio::test(start_paused = true)]
async fn message_clears_after_ttl() {
    let (controller, _rpc) = controller_with(ScriptedRpc::default());
    let mut updates = controller.subscribe();

    controller.show_message("hello", MessageKind::Success);
    tokio::time::sleep(Duration::from_millis(4990)).await;
    assert!(controller.snapshot().message.is_some());

    tokio::time::sleep(Duration::from_millis(20)).await;
    assert!(controller.snapshot().message.is_none());
    assert_eq!(
        drain(&mut updates),
        vec![StateChange::Message, StateChange::Message]
    );
}

#[tokio::test(start_paused = true)]
async fn reset_timer_restarts_delay_for_new_message() {
    let (controller, _rpc) = controller_with(ScriptedRpc::default());

    controller.show_message("first", MessageKind::Success);
    tokio::time::sleep(Duration::from_millis(1000)).await;
    controller.show_message("second", MessageKind::Error);

    tokio::time::sleep(Duration::from_millis(4010)).await;
    assert_eq!(
        message_of(&controller),
        Some(("second".to_string(), MessageKind::Error))
    );

    tokio::time::sleep(Duration::from_millis(1000)).await;
    assert!(controller.snapshot().message.is_none());
}

#[tokio::test(start_paused = true)]
async fn legacy_timer_clears_second_message_at_first_deadline() {
    let settings = ControllerSettings {
        message_timer: MessageTimerPolicy::Legacy,
        ..ControllerSettings::default()
    };
    let (controller, _rpc) = controller_with_settings(ScriptedRpc::default(), settings);

    controller.show_message("first", MessageKind::Success);
    tokio::time::sleep(Duration::from_millis(1000)).await;
    controller.show_message("second", MessageKind::Error);

    tokio::time::sleep(Duration::from_millis(3990)).await;
    assert_eq!(
        message_of(&controller),
        Some(("second".to_string(), MessageKind::Error))
    );

    tokio::time::sleep(Duration::from_millis(20)).await;
    assert!(controller.snapshot().message.is_none());
}
