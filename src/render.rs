//! Plain-text rendering of the monitor screen.

use chrono::{DateTime, Utc};

use crate::fastchannel_client::{format_relative_time, LogEntry};
use crate::monitor::{MessageKind, ViewState};

const EMPTY_FIELD: &str = "-";

pub fn render_screen(view: &ViewState) -> String {
    render_screen_at(view, Utc::now())
}

/// Render `view` with log timestamps relative to `now`.
pub fn render_screen_at(view: &ViewState, now: DateTime<Utc>) -> String {
    let mut lines = Vec::new();

    lines.push("== Monitor de Integracao Fastchannel ==".to_string());
    lines.push(format!(
        "API: {} [{}]",
        view.health.status,
        health_badge(view.health.online)
    ));
    lines.push(format!(
        "Sucesso (24h): {} | Erros (24h): {} | Taxa de sucesso: {:.1}%",
        view.stats.success_24h, view.stats.error_24h, view.stats.success_rate
    ));

    if view.syncing {
        lines.push("Sincronizando...".to_string());
    }

    if let Some(message) = &view.message {
        let tag = match message.kind {
            MessageKind::Success => "OK",
            MessageKind::Error => "ERRO",
        };
        lines.push(format!("[{tag}] {}", message.text));
    }

    lines.push(String::new());
    if view.logs.is_empty() {
        lines.push("Nenhum log encontrado".to_string());
    } else {
        lines.push(format!(
            "{:<12} {:<6} {:<16} {:<16} {}",
            "Quando", "Nivel", "Operacao", "Referencia", "Mensagem"
        ));
        lines.extend(view.logs.iter().map(|entry| render_log_line(entry, now)));
    }

    lines.join("\n")
}

fn health_badge(online: Option<bool>) -> &'static str {
    match online {
        Some(true) => "ONLINE",
        Some(false) => "OFFLINE",
        None => "?",
    }
}

fn render_log_line(entry: &LogEntry, now: DateTime<Utc>) -> String {
    let when = match entry.logged_at() {
        Some(at) => format_relative_time(at, now),
        None => entry
            .raw_timestamp()
            .unwrap_or_else(|| EMPTY_FIELD.to_string()),
    };

    if entry.raw().is_object() {
        format!(
            "{:<12} {:<6} {:<16} {:<16} {}",
            when,
            entry.level().unwrap_or(EMPTY_FIELD),
            entry.operation().unwrap_or(EMPTY_FIELD),
            entry.reference().unwrap_or(EMPTY_FIELD),
            entry.message().unwrap_or(EMPTY_FIELD)
        )
    } else {
        format!("{:<12} {}", when, entry.raw())
    }
}

#[cfg(test)]
#[path = "tests/render_tests.rs"]
mod tests;
