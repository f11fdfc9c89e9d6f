use chrono::{DateTime, Utc};

pub const MONITOR_SERVICE: &str = "FastchannelMonitorSP";
pub const INTEGRATION_SERVICE: &str = "FastchannelIntegrationSP";

pub const SERVICE_GATEWAY_PATH: &str = "/mge/service.sbr";
pub const DIRECT_SERVLET_PATH: &str = "/mge/fc-direct";
pub const OUTPUT_TYPE_JSON: &str = "json";

pub fn full_service_name(service: &str, method: &str) -> String {
    format!("{service}.{method}")
}

pub fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

pub fn format_relative_time(at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let duration = now.signed_duration_since(at);
    if duration.num_seconds() < 60 {
        "just now".to_string()
    } else if duration.num_minutes() < 60 {
        format!("{} min ago", duration.num_minutes())
    } else if duration.num_hours() < 24 {
        format!("{} h ago", duration.num_hours())
    } else {
        format!("{} d ago", duration.num_days())
    }
}
