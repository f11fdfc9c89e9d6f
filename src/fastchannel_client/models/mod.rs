mod health;
mod logs;
mod stats;
mod sync;
mod value;

pub use health::HealthStatus;
pub use logs::{LogEntry, LogsPayload};
pub use stats::Statistics;
pub use sync::SyncResult;
