use std::sync::atomic::{AtomicU64, Ordering};

/// Read operations whose late replies may race each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestKind {
    Health,
    Stats,
    Logs,
}

/// Identity of one issued request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestTicket {
    pub kind: RequestKind,
    pub seq: u64,
}

/// Monotonic request counters, one per [`RequestKind`]. A reply is only
/// applied while its ticket is still the newest of its kind.
#[derive(Debug, Default)]
pub struct RequestSequencer {
    health: AtomicU64,
    stats: AtomicU64,
    logs: AtomicU64,
}

impl RequestSequencer {
    pub fn begin(&self, kind: RequestKind) -> RequestTicket {
        let seq = self.counter(kind).fetch_add(1, Ordering::SeqCst) + 1;
        RequestTicket { kind, seq }
    }

    pub fn is_current(&self, ticket: RequestTicket) -> bool {
        self.counter(ticket.kind).load(Ordering::SeqCst) == ticket.seq
    }

    fn counter(&self, kind: RequestKind) -> &AtomicU64 {
        match kind {
            RequestKind::Health => &self.health,
            RequestKind::Stats => &self.stats,
            RequestKind::Logs => &self.logs,
        }
    }
}
