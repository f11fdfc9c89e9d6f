//! State-change notifications sent from the controller to whoever renders it.

/// Which part of the view state changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateChange {
    Health,
    Stats,
    Logs,
    Syncing,
    Message,
}

/// One notification per state mutation. `revision` increases by one each time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewUpdate {
    pub revision: u64,
    pub change: StateChange,
}
