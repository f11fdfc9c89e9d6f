mod controller;
mod events;
mod sequence;
mod state;

pub use controller::{ControllerSettings, ScreenController, SyncOutcome};
pub use events::{StateChange, ViewUpdate};
pub use sequence::{RequestKind, RequestSequencer, RequestTicket};
pub use state::{Message, MessageKind, ViewState};
