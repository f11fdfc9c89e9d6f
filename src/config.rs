mod loader;
mod paths;
mod types;

pub use types::{Config, MessageTimerPolicy, TransportKind};

#[cfg(test)]
#[path = "config/tests/config_tests.rs"]
mod tests;
