//! Trigger adapters - feed created-message events to the dispatcher

pub mod console;

pub use console::{load_event, ConsoleListener, ListenStats};
