//! jummix-notify - push notification fan-out for Jummix chat messages

pub mod application;
pub mod domain;
pub mod infrastructure;

pub use application::errors::ServiceError;
pub use application::notifications::{DispatchSummary, NotificationDispatcher};
pub use infrastructure::config::Config;
