//! Chat notification fan-out

pub mod dispatcher;
pub mod summary;

pub use dispatcher::{DispatcherSettings, NotificationDispatcher};
pub use summary::{DispatchStatus, DispatchSummary, FailureReason, RecipientOutcome, RecipientReport, SkipReason};
