//! Application layer - Use cases
//! 
//! This layer contains:
//! - Errors: Service, store, push and config errors
//! - Notifications: Chat message fan-out and its outcome summary

pub mod errors;
pub mod notifications;
