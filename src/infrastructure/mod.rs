//! Infrastructure layer - External concerns
//! 
//! This layer contains:
//! - Config: Configuration loading
//! - Firestore: Document store over the REST API
//! - FCM: Push gateway over the HTTP v1 API
//! - Memory: In-process store and gateway for tests and dry runs
//! - Adapters: Trigger sources (event files, stdin stream)

pub mod adapters;
pub mod config;
pub mod fcm;
pub mod firestore;
pub mod http;
pub mod memory;

#[cfg(test)]
pub(crate) mod test_server;
