//! Domain traits - Abstractions for infrastructure implementations

pub mod push;
pub mod store;

pub use push::{PushGateway, SendReport, TokenFailure, TokenResult};
pub use store::DocumentStore;
