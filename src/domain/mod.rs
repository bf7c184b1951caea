//! Domain layer - Core notification model with no external dependencies
//! 
//! This layer contains:
//! - Entities: Document projections (Conversation, ChatMessage, UserProfile) and the push payload
//! - Traits: Abstractions for infrastructure (DocumentStore, PushGateway)

pub mod entities;
pub mod traits;
