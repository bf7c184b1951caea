use async_trait::async_trait;
use crate::domain::entities::{Conversation, UserProfile};
use crate::application::errors::StoreError;

/// DocumentStore trait - abstraction over the external document database
///
/// Absent documents are `Ok(None)`, never an error.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn get_conversation(&self, id: &str) -> Result<Option<Conversation>, StoreError>;

    async fn get_user_profile(&self, uid: &str) -> Result<Option<UserProfile>, StoreError>;

    /// Drop the given tokens from a user's registered push tokens
    async fn remove_push_tokens(&self, uid: &str, tokens: &[String]) -> Result<(), StoreError>;
}
