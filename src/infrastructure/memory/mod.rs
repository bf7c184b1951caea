//! In-memory store and gateway for tests and dry runs

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::application::errors::{PushError, StoreError};
use crate::domain::entities::{Conversation, PushNotification, UserProfile};
use crate::domain::traits::{DocumentStore, PushGateway, SendReport, TokenFailure, TokenResult};

/// HashMap-backed document store
#[derive(Default)]
pub struct MemoryStore {
    conversations: Arc<RwLock<HashMap<String, Conversation>>>,
    profiles: Arc<RwLock<HashMap<String, UserProfile>>>,
    unreadable: Arc<RwLock<HashSet<String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert_conversation(&self, conversation: Conversation) {
        let mut conversations = self.conversations.write().await;
        conversations.insert(conversation.id.clone(), conversation);
    }

    pub async fn insert_profile(&self, profile: UserProfile) {
        let mut profiles = self.profiles.write().await;
        profiles.insert(profile.id.clone(), profile);
    }

    /// Make every read of this document id fail with a store error
    pub async fn fail_reads_of(&self, id: impl Into<String>) {
        self.unreadable.write().await.insert(id.into());
    }

    pub async fn profile(&self, uid: &str) -> Option<UserProfile> {
        self.profiles.read().await.get(uid).cloned()
    }

    async fn check_readable(&self, id: &str) -> Result<(), StoreError> {
        if self.unreadable.read().await.contains(id) {
            return Err(StoreError::Request(format!("read of {} refused", id)));
        }
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn get_conversation(&self, id: &str) -> Result<Option<Conversation>, StoreError> {
        self.check_readable(id).await?;
        Ok(self.conversations.read().await.get(id).cloned())
    }

    async fn get_user_profile(&self, uid: &str) -> Result<Option<UserProfile>, StoreError> {
        self.check_readable(uid).await?;
        Ok(self.profiles.read().await.get(uid).cloned())
    }

    async fn remove_push_tokens(&self, uid: &str, tokens: &[String]) -> Result<(), StoreError> {
        let mut profiles = self.profiles.write().await;
        let profile = profiles
            .get_mut(uid)
            .ok_or_else(|| StoreError::Request(format!("no such user: {}", uid)))?;
        profile.push_tokens.retain(|t| !tokens.contains(t));
        Ok(())
    }
}

/// One recorded gateway call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentNotification {
    pub tokens: Vec<String>,
    pub notification: PushNotification,
}

/// Records every call instead of delivering it
#[derive(Default)]
pub struct MemoryGateway {
    sent: Arc<RwLock<Vec<SentNotification>>>,
    failing_tokens: Arc<RwLock<HashSet<String>>>,
    token_failures: Arc<RwLock<HashMap<String, TokenFailure>>>,
    latency: Option<Duration>,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
}

impl MemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hold each call open for `latency` before answering
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Any call that includes `token` fails as a whole
    pub async fn fail_calls_with(&self, token: impl Into<String>) {
        self.failing_tokens.write().await.insert(token.into());
    }

    /// Report `token` as rejected inside an otherwise successful call
    pub async fn reject_token(&self, token: impl Into<String>, failure: TokenFailure) {
        self.token_failures.write().await.insert(token.into(), failure);
    }

    pub async fn sent(&self) -> Vec<SentNotification> {
        self.sent.read().await.clone()
    }

    /// Highest number of calls observed running at once
    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }

    async fn deliver(
        &self,
        tokens: &[String],
        notification: &PushNotification,
    ) -> Result<SendReport, PushError> {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        {
            let failing = self.failing_tokens.read().await;
            if let Some(token) = tokens.iter().find(|t| failing.contains(*t)) {
                return Err(PushError::Rejected(format!("token {} refused", token)));
            }
        }

        self.sent.write().await.push(SentNotification {
            tokens: tokens.to_vec(),
            notification: notification.clone(),
        });
        tracing::info!(
            tokens = tokens.len(),
            title = %notification.title,
            body = %notification.body,
            link = %notification.click_target,
            "Recorded push notification"
        );

        let rejected = self.token_failures.read().await;
        let results = tokens
            .iter()
            .map(|t| match rejected.get(t) {
                Some(failure) => TokenResult::failed(t.clone(), failure.clone()),
                None => TokenResult::delivered(t.clone()),
            })
            .collect();
        Ok(SendReport::new(results))
    }
}

#[async_trait]
impl PushGateway for MemoryGateway {
    fn name(&self) -> &str {
        "memory"
    }

    async fn send_multicast(
        &self,
        tokens: &[String],
        notification: &PushNotification,
    ) -> Result<SendReport, PushError> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(now, Ordering::SeqCst);

        let result = self.deliver(tokens, notification).await;

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }
}
