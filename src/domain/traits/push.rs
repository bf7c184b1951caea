use async_trait::async_trait;
use serde::Serialize;
use crate::domain::entities::PushNotification;
use crate::application::errors::PushError;

/// PushGateway trait - abstraction for push-notification providers
#[async_trait]
pub trait PushGateway: Send + Sync {
    /// Get the gateway name
    fn name(&self) -> &str;

    /// Send one notification to every token of a single recipient.
    ///
    /// `Err` means the call as a whole failed; per-token failures are
    /// reported in the returned [`SendReport`].
    async fn send_multicast(
        &self,
        tokens: &[String],
        notification: &PushNotification,
    ) -> Result<SendReport, PushError>;
}

/// Why the gateway rejected a single token
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum TokenFailure {
    /// The device is no longer registered
    Unregistered,
    /// The token is malformed or belongs to another project
    InvalidToken,
    Other(String),
}

impl TokenFailure {
    /// Stale tokens will never succeed again and may be evicted
    pub fn is_stale(&self) -> bool {
        matches!(self, TokenFailure::Unregistered | TokenFailure::InvalidToken)
    }
}

/// Delivery result for one token
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenResult {
    pub token: String,
    pub failure: Option<TokenFailure>,
}

impl TokenResult {
    pub fn delivered(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            failure: None,
        }
    }

    pub fn failed(token: impl Into<String>, failure: TokenFailure) -> Self {
        Self {
            token: token.into(),
            failure: Some(failure),
        }
    }

    pub fn is_success(&self) -> bool {
        self.failure.is_none()
    }
}

/// Per-token results of one gateway call
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SendReport {
    pub results: Vec<TokenResult>,
}

impl SendReport {
    pub fn new(results: Vec<TokenResult>) -> Self {
        Self { results }
    }

    pub fn success_count(&self) -> usize {
        self.results.iter().filter(|r| r.is_success()).count()
    }

    pub fn failure_count(&self) -> usize {
        self.results.len() - self.success_count()
    }

    pub fn stale_tokens(&self) -> Vec<String> {
        self.results
            .iter()
            .filter(|r| r.failure.as_ref().is_some_and(TokenFailure::is_stale))
            .map(|r| r.token.clone())
            .collect()
    }
}
