//! Notification dispatcher - Fans a new chat message out to the other participants

use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinHandle;

use crate::domain::entities::{MessageCreated, PushNotification};
use crate::domain::traits::{DocumentStore, PushGateway};
use super::summary::{DispatchStatus, DispatchSummary, FailureReason, RecipientOutcome, SkipReason};

/// Tunables for the fan-out
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatcherSettings {
    /// Where the notification leads when tapped (the chat list)
    pub click_target: String,
    /// Shown when the sender has no readable display name
    pub fallback_sender_name: String,
    /// Upper bound on recipient sends in flight, shared by all invocations
    pub max_concurrency: usize,
    /// Evict tokens the gateway reports as unregistered or invalid
    pub prune_stale_tokens: bool,
}

impl Default for DispatcherSettings {
    fn default() -> Self {
        Self {
            click_target: "/chats".to_string(),
            fallback_sender_name: "Someone".to_string(),
            max_concurrency: 16,
            prune_stale_tokens: false,
        }
    }
}

/// Handles one `MessageCreated` event at a time; safe to share across tasks
pub struct NotificationDispatcher {
    store: Arc<dyn DocumentStore>,
    gateway: Arc<dyn PushGateway>,
    settings: DispatcherSettings,
    limiter: Arc<Semaphore>,
}

impl NotificationDispatcher {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        gateway: Arc<dyn PushGateway>,
        settings: DispatcherSettings,
    ) -> Self {
        let limiter = Arc::new(Semaphore::new(settings.max_concurrency.max(1)));
        Self {
            store,
            gateway,
            settings,
            limiter,
        }
    }

    /// Run the fan-out for one created message.
    ///
    /// Never fails: every store or gateway problem is logged and recorded
    /// in the returned summary.
    pub async fn handle(&self, event: &MessageCreated) -> DispatchSummary {
        let summary = DispatchSummary::start(event);
        let conversation_id = event.conversation_id.as_str();
        let sender_uid = event.message.sender_uid.as_str();

        let conversation = match self.store.get_conversation(conversation_id).await {
            Ok(Some(conversation)) => conversation,
            Ok(None) => {
                tracing::warn!(conversation_id, "Conversation not found, nothing to notify");
                return summary.finish(DispatchStatus::ConversationMissing);
            }
            Err(e) => {
                tracing::error!(conversation_id, error = %e, "Failed to load conversation");
                return summary.finish(DispatchStatus::ConversationUnavailable);
            }
        };

        let recipients = conversation.recipients_for(sender_uid);
        if recipients.is_empty() {
            tracing::info!(conversation_id, sender_uid, "No other participants to notify");
            return summary.finish(DispatchStatus::NoRecipients);
        }

        let sender_name = self.sender_name(sender_uid).await;
        let notification = Arc::new(PushNotification::new_message(
            &sender_name,
            &event.message.text,
            &self.settings.click_target,
        ));

        tracing::debug!(
            conversation_id,
            recipients = recipients.len(),
            title = %notification.title,
            "Fanning out message notification"
        );

        let handles: Vec<(String, JoinHandle<RecipientOutcome>)> = recipients
            .into_iter()
            .map(|recipient| {
                let task = RecipientTask {
                    store: Arc::clone(&self.store),
                    gateway: Arc::clone(&self.gateway),
                    limiter: Arc::clone(&self.limiter),
                    notification: Arc::clone(&notification),
                    prune_stale_tokens: self.settings.prune_stale_tokens,
                    recipient: recipient.clone(),
                };
                (recipient, tokio::spawn(task.run()))
            })
            .collect();

        let mut summary = summary;
        for (recipient, handle) in handles {
            let outcome = match handle.await {
                Ok(outcome) => outcome,
                Err(e) => {
                    tracing::error!(recipient = %recipient, error = %e, "Recipient task aborted");
                    RecipientOutcome::failed(FailureReason::Aborted, e.to_string())
                }
            };
            summary.record(recipient, outcome);
        }

        let summary = summary.finish(DispatchStatus::Completed);
        tracing::info!(
            conversation_id,
            message_id = %summary.message_id,
            notified = summary.notified(),
            skipped = summary.skipped(),
            failed = summary.failed(),
            "Message notification dispatched"
        );
        summary
    }

    async fn sender_name(&self, sender_uid: &str) -> String {
        let fallback = self.settings.fallback_sender_name.as_str();
        if sender_uid.is_empty() {
            return fallback.to_string();
        }

        match self.store.get_user_profile(sender_uid).await {
            Ok(Some(profile)) => profile.display_name_or(fallback).to_string(),
            Ok(None) => {
                tracing::debug!(sender_uid, "Sender profile not found, using fallback name");
                fallback.to_string()
            }
            Err(e) => {
                tracing::warn!(sender_uid, error = %e, "Failed to load sender profile, using fallback name");
                fallback.to_string()
            }
        }
    }
}

/// Everything one recipient's branch needs, owned so it can be spawned
struct RecipientTask {
    store: Arc<dyn DocumentStore>,
    gateway: Arc<dyn PushGateway>,
    limiter: Arc<Semaphore>,
    notification: Arc<PushNotification>,
    prune_stale_tokens: bool,
    recipient: String,
}

impl RecipientTask {
    async fn run(self) -> RecipientOutcome {
        // The semaphore is never closed
        let _permit = self.limiter.acquire().await.ok();
        let recipient = self.recipient.as_str();

        let profile = match self.store.get_user_profile(recipient).await {
            Ok(Some(profile)) => profile,
            Ok(None) => {
                tracing::warn!(recipient, "Recipient profile not found, skipping");
                return RecipientOutcome::skipped(SkipReason::ProfileMissing);
            }
            Err(e) => {
                tracing::error!(recipient, error = %e, "Failed to load recipient profile");
                return RecipientOutcome::failed(FailureReason::Store, e.to_string());
            }
        };

        if !profile.has_push_tokens() {
            tracing::info!(recipient, "No push tokens registered, skipping");
            return RecipientOutcome::skipped(SkipReason::NoTokens);
        }

        let report = match self
            .gateway
            .send_multicast(&profile.push_tokens, &self.notification)
            .await
        {
            Ok(report) => report,
            Err(e) => {
                tracing::warn!(
                    recipient,
                    gateway = self.gateway.name(),
                    tokens = profile.push_tokens.len(),
                    error = %e,
                    "Push send failed"
                );
                return RecipientOutcome::failed(FailureReason::Gateway, e.to_string());
            }
        };

        let success_count = report.success_count();
        let failure_count = report.failure_count();
        if failure_count > 0 {
            tracing::warn!(recipient, success_count, failure_count, "Some push tokens were rejected");
        } else {
            tracing::debug!(recipient, success_count, "Push sent");
        }

        let pruned_tokens = if self.prune_stale_tokens {
            self.prune(report.stale_tokens()).await
        } else {
            0
        };

        RecipientOutcome::Notified {
            success_count,
            failure_count,
            pruned_tokens,
        }
    }

    /// Returns how many tokens were removed; removal failures only log
    async fn prune(&self, stale: Vec<String>) -> usize {
        if stale.is_empty() {
            return 0;
        }
        let recipient = self.recipient.as_str();

        match self.store.remove_push_tokens(recipient, &stale).await {
            Ok(()) => {
                tracing::info!(recipient, pruned = stale.len(), "Removed stale push tokens");
                stale.len()
            }
            Err(e) => {
                tracing::warn!(recipient, error = %e, "Failed to remove stale push tokens");
                0
            }
        }
    }
}
