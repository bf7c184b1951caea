//! Outcome of one dispatcher invocation

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::entities::MessageCreated;

/// How the invocation as a whole ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DispatchStatus {
    /// Every recipient was processed (whatever their individual outcome)
    Completed,
    ConversationMissing,
    /// The conversation could not be read from the store
    ConversationUnavailable,
    /// The sender is the only participant
    NoRecipients,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    ProfileMissing,
    NoTokens,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    Store,
    Gateway,
    /// The recipient task panicked or was cancelled
    Aborted,
}

/// What happened to one recipient
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RecipientOutcome {
    Notified {
        success_count: usize,
        failure_count: usize,
        pruned_tokens: usize,
    },
    Skipped {
        reason: SkipReason,
    },
    Failed {
        reason: FailureReason,
        detail: String,
    },
}

impl RecipientOutcome {
    pub fn skipped(reason: SkipReason) -> Self {
        RecipientOutcome::Skipped { reason }
    }

    pub fn failed(reason: FailureReason, detail: impl Into<String>) -> Self {
        RecipientOutcome::Failed {
            reason,
            detail: detail.into(),
        }
    }

    /// Whether a push-gateway call was made for this recipient
    pub fn reached_gateway(&self) -> bool {
        matches!(
            self,
            RecipientOutcome::Notified { .. }
                | RecipientOutcome::Failed {
                    reason: FailureReason::Gateway,
                    ..
                }
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecipientReport {
    pub recipient: String,
    #[serde(flatten)]
    pub outcome: RecipientOutcome,
}

/// Aggregated result returned by [`NotificationDispatcher::handle`]
///
/// [`NotificationDispatcher::handle`]: super::NotificationDispatcher::handle
#[derive(Debug, Clone, Serialize)]
pub struct DispatchSummary {
    pub conversation_id: String,
    pub message_id: String,
    pub sender_uid: String,
    pub status: DispatchStatus,
    /// Recipients in conversation participant order
    pub recipients: Vec<RecipientReport>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl DispatchSummary {
    pub(crate) fn start(event: &MessageCreated) -> Self {
        let now = Utc::now();
        Self {
            conversation_id: event.conversation_id.clone(),
            message_id: event.message_id.clone(),
            sender_uid: event.message.sender_uid.clone(),
            status: DispatchStatus::Completed,
            recipients: Vec::new(),
            started_at: now,
            finished_at: now,
        }
    }

    pub(crate) fn record(&mut self, recipient: impl Into<String>, outcome: RecipientOutcome) {
        self.recipients.push(RecipientReport {
            recipient: recipient.into(),
            outcome,
        });
    }

    pub(crate) fn finish(mut self, status: DispatchStatus) -> Self {
        self.status = status;
        self.finished_at = Utc::now();
        self
    }

    pub fn outcome_for(&self, recipient: &str) -> Option<&RecipientOutcome> {
        self.recipients
            .iter()
            .find(|r| r.recipient == recipient)
            .map(|r| &r.outcome)
    }

    pub fn gateway_calls(&self) -> usize {
        self.recipients
            .iter()
            .filter(|r| r.outcome.reached_gateway())
            .count()
    }

    pub fn notified(&self) -> usize {
        self.count(|o| matches!(o, RecipientOutcome::Notified { .. }))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, RecipientOutcome::Skipped { .. }))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, RecipientOutcome::Failed { .. }))
    }

    fn count(&self, pred: impl Fn(&RecipientOutcome) -> bool) -> usize {
        self.recipients.iter().filter(|r| pred(&r.outcome)).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::ChatMessage;

    #[test]
    fn test_summary_counts() {
        let event = MessageCreated::new("chat-1", ChatMessage::new("alice", "hi"));
        let mut summary = DispatchSummary::start(&event);
        summary.record(
            "bob",
            RecipientOutcome::Notified {
                success_count: 1,
                failure_count: 0,
                pruned_tokens: 0,
            },
        );
        summary.record("carol", RecipientOutcome::skipped(SkipReason::NoTokens));
        summary.record("dave", RecipientOutcome::failed(FailureReason::Gateway, "boom"));
        summary.record("erin", RecipientOutcome::failed(FailureReason::Store, "down"));
        let summary = summary.finish(DispatchStatus::Completed);

        assert_eq!(summary.notified(), 1);
        assert_eq!(summary.skipped(), 1);
        assert_eq!(summary.failed(), 2);
        assert_eq!(summary.gateway_calls(), 2);
        assert_eq!(
            summary.outcome_for("carol"),
            Some(&RecipientOutcome::skipped(SkipReason::NoTokens))
        );
    }

    #[test]
    fn test_summary_serializes_flat_outcomes() {
        let event = MessageCreated::new("chat-1", ChatMessage::new("alice", "hi"))
            .with_message_id("m-1");
        let mut summary = DispatchSummary::start(&event);
        summary.record("bob", RecipientOutcome::skipped(SkipReason::ProfileMissing));
        let json = serde_json::to_value(summary.finish(DispatchStatus::Completed)).unwrap();

        assert_eq!(json["status"], "completed");
        assert_eq!(json["message_id"], "m-1");
        assert_eq!(json["recipients"][0]["recipient"], "bob");
        assert_eq!(json["recipients"][0]["outcome"], "skipped");
        assert_eq!(json["recipients"][0]["reason"], "profile_missing");
    }
}
