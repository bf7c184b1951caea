use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Field values of a chat message as written by the client
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    #[serde(default)]
    pub sender_uid: String,
    #[serde(default)]
    pub text: String,
}

impl ChatMessage {
    pub fn new(sender_uid: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            sender_uid: sender_uid.into(),
            text: text.into(),
        }
    }
}

/// Trigger event: a message document was created under a conversation
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageCreated {
    pub conversation_id: String,
    #[serde(default = "generate_message_id")]
    pub message_id: String,
    pub message: ChatMessage,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

fn generate_message_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

impl MessageCreated {
    pub fn new(conversation_id: impl Into<String>, message: ChatMessage) -> Self {
        Self {
            conversation_id: conversation_id.into(),
            message_id: generate_message_id(),
            message,
            created_at: Utc::now(),
        }
    }

    pub fn with_message_id(mut self, id: impl Into<String>) -> Self {
        self.message_id = id.into();
        self
    }

    /// Decode one event from its JSON form
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_event_with_defaults() {
        let event = MessageCreated::from_json(
            r#"{"conversationId":"chat-1","message":{"senderUid":"alice"}}"#,
        )
        .unwrap();

        assert_eq!(event.conversation_id, "chat-1");
        assert_eq!(event.message.sender_uid, "alice");
        assert_eq!(event.message.text, "");
        assert!(!event.message_id.is_empty());
    }

    #[test]
    fn test_decode_event_keeps_message_id() {
        let event = MessageCreated::from_json(
            r#"{"conversationId":"chat-1","messageId":"m-9","message":{"senderUid":"alice","text":"hi"}}"#,
        )
        .unwrap();

        assert_eq!(event.message_id, "m-9");
        assert_eq!(event.message.text, "hi");
    }

    #[test]
    fn test_decode_event_requires_conversation() {
        assert!(MessageCreated::from_json(r#"{"message":{"text":"hi"}}"#).is_err());
    }
}
