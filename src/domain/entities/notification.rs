use serde::{Deserialize, Serialize};

/// Payload handed to the push gateway
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushNotification {
    pub title: String,
    pub body: String,
    pub click_target: String,
}

impl PushNotification {
    pub fn new(
        title: impl Into<String>,
        body: impl Into<String>,
        click_target: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            click_target: click_target.into(),
        }
    }

    /// Chat message alert shown to the other participants
    pub fn new_message(sender_name: &str, text: &str, click_target: &str) -> Self {
        Self::new(format!("New message from {}", sender_name), text, click_target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_message_payload() {
        let n = PushNotification::new_message("Alice", "hi", "/chats");
        assert_eq!(n.title, "New message from Alice");
        assert_eq!(n.body, "hi");
        assert_eq!(n.click_target, "/chats");
    }
}
