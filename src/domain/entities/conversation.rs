use super::unique_non_blank;

/// A chat thread with a fixed set of participant ids
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversation {
    pub id: String,
    pub participants: Vec<String>,
}

impl Conversation {
    pub fn new<I, S>(id: impl Into<String>, participants: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id: id.into(),
            participants: unique_non_blank(participants),
        }
    }

    /// Everyone in the thread except the author of the message
    pub fn recipients_for(&self, sender_uid: &str) -> Vec<String> {
        self.participants
            .iter()
            .filter(|p| p.as_str() != sender_uid)
            .cloned()
            .collect()
    }
}
