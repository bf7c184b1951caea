//! Domain entities - Typed projections of externally owned documents

pub mod conversation;
pub mod message;
pub mod notification;
pub mod user;

pub use conversation::Conversation;
pub use message::{ChatMessage, MessageCreated};
pub use notification::PushNotification;
pub use user::UserProfile;

/// Drop blanks and collapse duplicates while keeping first-seen order.
///
/// Ids and tokens are opaque: surrounding whitespace is part of the value.
pub(crate) fn unique_non_blank<I, S>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut out: Vec<String> = Vec::new();
    for item in items {
        let item = item.into();
        if item.trim().is_empty() || out.contains(&item) {
            continue;
        }
        out.push(item);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::unique_non_blank;

    #[test]
    fn test_unique_non_blank_keeps_order() {
        let items = unique_non_blank(vec!["b", "a", "", "b", "c", "  "]);
        assert_eq!(items, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_unique_non_blank_keeps_whitespace() {
        let items = unique_non_blank(vec!["alice ", "alice", "alice "]);
        assert_eq!(items, vec!["alice ", "alice"]);
    }
}
