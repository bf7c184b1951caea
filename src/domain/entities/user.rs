use std::fmt;

use super::unique_non_blank;

/// Read-only projection of a user document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    pub id: String,
    pub display_name: Option<String>,
    pub push_tokens: Vec<String>,
}

impl UserProfile {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: None,
            push_tokens: Vec::new(),
        }
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        let name = name.trim();
        self.display_name = (!name.is_empty()).then(|| name.to_string());
        self
    }

    pub fn with_push_tokens<I, S>(mut self, tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.push_tokens = unique_non_blank(tokens);
        self
    }

    pub fn has_push_tokens(&self) -> bool {
        !self.push_tokens.is_empty()
    }

    pub fn display_name_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.display_name.as_deref().unwrap_or(fallback)
    }
}

impl fmt::Display for UserProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name_or(&self.id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_display_name_falls_back() {
        let profile = UserProfile::new("bob").with_display_name("   ");
        assert_eq!(profile.display_name_or("Someone"), "Someone");
        assert_eq!(profile.to_string(), "bob");
    }

    #[test]
    fn test_push_tokens_normalized() {
        let profile = UserProfile::new("bob").with_push_tokens(["t1", "", "t1", "t2"]);
        assert_eq!(profile.push_tokens, vec!["t1", "t2"]);
        assert!(profile.has_push_tokens());
    }
}
