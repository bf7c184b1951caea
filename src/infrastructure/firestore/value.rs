//! Firestore REST document decoding
//!
//! Fields arrive as typed values (`{"stringValue": "x"}`,
//! `{"arrayValue": {"values": [...]}}`). Only the fields the dispatcher
//! reads are projected; anything else is ignored.

use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::HashMap;

use crate::domain::entities::{Conversation, UserProfile};

/// Raw document as returned by `GET .../documents/{collection}/{id}`
#[derive(Debug, Clone, Deserialize)]
pub struct Document {
    pub name: String,
    #[serde(default)]
    pub fields: HashMap<String, Value>,
}

impl Document {
    /// Last path segment of the document name
    pub fn id(&self) -> &str {
        self.name.rsplit('/').next().unwrap_or_default()
    }

    pub fn string(&self, field: &str) -> Option<&str> {
        self.fields.get(field).and_then(string_value)
    }

    /// String members of an array field; other member types are skipped
    pub fn string_array(&self, field: &str) -> Vec<String> {
        self.fields
            .get(field)
            .and_then(|v| v.get("arrayValue"))
            .and_then(|a| a.get("values"))
            .and_then(Value::as_array)
            .map(|values| {
                values
                    .iter()
                    .filter_map(string_value)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn into_conversation(self) -> Conversation {
        let participants = self.string_array("participants");
        Conversation::new(self.id(), participants)
    }

    pub fn into_user_profile(self) -> UserProfile {
        let profile = UserProfile::new(self.id()).with_push_tokens(self.string_array("fcmTokens"));
        match self.string("displayName").or_else(|| self.string("name")) {
            Some(name) => profile.with_display_name(name),
            None => profile,
        }
    }
}

fn string_value(value: &Value) -> Option<&str> {
    value.get("stringValue").and_then(Value::as_str)
}

/// `arrayValue` wrapper for a list of strings
pub fn string_array_value(items: &[String]) -> Value {
    let values: Vec<Value> = items.iter().map(|s| json!({ "stringValue": s })).collect();
    json!({ "values": values })
}
