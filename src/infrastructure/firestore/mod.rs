//! Firestore document store over the REST API

pub mod value;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde_json::json;

use crate::application::errors::{ConfigError, StoreError};
use crate::domain::entities::{Conversation, UserProfile};
use crate::domain::traits::DocumentStore;
use crate::infrastructure::config::{FirebaseConfig, StoreConfig};
use value::{string_array_value, Document};

/// Field holding a user's push tokens
const TOKENS_FIELD: &str = "fcmTokens";

/// Firestore-backed store
pub struct FirestoreStore {
    client: Client,
    base_url: Url,
    project_id: String,
    access_token: Option<String>,
    conversations: String,
    users: String,
}

impl FirestoreStore {
    pub fn new(
        client: Client,
        firebase: &FirebaseConfig,
        store: &StoreConfig,
    ) -> Result<Self, ConfigError> {
        let base_url = Url::parse(&store.base_url)
            .map_err(|e| ConfigError::InvalidValue(format!("store.base-url: {}", e)))?;
        if base_url.cannot_be_a_base() {
            return Err(ConfigError::InvalidValue(format!("store.base-url: {}", base_url)));
        }

        Ok(Self {
            client,
            base_url,
            project_id: firebase.project_id.clone(),
            access_token: firebase.access_token.clone(),
            conversations: store.conversations_collection.clone(),
            users: store.users_collection.clone(),
        })
    }

    /// Resource name used inside request bodies
    fn document_name(&self, collection: &str, id: &str) -> String {
        format!(
            "projects/{}/databases/(default)/documents/{}/{}",
            self.project_id, collection, id
        )
    }

    /// Build `{base}/v1/projects/{p}/databases/(default)/{tail...}`, escaping each segment
    fn endpoint(&self, tail: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(["v1", "projects", self.project_id.as_str(), "databases", "(default)"])
                .extend(tail);
        }
        url
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.access_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn fetch(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError> {
        // A blank id would address the collection itself
        if id.trim().is_empty() {
            return Ok(None);
        }

        let url = self.endpoint(&["documents", collection, id]);
        tracing::debug!(%url, "Fetching document");

        let response = self
            .authorize(self.client.get(url))
            .send()
            .await
            .map_err(|e| StoreError::Request(e.to_string()))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::Status { status, body });
        }

        response
            .json::<Document>()
            .await
            .map(Some)
            .map_err(|e| StoreError::Decode(e.to_string()))
    }
}

#[async_trait]
impl DocumentStore for FirestoreStore {
    async fn get_conversation(&self, id: &str) -> Result<Option<Conversation>, StoreError> {
        Ok(self
            .fetch(&self.conversations, id)
            .await?
            .map(Document::into_conversation))
    }

    async fn get_user_profile(&self, uid: &str) -> Result<Option<UserProfile>, StoreError> {
        Ok(self
            .fetch(&self.users, uid)
            .await?
            .map(Document::into_user_profile))
    }

    async fn remove_push_tokens(&self, uid: &str, tokens: &[String]) -> Result<(), StoreError> {
        if tokens.is_empty() {
            return Ok(());
        }

        let body = json!({
            "writes": [{
                "transform": {
                    "document": self.document_name(&self.users, uid),
                    "fieldTransforms": [{
                        "fieldPath": TOKENS_FIELD,
                        "removeAllFromArray": string_array_value(tokens),
                    }],
                },
                "currentDocument": { "exists": true },
            }],
        });

        let response = self
            .authorize(self.client.post(self.endpoint(&["documents:commit"])))
            .json(&body)
            .send()
            .await
            .map_err(|e| StoreError::Request(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::Status { status, body });
        }

        Ok(())
    }
}
