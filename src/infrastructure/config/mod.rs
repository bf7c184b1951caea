//! Configuration management

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use crate::application::errors::ConfigError;
use crate::application::notifications::DispatcherSettings;

/// Service configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct Config {
    pub firebase: FirebaseConfig,
    pub store: StoreConfig,
    pub push: PushConfig,
    pub dispatcher: DispatcherConfig,
    pub http: HttpConfig,
}

/// Project and credentials shared by the store and the gateway
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct FirebaseConfig {
    pub project_id: String,
    /// OAuth2 bearer token; optional against the emulator
    pub access_token: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct StoreConfig {
    pub base_url: String,
    pub conversations_collection: String,
    pub users_collection: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct PushConfig {
    pub base_url: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct DispatcherConfig {
    pub click_target: String,
    pub fallback_sender_name: String,
    pub max_concurrency: usize,
    pub prune_stale_tokens: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct HttpConfig {
    pub timeout_seconds: u64,
}

impl Default for FirebaseConfig {
    fn default() -> Self {
        Self {
            project_id: "jummix".to_string(),
            access_token: None,
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            base_url: "https://firestore.googleapis.com".to_string(),
            conversations_collection: "chats".to_string(),
            users_collection: "users".to_string(),
        }
    }
}

impl Default for PushConfig {
    fn default() -> Self {
        Self {
            base_url: "https://fcm.googleapis.com".to_string(),
        }
    }
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        let settings = DispatcherSettings::default();
        Self {
            click_target: settings.click_target,
            fallback_sender_name: settings.fallback_sender_name,
            max_concurrency: settings.max_concurrency,
            prune_stale_tokens: settings.prune_stale_tokens,
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self { timeout_seconds: 10 }
    }
}

impl DispatcherConfig {
    pub fn settings(&self) -> DispatcherSettings {
        DispatcherSettings {
            click_target: self.click_target.clone(),
            fallback_sender_name: self.fallback_sender_name.clone(),
            max_concurrency: self.max_concurrency,
            prune_stale_tokens: self.prune_stale_tokens,
        }
    }
}

impl Config {
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let content = std::fs::read_to_string(&path)
            .map_err(|e| ConfigError::Parse(format!("Failed to read config: {}", e)))?;

        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(content)
            .map_err(|e| ConfigError::Parse(format!("Failed to parse config: {}", e)))
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        serde_yaml::to_string(self)
            .map_err(|e| ConfigError::Parse(format!("Failed to serialize config: {}", e)))
    }

    pub fn load_env() -> Self {
        Config::default().with_env()
    }

    /// Overlay environment variables on top of the loaded values
    pub fn with_env(mut self) -> Self {
        if let Ok(project) = std::env::var("FIREBASE_PROJECT_ID") {
            self.firebase.project_id = project;
        }

        if let Ok(token) = std::env::var("GOOGLE_ACCESS_TOKEN") {
            self.firebase.access_token = Some(token);
        }

        // Same variable the Firebase SDKs honour
        if let Ok(host) = std::env::var("FIRESTORE_EMULATOR_HOST") {
            self.store.base_url = format!("http://{}", host);
        }

        if let Ok(target) = std::env::var("JUMMIX_CLICK_TARGET") {
            self.dispatcher.click_target = target;
        }

        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.firebase.project_id.trim().is_empty() {
            return Err(ConfigError::MissingField("firebase.project-id".to_string()));
        }
        if self.dispatcher.max_concurrency == 0 {
            return Err(ConfigError::InvalidValue(
                "dispatcher.max-concurrency must be at least 1".to_string(),
            ));
        }
        if self.http.timeout_seconds == 0 {
            return Err(ConfigError::InvalidValue(
                "http.timeout-seconds must be at least 1".to_string(),
            ));
        }
        for (field, url) in [("store.base-url", &self.store.base_url), ("push.base-url", &self.push.base_url)] {
            reqwest::Url::parse(url)
                .map_err(|e| ConfigError::InvalidValue(format!("{}: {}", field, e)))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.store.conversations_collection, "chats");
        assert_eq!(config.dispatcher.click_target, "/chats");
        assert!(!config.dispatcher.prune_stale_tokens);
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let config = Config::from_yaml(
            "firebase:\n  project-id: jummix-prod\ndispatcher:\n  prune-stale-tokens: true\n",
        )
        .unwrap();

        assert_eq!(config.firebase.project_id, "jummix-prod");
        assert!(config.dispatcher.prune_stale_tokens);
        assert_eq!(config.dispatcher.fallback_sender_name, "Someone");
        assert_eq!(config.store.users_collection, "users");
    }

    #[test]
    fn test_yaml_round_trip_keeps_kebab_keys() {
        let yaml = Config::default().to_yaml().unwrap();
        assert!(yaml.contains("max-concurrency"));
        assert!(Config::from_yaml(&yaml).is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_concurrency() {
        let mut config = Config::default();
        config.dispatcher.max_concurrency = 0;
        assert!(matches!(config.validate(), Err(ConfigError::InvalidValue(_))));
    }

    #[test]
    fn test_validate_rejects_blank_project() {
        let mut config = Config::default();
        config.firebase.project_id = " ".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::MissingField(_))));
    }

    #[test]
    fn test_validate_rejects_bad_url() {
        let mut config = Config::default();
        config.push.base_url = "not a url".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_settings_from_config() {
        let mut config = Config::default();
        config.dispatcher.max_concurrency = 4;
        let settings = config.dispatcher.settings();
        assert_eq!(settings.max_concurrency, 4);
        assert_eq!(settings.click_target, "/chats");
    }
}
