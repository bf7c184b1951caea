//! Process-wide HTTP client

use once_cell::sync::OnceCell;
use reqwest::Client;
use std::time::Duration;

use crate::application::errors::ConfigError;
use crate::infrastructure::config::HttpConfig;

static CLIENT: OnceCell<Client> = OnceCell::new();

/// Build the shared client on first use; later calls reuse it and ignore `config`
pub fn shared_client(config: &HttpConfig) -> Result<Client, ConfigError> {
    CLIENT
        .get_or_try_init(|| {
            Client::builder()
                .timeout(Duration::from_secs(config.timeout_seconds))
                .user_agent(concat!("jummix-notify/", env!("CARGO_PKG_VERSION")))
                .build()
                .map_err(|e| ConfigError::InvalidValue(format!("HTTP client: {}", e)))
        })
        .cloned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shared_client_initializes_once() {
        let first = shared_client(&HttpConfig::default());
        let second = shared_client(&HttpConfig { timeout_seconds: 99 });
        assert!(first.is_ok());
        assert!(second.is_ok());
        assert!(CLIENT.get().is_some());
    }
}
