//! Firebase Cloud Messaging gateway (HTTP v1 API)

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::{Deserialize, Serialize};

use crate::application::errors::{ConfigError, PushError};
use crate::domain::entities::PushNotification;
use crate::domain::traits::{PushGateway, SendReport, TokenFailure, TokenResult};
use crate::infrastructure::config::{FirebaseConfig, PushConfig};

/// FCM gateway; HTTP v1 has no multicast, so each token is its own request
pub struct FcmGateway {
    client: Client,
    send_url: Url,
    access_token: Option<String>,
}

impl FcmGateway {
    pub fn new(
        client: Client,
        firebase: &FirebaseConfig,
        push: &PushConfig,
    ) -> Result<Self, ConfigError> {
        let mut send_url = Url::parse(&push.base_url)
            .map_err(|e| ConfigError::InvalidValue(format!("push.base-url: {}", e)))?;
        send_url
            .path_segments_mut()
            .map_err(|_| ConfigError::InvalidValue(format!("push.base-url: {}", push.base_url)))?
            .pop_if_empty()
            .extend(["v1", "projects", firebase.project_id.as_str(), "messages:send"]);

        Ok(Self {
            client,
            send_url,
            access_token: firebase.access_token.clone(),
        })
    }

    async fn send_one(
        &self,
        access_token: &str,
        token: &str,
        notification: &PushNotification,
    ) -> Result<TokenResult, PushError> {
        let request = SendRequest::new(token, notification);

        let response = match self
            .client
            .post(self.send_url.clone())
            .bearer_auth(access_token)
            .json(&request)
            .send()
            .await
        {
            Ok(response) => response,
            // One unreachable request should not sink the other tokens
            Err(e) => return Ok(TokenResult::failed(token, TokenFailure::Other(e.to_string()))),
        };

        let status = response.status();
        if status.is_success() {
            return Ok(TokenResult::delivered(token));
        }

        let body = response.text().await.unwrap_or_default();

        // Bad credentials fail every token the same way
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(PushError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(TokenResult::failed(token, classify_error(status, &body)))
    }
}

#[async_trait]
impl PushGateway for FcmGateway {
    fn name(&self) -> &str {
        "fcm"
    }

    async fn send_multicast(
        &self,
        tokens: &[String],
        notification: &PushNotification,
    ) -> Result<SendReport, PushError> {
        let access_token = self
            .access_token
            .as_deref()
            .ok_or(PushError::MissingCredentials)?;

        let mut results = Vec::with_capacity(tokens.len());
        for (sent, token) in tokens.iter().enumerate() {
            match self.send_one(access_token, token, notification).await {
                Ok(result) => results.push(result),
                // Nothing delivered yet: the whole call failed
                Err(e) if results.is_empty() => return Err(e),
                Err(e) => {
                    // Tokens already delivered stay in the report; the rest share the error
                    tracing::warn!(
                        delivered = results.len(),
                        remaining = tokens.len() - sent,
                        error = %e,
                        "FCM rejected credentials mid-send"
                    );
                    let failure = TokenFailure::Other(e.to_string());
                    results.extend(
                        tokens[sent..]
                            .iter()
                            .map(|t| TokenResult::failed(t.as_str(), failure.clone())),
                    );
                    break;
                }
            }
        }

        Ok(SendReport::new(results))
    }
}

/// `{"message": {...}}` body of `messages:send`
#[derive(Serialize)]
struct SendRequest<'a> {
    message: Message<'a>,
}

#[derive(Serialize)]
struct Message<'a> {
    token: &'a str,
    notification: Notification<'a>,
    webpush: WebPush<'a>,
}

#[derive(Serialize)]
struct Notification<'a> {
    title: &'a str,
    body: &'a str,
}

#[derive(Serialize)]
struct WebPush<'a> {
    fcm_options: WebPushOptions<'a>,
}

#[derive(Serialize)]
struct WebPushOptions<'a> {
    link: &'a str,
}

impl<'a> SendRequest<'a> {
    fn new(token: &'a str, notification: &'a PushNotification) -> Self {
        Self {
            message: Message {
                token,
                notification: Notification {
                    title: &notification.title,
                    body: &notification.body,
                },
                webpush: WebPush {
                    fcm_options: WebPushOptions {
                        link: &notification.click_target,
                    },
                },
            },
        }
    }
}

/// `google.rpc.Status` error envelope
#[derive(Deserialize, Debug, Default)]
struct ErrorEnvelope {
    #[serde(default)]
    error: ErrorStatus,
}

#[derive(Deserialize, Debug, Default)]
struct ErrorStatus {
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: String,
    #[serde(default)]
    details: Vec<ErrorDetail>,
}

#[derive(Deserialize, Debug)]
struct ErrorDetail {
    #[serde(rename = "errorCode")]
    error_code: Option<String>,
}

/// Map a failed per-token response onto a [`TokenFailure`]
fn classify_error(status: StatusCode, body: &str) -> TokenFailure {
    let envelope: ErrorEnvelope = serde_json::from_str(body).unwrap_or_default();
    let error = envelope.error;

    let fcm_code = error
        .details
        .iter()
        .find_map(|d| d.error_code.as_deref())
        .unwrap_or(error.status.as_str());

    match fcm_code {
        "UNREGISTERED" => TokenFailure::Unregistered,
        "INVALID_ARGUMENT" if error.message.contains("registration token") => {
            TokenFailure::InvalidToken
        }
        "" => TokenFailure::Other(format!("HTTP {}", status.as_u16())),
        code => TokenFailure::Other(format!("{}: {}", code, error.message)),
    }
}
