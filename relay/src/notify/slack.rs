//! Slack Web API notifier.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::{NotificationMessage, Notifier, NotifyError};

#[derive(Serialize)]
struct PostMessageRequest<'a> {
    channel: &'a str,
    text: &'a str,
}

/// The envelope Slack wraps every Web API response in.
#[derive(Deserialize)]
struct PostMessageResponse {
    ok: bool,
    #[serde(default)]
    error: Option<String>,
}

/// Posts notifications with `chat.postMessage`.
#[derive(Debug, Clone)]
pub struct SlackNotifier {
    client: Client,
    token: Option<String>,
    api_base: String,
}

impl SlackNotifier {
    /// Create a notifier whose HTTP client gives up after `timeout`.
    ///
    /// A missing token is not an error here; each `notify` call reports it.
    pub fn new(
        token: Option<String>,
        api_base: impl Into<String>,
        timeout: Duration,
    ) -> reqwest::Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            token,
            api_base: api_base.into().trim_end_matches('/').to_string(),
        })
    }

    fn post_message_url(&self) -> String {
        format!("{}/api/chat.postMessage", self.api_base)
    }
}

#[async_trait]
impl Notifier for SlackNotifier {
    async fn notify(&self, message: &NotificationMessage) -> Result<(), NotifyError> {
        let token = self
            .token
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .ok_or(NotifyError::MissingCredential)?;

        info!(channel = %message.channel, text_length = message.text.len(), "slack_message_sending");

        let response = self
            .client
            .post(self.post_message_url())
            .bearer_auth(token)
            .json(&PostMessageRequest {
                channel: &message.channel,
                text: &message.text,
            })
            .send()
            .await
            .map_err(|e| NotifyError::Dispatch(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(NotifyError::Dispatch(format!(
                "slack api returned HTTP {}",
                status.as_u16()
            )));
        }

        let body: PostMessageResponse = response
            .json()
            .await
            .map_err(|e| NotifyError::Dispatch(format!("invalid slack api response: {e}")))?;

        if !body.ok {
            return Err(NotifyError::Dispatch(
                body.error.unwrap_or_else(|| "unknown_error".to_string()),
            ));
        }

        info!(channel = %message.channel, "slack_message_sent");

        Ok(())
    }
}
