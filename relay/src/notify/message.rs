//! Telemetry message formatting.

use crate::webhook::InboundWebhook;

/// Slack channel that receives every webhook notification.
pub const TELEMETRY_CHANNEL: &str = "telemetry";

/// A single text message bound for a Slack channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationMessage {
    pub text: String,
    pub channel: String,
}

impl NotificationMessage {
    /// Build the telemetry message describing an inbound webhook.
    pub fn for_webhook(webhook: &InboundWebhook) -> Self {
        // BTreeMap<String, Vec<String>> always serializes
        let headers = serde_json::to_string_pretty(&webhook.header_map()).unwrap_or_default();

        let text = format!(
            "New webhook received:\n `{} {}`\nHeaders:\n```{}```\nBody:\n```{}```",
            webhook.method,
            webhook.path,
            headers,
            webhook.body_text(),
        );

        Self {
            text,
            channel: TELEMETRY_CHANNEL.to_string(),
        }
    }
}
