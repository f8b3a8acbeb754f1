//! Side-channel notifications for received webhooks.
//!
//! Every inbound webhook is reported to a Slack channel before it is
//! forwarded. Failures here are reported to the caller of [`Notifier::notify`]
//! and never block forwarding.

pub mod message;
pub mod slack;

use async_trait::async_trait;
use thiserror::Error;

pub use message::{NotificationMessage, TELEMETRY_CHANNEL};
pub use slack::SlackNotifier;

/// Errors from a single notification attempt.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotifyError {
    /// No Slack token is configured.
    #[error("slack token not found")]
    MissingCredential,

    /// The message could not be delivered.
    #[error("failed to send slack message: {0}")]
    Dispatch(String),
}

/// Delivers a notification message. One attempt per call.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, message: &NotificationMessage) -> Result<(), NotifyError>;
}
