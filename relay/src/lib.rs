//! Webhook relay.
//!
//! Receives webhooks on `POST /webhooks/:slug`, posts a summary of each one
//! to Slack, and forwards the original headers and body to a fixed origin.
//!
//! ## Architecture
//!
//! ```text
//! Caller → web::relay_webhook ─┬→ notify::Notifier (Slack, best effort)
//!                              └→ forward::Forwarder → Origin /webhooks/:slug
//! ```

pub mod config;
pub mod forward;
pub mod notify;
pub mod web;
pub mod webhook;

// Re-export commonly used types
pub use config::Config;
pub use forward::{ForwardRequest, ForwardResponse, Forwarder, HttpForwarder};
pub use notify::{NotificationMessage, Notifier, NotifyError, SlackNotifier, TELEMETRY_CHANNEL};
pub use web::{router, ApiResponse, AppState};
pub use webhook::InboundWebhook;
