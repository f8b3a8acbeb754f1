//! Route handlers.
//!
//! The relay handler runs its steps strictly in order:
//! 1. Read the whole body
//! 2. Notify Slack (failures are logged, never returned)
//! 3. Build the forward request
//! 4. Forward to the origin
//! 5. Report success

use std::sync::Arc;

use axum::{
    body::Body,
    extract::{OriginalUri, State},
    http::{HeaderMap, Method},
    Json,
};
use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::forward::{ForwardRequest, Forwarder, HttpForwarder};
use crate::notify::{NotificationMessage, Notifier, NotifyError, SlackNotifier};
use crate::web::response::{ApiResponse, RelayError};
use crate::webhook::{slug_from_path, InboundWebhook};
use crate::Config;

/// Message returned when a webhook is relayed.
pub const SUCCESS_MESSAGE: &str = "Webhook processed successfully";

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub notifier: Arc<dyn Notifier>,
    pub forwarder: Arc<dyn Forwarder>,
}

impl AppState {
    /// Build state with the Slack notifier and HTTP forwarder.
    pub fn new(config: Config) -> reqwest::Result<Self> {
        let notifier = SlackNotifier::new(
            config.slack_token.clone(),
            config.slack_api_base.clone(),
            config.notify_timeout(),
        )?;
        let forwarder = HttpForwarder::new(config.forward_timeout())?;

        Ok(Self::with_clients(config, Arc::new(notifier), Arc::new(forwarder)))
    }

    pub fn with_clients(
        config: Config,
        notifier: Arc<dyn Notifier>,
        forwarder: Arc<dyn Forwarder>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            notifier,
            forwarder,
        }
    }
}

// =============================================================================
// Liveness
// =============================================================================

pub async fn root() -> &'static str {
    debug!("root_requested");
    "Hello, World!"
}

/// Health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Health check endpoint.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

// =============================================================================
// Webhook Relay
// =============================================================================

/// Relay a webhook to Slack and the origin.
pub async fn relay_webhook(
    State(state): State<AppState>,
    method: Method,
    OriginalUri(uri): OriginalUri,
    headers: HeaderMap,
    body: Body,
) -> Result<Json<ApiResponse>, RelayError> {
    let path = uri.path().to_string();
    let slug = slug_from_path(&path).unwrap_or_default().to_string();

    info!(slug = %slug, method = %method, header_count = headers.len(), "webhook_received");

    let body = axum::body::to_bytes(body, usize::MAX).await.map_err(|e| {
        error!(slug = %slug, error = %e, "webhook_body_read_failed");
        RelayError::BodyRead(e.to_string())
    })?;

    let webhook = InboundWebhook {
        method,
        slug,
        path,
        headers,
        body,
    };

    notify(state.notifier.as_ref(), &webhook).await;

    let slug = webhook.slug.clone();
    let request = ForwardRequest::build(state.config.origin.as_deref(), webhook).map_err(|e| {
        error!(slug = %slug, error = %e, "forward_request_build_failed");
        RelayError::from(e)
    })?;

    let response = state.forwarder.send(request).await.map_err(|e| {
        error!(slug = %slug, error = %e, "forward_failed");
        RelayError::from(e)
    })?;

    if !response.is_success() {
        warn!(slug = %slug, status_code = response.status, "origin_returned_error_status");
    }

    info!(slug = %slug, status_code = response.status, "webhook_processed");

    Ok(Json(ApiResponse::success(SUCCESS_MESSAGE)))
}

/// Send the telemetry message, logging rather than returning any failure.
async fn notify(notifier: &dyn Notifier, webhook: &InboundWebhook) {
    let message = NotificationMessage::for_webhook(webhook);

    match notifier.notify(&message).await {
        Ok(()) => {}
        Err(NotifyError::MissingCredential) => {
            warn!(slug = %webhook.slug, "slack_token_not_configured");
        }
        Err(e) => {
            error!(slug = %webhook.slug, error = %e, "slack_message_failed");
        }
    }
}
