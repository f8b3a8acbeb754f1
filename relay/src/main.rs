//! Webhook relay server.
//!
//! Receives webhooks, reports each one to the Slack `telemetry` channel and
//! forwards it unchanged to the configured origin.

use std::net::SocketAddr;

use anyhow::{Context, Result};
use tokio::{net::TcpListener, signal};
use tracing::{info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use relay::{router, AppState, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is fine; the environment may already be populated
    let dotenv_loaded = dotenvy::dotenv().is_ok();

    // Initialize structured JSON logging
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().json().flatten_event(true))
        .init();

    info!(dotenv_loaded, "relay_starting");

    // Load configuration
    let config = Config::from_env();
    info!(
        port = config.port,
        origin = ?config.origin,
        slack_token_configured = config.slack_token.is_some(),
        slack_api_base = %config.slack_api_base,
        auth_enabled = config.auth_enabled(),
        forward_timeout_ms = config.forward_timeout_ms,
        notify_timeout_ms = config.notify_timeout_ms,
        "config_loaded"
    );

    let port = config.port;
    let state = AppState::new(config).context("Failed to build HTTP clients")?;
    let app = router(state);

    // Bind to address
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    info!(address = %addr, "relay_listening");

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("relay_shutdown_complete");

    Ok(())
}

/// Resolve on SIGINT or SIGTERM. A signal that cannot be installed is
/// logged and never fires.
async fn shutdown_signal() {
    let interrupt = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "sigint_handler_unavailable");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "sigterm_handler_unavailable");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    let received = tokio::select! {
        _ = interrupt => "SIGINT",
        _ = terminate => "SIGTERM",
    };

    info!(signal = received, "relay_shutting_down");
}
