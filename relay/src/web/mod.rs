//! Web server module.
//!
//! Routes:
//! - `GET /` liveness text
//! - `GET /health` liveness JSON
//! - `POST /webhooks/:slug` relay, behind the optional API key check

pub mod auth;
pub mod handlers;
pub mod response;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

pub use auth::{authorize, require_api_key, AuthError, API_KEY_HEADER};
pub use handlers::{health, relay_webhook, root, AppState, HealthResponse, SUCCESS_MESSAGE};
pub use response::{ApiResponse, RelayError};

/// Build the application router.
pub fn router(state: AppState) -> Router {
    let webhooks = Router::new()
        .route("/webhooks/:slug", post(relay_webhook))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_api_key));

    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .merge(webhooks)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
