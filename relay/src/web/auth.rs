//! Optional pre-shared key check for webhook routes.
//!
//! When `API_KEY` is configured, callers must send it as
//! `Authorization: Bearer <key>` or `X-API-Key: <key>`.

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use sha2::{Digest, Sha256};
use thiserror::Error;
use tracing::warn;

use crate::web::handlers::AppState;
use crate::web::response::ApiResponse;

/// Alternate header carrying the pre-shared key.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Rejections produced before the relay handler runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("missing api key")]
    Missing,

    #[error("invalid api key")]
    Invalid,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        (
            StatusCode::UNAUTHORIZED,
            Json(ApiResponse::failure("unauthorized", self.to_string())),
        )
            .into_response()
    }
}

/// Extract the presented key, preferring a bearer token.
fn extract_api_key(headers: &HeaderMap) -> Option<&str> {
    let bearer = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "));

    bearer.or_else(|| headers.get(API_KEY_HEADER).and_then(|v| v.to_str().ok()))
}

/// Compare keys in constant time.
///
/// Both sides are hashed first so the comparison never depends on the
/// length of the expected key.
fn keys_match(expected: &str, provided: &str) -> bool {
    let expected = Sha256::digest(expected.as_bytes());
    let provided = Sha256::digest(provided.as_bytes());

    let mut result = 0u8;
    for (x, y) in expected.iter().zip(provided.iter()) {
        result |= x ^ y;
    }
    result == 0
}

/// Check a request against the configured key, if any.
pub fn authorize(expected: Option<&str>, headers: &HeaderMap) -> Result<(), AuthError> {
    let Some(expected) = expected else {
        return Ok(());
    };

    let provided = extract_api_key(headers).ok_or(AuthError::Missing)?;

    if keys_match(expected, provided) {
        Ok(())
    } else {
        Err(AuthError::Invalid)
    }
}

/// Axum middleware that rejects webhook requests lacking the configured key.
pub async fn require_api_key(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    if let Err(e) = authorize(state.config.api_key.as_deref(), request.headers()) {
        warn!(path = %request.uri().path(), reason = %e, "webhook_auth_rejected");
        return Err(e);
    }

    Ok(next.run(request).await)
}
