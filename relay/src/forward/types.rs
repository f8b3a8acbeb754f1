//! Forwarded request and response types.

use axum::http::HeaderMap;
use bytes::Bytes;
use thiserror::Error;
use url::Url;

use crate::webhook::{InboundWebhook, WEBHOOK_PATH_PREFIX};

/// Errors building a [`ForwardRequest`] from configuration and a webhook.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    #[error("forwarding origin is not configured")]
    MissingOrigin,

    #[error("invalid forwarding origin {origin:?}: {reason}")]
    InvalidOrigin { origin: String, reason: String },

    #[error("invalid forwarding url {url:?}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("forwarding url {url:?} would be sent as {normalized:?}")]
    Rewritten { url: String, normalized: String },
}

/// Transport-level failure sending a [`ForwardRequest`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ForwardError {
    #[error("request timed out after {timeout_ms}ms: {message}")]
    Timeout { timeout_ms: u64, message: String },

    #[error("{0}")]
    Transport(String),
}

/// A POST to the origin carrying the inbound headers and body verbatim.
#[derive(Debug, Clone)]
pub struct ForwardRequest {
    pub url: Url,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl ForwardRequest {
    /// Build the request for `webhook`, consuming it.
    ///
    /// The target is `origin + "/webhooks/" + slug`, concatenated as is.
    /// URL parsing must leave the slug untouched: a slug that would be
    /// re-encoded or resolved as a dot segment is rejected.
    pub fn build(origin: Option<&str>, webhook: InboundWebhook) -> Result<Self, BuildError> {
        let origin = origin
            .map(str::trim)
            .filter(|o| !o.is_empty())
            .ok_or(BuildError::MissingOrigin)?;

        validate_origin(origin)?;

        let target = format!("{origin}{WEBHOOK_PATH_PREFIX}{}", webhook.slug);
        let url = Url::parse(&target).map_err(|source| BuildError::InvalidUrl {
            url: target.clone(),
            source,
        })?;

        let suffix = format!("{WEBHOOK_PATH_PREFIX}{}", webhook.slug);
        if !url.path().ends_with(&suffix) || url.query().is_some() || url.fragment().is_some() {
            return Err(BuildError::Rewritten {
                url: target,
                normalized: url.to_string(),
            });
        }

        Ok(Self {
            url,
            headers: webhook.headers,
            body: webhook.body,
        })
    }
}

fn validate_origin(origin: &str) -> Result<(), BuildError> {
    let invalid = |reason: String| BuildError::InvalidOrigin {
        origin: origin.to_string(),
        reason,
    };

    let parsed = Url::parse(origin).map_err(|e| invalid(e.to_string()))?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme {:?}", parsed.scheme())));
    }
    if parsed.host_str().is_none() {
        return Err(invalid("missing host".to_string()));
    }

    Ok(())
}

/// What the origin answered. Recorded, never judged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForwardResponse {
    pub status: u16,
}

impl ForwardResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderValue, Method};

    fn webhook(slug: &str) -> InboundWebhook {
        let mut headers = HeaderMap::new();
        headers.append("x-test", HeaderValue::from_static("1"));
        headers.append("x-multi", HeaderValue::from_static("a"));
        headers.append("x-multi", HeaderValue::from_static("b"));

        InboundWebhook {
            method: Method::POST,
            slug: slug.to_string(),
            path: format!("/webhooks/{slug}"),
            headers,
            body: Bytes::from_static(br#"{"k":"v"}"#),
        }
    }

    #[test]
    fn test_build_target_url() {
        let request = ForwardRequest::build(Some("https://relay.ngrok.app"), webhook("abc123")).unwrap();
        assert_eq!(request.url.as_str(), "https://relay.ngrok.app/webhooks/abc123");
    }

    #[test]
    fn test_build_keeps_headers_and_body() {
        let request = ForwardRequest::build(Some("http://localhost:3000"), webhook("abc")).unwrap();
        assert_eq!(request.body, Bytes::from_static(br#"{"k":"v"}"#));
        assert_eq!(request.headers.get("x-test").unwrap(), "1");
        let multi: Vec<_> = request.headers.get_all("x-multi").iter().collect();
        assert_eq!(multi, vec!["a", "b"]);
    }

    #[test]
    fn test_build_keeps_percent_encoded_slug() {
        let request = ForwardRequest::build(Some("http://localhost:3000"), webhook("a%20b")).unwrap();
        assert_eq!(request.url.path(), "/webhooks/a%20b");
    }

    #[test]
    fn test_build_rejects_rewritten_slugs() {
        for slug in ["..", ".", "%2e%2e", "%2E.", "a{b}", "a%7Bb%7D/..", "a?b", "a#b"] {
            let err = ForwardRequest::build(Some("http://origin.test/base"), webhook(slug)).unwrap_err();
            assert!(
                matches!(err, BuildError::Rewritten { .. }),
                "slug {slug:?} gave {err:?}"
            );
        }
    }

    #[test]
    fn test_build_keeps_path_under_origin_base() {
        let request = ForwardRequest::build(Some("http://origin.test/base"), webhook("a%7Bb%7D")).unwrap();
        assert_eq!(request.url.as_str(), "http://origin.test/base/webhooks/a%7Bb%7D");
    }

    #[test]
    fn test_build_missing_origin() {
        assert_eq!(
            ForwardRequest::build(None, webhook("abc")).unwrap_err(),
            BuildError::MissingOrigin
        );
        assert_eq!(
            ForwardRequest::build(Some("  "), webhook("abc")).unwrap_err(),
            BuildError::MissingOrigin
        );
    }

    #[test]
    fn test_build_invalid_origin() {
        let err = ForwardRequest::build(Some("not a url"), webhook("abc")).unwrap_err();
        assert!(matches!(err, BuildError::InvalidOrigin { .. }));

        let err = ForwardRequest::build(Some("ftp://files.example.com"), webhook("abc")).unwrap_err();
        assert!(matches!(err, BuildError::InvalidOrigin { .. }));
    }

    #[test]
    fn test_forward_response_success_range() {
        assert!(ForwardResponse { status: 204 }.is_success());
        assert!(!ForwardResponse { status: 502 }.is_success());
    }
}
