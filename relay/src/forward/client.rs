//! reqwest-backed forwarder.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{error, info};

use super::types::{ForwardError, ForwardRequest, ForwardResponse};
use super::Forwarder;

/// Sends forwarded webhooks over HTTP with a fixed timeout.
#[derive(Debug, Clone)]
pub struct HttpForwarder {
    client: Client,
    timeout: Duration,
}

impl HttpForwarder {
    pub fn new(timeout: Duration) -> reqwest::Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, timeout })
    }
}

#[async_trait]
impl Forwarder for HttpForwarder {
    async fn send(&self, request: ForwardRequest) -> Result<ForwardResponse, ForwardError> {
        let url = request.url.to_string();

        info!(
            url = %url,
            header_count = request.headers.len(),
            body_length = request.body.len(),
            timeout_seconds = self.timeout.as_secs_f64(),
            "forward_starting"
        );

        let result = self
            .client
            .post(request.url)
            .headers(request.headers)
            .body(request.body)
            .send()
            .await;

        match result {
            Ok(resp) => {
                let response = ForwardResponse {
                    status: resp.status().as_u16(),
                };

                info!(
                    url = %url,
                    status_code = response.status,
                    is_success = response.is_success(),
                    "forward_complete"
                );

                Ok(response)
            }
            Err(e) if e.is_timeout() => {
                error!(
                    url = %url,
                    timeout_seconds = self.timeout.as_secs_f64(),
                    error = %e,
                    "forward_timeout"
                );
                Err(ForwardError::Timeout {
                    timeout_ms: self.timeout.as_millis() as u64,
                    message: e.to_string(),
                })
            }
            Err(e) => {
                error!(url = %url, error = %e, "forward_error");
                Err(ForwardError::Transport(e.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderMap, HeaderValue};
    use bytes::Bytes;
    use url::Url;
    use wiremock::matchers::{body_bytes, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn request(url: &str, body: &'static [u8]) -> ForwardRequest {
        let mut headers = HeaderMap::new();
        headers.insert("x-test", HeaderValue::from_static("1"));
        ForwardRequest {
            url: Url::parse(url).unwrap(),
            headers,
            body: Bytes::from_static(body),
        }
    }

    #[tokio::test]
    async fn test_posts_headers_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/webhooks/abc"))
            .and(header("x-test", "1"))
            .and(body_bytes(b"payload".to_vec()))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let forwarder = HttpForwarder::new(Duration::from_secs(5)).unwrap();
        let response = forwarder
            .send(request(&format!("{}/webhooks/abc", server.uri()), b"payload"))
            .await
            .unwrap();

        assert_eq!(response.status, 200);
    }

    #[tokio::test]
    async fn test_downstream_error_status_is_not_a_transport_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let forwarder = HttpForwarder::new(Duration::from_secs(5)).unwrap();
        let response = forwarder
            .send(request(&format!("{}/webhooks/abc", server.uri()), b""))
            .await
            .unwrap();

        assert_eq!(response.status, 500);
        assert!(!response.is_success());
    }

    #[tokio::test]
    async fn test_slow_origin_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
            .mount(&server)
            .await;

        let forwarder = HttpForwarder::new(Duration::from_millis(100)).unwrap();
        let err = forwarder
            .send(request(&format!("{}/webhooks/abc", server.uri()), b""))
            .await
            .unwrap_err();

        assert!(matches!(err, ForwardError::Timeout { timeout_ms: 100, .. }));
    }
}
