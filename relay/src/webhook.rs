//! Request-scoped view of an inbound webhook.

use std::collections::BTreeMap;

use axum::http::{HeaderMap, Method};
use bytes::Bytes;

/// Route prefix shared by the inbound route and the forwarded URL.
pub const WEBHOOK_PATH_PREFIX: &str = "/webhooks/";

/// An inbound webhook captured in full before any side effect runs.
///
/// The body is read exactly once; notification and forwarding both borrow
/// or take these bytes without re-encoding them.
#[derive(Debug, Clone)]
pub struct InboundWebhook {
    pub method: Method,
    /// Raw path segment after `/webhooks/`, still percent-encoded.
    pub slug: String,
    pub path: String,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl InboundWebhook {
    /// Header names mapped to every value they carry, sorted by name.
    ///
    /// Names are shown in canonical form (`X-Test`). Values that are not
    /// valid UTF-8 are rendered lossily.
    pub fn header_map(&self) -> BTreeMap<String, Vec<String>> {
        let mut map: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for (name, value) in &self.headers {
            map.entry(canonical_header_name(name.as_str()))
                .or_default()
                .push(String::from_utf8_lossy(value.as_bytes()).into_owned());
        }
        map
    }

    /// The body as text, for display only.
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Capitalize the first letter of each hyphen-separated word,
/// lowercasing the rest: `x-hub-signature` becomes `X-Hub-Signature`.
pub fn canonical_header_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper = true;
    for c in name.chars() {
        if upper {
            out.push(c.to_ascii_uppercase());
        } else {
            out.push(c.to_ascii_lowercase());
        }
        upper = c == '-';
    }
    out
}

/// Extract the slug segment from a request path such as `/webhooks/abc123`.
pub fn slug_from_path(path: &str) -> Option<&str> {
    path.strip_prefix(WEBHOOK_PATH_PREFIX)
        .filter(|slug| !slug.is_empty() && !slug.contains('/'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_slug_from_path() {
        assert_eq!(slug_from_path("/webhooks/abc123"), Some("abc123"));
        assert_eq!(slug_from_path("/webhooks/a%2Fb"), Some("a%2Fb"));
        assert_eq!(slug_from_path("/webhooks/"), None);
        assert_eq!(slug_from_path("/other/abc"), None);
    }

    #[test]
    fn test_header_map_groups_repeated_headers() {
        let mut headers = HeaderMap::new();
        headers.append("x-test", HeaderValue::from_static("1"));
        headers.append("accept", HeaderValue::from_static("text/plain"));
        headers.append("accept", HeaderValue::from_static("application/json"));

        let webhook = InboundWebhook {
            method: Method::POST,
            slug: "abc".to_string(),
            path: "/webhooks/abc".to_string(),
            headers,
            body: Bytes::new(),
        };

        let map = webhook.header_map();
        let keys: Vec<&String> = map.keys().collect();
        assert_eq!(keys, vec!["Accept", "X-Test"]);
        assert_eq!(map["Accept"], vec!["text/plain", "application/json"]);
        assert_eq!(map["X-Test"], vec!["1"]);
    }

    #[test]
    fn test_canonical_header_name() {
        assert_eq!(canonical_header_name("x-test"), "X-Test");
        assert_eq!(canonical_header_name("content-type"), "Content-Type");
        assert_eq!(canonical_header_name("x-hub-signature-256"), "X-Hub-Signature-256");
        assert_eq!(canonical_header_name("www-authenticate"), "Www-Authenticate");
        assert_eq!(canonical_header_name("etag"), "Etag");
    }

    #[test]
    fn test_body_text_is_lossy() {
        let webhook = InboundWebhook {
            method: Method::POST,
            slug: "abc".to_string(),
            path: "/webhooks/abc".to_string(),
            headers: HeaderMap::new(),
            body: Bytes::from_static(&[b'o', b'k', 0xff]),
        };
        assert_eq!(webhook.body_text(), "ok\u{fffd}");
    }
}
