//! Response captured from one lifecycle call

use std::collections::HashMap;
use std::time::Duration;

/// What came back from the service.
///
/// A non-2xx status is a normal response, not a transport failure; the
/// absence checks after a delete depend on reading 404 bodies.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResponseSpec {
    /// Numeric status.
    pub status: u16,
    /// Header map as received.
    pub headers: HashMap<String, String>,
    /// Body decoded as UTF-8, lossily if needed.
    pub body: String,
    /// Round-trip time.
    pub duration: Duration,
    /// `Content-Type` lifted out of `headers`.
    pub content_type: Option<String>,
}

impl ResponseSpec {
    /// Assembles a response from the raw parts an adapter has read.
    #[must_use]
    pub fn new(
        status: u16,
        headers: HashMap<String, String>,
        body: Vec<u8>,
        duration: Duration,
    ) -> Self {
        let content_type = header(&headers, "content-type").map(str::to_string);
        let body = String::from_utf8(body)
            .unwrap_or_else(|e| String::from_utf8_lossy(e.as_bytes()).into_owned());

        Self {
            status,
            headers,
            body,
            duration,
            content_type,
        }
    }

    /// Media type of the body without parameters, e.g. `application/json`
    /// for `application/json; charset=utf-8`.
    #[must_use]
    pub fn media_type(&self) -> Option<&str> {
        self.content_type
            .as_deref()
            .and_then(|ct| ct.split(';').next())
            .map(str::trim)
            .filter(|media| !media.is_empty())
    }

    /// True for `application/json` and `+json` media types, in any case.
    #[must_use]
    pub fn is_json(&self) -> bool {
        self.media_type().is_some_and(|media| {
            media.eq_ignore_ascii_case("application/json")
                || media
                    .get(media.len().saturating_sub(5)..)
                    .is_some_and(|suffix| suffix.eq_ignore_ascii_case("+json"))
        })
    }

    /// First `limit` characters of the body for failure messages.
    #[must_use]
    pub fn body_preview(&self, limit: usize) -> String {
        let mut chars = self.body.chars();
        let head: String = chars.by_ref().take(limit).collect();
        if chars.next().is_some() {
            format!("{head}...")
        } else {
            head
        }
    }
}

fn header<'a>(headers: &'a HashMap<String, String>, name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(name))
        .map(|(_, v)| v.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_content_type_found_case_insensitively() {
        let headers = HashMap::from([(
            "Content-Type".to_string(),
            "application/json; charset=utf-8".to_string(),
        )]);
        let response = ResponseSpec::new(
            200,
            headers,
            br#"{"type":"unknown"}"#.to_vec(),
            Duration::from_millis(12),
        );

        assert_eq!(
            response.content_type.as_deref(),
            Some("application/json; charset=utf-8")
        );
        assert!(response.is_json());
    }

    #[test]
    fn test_media_type_is_case_insensitive() {
        let headers = HashMap::from([(
            "content-type".to_string(),
            "Application/JSON; charset=UTF-8".to_string(),
        )]);
        let response = ResponseSpec::new(200, headers, b"{}".to_vec(), Duration::ZERO);
        assert_eq!(response.media_type(), Some("Application/JSON"));
        assert!(response.is_json());

        let headers = HashMap::from([(
            "Content-Type".to_string(),
            "application/problem+JSON".to_string(),
        )]);
        let response = ResponseSpec::new(404, headers, b"{}".to_vec(), Duration::ZERO);
        assert!(response.is_json());
    }

    #[test]
    fn test_html_error_page_is_not_json() {
        let headers = HashMap::from([("content-type".to_string(), "text/html".to_string())]);
        let response = ResponseSpec::new(502, headers, b"<html>".to_vec(), Duration::ZERO);
        assert!(!response.is_json());
    }

    #[test]
    fn test_body_preview_truncates() {
        let response = ResponseSpec::new(404, HashMap::new(), b"abcdef".to_vec(), Duration::ZERO);
        assert_eq!(response.body_preview(3), "abc...");
        assert_eq!(response.body_preview(6), "abcdef");
        assert_eq!(response.body_preview(10), "abcdef");
        assert!(!response.is_json());
    }
}
