//! Response envelopes returned by mutation and lookup endpoints.

use serde::{Deserialize, Serialize};

/// `type` value the service uses on every success acknowledgement.
pub const ACK_TYPE: &str = "unknown";

/// Message of a plain acknowledgement.
pub const ACK_OK: &str = "ok";

/// `type` value of the error envelope.
pub const ERROR_TYPE: &str = "error";

/// `code` of every not-found error envelope.
pub const NOT_FOUND_CODE: i64 = 1;

/// Message returned when a user lookup misses.
pub const USER_NOT_FOUND: &str = "User not found";

/// Marker contained in the login acknowledgement message.
pub const LOGIN_MARKER: &str = "logged in user session";

/// Success acknowledgement `{type, message}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AckEnvelope {
    /// Always `unknown` for this service.
    #[serde(rename = "type")]
    pub kind: String,
    /// `ok`, the affected key, or the login message.
    pub message: String,
}

/// Error envelope `{code, type, message}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    /// Service error code.
    pub code: i64,
    /// Always `error`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Human-readable reason.
    pub message: String,
}

/// Extracts the session token from a login message.
///
/// The token is everything after the first `:`; `None` when there is no
/// colon or nothing follows it.
#[must_use]
pub fn session_token_from_message(message: &str) -> Option<&str> {
    message
        .split_once(':')
        .map(|(_, token)| token)
        .filter(|token| !token.is_empty())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_token_after_first_colon() {
        assert_eq!(
            session_token_from_message("logged in user session:1718092910696"),
            Some("1718092910696")
        );
        assert_eq!(session_token_from_message("a:b:c"), Some("b:c"));
    }

    #[test]
    fn test_token_missing() {
        assert_eq!(session_token_from_message("logged in user session"), None);
        assert_eq!(session_token_from_message("logged in user session:"), None);
    }

    #[test]
    fn test_error_envelope_wire_names() {
        let envelope: ErrorEnvelope =
            serde_json::from_str(r#"{"code":1,"type":"error","message":"User not found"}"#)
                .unwrap();
        assert_eq!(envelope.kind, ERROR_TYPE);
        assert_eq!(envelope.code, 1);
    }
}
