//! HTTP Request body types

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The kind of request body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RequestBodyKind {
    /// No body
    #[default]
    None,
    /// JSON document
    Json,
}

/// HTTP request body with content and type information.
///
/// A JSON body may be declared before its content is known (a template);
/// the content type is still sent so the server treats it as JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct RequestBody {
    /// The kind of body
    pub kind: RequestBodyKind,
    /// The JSON document, once attached
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<Value>,
}

impl RequestBody {
    /// Creates an empty body.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            kind: RequestBodyKind::None,
            content: None,
        }
    }

    /// Creates a JSON body.
    #[must_use]
    pub const fn json(content: Value) -> Self {
        Self {
            kind: RequestBodyKind::Json,
            content: Some(content),
        }
    }

    /// Creates a JSON body whose content is attached later.
    #[must_use]
    pub const fn json_template() -> Self {
        Self {
            kind: RequestBodyKind::Json,
            content: None,
        }
    }

    /// Returns whether there is nothing to send.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.content.is_none()
    }

    /// Returns the content type if applicable.
    #[must_use]
    pub const fn content_type(&self) -> Option<&'static str> {
        match self.kind {
            RequestBodyKind::None => None,
            RequestBodyKind::Json => Some("application/json"),
        }
    }

    /// Serializes the content for the wire.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON document cannot be serialized.
    pub fn to_bytes(&self) -> Result<Option<Vec<u8>>, serde_json::Error> {
        self.content.as_ref().map(serde_json::to_vec).transpose()
    }
}
