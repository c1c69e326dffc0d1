//! HTTP verbs the lifecycle uses

use serde::{Deserialize, Serialize};
use std::fmt;

/// Verb of a lifecycle request.
///
/// The pet-store contract only needs create (`POST`), read (`GET`),
/// update (`PUT`) and delete (`DELETE`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    /// Read-back and login.
    #[default]
    Get,
    /// Resource creation.
    Post,
    /// User update.
    Put,
    /// Resource removal.
    Delete,
}

impl HttpMethod {
    /// Wire name of the verb.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
