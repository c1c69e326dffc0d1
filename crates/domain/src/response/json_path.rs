//! Queryable view over a JSON response body.
//!
//! Paths use dotted field access with bracketed indices, e.g. `category.id`,
//! `photoUrls[0]` or `tags[0].name`. A leading `$` or `$.` is accepted.

use serde_json::Value;

use crate::error::{DomainError, DomainResult};

/// A parsed JSON body with path-based field access.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonView {
    root: Value,
}

impl JsonView {
    /// Wraps an already parsed document.
    #[must_use]
    pub const fn new(root: Value) -> Self {
        Self { root }
    }

    /// Parses a body into a view.
    ///
    /// # Errors
    ///
    /// Returns the parser error if the body is not valid JSON.
    pub fn parse(body: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(body).map(Self::new)
    }

    /// Returns the whole document.
    #[must_use]
    pub const fn root(&self) -> &Value {
        &self.root
    }

    /// Looks up a path. `Ok(None)` means the path is well formed but absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the path cannot be parsed.
    pub fn get(&self, path: &str) -> DomainResult<Option<&Value>> {
        query(&self.root, path)
    }

    /// Looks up a string field.
    ///
    /// # Errors
    ///
    /// Returns an error if the path cannot be parsed.
    pub fn get_str(&self, path: &str) -> DomainResult<Option<&str>> {
        Ok(self.get(path)?.and_then(Value::as_str))
    }

    /// Looks up an integer field.
    ///
    /// # Errors
    ///
    /// Returns an error if the path cannot be parsed.
    pub fn get_i64(&self, path: &str) -> DomainResult<Option<i64>> {
        Ok(self.get(path)?.and_then(Value::as_i64))
    }

    /// Looks up a boolean field.
    ///
    /// # Errors
    ///
    /// Returns an error if the path cannot be parsed.
    pub fn get_bool(&self, path: &str) -> DomainResult<Option<bool>> {
        Ok(self.get(path)?.and_then(Value::as_bool))
    }
}

/// One step of a parsed path.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Field(String),
    Index(usize),
}

/// Queries `value` with a dotted/indexed path.
///
/// # Errors
///
/// Returns an error if the path cannot be parsed.
pub fn query<'a>(value: &'a Value, path: &str) -> DomainResult<Option<&'a Value>> {
    let mut current = value;
    for segment in parse_path(path)? {
        let next = match segment {
            Segment::Field(name) => current.get(name.as_str()),
            Segment::Index(index) => current.get(index),
        };
        match next {
            Some(v) => current = v,
            None => return Ok(None),
        }
    }
    Ok(Some(current))
}

fn parse_path(path: &str) -> DomainResult<Vec<Segment>> {
    let invalid = |reason: &str| DomainError::InvalidJsonPath {
        path: path.to_string(),
        reason: reason.to_string(),
    };

    let trimmed = path.trim();
    let body = trimmed.strip_prefix('$').unwrap_or(trimmed);
    let body = body.strip_prefix('.').unwrap_or(body);

    let mut segments = Vec::new();
    for part in split_outside_brackets(body) {
        if part.is_empty() {
            return Err(invalid("empty segment"));
        }
        let (name, mut rest) = part.find('[').map_or((part, ""), |i| part.split_at(i));
        if !name.is_empty() {
            segments.push(Segment::Field(name.to_string()));
        }
        while !rest.is_empty() {
            let close = rest.find(']').ok_or_else(|| invalid("unclosed '['"))?;
            let index = rest[1..close]
                .trim()
                .parse::<usize>()
                .map_err(|_| invalid("array index must be a non-negative integer"))?;
            segments.push(Segment::Index(index));
            rest = &rest[close + 1..];
            if !rest.is_empty() && !rest.starts_with('[') {
                return Err(invalid("unexpected text after ']'"));
            }
        }
    }
    Ok(segments)
}

/// Split a path on dots, respecting array brackets.
fn split_outside_brackets(path: &str) -> Vec<&str> {
    if path.is_empty() {
        return Vec::new();
    }
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, ch) in path.char_indices() {
        match ch {
            '[' => depth += 1,
            ']' => depth = depth.saturating_sub(1),
            '.' if depth == 0 => {
                parts.push(&path[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&path[start..]);
    parts
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn pet() -> JsonView {
        JsonView::new(json!({
            "id": 9_223_372_036_854_775_000_i64,
            "category": {"id": 0, "name": "dogs"},
            "name": "rex",
            "photoUrls": ["a.com", "b.com"],
            "tags": [{"id": 7, "name": "good"}],
            "status": "available"
        }))
    }

    #[test]
    fn test_dotted_and_indexed_access() {
        let view = pet();
        assert_eq!(view.get_i64("category.id").unwrap(), Some(0));
        assert_eq!(view.get_str("category.name").unwrap(), Some("dogs"));
        assert_eq!(view.get_str("photoUrls[1]").unwrap(), Some("b.com"));
        assert_eq!(view.get_str("tags[0].name").unwrap(), Some("good"));
        assert_eq!(view.get_i64("$.id").unwrap(), Some(9_223_372_036_854_775_000));
    }

    #[test]
    fn test_missing_paths_are_none() {
        let view = pet();
        assert_eq!(view.get("category.missing").unwrap(), None);
        assert_eq!(view.get("photoUrls[5]").unwrap(), None);
        assert_eq!(view.get("name.inner").unwrap(), None);
    }

    #[test]
    fn test_root_path() {
        let view = pet();
        assert_eq!(view.get("$").unwrap(), Some(view.root()));
    }

    #[test]
    fn test_malformed_paths_are_errors() {
        let view = pet();
        assert!(view.get("tags[x].name").is_err());
        assert!(view.get("tags[0").is_err());
        assert!(view.get("category..id").is_err());
        assert!(view.get("tags[0]name").is_err());
    }

    #[test]
    fn test_wrong_type_is_none() {
        let view = pet();
        assert_eq!(view.get_i64("name").unwrap(), None);
        assert_eq!(view.get_bool("status").unwrap(), None);
    }
}
