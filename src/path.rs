// Copyright 2025 Oxide Computer Company

//! JSON pointers for tracking where each side of a comparison is within its
//! OpenAPI document.
//!
//! The walker keeps one [`JsonPointer`] per document side. After a `$ref` is
//! followed, the pointer is reset to the referenced component, so two visits
//! to the same component produce the same pointer no matter how the walk got
//! there. That property is what the cycle guard keys on.

use std::{borrow::Cow, fmt};

/// A location within an OpenAPI document, as an RFC 6901 JSON pointer in URI
/// fragment form (`#/paths/~1users/get`).
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct JsonPointer {
    path: String,
}

impl JsonPointer {
    /// The document root, `#`.
    pub fn root() -> Self {
        Self {
            path: "#".to_string(),
        }
    }

    /// Parse a local reference such as `#/components/schemas/User`.
    ///
    /// Returns `None` for anything that is not a local JSON pointer.
    pub fn parse(reference: &str) -> Option<Self> {
        (reference == "#" || reference.starts_with("#/")).then(|| Self {
            path: reference.to_string(),
        })
    }

    /// Append a path segment, escaping special characters per RFC 6901.
    pub fn append(&self, segment: &str) -> Self {
        Self {
            path: format!("{}/{}", self.path, escape_json_pointer_segment(segment)),
        }
    }

    /// Get the JSON pointer string.
    pub fn as_str(&self) -> &str {
        &self.path
    }

    /// Unescaped segments after the leading `#`.
    pub fn segments(&self) -> impl Iterator<Item = Cow<'_, str>> {
        self.path
            .strip_prefix("#/")
            .into_iter()
            .flat_map(|rest| rest.split('/'))
            .map(unescape_json_pointer_segment)
    }
}

impl fmt::Display for JsonPointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)
    }
}

/// Escape a segment for use in a JSON pointer per RFC 6901.
fn escape_json_pointer_segment(segment: &str) -> String {
    segment.replace('~', "~0").replace('/', "~1")
}

/// Reverse [`escape_json_pointer_segment`]. `~1` must be decoded before `~0`.
fn unescape_json_pointer_segment(segment: &str) -> Cow<'_, str> {
    if segment.contains('~') {
        Cow::Owned(segment.replace("~1", "/").replace("~0", "~"))
    } else {
        Cow::Borrowed(segment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_pointer() {
        assert_eq!(JsonPointer::root().as_str(), "#");
        assert_eq!(JsonPointer::root().segments().count(), 0);
    }

    #[test]
    fn append_escapes() {
        let pointer = JsonPointer::root()
            .append("paths")
            .append("/users/{id}")
            .append("get");
        assert_eq!(pointer.as_str(), "#/paths/~1users~1{id}/get");

        let pointer = JsonPointer::root().append("a~b");
        assert_eq!(pointer.as_str(), "#/a~0b");
    }

    #[test]
    fn content_type_segment() {
        let pointer = JsonPointer::root()
            .append("content")
            .append("application/json");
        assert_eq!(pointer.as_str(), "#/content/application~1json");
    }

    #[test]
    fn parse_valid() {
        let pointer = JsonPointer::parse("#/components/schemas/User").unwrap();
        assert_eq!(pointer.as_str(), "#/components/schemas/User");
        assert_eq!(
            pointer.segments().collect::<Vec<_>>(),
            vec!["components", "schemas", "User"],
        );
    }

    #[test]
    fn parse_invalid() {
        assert!(JsonPointer::parse("components/schemas/User").is_none());
        assert!(JsonPointer::parse("other.yml#/components/schemas/User").is_none());
        assert!(JsonPointer::parse("").is_none());
    }

    #[test]
    fn segments_unescape() {
        let pointer = JsonPointer::parse("#/components/schemas/a~1b~0c").unwrap();
        assert_eq!(
            pointer.segments().collect::<Vec<_>>(),
            vec!["components", "schemas", "a/b~c"],
        );
    }

    #[test]
    fn escape_roundtrip_order() {
        // "~01" must decode to "~1", not "/".
        assert_eq!(unescape_json_pointer_segment("~01"), "~1");
        assert_eq!(escape_json_pointer_segment("~1"), "~01");
    }
}
