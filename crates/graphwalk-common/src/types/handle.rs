//! Document handles.
//!
//! Every vertex and edge is addressed by a handle of the form
//! `Collection/key`. The collection part names the vertex or edge collection
//! the document lives in; the key is unique within that collection.

use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, LazyLock};

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::collection::validate_collection_name;
use crate::utils::error::{Error, Result};

/// Maximum length of a document key.
pub const MAX_KEY_LEN: usize = 254;

static DOCUMENT_KEY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9_\-:.@()+,=;$!*'%]+$").expect("document key pattern is valid")
});

/// Checks a document key.
pub fn validate_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(invalid(key, "key is empty"));
    }
    if key.len() > MAX_KEY_LEN {
        return Err(invalid(key, "key is longer than 254 bytes"));
    }
    if !DOCUMENT_KEY.is_match(key) {
        return Err(invalid(key, "key contains illegal characters"));
    }
    Ok(())
}

fn invalid(handle: &str, reason: &'static str) -> Error {
    Error::InvalidHandle {
        handle: handle.to_string(),
        reason,
    }
}

/// Identifier of a vertex or edge: `Collection/key`.
///
/// Cloning is cheap; both parts are reference counted.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentHandle {
    collection: Arc<str>,
    key: Arc<str>,
}

impl DocumentHandle {
    /// Builds a handle from its parts, validating both.
    pub fn new(collection: &str, key: &str) -> Result<Self> {
        validate_collection_name(collection).map_err(|_| {
            invalid(&format!("{collection}/{key}"), "invalid collection name")
        })?;
        validate_key(key).map_err(|e| match e {
            Error::InvalidHandle { reason, .. } => invalid(&format!("{collection}/{key}"), reason),
            other => other,
        })?;
        Ok(Self {
            collection: collection.into(),
            key: key.into(),
        })
    }

    /// Parses a `Collection/key` string.
    ///
    /// # Examples
    ///
    /// ```
    /// use graphwalk_common::types::DocumentHandle;
    ///
    /// let handle = DocumentHandle::parse("Person/matteo").unwrap();
    /// assert_eq!(handle.collection(), "Person");
    /// assert_eq!(handle.key(), "matteo");
    /// ```
    pub fn parse(s: &str) -> Result<Self> {
        let Some((collection, key)) = s.split_once('/') else {
            return Err(invalid(s, "expected 'collection/key'"));
        };
        Self::new(collection, key)
    }

    /// Returns the collection name.
    #[must_use]
    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Returns the key within the collection.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl fmt::Display for DocumentHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.collection, self.key)
    }
}

impl fmt::Debug for DocumentHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DocumentHandle({self})")
    }
}

impl FromStr for DocumentHandle {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<&str> for DocumentHandle {
    type Error = Error;

    fn try_from(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl Serialize for DocumentHandle {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DocumentHandle {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_round_trips_display() {
        let handle = DocumentHandle::parse("Friend/x").unwrap();
        assert_eq!(handle.collection(), "Friend");
        assert_eq!(handle.key(), "x");
        assert_eq!(handle.to_string(), "Friend/x");
    }

    #[test]
    fn test_parse_rejects_missing_separator() {
        let err = DocumentHandle::parse("matteo").unwrap_err();
        assert!(matches!(err, Error::InvalidHandle { .. }));
    }

    #[test]
    fn test_parse_rejects_empty_parts() {
        assert!(DocumentHandle::parse("/a").is_err());
        assert!(DocumentHandle::parse("Person/").is_err());
        assert!(DocumentHandle::parse("").is_err());
    }

    #[test]
    fn test_key_with_extra_slash_is_rejected() {
        let err = DocumentHandle::parse("Person/a/b").unwrap_err();
        assert_eq!(
            err,
            Error::InvalidHandle {
                handle: "Person/a/b".to_string(),
                reason: "key contains illegal characters",
            }
        );
    }

    #[test]
    fn test_key_punctuation() {
        assert!(DocumentHandle::parse("Person/a:b@c(1)+2,3=4;$!*'%").is_ok());
        assert!(DocumentHandle::parse("Person/a b").is_err());
    }

    #[test]
    fn test_key_length_limit() {
        let key = "k".repeat(MAX_KEY_LEN);
        assert!(DocumentHandle::new("Person", &key).is_ok());
        let key = "k".repeat(MAX_KEY_LEN + 1);
        assert!(DocumentHandle::new("Person", &key).is_err());
    }

    #[test]
    fn test_serde_as_string() {
        let handle = DocumentHandle::parse("Person/a").unwrap();
        let json = serde_json::to_string(&handle).unwrap();
        assert_eq!(json, "\"Person/a\"");

        let back: DocumentHandle = serde_json::from_str(&json).unwrap();
        assert_eq!(back, handle);

        assert!(serde_json::from_str::<DocumentHandle>("\"nope\"").is_err());
    }

    #[test]
    fn test_ordering_is_by_collection_then_key() {
        let mut handles: Vec<DocumentHandle> = ["B/a", "A/z", "A/b"]
            .iter()
            .map(|s| DocumentHandle::parse(s).unwrap())
            .collect();
        handles.sort();
        let rendered: Vec<String> = handles.iter().map(ToString::to_string).collect();
        assert_eq!(rendered, ["A/b", "A/z", "B/a"]);
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn parse_accepts_only_what_it_can_print(input in "\\PC{0,40}") {
                if let Ok(handle) = DocumentHandle::parse(&input) {
                    prop_assert_eq!(handle.to_string(), input);
                }
            }

            #[test]
            fn well_formed_parts_parse(
                collection in "[A-Za-z_][A-Za-z0-9_-]{0,20}",
                key in "[A-Za-z0-9_:.@]{1,30}",
            ) {
                let handle = DocumentHandle::new(&collection, &key).unwrap();
                prop_assert_eq!(handle.collection(), collection.as_str());
                prop_assert_eq!(handle.key(), key.as_str());
                prop_assert_eq!(DocumentHandle::parse(&handle.to_string()).unwrap(), handle);
            }
        }
    }
}
