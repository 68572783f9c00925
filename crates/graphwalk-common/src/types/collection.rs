//! Collection kinds and collection name rules.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::utils::error::{Error, Result};

/// Maximum length of a collection name.
pub const MAX_COLLECTION_NAME_LEN: usize = 256;

static COLLECTION_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_\-]*$").expect("collection name pattern is valid")
});

/// What a collection stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollectionKind {
    /// Vertex documents.
    Vertex,
    /// Directed edge documents.
    Edge,
}

impl fmt::Display for CollectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Vertex => f.write_str("vertex"),
            Self::Edge => f.write_str("edge"),
        }
    }
}

/// Checks a collection name.
///
/// Names start with a letter or underscore, continue with letters, digits,
/// `_` or `-`, and are at most 256 bytes long.
pub fn validate_collection_name(name: &str) -> Result<()> {
    if name.len() > MAX_COLLECTION_NAME_LEN || !COLLECTION_NAME.is_match(name) {
        return Err(Error::InvalidCollectionName(name.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_collection_names() {
        for name in ["Person", "_system", "friend-of", "Edge_2"] {
            assert!(validate_collection_name(name).is_ok(), "{name}");
        }
    }

    #[test]
    fn test_invalid_collection_names() {
        for name in ["", "2Person", "Per son", "a/b", "ünicode"] {
            assert_eq!(
                validate_collection_name(name),
                Err(Error::InvalidCollectionName(name.to_string()))
            );
        }

        let long = "a".repeat(MAX_COLLECTION_NAME_LEN + 1);
        assert!(validate_collection_name(&long).is_err());
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(CollectionKind::Vertex.to_string(), "vertex");
        assert_eq!(CollectionKind::Edge.to_string(), "edge");
    }
}
