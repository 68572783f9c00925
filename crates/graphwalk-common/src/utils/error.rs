//! Error types for Graphwalk.
//!
//! Every error carries a stable machine code ([`Error::code`]), an HTTP
//! status a hosting layer should answer with ([`Error::status_code`]), and a
//! human-readable message (its `Display`).

use std::time::Duration;

use serde::Serialize;
use thiserror::Error;

use crate::types::{CollectionKind, DocumentHandle};

/// Result alias used across the Graphwalk crates.
pub type Result<T> = std::result::Result<T, Error>;

/// Coarse error taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    /// Missing or malformed input; rejected before any store access.
    Validation,
    /// A vertex, edge, collection, or graph is absent.
    NotFound,
    /// Duplicate identifier or name, or a collection of the wrong kind.
    Conflict,
    /// A graph definition (or an edge against it) is inconsistent.
    InvalidDefinition,
    /// A traversal was stopped before completion.
    Aborted,
}

/// Errors raised by the store, the lifecycle manager, and the traversal
/// engine.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// The traversal start vertex is missing, not a string, or malformed.
    #[error("startVertex is required")]
    StartVertexRequired,

    /// A document handle could not be parsed.
    #[error("invalid document handle '{handle}': {reason}")]
    InvalidHandle {
        /// The offending input.
        handle: String,
        /// What is wrong with it.
        reason: &'static str,
    },

    /// A collection name does not follow the naming rules.
    #[error("invalid collection name '{0}'")]
    InvalidCollectionName(String),

    /// A document tried to set a store-owned attribute.
    #[error("attribute '{0}' is reserved")]
    ReservedAttribute(String),

    /// A traversal option is out of range or not understood.
    #[error("invalid traversal option: {0}")]
    InvalidOption(String),

    /// The vertex does not exist.
    #[error("vertex {0} not found")]
    VertexNotFound(DocumentHandle),

    /// The edge does not exist.
    #[error("edge {0} not found")]
    EdgeNotFound(DocumentHandle),

    /// The collection does not exist.
    #[error("collection '{0}' not found")]
    CollectionNotFound(String),

    /// No graph is registered under this name.
    #[error("graph '{0}' not found")]
    GraphNotFound(String),

    /// A document with this handle already exists.
    #[error("document {0} already exists")]
    DuplicateId(DocumentHandle),

    /// A collection with this name already exists.
    #[error("collection '{0}' already exists")]
    DuplicateCollection(String),

    /// A graph with this name is already registered.
    #[error("graph '{0}' already exists")]
    GraphAlreadyExists(String),

    /// The collection exists but holds the other kind of document.
    #[error("collection '{collection}' is not a {expected} collection")]
    CollectionTypeMismatch {
        /// The collection name.
        collection: String,
        /// The kind the operation needed.
        expected: CollectionKind,
    },

    /// A graph definition is rejected.
    #[error("invalid edge definition: {0}")]
    InvalidEdgeDefinition(String),

    /// An edge inserted through a graph does not match its definition.
    #[error("edge {edge} violates graph '{graph}': {reason}")]
    EdgeDefinitionViolation {
        /// The graph name.
        graph: String,
        /// The rejected edge.
        edge: DocumentHandle,
        /// Which rule it breaks.
        reason: String,
    },

    /// The traversal was cancelled by its caller.
    #[error("traversal cancelled")]
    Cancelled,

    /// The traversal ran past its deadline.
    #[error("traversal timed out after {0:?}")]
    Timeout(Duration),

    /// The traversal expanded more frontier entries than allowed.
    #[error("traversal exceeded {0} iterations")]
    IterationLimitExceeded(usize),
}

impl Error {
    /// Returns the coarse kind of this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::StartVertexRequired
            | Self::InvalidHandle { .. }
            | Self::InvalidCollectionName(_)
            | Self::ReservedAttribute(_)
            | Self::InvalidOption(_) => ErrorKind::Validation,
            Self::VertexNotFound(_)
            | Self::EdgeNotFound(_)
            | Self::CollectionNotFound(_)
            | Self::GraphNotFound(_) => ErrorKind::NotFound,
            Self::DuplicateId(_)
            | Self::DuplicateCollection(_)
            | Self::GraphAlreadyExists(_)
            | Self::CollectionTypeMismatch { .. } => ErrorKind::Conflict,
            Self::InvalidEdgeDefinition(_) | Self::EdgeDefinitionViolation { .. } => {
                ErrorKind::InvalidDefinition
            }
            Self::Cancelled | Self::Timeout(_) | Self::IterationLimitExceeded(_) => {
                ErrorKind::Aborted
            }
        }
    }

    /// Returns the stable machine-readable code.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::StartVertexRequired => "START_VERTEX_IS_REQUIRED",
            Self::InvalidHandle { .. } => "INVALID_DOCUMENT_HANDLE",
            Self::InvalidCollectionName(_) => "INVALID_COLLECTION_NAME",
            Self::ReservedAttribute(_) => "RESERVED_ATTRIBUTE",
            Self::InvalidOption(_) => "INVALID_TRAVERSAL_OPTION",
            Self::VertexNotFound(_) => "VERTEX_NOT_FOUND",
            Self::EdgeNotFound(_) => "EDGE_NOT_FOUND",
            Self::CollectionNotFound(_) => "COLLECTION_NOT_FOUND",
            Self::GraphNotFound(_) => "GRAPH_NOT_FOUND",
            Self::DuplicateId(_) => "DUPLICATE_ID",
            Self::DuplicateCollection(_) => "DUPLICATE_COLLECTION",
            Self::GraphAlreadyExists(_) => "GRAPH_ALREADY_EXISTS",
            Self::CollectionTypeMismatch { .. } => "COLLECTION_TYPE_MISMATCH",
            Self::InvalidEdgeDefinition(_) => "INVALID_EDGE_DEFINITION",
            Self::EdgeDefinitionViolation { .. } => "EDGE_DEFINITION_VIOLATION",
            Self::Cancelled => "TRAVERSAL_CANCELLED",
            Self::Timeout(_) => "TRAVERSAL_TIMEOUT",
            Self::IterationLimitExceeded(_) => "ITERATION_LIMIT_EXCEEDED",
        }
    }

    /// Returns the HTTP status a hosting layer should use.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self.kind() {
            ErrorKind::Validation | ErrorKind::InvalidDefinition => 400,
            ErrorKind::NotFound => 404,
            ErrorKind::Conflict => 409,
            ErrorKind::Aborted => match self {
                Self::IterationLimitExceeded(_) => 500,
                _ => 408,
            },
        }
    }

    /// Builds the structured body a hosting layer sends back.
    #[must_use]
    pub fn to_body(&self) -> ErrorBody {
        ErrorBody::from(self)
    }
}

/// Serializable error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    /// Machine code, e.g. `START_VERTEX_IS_REQUIRED`.
    pub code: &'static str,
    /// HTTP status.
    pub status_code: u16,
    /// Coarse kind.
    pub kind: ErrorKind,
    /// Human-readable message.
    pub message: String,
}

impl From<&Error> for ErrorBody {
    fn from(err: &Error) -> Self {
        Self {
            code: err.code(),
            status_code: err.status_code(),
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn handle(s: &str) -> DocumentHandle {
        DocumentHandle::parse(s).unwrap()
    }

    #[test]
    fn test_start_vertex_required_body() {
        let body = Error::StartVertexRequired.to_body();
        assert_eq!(body.code, "START_VERTEX_IS_REQUIRED");
        assert_eq!(body.status_code, 400);
        assert_eq!(body.kind, ErrorKind::Validation);
        assert_eq!(body.message, "startVertex is required");

        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["statusCode"], 400);
        assert_eq!(json["kind"], "VALIDATION");
    }

    #[test]
    fn test_status_codes_by_kind() {
        assert_eq!(Error::VertexNotFound(handle("Person/a")).status_code(), 404);
        assert_eq!(Error::GraphNotFound("g".into()).status_code(), 404);
        assert_eq!(Error::DuplicateId(handle("Person/a")).status_code(), 409);
        assert_eq!(Error::GraphAlreadyExists("g".into()).status_code(), 409);
        assert_eq!(Error::InvalidEdgeDefinition("x".into()).status_code(), 400);
        assert_eq!(Error::Timeout(Duration::from_millis(5)).status_code(), 408);
        assert_eq!(Error::Cancelled.status_code(), 408);
        assert_eq!(Error::IterationLimitExceeded(10).status_code(), 500);
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            Error::VertexNotFound(handle("Person/a")).to_string(),
            "vertex Person/a not found"
        );
        assert_eq!(
            Error::CollectionTypeMismatch {
                collection: "Friend".into(),
                expected: CollectionKind::Vertex,
            }
            .to_string(),
            "collection 'Friend' is not a vertex collection"
        );
    }
}
