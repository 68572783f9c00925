//! # Graphwalk
//!
//! Named property graphs over a pluggable document store, with
//! breadth-first and depth-first traversal.
//!
//! Start with [`GraphWalkDB`]: insert vertices and edges into collections,
//! define a graph over them, then traverse it from a start vertex.
//!
//! ## Quick Start
//!
//! ```rust
//! use graphwalk::{DocumentHandle, Edge, EdgeDefinition, GraphDefinition, GraphWalkDB, Vertex};
//! use serde_json::json;
//!
//! let db = GraphWalkDB::new_in_memory();
//! for key in ["matteo", "antonio"] {
//!     db.insert_vertex(Vertex::new(DocumentHandle::new("Person", key)?))?;
//! }
//! db.insert_edge(Edge::new(
//!     DocumentHandle::parse("Friend/x")?,
//!     DocumentHandle::parse("Person/matteo")?,
//!     DocumentHandle::parse("Person/antonio")?,
//! ))?;
//! db.create_graph(
//!     "GraphFriend",
//!     GraphDefinition::new().with_edge_definition(EdgeDefinition::new(
//!         "Friend",
//!         ["Person"],
//!         ["Person"],
//!     )),
//! )?;
//!
//! let result = db.traversal("GraphFriend", &json!({"startVertex": "Person/matteo"}))?;
//! assert_eq!(result.visited.vertices.len(), 2);
//! assert_eq!(result.visited.paths.len(), 1);
//!
//! // A request without a start vertex is rejected with status 400.
//! let err = db.traversal("GraphFriend", &json!({})).unwrap_err();
//! assert_eq!(err.status_code(), 400);
//! # Ok::<(), graphwalk::Error>(())
//! ```

// Re-export the main database API
pub use graphwalk_engine::{
    Config, Dataset, DatasetError, Graph, GraphModel, GraphWalkDB, TraversalRequest,
};

// Graph model and traversal
pub use graphwalk_core::graph::{
    Direction, Edge, EdgeDefinition, GraphDefinition, GraphStore, MemoryStore, Vertex,
};
pub use graphwalk_core::traversal::{
    CancelToken, Path, Strategy, TraversalFilter, TraversalOptions, TraversalResult, Uniqueness,
    VisitAction,
};

// Core types - handles, values, and errors
pub use graphwalk_common::types::{DocumentHandle, PropertyMap, Value};
pub use graphwalk_common::utils::error::{Error, Result};
