//! A handle bound to one graph name.

use std::sync::Arc;

use graphwalk_common::utils::error::Result;
use graphwalk_core::graph::{GraphDefinition, GraphStore, MemoryStore};
use graphwalk_core::traversal::TraversalResult;
use serde_json::Value as JsonValue;

use crate::database::GraphWalkDB;
use crate::manager::Graph;
use crate::request::TraversalRequest;

/// The lifecycle and traversal calls of one named graph.
///
/// ```
/// use graphwalk_core::graph::{EdgeDefinition, GraphDefinition};
/// use graphwalk_engine::{Config, GraphWalkDB};
/// use serde_json::json;
///
/// let db = GraphWalkDB::with_config(Config::in_memory().with_auto_create_collections(true));
/// let friends = db.model("GraphFriend");
/// friends
///     .create(GraphDefinition::new().with_edge_definition(
///         EdgeDefinition::new("Friend", ["Person"], ["Person"]),
///     ))
///     .unwrap();
///
/// let err = friends.traversal(&json!({})).unwrap_err();
/// assert_eq!(err.status_code(), 400);
/// friends.destroy(true).unwrap();
/// ```
pub struct GraphModel<'db, S: GraphStore = MemoryStore> {
    db: &'db GraphWalkDB<S>,
    name: String,
}

impl<'db, S: GraphStore> GraphModel<'db, S> {
    pub(crate) fn new(db: &'db GraphWalkDB<S>, name: String) -> Self {
        Self { db, name }
    }

    /// The graph name this model is bound to.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Creates the graph under this model's name.
    ///
    /// # Errors
    ///
    /// See [`GraphWalkDB::create_graph`].
    pub fn create(&self, definition: GraphDefinition) -> Result<Arc<Graph>> {
        self.db.create_graph(&self.name, definition)
    }

    /// Drops the graph, optionally with its exclusive collections.
    ///
    /// # Errors
    ///
    /// See [`GraphWalkDB::destroy_graph`].
    pub fn destroy(&self, delete_collections: bool) -> Result<()> {
        self.db.destroy_graph(&self.name, delete_collections)
    }

    /// Traverses the graph with a `graphOptions` object.
    ///
    /// # Errors
    ///
    /// See [`GraphWalkDB::traversal`].
    pub fn traversal(&self, graph_options: &JsonValue) -> Result<TraversalResult> {
        self.db.traversal(&self.name, graph_options)
    }

    /// Traverses the graph with a typed request.
    ///
    /// # Errors
    ///
    /// See [`GraphWalkDB::traverse`].
    pub fn traverse(&self, request: &TraversalRequest) -> Result<TraversalResult> {
        self.db.traverse(&self.name, request)
    }

    /// The registered graph.
    ///
    /// # Errors
    ///
    /// `GraphNotFound` if it was never created or has been destroyed.
    pub fn graph(&self) -> Result<Arc<Graph>> {
        self.db.graphs().get(&self.name)
    }
}
