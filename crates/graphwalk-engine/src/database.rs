//! GraphWalkDB main database struct.

use std::sync::Arc;

use graphwalk_common::types::{CollectionKind, DocumentHandle, PropertyMap};
use graphwalk_common::utils::error::{Error, Result};
use graphwalk_core::graph::{CollectionInfo, Edge, GraphDefinition, GraphStore, MemoryStore, Vertex};
use graphwalk_core::traversal::{CancelToken, TraversalFilter, TraversalResult, Traverser};
use serde::Serialize;
use serde_json::Value as JsonValue;

use crate::config::Config;
use crate::manager::{Graph, GraphManager};
use crate::model::GraphModel;
use crate::request::TraversalRequest;

/// Counts and graphs of a database.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseInfo {
    /// Registered graph names.
    pub graphs: Vec<String>,
    /// Collections with their kinds and sizes.
    pub collections: Vec<CollectionInfo>,
    /// Total vertices.
    pub vertex_count: usize,
    /// Total edges.
    pub edge_count: usize,
}

/// The main Graphwalk database: a store plus the graphs defined over it.
pub struct GraphWalkDB<S: GraphStore = MemoryStore> {
    /// Database configuration.
    config: Config,
    /// The underlying graph store.
    store: Arc<S>,
    /// Named graphs.
    graphs: GraphManager<S>,
}

impl GraphWalkDB<MemoryStore> {
    /// Creates a new in-memory database.
    ///
    /// # Examples
    ///
    /// ```
    /// use graphwalk_engine::GraphWalkDB;
    ///
    /// let db = GraphWalkDB::new_in_memory();
    /// assert_eq!(db.info().vertex_count, 0);
    /// ```
    #[must_use]
    pub fn new_in_memory() -> Self {
        Self::with_config(Config::in_memory())
    }

    /// Creates an in-memory database with the given configuration.
    ///
    /// # Examples
    ///
    /// ```
    /// use graphwalk_engine::{Config, GraphWalkDB};
    ///
    /// let config = Config::in_memory().with_default_max_depth(3);
    /// let db = GraphWalkDB::with_config(config);
    /// ```
    #[must_use]
    pub fn with_config(config: Config) -> Self {
        let store = MemoryStore::with_config(config.store.clone());
        Self::with_store(store, config)
    }
}

impl<S: GraphStore> GraphWalkDB<S> {
    /// Creates a database over a custom store.
    pub fn with_store(store: S, config: Config) -> Self {
        let store = Arc::new(store);
        let graphs = GraphManager::new(Arc::clone(&store), config.auto_create_collections);
        Self {
            config,
            store,
            graphs,
        }
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the underlying store.
    #[must_use]
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Returns the graph registry.
    #[must_use]
    pub fn graphs(&self) -> &GraphManager<S> {
        &self.graphs
    }

    /// Returns a handle bound to one graph name.
    pub fn model(&self, name: impl Into<String>) -> GraphModel<'_, S> {
        GraphModel::new(self, name.into())
    }

    // === Graph lifecycle ===

    /// Registers a named graph.
    ///
    /// # Errors
    ///
    /// See [`GraphManager::create`].
    pub fn create_graph(&self, name: &str, definition: GraphDefinition) -> Result<Arc<Graph>> {
        self.graphs.create(name, definition)
    }

    /// Removes a named graph, optionally deleting its collections.
    ///
    /// # Errors
    ///
    /// See [`GraphManager::drop`].
    pub fn destroy_graph(&self, name: &str, delete_collections: bool) -> Result<()> {
        self.graphs.drop(name, delete_collections)
    }

    // === Traversal ===

    /// Traverses `graph` with loosely-typed `graph_options`.
    ///
    /// # Errors
    ///
    /// Request validation errors (before any store access), then
    /// `GraphNotFound`, `VertexNotFound`, or an aborted-traversal error.
    ///
    /// # Examples
    ///
    /// ```
    /// use graphwalk_engine::GraphWalkDB;
    /// use serde_json::json;
    ///
    /// let db = GraphWalkDB::new_in_memory();
    /// let err = db.traversal("social", &json!({})).unwrap_err();
    /// assert_eq!(err.code(), "START_VERTEX_IS_REQUIRED");
    /// ```
    pub fn traversal(&self, graph: &str, graph_options: &JsonValue) -> Result<TraversalResult> {
        let request = TraversalRequest::from_json(graph_options)?;
        self.traverse(graph, &request)
    }

    /// Traverses `graph` with a typed request.
    ///
    /// # Errors
    ///
    /// See [`traversal`](Self::traversal).
    pub fn traverse(&self, graph: &str, request: &TraversalRequest) -> Result<TraversalResult> {
        self.traverse_with(graph, request, None, None)
    }

    /// Traverses `graph` with an optional vertex filter and cancel token.
    ///
    /// The configured or requested timeout is added to `cancel`.
    ///
    /// # Errors
    ///
    /// See [`traversal`](Self::traversal).
    pub fn traverse_with(
        &self,
        graph: &str,
        request: &TraversalRequest,
        filter: Option<&dyn TraversalFilter>,
        cancel: Option<CancelToken>,
    ) -> Result<TraversalResult> {
        let graph = self.graphs.get(graph)?;
        let options = request.options(&self.config);

        let mut cancel = cancel.unwrap_or_default();
        if let Some(timeout) = request.timeout(&self.config) {
            cancel = cancel.deadline_after(timeout);
        }

        let snapshot = self.store.snapshot();
        let mut traverser = Traverser::new(&snapshot, options)
            .with_scope(graph.edge_scope())
            .with_cancel(cancel);
        if let Some(filter) = filter {
            traverser = traverser.with_filter(filter);
        }

        let result = traverser.run(&request.start_vertex);
        if let Err(ref err) = result {
            tracing::debug!(graph = graph.name(), start = %request.start_vertex, %err, "traversal failed");
        }
        result
    }

    // === Documents ===

    /// Creates an empty collection.
    ///
    /// # Errors
    ///
    /// `InvalidCollectionName` or `DuplicateCollection`.
    pub fn create_collection(&self, name: &str, kind: CollectionKind) -> Result<()> {
        self.store.create_collection(name, kind)
    }

    /// Deletes a collection; vertex collections take their edges with them.
    ///
    /// # Errors
    ///
    /// `CollectionNotFound`.
    pub fn delete_collection(&self, name: &str) -> Result<()> {
        self.store.delete_collection(name)
    }

    /// Inserts a vertex.
    ///
    /// # Errors
    ///
    /// `DuplicateId`, `ReservedAttribute`, or `CollectionTypeMismatch`.
    pub fn insert_vertex(&self, vertex: Vertex) -> Result<()> {
        self.store.put_vertex(vertex)
    }

    /// Inserts an edge whose endpoints already exist.
    ///
    /// # Errors
    ///
    /// `VertexNotFound` for a missing endpoint, plus the vertex insert errors.
    pub fn insert_edge(&self, edge: Edge) -> Result<()> {
        self.store.put_edge(edge)
    }

    /// Inserts an edge after checking it against a graph's edge definitions.
    ///
    /// # Errors
    ///
    /// `GraphNotFound`, `EdgeDefinitionViolation`, or an insert error.
    pub fn insert_edge_in_graph(&self, graph: &str, edge: Edge) -> Result<()> {
        let graph = self.graphs.get(graph)?;
        if let Err(reason) = graph.edge_scope().check(&edge) {
            return Err(Error::EdgeDefinitionViolation {
                graph: graph.name().to_string(),
                edge: edge.handle,
                reason,
            });
        }
        self.store.put_edge(edge)
    }

    /// Merges properties into a vertex.
    ///
    /// # Errors
    ///
    /// `VertexNotFound` or `ReservedAttribute`.
    pub fn update_vertex(&self, handle: &DocumentHandle, properties: PropertyMap) -> Result<()> {
        self.store.update_vertex(handle, properties)
    }

    /// Fetches a vertex.
    ///
    /// # Errors
    ///
    /// `VertexNotFound`.
    pub fn get_vertex(&self, handle: &DocumentHandle) -> Result<Vertex> {
        self.store.get_vertex(handle)
    }

    /// Fetches an edge.
    ///
    /// # Errors
    ///
    /// `EdgeNotFound`.
    pub fn get_edge(&self, handle: &DocumentHandle) -> Result<Edge> {
        self.store.get_edge(handle)
    }

    /// Removes a vertex and its edges.
    ///
    /// # Errors
    ///
    /// `VertexNotFound`.
    pub fn remove_vertex(&self, handle: &DocumentHandle) -> Result<Vertex> {
        self.store.remove_vertex(handle)
    }

    /// Removes an edge.
    ///
    /// # Errors
    ///
    /// `EdgeNotFound`.
    pub fn remove_edge(&self, handle: &DocumentHandle) -> Result<Edge> {
        self.store.remove_edge(handle)
    }

    /// Summarizes graphs and collections.
    #[must_use]
    pub fn info(&self) -> DatabaseInfo {
        let collections = self.store.collections();
        let count = |kind: CollectionKind| -> usize {
            collections
                .iter()
                .filter(|c| c.kind == kind)
                .map(|c| c.count)
                .sum()
        };
        DatabaseInfo {
            graphs: self.graphs.list().iter().map(|g| g.name().to_string()).collect(),
            vertex_count: count(CollectionKind::Vertex),
            edge_count: count(CollectionKind::Edge),
            collections,
        }
    }
}

impl Default for GraphWalkDB<MemoryStore> {
    fn default() -> Self {
        Self::new_in_memory()
    }
}
