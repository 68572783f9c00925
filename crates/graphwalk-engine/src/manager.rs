//! Named graph registry.
//!
//! The manager keeps the graphs of one database. Creating a graph checks its
//! definition against the store; dropping one can also delete the
//! collections no other graph still uses.

use std::sync::Arc;

use graphwalk_common::types::{CollectionKind, validate_collection_name};
use graphwalk_common::utils::error::{Error, Result};
use graphwalk_core::graph::{EdgeScope, GraphDefinition, GraphStore};
use indexmap::IndexMap;
use parking_lot::RwLock;
use serde::Serialize;

/// A registered graph.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Graph {
    name: String,
    #[serde(flatten)]
    definition: GraphDefinition,
    #[serde(skip)]
    scope: EdgeScope,
}

impl Graph {
    fn new(name: String, definition: GraphDefinition) -> Self {
        let scope = definition.edge_scope();
        Self {
            name,
            definition,
            scope,
        }
    }

    /// Graph name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Edge definitions and orphan collections.
    #[must_use]
    pub fn definition(&self) -> &GraphDefinition {
        &self.definition
    }

    /// The edges a traversal through this graph may follow.
    #[must_use]
    pub fn edge_scope(&self) -> &EdgeScope {
        &self.scope
    }
}

/// Registry of named graphs over one store.
pub struct GraphManager<S: GraphStore> {
    store: Arc<S>,
    graphs: RwLock<IndexMap<String, Arc<Graph>>>,
    auto_create_collections: bool,
}

impl<S: GraphStore> GraphManager<S> {
    /// Creates an empty registry.
    pub fn new(store: Arc<S>, auto_create_collections: bool) -> Self {
        Self {
            store,
            graphs: RwLock::new(IndexMap::new()),
            auto_create_collections,
        }
    }

    /// Registers a graph.
    ///
    /// Missing edge collections are created. Missing vertex collections are
    /// created only when the manager auto-creates collections.
    ///
    /// # Errors
    ///
    /// `GraphAlreadyExists` if the name is taken; `InvalidEdgeDefinition` if
    /// the definition is malformed or conflicts with the store or another
    /// graph.
    pub fn create(&self, name: &str, definition: GraphDefinition) -> Result<Arc<Graph>> {
        validate_collection_name(name)
            .map_err(|_| Error::InvalidEdgeDefinition(format!("invalid graph name '{name}'")))?;

        let mut graphs = self.graphs.write();
        if graphs.contains_key(name) {
            return Err(Error::GraphAlreadyExists(name.to_string()));
        }
        definition.validate()?;

        let missing = self.check_against_store(&definition)?;
        for edge_def in &definition.edge_definitions {
            if let Some(other) = graphs.values().find_map(|g| {
                g.definition
                    .edge_definition(&edge_def.collection)
                    .filter(|existing| !existing.same_endpoints(edge_def))
                    .map(|_| g.name())
            }) {
                return Err(Error::InvalidEdgeDefinition(format!(
                    "edge collection '{}' is used by graph '{other}' with different from/to collections",
                    edge_def.collection
                )));
            }
        }

        for (collection, kind) in missing {
            match self.store.create_collection(collection, kind) {
                Ok(()) => {}
                // created meanwhile, possibly with the other kind
                Err(Error::DuplicateCollection(_)) => match self.store.collection_kind(collection) {
                    Some(found) if found == kind => {}
                    Some(found) => {
                        return Err(Error::InvalidEdgeDefinition(format!(
                            "'{collection}' is a {found} collection, not a {kind} collection"
                        )));
                    }
                    None => return Err(Error::CollectionNotFound(collection.to_string())),
                },
                Err(err) => return Err(err),
            }
        }

        let graph = Arc::new(Graph::new(name.to_string(), definition));
        graphs.insert(name.to_string(), Arc::clone(&graph));
        tracing::info!(
            graph = name,
            edge_collections = graph.definition.edge_definitions.len(),
            "created graph"
        );
        Ok(graph)
    }

    /// Returns the collections that must be created for `definition`.
    fn check_against_store<'d>(
        &self,
        definition: &'d GraphDefinition,
    ) -> Result<Vec<(&'d str, CollectionKind)>> {
        let mut missing = Vec::new();

        for collection in definition.edge_collections() {
            match self.store.collection_kind(collection) {
                Some(CollectionKind::Edge) => {}
                Some(CollectionKind::Vertex) => {
                    return Err(Error::InvalidEdgeDefinition(format!(
                        "'{collection}' is a vertex collection, not an edge collection"
                    )));
                }
                None => missing.push((collection, CollectionKind::Edge)),
            }
        }

        for collection in definition.vertex_collections() {
            match self.store.collection_kind(collection) {
                Some(CollectionKind::Vertex) => {}
                Some(CollectionKind::Edge) => {
                    return Err(Error::InvalidEdgeDefinition(format!(
                        "'{collection}' is an edge collection, not a vertex collection"
                    )));
                }
                None if self.auto_create_collections => {
                    missing.push((collection, CollectionKind::Vertex));
                }
                None => {
                    return Err(Error::InvalidEdgeDefinition(format!(
                        "vertex collection '{collection}' does not exist"
                    )));
                }
            }
        }
        Ok(missing)
    }

    /// Removes a graph.
    ///
    /// With `delete_collections`, also deletes every collection of the graph
    /// that no remaining graph refers to. The registry stays locked until the
    /// collections are gone, and the graph is unregistered only once they
    /// are: if the store fails midway the graph stays registered and the
    /// drop can be retried.
    ///
    /// # Errors
    ///
    /// `GraphNotFound` if no graph has this name; any store error raised
    /// while deleting collections.
    pub fn drop(&self, name: &str, delete_collections: bool) -> Result<()> {
        let mut graphs = self.graphs.write();
        let graph = graphs
            .get(name)
            .cloned()
            .ok_or_else(|| Error::GraphNotFound(name.to_string()))?;

        let mut deleted = 0;
        if delete_collections {
            let exclusive = graph
                .definition
                .collections()
                .into_iter()
                .filter(|c| {
                    !graphs
                        .values()
                        .filter(|other| other.name() != name)
                        .any(|other| other.definition.collections().contains(c))
                });
            for collection in exclusive {
                match self.store.delete_collection(collection) {
                    Ok(()) => deleted += 1,
                    Err(Error::CollectionNotFound(_)) => {}
                    Err(err) => {
                        tracing::warn!(graph = name, collection, %err, "drop interrupted");
                        return Err(err);
                    }
                }
            }
        }

        graphs.shift_remove(name);
        tracing::info!(graph = name, deleted_collections = deleted, "dropped graph");
        Ok(())
    }

    /// Looks up a graph.
    ///
    /// # Errors
    ///
    /// `GraphNotFound` if no graph has this name.
    pub fn get(&self, name: &str) -> Result<Arc<Graph>> {
        self.graphs
            .read()
            .get(name)
            .cloned()
            .ok_or_else(|| Error::GraphNotFound(name.to_string()))
    }

    /// All graphs, in creation order.
    #[must_use]
    pub fn list(&self) -> Vec<Arc<Graph>> {
        self.graphs.read().values().cloned().collect()
    }

    /// Whether a graph with this name exists.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.graphs.read().contains_key(name)
    }
}
