//! The storage interface.
//!
//! [`GraphStore`] is what the lifecycle manager and the traversal engine are
//! written against. Reads go through a [`GraphRead`] snapshot so a traversal
//! sees one consistent state for its whole run; writers are excluded while
//! any snapshot is alive.

use graphwalk_common::types::{CollectionKind, DocumentHandle, PropertyMap};
use graphwalk_common::utils::error::{Error, Result};
use serde::Serialize;

use super::Direction;
use super::document::{Edge, Vertex};

/// Boxed iterator over edges borrowed from a snapshot.
pub type EdgeIter<'a> = Box<dyn Iterator<Item = &'a Edge> + 'a>;

/// A consistent read view of a store.
pub trait GraphRead {
    /// Looks up a vertex.
    fn vertex(&self, handle: &DocumentHandle) -> Option<&Vertex>;

    /// Looks up an edge.
    fn edge(&self, handle: &DocumentHandle) -> Option<&Edge>;

    /// Edges whose `from` is `vertex`, in insertion order.
    fn out_edges(&self, vertex: &DocumentHandle) -> EdgeIter<'_>;

    /// Edges whose `to` is `vertex`, in insertion order.
    fn in_edges(&self, vertex: &DocumentHandle) -> EdgeIter<'_>;

    /// Returns the kind of a collection, if it exists.
    fn collection_kind(&self, name: &str) -> Option<CollectionKind>;

    /// Edges incident to `vertex` in the given direction.
    ///
    /// `Any` lists outbound edges first, then inbound ones.
    fn edges(&self, vertex: &DocumentHandle, direction: Direction) -> EdgeIter<'_> {
        match direction {
            Direction::Outbound => self.out_edges(vertex),
            Direction::Inbound => self.in_edges(vertex),
            Direction::Any => Box::new(self.out_edges(vertex).chain(self.in_edges(vertex))),
        }
    }
}

/// Name, kind and document count of a collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CollectionInfo {
    /// Collection name.
    pub name: String,
    /// Vertex or edge.
    pub kind: CollectionKind,
    /// Number of documents.
    pub count: usize,
}

/// Pluggable vertex/edge storage.
///
/// Implementations must be safe to share between threads. Mutations must be
/// mutually exclusive with live snapshots.
pub trait GraphStore: Send + Sync {
    /// Read view type; holds whatever lock keeps it consistent.
    type Snapshot<'a>: GraphRead
    where
        Self: 'a;

    /// Takes a consistent read view.
    fn snapshot(&self) -> Self::Snapshot<'_>;

    // === Collections ===

    /// Creates an empty collection.
    ///
    /// Fails with `DuplicateCollection` if the name is taken.
    fn create_collection(&self, name: &str, kind: CollectionKind) -> Result<()>;

    /// Deletes a collection and its documents.
    ///
    /// Deleting a vertex collection also deletes every edge touching one of
    /// its vertices.
    fn delete_collection(&self, name: &str) -> Result<()>;

    /// Lists collections in creation order.
    fn collections(&self) -> Vec<CollectionInfo>;

    // === Documents ===

    /// Inserts a vertex, creating its collection if needed.
    fn put_vertex(&self, vertex: Vertex) -> Result<()>;

    /// Inserts an edge, creating its collection if needed.
    ///
    /// Both endpoints must exist.
    fn put_edge(&self, edge: Edge) -> Result<()>;

    /// Merges `properties` into an existing vertex.
    fn update_vertex(&self, handle: &DocumentHandle, properties: PropertyMap) -> Result<()>;

    /// Removes a vertex and every edge touching it.
    fn remove_vertex(&self, handle: &DocumentHandle) -> Result<Vertex>;

    /// Removes an edge.
    fn remove_edge(&self, handle: &DocumentHandle) -> Result<Edge>;

    // === Provided reads ===

    /// Returns the kind of a collection, if it exists.
    fn collection_kind(&self, name: &str) -> Option<CollectionKind> {
        self.snapshot().collection_kind(name)
    }

    /// Fetches a copy of a vertex.
    fn get_vertex(&self, handle: &DocumentHandle) -> Result<Vertex> {
        self.snapshot()
            .vertex(handle)
            .cloned()
            .ok_or_else(|| Error::VertexNotFound(handle.clone()))
    }

    /// Fetches a copy of an edge.
    fn get_edge(&self, handle: &DocumentHandle) -> Result<Edge> {
        self.snapshot()
            .edge(handle)
            .cloned()
            .ok_or_else(|| Error::EdgeNotFound(handle.clone()))
    }

    /// Copies of the edges leaving `vertex`.
    fn get_out_edges(&self, vertex: &DocumentHandle) -> Vec<Edge> {
        self.snapshot().out_edges(vertex).cloned().collect()
    }

    /// Copies of the edges entering `vertex`.
    fn get_in_edges(&self, vertex: &DocumentHandle) -> Vec<Edge> {
        self.snapshot().in_edges(vertex).cloned().collect()
    }

    /// Total number of vertices.
    fn vertex_count(&self) -> usize {
        self.collections()
            .iter()
            .filter(|c| c.kind == CollectionKind::Vertex)
            .map(|c| c.count)
            .sum()
    }

    /// Total number of edges.
    fn edge_count(&self) -> usize {
        self.collections()
            .iter()
            .filter(|c| c.kind == CollectionKind::Edge)
            .map(|c| c.count)
            .sum()
    }
}
