//! In-memory graph store.

use std::sync::Arc;

use graphwalk_common::types::{CollectionKind, DocumentHandle, PropertyMap, validate_collection_name};
use graphwalk_common::utils::error::{Error, Result};
use graphwalk_common::utils::hash::FastHashSet;
use indexmap::IndexMap;
use parking_lot::{RwLock, RwLockReadGuard};

use super::document::{Edge, Vertex};
use super::store::{CollectionInfo, EdgeIter, GraphRead, GraphStore};
use crate::index::adjacency::AdjacencyIndex;

/// Configuration for the in-memory store.
#[derive(Debug, Clone)]
pub struct MemoryStoreConfig {
    /// Whether to maintain backward adjacency lists.
    ///
    /// Without them inbound lookups scan every edge collection.
    pub backward_edges: bool,
    /// Initial capacity for adjacency lists.
    pub initial_vertex_capacity: usize,
    /// Initial capacity per edge collection.
    pub initial_edge_capacity: usize,
}

impl Default for MemoryStoreConfig {
    fn default() -> Self {
        Self {
            backward_edges: true,
            initial_vertex_capacity: 1024,
            initial_edge_capacity: 4096,
        }
    }
}

/// Documents of one collection, keyed by document key.
type Documents<T> = IndexMap<Arc<str>, T>;

/// Everything behind the store lock.
#[derive(Debug)]
struct StoreData {
    /// Vertex collections in creation order.
    vertex_collections: IndexMap<Arc<str>, Documents<Vertex>>,
    /// Edge collections in creation order.
    edge_collections: IndexMap<Arc<str>, Documents<Edge>>,
    /// Forward adjacency (outgoing edges).
    outgoing: AdjacencyIndex,
    /// Backward adjacency (incoming edges), if enabled.
    incoming: Option<AdjacencyIndex>,
}

impl StoreData {
    fn kind_of(&self, name: &str) -> Option<CollectionKind> {
        if self.vertex_collections.contains_key(name) {
            Some(CollectionKind::Vertex)
        } else if self.edge_collections.contains_key(name) {
            Some(CollectionKind::Edge)
        } else {
            None
        }
    }

    fn vertex(&self, handle: &DocumentHandle) -> Option<&Vertex> {
        self.vertex_collections
            .get(handle.collection())?
            .get(handle.key())
    }

    fn edge(&self, handle: &DocumentHandle) -> Option<&Edge> {
        self.edge_collections
            .get(handle.collection())?
            .get(handle.key())
    }

    /// Returns the documents of `name`, creating the collection if absent.
    fn vertex_documents(&mut self, name: &str) -> Result<&mut Documents<Vertex>> {
        if self.edge_collections.contains_key(name) {
            return Err(Error::CollectionTypeMismatch {
                collection: name.to_string(),
                expected: CollectionKind::Vertex,
            });
        }
        Ok(self
            .vertex_collections
            .entry(name.into())
            .or_insert_with(|| {
                tracing::debug!(collection = name, "creating vertex collection");
                Documents::new()
            }))
    }

    fn edge_documents(&mut self, name: &str, capacity: usize) -> Result<&mut Documents<Edge>> {
        if self.vertex_collections.contains_key(name) {
            return Err(Error::CollectionTypeMismatch {
                collection: name.to_string(),
                expected: CollectionKind::Edge,
            });
        }
        Ok(self
            .edge_collections
            .entry(name.into())
            .or_insert_with(|| {
                tracing::debug!(collection = name, "creating edge collection");
                Documents::with_capacity(capacity)
            }))
    }

    fn index_edge(&mut self, edge: &Edge) {
        self.outgoing
            .add_edge(edge.from.clone(), edge.to.clone(), edge.handle.clone());
        if let Some(ref mut incoming) = self.incoming {
            incoming.add_edge(edge.to.clone(), edge.from.clone(), edge.handle.clone());
        }
    }

    fn unindex_edge(&mut self, edge: &Edge) {
        self.outgoing.remove_edge(&edge.from, &edge.handle);
        if let Some(ref mut incoming) = self.incoming {
            incoming.remove_edge(&edge.to, &edge.handle);
        }
    }

    /// Removes one edge record and its index entries.
    fn take_edge(&mut self, handle: &DocumentHandle) -> Option<Edge> {
        let edge = self
            .edge_collections
            .get_mut(handle.collection())?
            .shift_remove(handle.key())?;
        self.unindex_edge(&edge);
        Some(edge)
    }

    /// Removes a batch of edges and their index entries.
    ///
    /// Every affected collection and adjacency list is rewritten once.
    /// Returns how many of `handles` existed.
    fn take_edges(&mut self, handles: &FastHashSet<DocumentHandle>) -> usize {
        if handles.is_empty() {
            return 0;
        }
        let collections: FastHashSet<&str> = handles.iter().map(DocumentHandle::collection).collect();
        let mut endpoints = Vec::new();
        for (name, docs) in &mut self.edge_collections {
            if !collections.contains(name.as_ref()) {
                continue;
            }
            docs.retain(|_, edge| {
                let keep = !handles.contains(&edge.handle);
                if !keep {
                    endpoints.push((edge.from.clone(), edge.to.clone()));
                }
                keep
            });
        }
        self.unindex_edges(&endpoints, handles);
        endpoints.len()
    }

    fn unindex_edges(
        &mut self,
        endpoints: &[(DocumentHandle, DocumentHandle)],
        handles: &FastHashSet<DocumentHandle>,
    ) {
        self.outgoing
            .remove_edges(endpoints.iter().map(|(from, _)| from), handles);
        if let Some(ref mut incoming) = self.incoming {
            incoming.remove_edges(endpoints.iter().map(|(_, to)| to), handles);
        }
    }

    /// Handles of every edge touching any of `vertices`.
    fn incident_edges<'v>(
        &self,
        vertices: impl IntoIterator<Item = &'v DocumentHandle>,
    ) -> FastHashSet<DocumentHandle> {
        let vertices: FastHashSet<&DocumentHandle> = vertices.into_iter().collect();
        let mut handles = FastHashSet::default();
        for vertex in &vertices {
            handles.extend(self.outgoing.edges(vertex).cloned());
            if let Some(ref incoming) = self.incoming {
                handles.extend(incoming.edges(vertex).cloned());
            }
        }
        if self.incoming.is_none() {
            // one scan for the whole batch
            handles.extend(
                self.edge_collections
                    .values()
                    .flat_map(|docs| docs.values())
                    .filter(|e| vertices.contains(&e.to))
                    .map(|e| e.handle.clone()),
            );
        }
        handles
    }

    fn take_vertex(&mut self, handle: &DocumentHandle) -> Option<(Vertex, usize)> {
        let vertex = self
            .vertex_collections
            .get_mut(handle.collection())?
            .shift_remove(handle.key())?;
        let incident = self.incident_edges([handle]);
        let removed = self.take_edges(&incident);
        Some((vertex, removed))
    }
}

/// The in-memory graph store.
///
/// All data sits behind one reader-writer lock: any number of traversals
/// can read concurrently, and a mutation waits until they finish.
pub struct MemoryStore {
    /// Configuration.
    config: MemoryStoreConfig,
    /// Collections, documents, and adjacency indexes.
    data: RwLock<StoreData>,
}

impl MemoryStore {
    /// Creates an empty store with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(MemoryStoreConfig::default())
    }

    /// Creates an empty store with custom configuration.
    #[must_use]
    pub fn with_config(config: MemoryStoreConfig) -> Self {
        let incoming = config
            .backward_edges
            .then(|| AdjacencyIndex::with_capacity(config.initial_vertex_capacity));

        Self {
            data: RwLock::new(StoreData {
                vertex_collections: IndexMap::new(),
                edge_collections: IndexMap::new(),
                outgoing: AdjacencyIndex::with_capacity(config.initial_vertex_capacity),
                incoming,
            }),
            config,
        }
    }

    /// Returns the store configuration.
    #[must_use]
    pub fn config(&self) -> &MemoryStoreConfig {
        &self.config
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryStore")
            .field("config", &self.config)
            .field("vertices", &self.vertex_count())
            .field("edges", &self.edge_count())
            .finish()
    }
}

/// Read view of a [`MemoryStore`]; holds the read lock until dropped.
pub struct MemorySnapshot<'a> {
    data: RwLockReadGuard<'a, StoreData>,
}

impl GraphRead for MemorySnapshot<'_> {
    fn vertex(&self, handle: &DocumentHandle) -> Option<&Vertex> {
        self.data.vertex(handle)
    }

    fn edge(&self, handle: &DocumentHandle) -> Option<&Edge> {
        self.data.edge(handle)
    }

    fn out_edges(&self, vertex: &DocumentHandle) -> EdgeIter<'_> {
        let data: &StoreData = &self.data;
        Box::new(data.outgoing.edges(vertex).filter_map(|h| data.edge(h)))
    }

    fn in_edges(&self, vertex: &DocumentHandle) -> EdgeIter<'_> {
        let data: &StoreData = &self.data;
        match data.incoming {
            Some(ref incoming) => Box::new(incoming.edges(vertex).filter_map(|h| data.edge(h))),
            None => {
                let vertex = vertex.clone();
                Box::new(
                    data.edge_collections
                        .values()
                        .flat_map(|docs| docs.values())
                        .filter(move |e| e.to == vertex),
                )
            }
        }
    }

    fn collection_kind(&self, name: &str) -> Option<CollectionKind> {
        self.data.kind_of(name)
    }
}

impl GraphStore for MemoryStore {
    type Snapshot<'a> = MemorySnapshot<'a>;

    fn snapshot(&self) -> MemorySnapshot<'_> {
        MemorySnapshot {
            data: self.data.read(),
        }
    }

    // === Collections ===

    fn create_collection(&self, name: &str, kind: CollectionKind) -> Result<()> {
        validate_collection_name(name)?;
        let mut data = self.data.write();
        if data.kind_of(name).is_some() {
            return Err(Error::DuplicateCollection(name.to_string()));
        }
        match kind {
            CollectionKind::Vertex => {
                data.vertex_collections.insert(name.into(), Documents::new());
            }
            CollectionKind::Edge => {
                data.edge_collections.insert(
                    name.into(),
                    Documents::with_capacity(self.config.initial_edge_capacity),
                );
            }
        }
        tracing::debug!(collection = name, %kind, "created collection");
        Ok(())
    }

    fn delete_collection(&self, name: &str) -> Result<()> {
        let mut data = self.data.write();
        match data.kind_of(name) {
            Some(CollectionKind::Vertex) => {
                let docs = data
                    .vertex_collections
                    .shift_remove(name)
                    .unwrap_or_default();
                let incident = data.incident_edges(docs.values().map(|v| &v.handle));
                let cascaded = data.take_edges(&incident);
                tracing::debug!(
                    collection = name,
                    vertices = docs.len(),
                    cascaded_edges = cascaded,
                    "deleted vertex collection"
                );
                Ok(())
            }
            Some(CollectionKind::Edge) => {
                let docs = data.edge_collections.shift_remove(name).unwrap_or_default();
                let handles: FastHashSet<DocumentHandle> =
                    docs.values().map(|e| e.handle.clone()).collect();
                let endpoints: Vec<_> = docs.values().map(|e| (e.from.clone(), e.to.clone())).collect();
                data.unindex_edges(&endpoints, &handles);
                tracing::debug!(collection = name, edges = docs.len(), "deleted edge collection");
                Ok(())
            }
            None => Err(Error::CollectionNotFound(name.to_string())),
        }
    }

    fn collections(&self) -> Vec<CollectionInfo> {
        let data = self.data.read();
        let vertices = data.vertex_collections.iter().map(|(name, docs)| CollectionInfo {
            name: name.to_string(),
            kind: CollectionKind::Vertex,
            count: docs.len(),
        });
        let edges = data.edge_collections.iter().map(|(name, docs)| CollectionInfo {
            name: name.to_string(),
            kind: CollectionKind::Edge,
            count: docs.len(),
        });
        vertices.chain(edges).collect()
    }

    // === Documents ===

    fn put_vertex(&self, vertex: Vertex) -> Result<()> {
        vertex.validate()?;
        let mut data = self.data.write();
        let docs = data.vertex_documents(vertex.collection())?;
        if docs.contains_key(vertex.key()) {
            return Err(Error::DuplicateId(vertex.handle));
        }
        docs.insert(vertex.key().into(), vertex);
        Ok(())
    }

    fn put_edge(&self, edge: Edge) -> Result<()> {
        edge.validate()?;
        let mut data = self.data.write();
        for endpoint in [&edge.from, &edge.to] {
            if data.vertex(endpoint).is_none() {
                return Err(Error::VertexNotFound(endpoint.clone()));
            }
        }

        let docs = data.edge_documents(edge.collection(), self.config.initial_edge_capacity)?;
        if docs.contains_key(edge.key()) {
            return Err(Error::DuplicateId(edge.handle));
        }
        docs.insert(edge.key().into(), edge.clone());
        data.index_edge(&edge);
        Ok(())
    }

    fn update_vertex(&self, handle: &DocumentHandle, properties: PropertyMap) -> Result<()> {
        let mut data = self.data.write();
        let vertex = data
            .vertex_collections
            .get_mut(handle.collection())
            .and_then(|docs| docs.get_mut(handle.key()))
            .ok_or_else(|| Error::VertexNotFound(handle.clone()))?;

        let mut updated = vertex.properties.clone();
        updated.extend(properties);
        let candidate = Vertex {
            handle: handle.clone(),
            properties: updated,
        };
        candidate.validate()?;
        vertex.properties = candidate.properties;
        Ok(())
    }

    fn remove_vertex(&self, handle: &DocumentHandle) -> Result<Vertex> {
        let mut data = self.data.write();
        let (vertex, cascaded) = data
            .take_vertex(handle)
            .ok_or_else(|| Error::VertexNotFound(handle.clone()))?;
        tracing::debug!(vertex = %handle, cascaded_edges = cascaded, "removed vertex");
        Ok(vertex)
    }

    fn remove_edge(&self, handle: &DocumentHandle) -> Result<Edge> {
        self.data
            .write()
            .take_edge(handle)
            .ok_or_else(|| Error::EdgeNotFound(handle.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Direction;

    fn h(s: &str) -> DocumentHandle {
        DocumentHandle::parse(s).unwrap()
    }

    fn edge(id: &str, from: &str, to: &str) -> Edge {
        Edge::new(h(id), h(from), h(to))
    }

    fn friends(config: MemoryStoreConfig) -> MemoryStore {
        let store = MemoryStore::with_config(config);
        for key in ["a", "b", "c", "d"] {
            store.put_vertex(Vertex::new(h(&format!("Person/{key}")))).unwrap();
        }
        store.put_edge(edge("Friend/x", "Person/a", "Person/b")).unwrap();
        store.put_edge(edge("Friend/y", "Person/b", "Person/d")).unwrap();
        store.put_edge(edge("Friend/z", "Person/c", "Person/a")).unwrap();
        store.put_edge(edge("Friend/h", "Person/a", "Person/d")).unwrap();
        store
    }

    fn keys(edges: &[Edge]) -> Vec<&str> {
        edges.iter().map(Edge::key).collect()
    }

    #[test]
    fn test_put_and_get_vertex() {
        let store = MemoryStore::new();
        let v = Vertex::new(h("Person/matteo")).with_property("firstName", "Matteo");
        store.put_vertex(v.clone()).unwrap();

        assert_eq!(store.get_vertex(&h("Person/matteo")).unwrap(), v);
        assert_eq!(
            store.get_vertex(&h("Person/antonio")),
            Err(Error::VertexNotFound(h("Person/antonio")))
        );
        assert_eq!(store.collection_kind("Person"), Some(CollectionKind::Vertex));
    }

    #[test]
    fn test_duplicate_vertex() {
        let store = MemoryStore::new();
        store.put_vertex(Vertex::new(h("Person/a"))).unwrap();
        assert_eq!(
            store.put_vertex(Vertex::new(h("Person/a"))),
            Err(Error::DuplicateId(h("Person/a")))
        );
        assert_eq!(store.vertex_count(), 1);
    }

    #[test]
    fn test_out_and_in_edges() {
        let store = friends(MemoryStoreConfig::default());

        assert_eq!(keys(&store.get_out_edges(&h("Person/a"))), ["x", "h"]);
        assert_eq!(keys(&store.get_in_edges(&h("Person/a"))), ["z"]);
        assert_eq!(keys(&store.get_in_edges(&h("Person/d"))), ["y", "h"]);
        assert!(store.get_out_edges(&h("Person/d")).is_empty());
    }

    #[test]
    fn test_in_edges_without_backward_index() {
        let store = friends(MemoryStoreConfig {
            backward_edges: false,
            ..Default::default()
        });

        assert_eq!(keys(&store.get_in_edges(&h("Person/d"))), ["y", "h"]);
        let snapshot = store.snapshot();
        let any: Vec<&str> = snapshot
            .edges(&h("Person/a"), Direction::Any)
            .map(Edge::key)
            .collect();
        assert_eq!(any, ["x", "h", "z"]);
    }

    #[test]
    fn test_edge_requires_endpoints() {
        let store = MemoryStore::new();
        store.put_vertex(Vertex::new(h("Person/a"))).unwrap();

        assert_eq!(
            store.put_edge(edge("Friend/x", "Person/a", "Person/b")),
            Err(Error::VertexNotFound(h("Person/b")))
        );
        assert_eq!(store.edge_count(), 0);
    }

    #[test]
    fn test_duplicate_edge() {
        let store = friends(MemoryStoreConfig::default());
        assert_eq!(
            store.put_edge(edge("Friend/x", "Person/c", "Person/d")),
            Err(Error::DuplicateId(h("Friend/x")))
        );
        assert_eq!(keys(&store.get_out_edges(&h("Person/c"))), ["z"]);
    }

    #[test]
    fn test_collection_kind_mismatch() {
        let store = friends(MemoryStoreConfig::default());

        assert_eq!(
            store.put_vertex(Vertex::new(h("Friend/q"))),
            Err(Error::CollectionTypeMismatch {
                collection: "Friend".into(),
                expected: CollectionKind::Vertex,
            })
        );
        assert!(matches!(
            store.put_edge(edge("Person/e", "Person/a", "Person/b")),
            Err(Error::CollectionTypeMismatch { .. })
        ));
    }

    #[test]
    fn test_create_collection() {
        let store = MemoryStore::new();
        store.create_collection("Person", CollectionKind::Vertex).unwrap();
        assert_eq!(
            store.create_collection("Person", CollectionKind::Edge),
            Err(Error::DuplicateCollection("Person".into()))
        );
        assert_eq!(
            store.create_collection("bad name", CollectionKind::Vertex),
            Err(Error::InvalidCollectionName("bad name".into()))
        );

        let infos = store.collections();
        assert_eq!(infos.len(), 1);
        assert_eq!(infos[0].count, 0);
    }

    #[test]
    fn test_delete_edge_collection() {
        let store = friends(MemoryStoreConfig::default());
        store.delete_collection("Friend").unwrap();

        assert_eq!(store.edge_count(), 0);
        assert_eq!(store.vertex_count(), 4);
        assert!(store.get_out_edges(&h("Person/a")).is_empty());
        assert!(store.get_in_edges(&h("Person/d")).is_empty());
        assert_eq!(
            store.delete_collection("Friend"),
            Err(Error::CollectionNotFound("Friend".into()))
        );
    }

    #[test]
    fn test_delete_vertex_collection_cascades_edges() {
        let store = friends(MemoryStoreConfig::default());
        store.create_collection("City", CollectionKind::Vertex).unwrap();
        store.put_vertex(Vertex::new(h("City/rome"))).unwrap();
        store.put_edge(edge("LivesIn/1", "Person/a", "City/rome")).unwrap();

        store.delete_collection("City").unwrap();

        assert_eq!(store.edge_count(), 4);
        assert_eq!(keys(&store.get_out_edges(&h("Person/a"))), ["x", "h"]);
        assert_eq!(
            store.get_edge(&h("LivesIn/1")),
            Err(Error::EdgeNotFound(h("LivesIn/1")))
        );
    }

    #[test]
    fn test_remove_vertex_cascades() {
        for backward_edges in [true, false] {
            let store = friends(MemoryStoreConfig {
                backward_edges,
                ..Default::default()
            });
            store.remove_vertex(&h("Person/a")).unwrap();

            // x, z and h touched a
            assert_eq!(store.edge_count(), 1);
            assert_eq!(keys(&store.get_in_edges(&h("Person/d"))), ["y"]);
            assert!(store.get_out_edges(&h("Person/c")).is_empty());
        }
    }

    #[test]
    fn test_remove_hub_vertex_is_linear() {
        const SPOKES: usize = 40_000;

        for backward_edges in [true, false] {
            let store = MemoryStore::with_config(MemoryStoreConfig {
                backward_edges,
                ..Default::default()
            });
            store.put_vertex(Vertex::new(h("P/hub"))).unwrap();
            store.put_vertex(Vertex::new(h("P/other"))).unwrap();
            for i in 0..SPOKES {
                store.put_vertex(Vertex::new(h(&format!("P/v{i}")))).unwrap();
                store
                    .put_edge(edge(&format!("E/s{i}"), &format!("P/v{i}"), "P/hub"))
                    .unwrap();
            }
            store.put_edge(edge("E/keep", "P/v0", "P/other")).unwrap();

            let started = std::time::Instant::now();
            store.remove_vertex(&h("P/hub")).unwrap();
            let elapsed = started.elapsed();

            assert!(elapsed < std::time::Duration::from_secs(5), "took {elapsed:?}");
            assert_eq!(store.edge_count(), 1);
            assert_eq!(keys(&store.get_out_edges(&h("P/v0"))), ["keep"]);
            assert_eq!(keys(&store.get_in_edges(&h("P/other"))), ["keep"]);
        }
    }

    #[test]
    fn test_delete_edge_collection_keeps_other_edges() {
        let store = friends(MemoryStoreConfig::default());
        store.put_edge(edge("Likes/1", "Person/a", "Person/d")).unwrap();
        store.delete_collection("Friend").unwrap();

        assert_eq!(keys(&store.get_out_edges(&h("Person/a"))), ["1"]);
        assert_eq!(keys(&store.get_in_edges(&h("Person/d"))), ["1"]);
        assert_eq!(store.edge_count(), 1);
    }

    #[test]
    fn test_remove_vertex_with_self_loop() {
        let store = MemoryStore::new();
        store.put_vertex(Vertex::new(h("Person/a"))).unwrap();
        store.put_edge(edge("Friend/self", "Person/a", "Person/a")).unwrap();

        store.remove_vertex(&h("Person/a")).unwrap();
        assert_eq!(store.edge_count(), 0);
    }

    #[test]
    fn test_remove_edge() {
        let store = friends(MemoryStoreConfig::default());
        let removed = store.remove_edge(&h("Friend/x")).unwrap();
        assert_eq!(removed.to, h("Person/b"));
        assert_eq!(keys(&store.get_out_edges(&h("Person/a"))), ["h"]);
        assert!(store.get_in_edges(&h("Person/b")).is_empty());
        assert!(store.remove_edge(&h("Friend/x")).is_err());
    }

    #[test]
    fn test_update_vertex_merges() {
        let store = MemoryStore::new();
        store
            .put_vertex(Vertex::new(h("Person/a")).with_property("firstName", "A"))
            .unwrap();

        let mut props = PropertyMap::new();
        props.insert("age".into(), 41i64.into());
        props.insert("firstName".into(), "Alessandro".into());
        store.update_vertex(&h("Person/a"), props).unwrap();

        let v = store.get_vertex(&h("Person/a")).unwrap();
        assert_eq!(v.get_property("firstName").and_then(|x| x.as_str()), Some("Alessandro"));
        assert_eq!(v.get_property("age").and_then(|x| x.as_int()), Some(41));

        let mut bad = PropertyMap::new();
        bad.insert("_id".into(), "x".into());
        assert!(store.update_vertex(&h("Person/a"), bad).is_err());
        assert!(store.get_vertex(&h("Person/a")).unwrap().get_property("_id").is_none());
    }

    #[test]
    fn test_collections_listing_order() {
        let store = friends(MemoryStoreConfig::default());
        let infos = store.collections();
        let names: Vec<_> = infos.iter().map(|c| (c.name.as_str(), c.kind, c.count)).collect();
        assert_eq!(
            names,
            [
                ("Person", CollectionKind::Vertex, 4),
                ("Friend", CollectionKind::Edge, 4)
            ]
        );
    }
}
